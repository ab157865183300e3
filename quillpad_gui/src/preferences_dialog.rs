use eframe::egui;
use egui::{Color32, RichText};
use quillpad_core::{Color, Prompter};
use quillpad_settings::{
    Preferences, SettingsStore, AUTO_SAVE_INTERVAL_RANGE, FONT_FAMILIES, FONT_SIZE_RANGE,
    TAB_SIZE_RANGE,
};
use tracing::{info, warn};

use crate::editor_view::{color32_from_color, color_from_color32};

const TITLE: &str = "Preferences";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PreferencesTab {
    General,
    Editor,
}

/// What the main window must do after a frame of the dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResponse {
    Open,
    Applied(Preferences),
    /// Closed; carries the applied preferences when closed with OK.
    Closed(Option<Preferences>),
}

#[derive(Debug)]
pub struct PreferencesDialog {
    form: Preferences,
    tab: PreferencesTab,
}

impl PreferencesDialog {
    /// Loads every field from the store, defaulting absent ones.
    pub fn open(store: &SettingsStore) -> Self {
        Self {
            form: Preferences::load(store),
            tab: PreferencesTab::General,
        }
    }

    pub fn form(&self) -> &Preferences {
        &self.form
    }

    /// Puts the hard-coded defaults into the form after confirmation; nothing is persisted.
    pub fn reset(&mut self, prompter: &mut dyn Prompter) -> bool {
        if !prompter.confirm(
            "Reset Settings",
            "Are you sure you want to reset all settings to default values?",
        ) {
            return false;
        }
        self.form = Preferences::default();
        prompter.inform("Reset Settings", "Settings have been reset to default values.");
        true
    }

    /// Persists the form and flushes the store.
    pub fn apply(&mut self, store: &mut SettingsStore, prompter: &mut dyn Prompter) -> Preferences {
        self.form.sanitize();
        self.form.write_to(store);
        match store.sync() {
            Ok(()) => {
                info!("preferences applied");
                prompter.inform(TITLE, "Settings applied successfully!");
            }
            Err(err) => {
                warn!(error = %err, "failed to persist preferences");
                prompter.warn(TITLE, &format!("Cannot save settings:\n{err}."));
            }
        }
        self.form.clone()
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        store: &mut SettingsStore,
        prompter: &mut dyn Prompter,
    ) -> DialogResponse {
        let mut response = DialogResponse::Open;
        let mut open = true;
        egui::Window::new(TITLE)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.tab, PreferencesTab::General, "General");
                    ui.selectable_value(&mut self.tab, PreferencesTab::Editor, "Editor");
                });
                ui.separator();
                match self.tab {
                    PreferencesTab::General => self.general_tab(ui),
                    PreferencesTab::Editor => self.editor_tab(ui),
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Reset").clicked() {
                        self.reset(prompter);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Apply").clicked() {
                            response = DialogResponse::Applied(self.apply(store, prompter));
                        }
                        if ui.button("Cancel").clicked() {
                            response = DialogResponse::Closed(None);
                        }
                        if ui.button("OK").clicked() {
                            response = DialogResponse::Closed(Some(self.apply(store, prompter)));
                        }
                    });
                });
            });
        if !open {
            response = DialogResponse::Closed(None);
        }
        response
    }

    fn general_tab(&mut self, ui: &mut egui::Ui) {
        let general = &mut self.form.general;
        egui::Grid::new("preferences_general")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Author Name:");
                ui.add(egui::TextEdit::singleline(&mut general.author).hint_text("Enter your name"));
                ui.end_row();

                ui.label("");
                ui.checkbox(&mut general.auto_save, "Enable auto-save");
                ui.end_row();

                ui.label("Auto-save interval:");
                ui.add_enabled(
                    general.auto_save,
                    egui::DragValue::new(&mut general.auto_save_interval)
                        .clamp_range(AUTO_SAVE_INTERVAL_RANGE)
                        .speed(1.0)
                        .suffix(" minutes"),
                );
                ui.end_row();

                ui.label("");
                ui.checkbox(&mut general.show_status_bar, "Show status bar");
                ui.end_row();

                ui.label("");
                ui.checkbox(&mut general.show_tool_bar, "Show toolbar");
                ui.end_row();
            });
    }

    fn editor_tab(&mut self, ui: &mut egui::Ui) {
        let editor = &mut self.form.editor;
        ui.label(RichText::new("Font Settings").strong());
        egui::Grid::new("preferences_font")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Font Family:");
                egui::ComboBox::from_id_source("preferences_font_family")
                    .width(180.0)
                    .selected_text(editor.font_family.as_str())
                    .show_ui(ui, |ui| {
                        for family in FONT_FAMILIES {
                            ui.selectable_value(&mut editor.font_family, family.to_string(), family);
                        }
                    });
                ui.end_row();

                ui.label("Font Size:");
                ui.add(
                    egui::DragValue::new(&mut editor.font_size)
                        .clamp_range(FONT_SIZE_RANGE)
                        .speed(1.0),
                );
                ui.end_row();
            });

        ui.add_space(8.0);
        ui.label(RichText::new("Color Settings").strong());
        egui::Grid::new("preferences_colors")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Background:");
                color_row(ui, &mut editor.background_color);
                ui.end_row();

                ui.label("Text:");
                color_row(ui, &mut editor.text_color);
                ui.end_row();
            });

        ui.add_space(8.0);
        ui.label(RichText::new("Editor Options").strong());
        egui::Grid::new("preferences_options")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("");
                ui.checkbox(&mut editor.word_wrap, "Enable word wrap");
                ui.end_row();

                ui.label("");
                ui.checkbox(&mut editor.line_numbers, "Show line numbers");
                ui.end_row();

                ui.label("Tab Size:");
                ui.add(
                    egui::DragValue::new(&mut editor.tab_size)
                        .clamp_range(TAB_SIZE_RANGE)
                        .speed(1.0),
                );
                ui.end_row();
            });
    }
}

fn color_row(ui: &mut egui::Ui, color: &mut Color) {
    let mut color32: Color32 = color32_from_color(*color);
    if ui.color_edit_button_srgba(&mut color32).changed() {
        *color = color_from_color32(color32);
    }
    ui.monospace(color.to_hex());
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillpad_core::SaveChoice;
    use quillpad_settings::keys;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingPrompter {
        confirm_answer: bool,
        infos: Vec<String>,
        warnings: Vec<String>,
    }

    impl Prompter for RecordingPrompter {
        fn ask_save_changes(&mut self) -> SaveChoice {
            SaveChoice::Cancel
        }

        fn pick_open_path(&mut self) -> Option<PathBuf> {
            None
        }

        fn pick_save_path(&mut self) -> Option<PathBuf> {
            None
        }

        fn warn(&mut self, _title: &str, message: &str) {
            self.warnings.push(message.to_string());
        }

        fn inform(&mut self, _title: &str, message: &str) {
            self.infos.push(message.to_string());
        }

        fn confirm(&mut self, _title: &str, _message: &str) -> bool {
            self.confirm_answer
        }
    }

    fn customised_store() -> SettingsStore {
        let mut store = SettingsStore::in_memory();
        let mut prefs = Preferences::default();
        prefs.general.auto_save_interval = 30;
        prefs.editor.tab_size = 8;
        prefs.editor.word_wrap = false;
        prefs.editor.line_numbers = true;
        prefs.editor.background_color = Color::rgb(0x10, 0x10, 0x10);
        prefs.editor.text_color = Color::rgb(0xee, 0xee, 0xee);
        prefs.write_to(&mut store);
        store
    }

    #[test]
    fn open_loads_current_values() {
        let store = customised_store();
        let dialog = PreferencesDialog::open(&store);
        assert_eq!(dialog.form().editor.tab_size, 8);
        assert!(!dialog.form().editor.word_wrap);
    }

    #[test]
    fn reset_restores_defaults_without_touching_the_store() {
        let store = customised_store();
        let mut dialog = PreferencesDialog::open(&store);
        let mut prompter = RecordingPrompter {
            confirm_answer: true,
            ..Default::default()
        };

        assert!(dialog.reset(&mut prompter));

        let form = dialog.form();
        assert_eq!(form.general.auto_save_interval, 5);
        assert_eq!(form.editor.tab_size, 4);
        assert!(form.editor.word_wrap);
        assert!(!form.editor.line_numbers);
        assert_eq!(form.editor.background_color, Color::WHITE);
        assert_eq!(form.editor.text_color, Color::BLACK);
        assert_eq!(store.int_or(keys::TAB_SIZE, 0), 8);
        assert_eq!(
            prompter.infos,
            vec!["Settings have been reset to default values.".to_string()]
        );
    }

    #[test]
    fn declined_reset_keeps_form() {
        let store = customised_store();
        let mut dialog = PreferencesDialog::open(&store);
        let mut prompter = RecordingPrompter::default();

        assert!(!dialog.reset(&mut prompter));
        assert_eq!(dialog.form().editor.tab_size, 8);
        assert!(prompter.infos.is_empty());
    }

    #[test]
    fn apply_persists_reset_values() {
        let mut store = customised_store();
        let mut dialog = PreferencesDialog::open(&store);
        let mut prompter = RecordingPrompter {
            confirm_answer: true,
            ..Default::default()
        };
        dialog.reset(&mut prompter);

        let applied = dialog.apply(&mut store, &mut prompter);

        assert_eq!(applied, Preferences::default());
        assert_eq!(Preferences::load(&store), Preferences::default());
        assert_eq!(
            prompter.infos.last().map(String::as_str),
            Some("Settings applied successfully!")
        );
    }

    #[test]
    fn apply_syncs_to_disk() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("settings.json");
        let mut store = SettingsStore::load(&path).expect("load");
        let mut dialog = PreferencesDialog::open(&store);
        dialog.form.general.author = "Grace".to_string();
        let mut prompter = RecordingPrompter::default();

        dialog.apply(&mut store, &mut prompter);

        let reloaded = SettingsStore::load(&path).expect("reload");
        assert_eq!(Preferences::load(&reloaded).general.author, "Grace");
        assert!(prompter.warnings.is_empty());
    }
}
