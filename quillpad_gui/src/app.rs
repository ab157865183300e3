use std::time::Instant;

use eframe::{egui, App, Frame};
use egui::{Align, Key, KeyboardShortcut, Layout, Modifiers, RichText, ViewportCommand};
use once_cell::sync::Lazy;
use quillpad_core::{
    Action, ActionOutcome, CursorStatus, EditorEvent, EditorSession, Prompter, Shortcut,
    ShortcutKey,
};
use quillpad_settings::layout::{FILE_LIST_MAX_WIDTH, FILE_LIST_MIN_WIDTH};
use quillpad_settings::{Preferences, SettingsError, SettingsStore, WindowGeometry, WindowState};
use tracing::{info, warn};

use crate::about_dialog;
use crate::editor_view::EditorView;
use crate::native::{NativePrompter, SystemClipboard};
use crate::preferences_dialog::{DialogResponse, PreferencesDialog};

#[derive(Clone, Copy)]
enum MenuEntry {
    Action(Action),
    Separator,
}

#[derive(Clone, Copy)]
struct MenuSection {
    title: &'static str,
    entries: &'static [MenuEntry],
}

impl MenuSection {
    const fn new(title: &'static str, entries: &'static [MenuEntry]) -> Self {
        Self { title, entries }
    }
}

static MENU_STRUCTURE: Lazy<Vec<MenuSection>> = Lazy::new(|| {
    use MenuEntry::{Action as A, Separator};
    vec![
        MenuSection::new(
            "File",
            &[
                A(Action::New),
                A(Action::Open),
                A(Action::Save),
                A(Action::SaveAs),
                Separator,
                A(Action::Exit),
            ],
        ),
        MenuSection::new(
            "Edit",
            &[
                A(Action::Undo),
                A(Action::Redo),
                Separator,
                A(Action::Cut),
                A(Action::Copy),
                A(Action::Paste),
                A(Action::SelectAll),
                Separator,
                A(Action::Find),
                A(Action::Replace),
            ],
        ),
        MenuSection::new("View", &[A(Action::Preferences)]),
        MenuSection::new("Help", &[A(Action::About), A(Action::AboutToolkit)]),
    ]
});

const TOOLBAR: &[MenuEntry] = &[
    MenuEntry::Action(Action::New),
    MenuEntry::Action(Action::Open),
    MenuEntry::Action(Action::Save),
    MenuEntry::Separator,
    MenuEntry::Action(Action::Undo),
    MenuEntry::Action(Action::Redo),
    MenuEntry::Separator,
    MenuEntry::Action(Action::Cut),
    MenuEntry::Action(Action::Copy),
    MenuEntry::Action(Action::Paste),
];

const FILE_LIST: [&str; 3] = ["Welcome.txt", "Example.txt", "Notes.txt"];

/// Shortcuts the window intercepts, shifted variants first so that
/// Ctrl+Shift+S is not taken for Ctrl+S. Clipboard and select-all shortcuts
/// stay with the focused text widget.
static SHORTCUTS: Lazy<Vec<(KeyboardShortcut, Action)>> = Lazy::new(|| {
    let mut shortcuts: Vec<(Shortcut, Action)> = Action::ALL
        .iter()
        .filter(|action| !action.is_text_widget_native())
        .filter_map(|action| action.shortcut().map(|shortcut| (shortcut, *action)))
        .collect();
    shortcuts.push((
        Shortcut {
            key: ShortcutKey::Z,
            shift: true,
        },
        Action::Redo,
    ));
    shortcuts.sort_by_key(|(shortcut, _)| !shortcut.shift);
    shortcuts
        .into_iter()
        .map(|(shortcut, action)| (keyboard_shortcut(shortcut), action))
        .collect()
});

fn keyboard_shortcut(shortcut: Shortcut) -> KeyboardShortcut {
    let key = match shortcut.key {
        ShortcutKey::A => Key::A,
        ShortcutKey::C => Key::C,
        ShortcutKey::F => Key::F,
        ShortcutKey::H => Key::H,
        ShortcutKey::N => Key::N,
        ShortcutKey::O => Key::O,
        ShortcutKey::Q => Key::Q,
        ShortcutKey::S => Key::S,
        ShortcutKey::V => Key::V,
        ShortcutKey::X => Key::X,
        ShortcutKey::Y => Key::Y,
        ShortcutKey::Z => Key::Z,
    };
    let modifiers = Modifiers {
        shift: shortcut.shift,
        ..Modifiers::COMMAND
    };
    KeyboardShortcut::new(modifiers, key)
}

pub struct MainWindow {
    session: EditorSession,
    view: EditorView,
    store: SettingsStore,
    preferences: Preferences,
    geometry: WindowGeometry,
    window_state: WindowState,
    prompter: NativePrompter,
    clipboard: SystemClipboard,
    preferences_dialog: Option<PreferencesDialog>,
    about_open: bool,
    status_message: Option<(String, Instant)>,
    hovered_tip: Option<&'static str>,
    cursor_status: CursorStatus,
    selected_file: Option<usize>,
    title: String,
    close_confirmed: bool,
}

impl MainWindow {
    pub fn new(cc: &eframe::CreationContext<'_>, store: SettingsStore) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let preferences = Preferences::load(&store);
        let mut session = EditorSession::default();
        let mut view = EditorView::default();
        view.apply_preferences(&preferences, session.editor_mut());
        view.request_focus(&cc.egui_ctx);

        Self {
            cursor_status: session.cursor_status(),
            geometry: WindowGeometry::restore(&store),
            window_state: WindowState::restore(&store),
            session,
            view,
            store,
            preferences,
            prompter: NativePrompter,
            clipboard: SystemClipboard::new(),
            preferences_dialog: None,
            about_open: false,
            status_message: None,
            hovered_tip: None,
            selected_file: None,
            title: String::new(),
            close_confirmed: false,
        }
    }

    fn modal_open(&self) -> bool {
        self.preferences_dialog.is_some() || self.about_open || self.view.has_open_picker()
    }

    fn is_enabled(&self, action: Action) -> bool {
        let editor = self.session.editor();
        match action {
            Action::Undo => editor.can_undo(),
            Action::Redo => editor.can_redo(),
            Action::Cut | Action::Copy => editor.caret().has_selection(),
            _ => true,
        }
    }

    fn run_action(&mut self, ctx: &egui::Context, action: Action) {
        match self
            .session
            .dispatch(action, &mut self.prompter, &mut self.clipboard)
        {
            ActionOutcome::Handled => {}
            ActionOutcome::ShowPreferences => {
                self.preferences_dialog = Some(PreferencesDialog::open(&self.store));
            }
            ActionOutcome::ShowAbout => self.about_open = true,
            ActionOutcome::ShowAboutToolkit => {
                self.prompter
                    .inform("About egui", &about_dialog::toolkit_message());
            }
            ActionOutcome::Quit => {
                self.close_confirmed = true;
                self.save_layout();
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
        }
    }

    fn apply_preferences(&mut self, preferences: Preferences) {
        self.view
            .apply_preferences(&preferences, self.session.editor_mut());
        self.preferences = preferences;
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) || self.close_confirmed {
            return;
        }
        if self.session.handle_close_request(&mut self.prompter) {
            info!("closing main window");
            self.close_confirmed = true;
            self.save_layout();
        } else {
            ctx.send_viewport_cmd(ViewportCommand::CancelClose);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let triggered = ctx.input_mut(|input| {
            SHORTCUTS
                .iter()
                .find(|(shortcut, _)| input.consume_shortcut(shortcut))
                .map(|(_, action)| *action)
        });
        if let Some(action) = triggered {
            self.run_action(ctx, action);
        }
    }

    fn remember_geometry(&mut self, ctx: &egui::Context) {
        ctx.input(|input| {
            let viewport = input.viewport();
            let maximized = viewport.maximized.unwrap_or(false);
            self.geometry.maximized = maximized;
            if maximized {
                return;
            }
            if let Some(outer) = viewport.outer_rect {
                self.geometry.x = outer.min.x;
                self.geometry.y = outer.min.y;
            }
            if let Some(inner) = viewport.inner_rect {
                self.geometry.width = inner.width();
                self.geometry.height = inner.height();
            }
        });
    }

    fn persist_layout(&mut self) -> Result<(), SettingsError> {
        self.geometry.sanitize();
        self.window_state.sanitize();
        self.geometry.save(&mut self.store)?;
        self.window_state.save(&mut self.store)?;
        self.store.sync()
    }

    fn save_layout(&mut self) {
        if let Err(err) = self.persist_layout() {
            warn!(error = %err, "failed to persist window layout");
        }
    }

    fn refresh_status(&mut self, ctx: &egui::Context) {
        let events = self.session.editor_mut().take_events();
        if events.iter().any(EditorEvent::refreshes_status) {
            self.cursor_status = self.session.cursor_status();
            ctx.request_repaint();
        }

        if let Some(message) = self.session.take_status_message() {
            self.status_message = Some((message.text, Instant::now() + message.timeout));
        }
        if let Some((_, deadline)) = &self.status_message {
            let now = Instant::now();
            if now >= *deadline {
                self.status_message = None;
            } else {
                ctx.request_repaint_after(*deadline - now);
            }
        }
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let title = self.session.window_title();
        if title != self.title {
            ctx.send_viewport_cmd(ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }

    fn action_button(&mut self, ui: &mut egui::Ui, action: Action, text: &str) -> bool {
        let mut button = egui::Button::new(text);
        if let Some(shortcut) = action.shortcut() {
            button = button.shortcut_text(ui.ctx().format_shortcut(&keyboard_shortcut(shortcut)));
        }
        let response = ui.add_enabled(self.is_enabled(action), button);
        if response.hovered() {
            self.hovered_tip = Some(action.status_tip());
        }
        response.clicked()
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context, modal: bool) -> Option<Action> {
        let mut pending = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.set_enabled(!modal);
            egui::menu::bar(ui, |ui| {
                for section in MENU_STRUCTURE.iter() {
                    ui.menu_button(section.title, |ui| {
                        for entry in section.entries {
                            match *entry {
                                MenuEntry::Separator => {
                                    ui.separator();
                                }
                                MenuEntry::Action(action) => {
                                    if self.action_button(ui, action, action.label()) {
                                        pending = Some(action);
                                        ui.close_menu();
                                    }
                                }
                            }
                        }
                    });
                }
            });
        });
        pending
    }

    fn show_toolbar(&mut self, ctx: &egui::Context, modal: bool) -> Option<Action> {
        let mut pending = None;
        egui::TopBottomPanel::top("toolbar")
            .resizable(false)
            .exact_height(32.0)
            .show(ctx, |ui| {
                ui.set_enabled(!modal);
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    for entry in TOOLBAR {
                        match *entry {
                            MenuEntry::Separator => {
                                ui.separator();
                            }
                            MenuEntry::Action(action) => {
                                let text = action.label().trim_end_matches("...");
                                if self.action_button(ui, action, text) {
                                    pending = Some(action);
                                }
                            }
                        }
                    }
                });
            });
        pending
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    let message = self
                        .hovered_tip
                        .map(str::to_string)
                        .or_else(|| self.status_message.as_ref().map(|(text, _)| text.clone()));
                    if let Some(message) = message {
                        ui.label(message);
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.cursor_status.size_label());
                        ui.separator();
                        ui.label(self.cursor_status.location_label());
                    });
                });
            });
    }

    fn show_file_list(&mut self, ctx: &egui::Context, modal: bool) {
        let panel = egui::SidePanel::left("file_list")
            .resizable(true)
            .default_width(self.window_state.file_list_width)
            .width_range(FILE_LIST_MIN_WIDTH..=FILE_LIST_MAX_WIDTH)
            .show(ctx, |ui| {
                ui.set_enabled(!modal);
                ui.label(RichText::new("Files").strong());
                ui.separator();
                for (idx, name) in FILE_LIST.iter().enumerate() {
                    let selected = self.selected_file == Some(idx);
                    if ui.selectable_label(selected, *name).clicked() {
                        self.selected_file = Some(idx);
                    }
                }
            });
        self.window_state.file_list_width = panel.response.rect.width();
    }

    fn show_editor(&mut self, ctx: &egui::Context, modal: bool) {
        let frame = egui::Frame::central_panel(&ctx.style()).fill(self.view.background());
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            ui.set_enabled(!modal);
            self.view
                .show(ui, self.session.editor_mut(), &mut self.clipboard);
        });
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(dialog) = self.preferences_dialog.as_mut() {
            match dialog.show(ctx, &mut self.store, &mut self.prompter) {
                DialogResponse::Open => {}
                DialogResponse::Applied(preferences) => self.apply_preferences(preferences),
                DialogResponse::Closed(applied) => {
                    self.preferences_dialog = None;
                    if let Some(preferences) = applied {
                        self.apply_preferences(preferences);
                    }
                }
            }
        }
        if self.about_open {
            self.about_open = about_dialog::show(ctx);
        }
        self.view.show_pickers(ctx, self.session.editor_mut());
    }
}

impl App for MainWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.handle_close_request(ctx);

        let modal = self.modal_open();
        if !modal {
            self.handle_shortcuts(ctx);
        }

        self.hovered_tip = None;
        let mut pending = self.show_menu_bar(ctx, modal);
        if self.preferences.general.show_tool_bar {
            pending = pending.or(self.show_toolbar(ctx, modal));
        }
        if self.preferences.general.show_status_bar {
            self.show_status_bar(ctx);
        }
        self.show_file_list(ctx, modal);
        self.show_editor(ctx, modal);
        self.show_dialogs(ctx);

        if let Some(action) = pending {
            self.run_action(ctx, action);
        }

        self.refresh_status(ctx);
        self.remember_geometry(ctx);
        self.sync_title(ctx);
    }
}
