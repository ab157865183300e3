//! egui rendering of [`TextEditor`]: rich-text layout, caret sync, context menu
//! and the font/color pickers.

use std::ops::Range;

use eframe::egui;
use egui::text::{CCursor, LayoutJob, TextFormat};
use egui::text_edit::{CCursorRange, TextEditState};
use egui::{Color32, FontFamily, FontId, Stroke};
use quillpad_core::{Caret, CharFormat, Clipboard, Color, FontInfo, FormatRuns, TextEditor};
use quillpad_settings::{Preferences, FONT_FAMILIES, FONT_SIZE_RANGE};

const BOLD_LETTER_SPACING: f32 = 0.6;

/// Commands of the text widget's built-in edit menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StandardEdit {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    Delete,
    SelectAll,
}

/// `None` marks a separator.
const STANDARD_EDIT_MENU: [Option<StandardEdit>; 9] = [
    Some(StandardEdit::Undo),
    Some(StandardEdit::Redo),
    None,
    Some(StandardEdit::Cut),
    Some(StandardEdit::Copy),
    Some(StandardEdit::Paste),
    Some(StandardEdit::Delete),
    None,
    Some(StandardEdit::SelectAll),
];

impl StandardEdit {
    fn label(self) -> &'static str {
        match self {
            StandardEdit::Undo => "Undo",
            StandardEdit::Redo => "Redo",
            StandardEdit::Cut => "Cut",
            StandardEdit::Copy => "Copy",
            StandardEdit::Paste => "Paste",
            StandardEdit::Delete => "Delete",
            StandardEdit::SelectAll => "Select All",
        }
    }

    fn is_enabled(self, editor: &TextEditor) -> bool {
        match self {
            StandardEdit::Undo => editor.can_undo(),
            StandardEdit::Redo => editor.can_redo(),
            StandardEdit::Cut | StandardEdit::Copy | StandardEdit::Delete => {
                editor.caret().has_selection()
            }
            StandardEdit::Paste => true,
            StandardEdit::SelectAll => editor.char_count() > 0,
        }
    }

    fn apply(self, editor: &mut TextEditor, clipboard: &mut dyn Clipboard) {
        match self {
            StandardEdit::Undo => {
                editor.undo();
            }
            StandardEdit::Redo => {
                editor.redo();
            }
            StandardEdit::Cut => editor.cut(clipboard),
            StandardEdit::Copy => editor.copy(clipboard),
            StandardEdit::Paste => editor.paste(clipboard),
            StandardEdit::Delete => {
                editor.delete_selection();
            }
            StandardEdit::SelectAll => editor.select_all(),
        }
    }
}

pub fn color32_from_color(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn color_from_color32(color: Color32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color { r, g, b, a }
}

fn point_to_pixels(point_size: u16) -> f32 {
    f32::from(point_size) * 96.0 / 72.0
}

/// egui ships one proportional and one monospace face; map families onto them.
fn font_family_for(family: &str) -> FontFamily {
    let lower = family.to_ascii_lowercase();
    if lower.contains("courier") || lower.contains("mono") || lower.contains("consol") {
        FontFamily::Monospace
    } else {
        FontFamily::Proportional
    }
}

fn text_format(format: &CharFormat, base_font: &FontInfo, base_color: Color) -> TextFormat {
    let font = format.font(base_font);
    let color = color32_from_color(format.color(base_color));
    TextFormat {
        font_id: FontId::new(point_to_pixels(font.point_size), font_family_for(&font.family)),
        color,
        italics: font.italic,
        underline: if font.underline {
            Stroke::new(1.0, color)
        } else {
            Stroke::NONE
        },
        // default fonts carry no bold face
        extra_letter_spacing: if font.bold { BOLD_LETTER_SPACING } else { 0.0 },
        ..Default::default()
    }
}

fn advance_chars(text: &str, byte_start: usize, chars: usize) -> usize {
    text[byte_start..]
        .char_indices()
        .nth(chars)
        .map(|(offset, _)| byte_start + offset)
        .unwrap_or(text.len())
}

/// Lays `text` out run by run. Characters past the runs use the base format.
fn build_layout_job(
    text: &str,
    formats: &FormatRuns,
    base_font: &FontInfo,
    base_color: Color,
) -> LayoutJob {
    let mut job = LayoutJob::default();
    let mut byte_start = 0;
    for run in formats.iter() {
        if byte_start >= text.len() {
            break;
        }
        let byte_end = advance_chars(text, byte_start, run.len);
        job.append(
            &text[byte_start..byte_end],
            0.0,
            text_format(&run.format, base_font, base_color),
        );
        byte_start = byte_end;
    }
    if byte_start < text.len() || job.sections.is_empty() {
        job.append(
            &text[byte_start..],
            0.0,
            text_format(&CharFormat::default(), base_font, base_color),
        );
    }
    job
}

/// Smallest char range of `old` that must be replaced to obtain `new`, plus the
/// replacement text. `cursor` (char index in `new`) anchors ambiguous repeats.
fn changed_span(old: &str, new: &str, cursor: Option<usize>) -> (Range<usize>, String) {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();
    let max_suffix = cursor.map_or(new_chars.len(), |c| new_chars.len().saturating_sub(c));

    let mut suffix = 0;
    while suffix < old_chars.len()
        && suffix < new_chars.len()
        && suffix < max_suffix
        && old_chars[old_chars.len() - 1 - suffix] == new_chars[new_chars.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let limit = old_chars.len().min(new_chars.len()) - suffix;
    let mut prefix = 0;
    while prefix < limit && old_chars[prefix] == new_chars[prefix] {
        prefix += 1;
    }

    let inserted = new_chars[prefix..new_chars.len() - suffix].iter().collect();
    (prefix..old_chars.len() - suffix, inserted)
}

#[derive(Debug)]
pub struct EditorView {
    id: egui::Id,
    background: Color32,
    word_wrap: bool,
    widget_caret: Option<Caret>,
    font_picker: Option<FontInfo>,
    color_picker: Option<Color32>,
}

impl Default for EditorView {
    fn default() -> Self {
        Self {
            id: egui::Id::new("quillpad_editor"),
            background: Color32::WHITE,
            word_wrap: true,
            widget_caret: None,
            font_picker: None,
            color_picker: None,
        }
    }
}

impl EditorView {
    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn apply_preferences(&mut self, prefs: &Preferences, editor: &mut TextEditor) {
        self.background = color32_from_color(prefs.editor.background_color);
        self.word_wrap = prefs.editor.word_wrap;
        editor.set_base_font(FontInfo::new(
            prefs.editor.font_family.clone(),
            prefs.editor.font_size,
        ));
        editor.set_base_color(prefs.editor.text_color);
    }

    pub fn request_focus(&self, ctx: &egui::Context) {
        ctx.memory_mut(|memory| memory.request_focus(self.id));
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        editor: &mut TextEditor,
        clipboard: &mut dyn Clipboard,
    ) {
        self.push_caret_to_widget(ui.ctx(), editor);

        let formats = editor.formats().clone();
        let base_font = editor.base_font().clone();
        let base_color = editor.base_color();
        let word_wrap = self.word_wrap;
        let mut layouter = move |ui: &egui::Ui, text: &str, wrap_width: f32| {
            let mut job = build_layout_job(text, &formats, &base_font, base_color);
            job.wrap.max_width = if word_wrap { wrap_width } else { f32::INFINITY };
            ui.fonts(|fonts| fonts.layout_job(job))
        };

        let mut buffer = editor.text().to_string();
        let scroll = if self.word_wrap {
            egui::ScrollArea::vertical()
        } else {
            egui::ScrollArea::both()
        };
        let output = scroll
            .id_source("quillpad_editor_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                egui::TextEdit::multiline(&mut buffer)
                    .id(self.id)
                    .frame(false)
                    .lock_focus(true)
                    .desired_width(f32::INFINITY)
                    .desired_rows(30)
                    .layouter(&mut layouter)
                    .show(ui)
            })
            .inner;

        let cursor = output
            .cursor_range
            .map(|range| (range.secondary.ccursor.index, range.primary.ccursor.index));
        if buffer != editor.text() {
            let (range, inserted) =
                changed_span(editor.text(), &buffer, cursor.map(|(_, position)| position));
            editor.replace_range(range, &inserted);
        }
        if let Some((anchor, position)) = cursor {
            editor.set_selection(anchor, position);
        }
        self.widget_caret = Some(editor.caret());

        output
            .response
            .context_menu(|ui| self.context_menu(ui, editor, clipboard));
    }

    /// Font and color pickers opened from the context menu.
    pub fn show_pickers(&mut self, ctx: &egui::Context, editor: &mut TextEditor) {
        self.font_picker_window(ctx, editor);
        self.color_picker_window(ctx, editor);
    }

    pub fn has_open_picker(&self) -> bool {
        self.font_picker.is_some() || self.color_picker.is_some()
    }

    fn push_caret_to_widget(&self, ctx: &egui::Context, editor: &TextEditor) {
        let caret = editor.caret();
        if self.widget_caret == Some(caret) {
            return;
        }
        let mut state = TextEditState::load(ctx, self.id).unwrap_or_default();
        state.set_ccursor_range(Some(CCursorRange::two(
            CCursor::new(caret.anchor()),
            CCursor::new(caret.position()),
        )));
        state.store(ctx, self.id);
    }

    fn context_menu(
        &mut self,
        ui: &mut egui::Ui,
        editor: &mut TextEditor,
        clipboard: &mut dyn Clipboard,
    ) {
        for entry in STANDARD_EDIT_MENU {
            let Some(command) = entry else {
                ui.separator();
                continue;
            };
            if ui
                .add_enabled(command.is_enabled(editor), egui::Button::new(command.label()))
                .clicked()
            {
                command.apply(editor, clipboard);
                ui.close_menu();
            }
        }
        ui.separator();
        if ui.button("Change Font...").clicked() {
            self.font_picker = Some(editor.current_font());
            ui.close_menu();
        }
        if ui.button("Change Color...").clicked() {
            self.color_picker = Some(color32_from_color(editor.current_color()));
            ui.close_menu();
        }
        ui.separator();
        let font = editor.current_font();
        let mut bold = font.bold;
        if ui.checkbox(&mut bold, "Bold").clicked() {
            editor.set_font_bold(bold);
            ui.close_menu();
        }
        let mut italic = font.italic;
        if ui.checkbox(&mut italic, "Italic").clicked() {
            editor.set_font_italic(italic);
            ui.close_menu();
        }
        let mut underline = font.underline;
        if ui.checkbox(&mut underline, "Underline").clicked() {
            editor.set_font_underline(underline);
            ui.close_menu();
        }
    }

    fn font_picker_window(&mut self, ctx: &egui::Context, editor: &mut TextEditor) {
        let Some(font) = self.font_picker.as_mut() else {
            return;
        };
        let mut accepted = None;
        egui::Window::new("Select Font")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("font_picker_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Family:");
                        egui::ComboBox::from_id_source("font_picker_family")
                            .width(180.0)
                            .selected_text(font.family.as_str())
                            .show_ui(ui, |ui| {
                                for family in FONT_FAMILIES {
                                    ui.selectable_value(&mut font.family, family.to_string(), family);
                                }
                            });
                        ui.end_row();

                        ui.label("Size:");
                        ui.add(
                            egui::DragValue::new(&mut font.point_size)
                                .clamp_range(FONT_SIZE_RANGE)
                                .speed(1.0),
                        );
                        ui.end_row();
                    });
                ui.horizontal(|ui| {
                    ui.checkbox(&mut font.bold, "Bold");
                    ui.checkbox(&mut font.italic, "Italic");
                    ui.checkbox(&mut font.underline, "Underline");
                });
                ui.separator();
                let preview = CharFormat::from_font(font);
                let mut job = LayoutJob::default();
                job.append(
                    "AaBbYyZz",
                    0.0,
                    text_format(&preview, font, editor.current_color()),
                );
                ui.label(job);
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        accepted = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        accepted = Some(false);
                    }
                });
            });
        match accepted {
            Some(true) => {
                if let Some(font) = self.font_picker.take() {
                    editor.apply_font(&font);
                }
            }
            Some(false) => self.font_picker = None,
            None => {}
        }
    }

    fn color_picker_window(&mut self, ctx: &egui::Context, editor: &mut TextEditor) {
        let Some(color) = self.color_picker.as_mut() else {
            return;
        };
        let mut accepted = None;
        egui::Window::new("Select Color")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::color_picker::color_picker_color32(
                    ui,
                    color,
                    egui::color_picker::Alpha::Opaque,
                );
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        accepted = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        accepted = Some(false);
                    }
                });
            });
        match accepted {
            Some(true) => {
                if let Some(color) = self.color_picker.take() {
                    editor.set_text_color(color_from_color32(color));
                }
            }
            Some(false) => self.color_picker = None,
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillpad_core::MemoryClipboard;

    #[test]
    fn context_menu_starts_with_undo_and_redo() {
        assert_eq!(
            &STANDARD_EDIT_MENU[..3],
            &[Some(StandardEdit::Undo), Some(StandardEdit::Redo), None]
        );
        assert_eq!(STANDARD_EDIT_MENU.last(), Some(&Some(StandardEdit::SelectAll)));
    }

    #[test]
    fn context_undo_redo_follow_history() {
        let mut clipboard = MemoryClipboard::new();
        let mut editor = TextEditor::with_text("abc");
        assert!(!StandardEdit::Undo.is_enabled(&editor));
        assert!(!StandardEdit::Redo.is_enabled(&editor));

        editor.set_cursor(3);
        editor.insert_text("d");
        assert!(StandardEdit::Undo.is_enabled(&editor));

        StandardEdit::Undo.apply(&mut editor, &mut clipboard);
        assert_eq!(editor.text(), "abc");
        assert!(StandardEdit::Redo.is_enabled(&editor));

        StandardEdit::Redo.apply(&mut editor, &mut clipboard);
        assert_eq!(editor.text(), "abcd");
        assert!(!StandardEdit::Redo.is_enabled(&editor));
    }

    #[test]
    fn context_delete_needs_a_selection() {
        let mut clipboard = MemoryClipboard::new();
        let mut editor = TextEditor::with_text("alpha beta");
        assert!(!StandardEdit::Delete.is_enabled(&editor));

        editor.set_selection(0, 6);
        assert!(StandardEdit::Delete.is_enabled(&editor));
        StandardEdit::Delete.apply(&mut editor, &mut clipboard);
        assert_eq!(editor.text(), "beta");
        assert_eq!(clipboard.get_text(), None);
    }

    #[test]
    fn typing_a_repeated_char_inserts_at_cursor() {
        let (range, inserted) = changed_span("aa", "aaa", Some(2));
        assert_eq!(range, 1..1);
        assert_eq!(inserted, "a");
    }

    #[test]
    fn backspace_removes_one_char() {
        let (range, inserted) = changed_span("abc", "ac", Some(1));
        assert_eq!(range, 1..2);
        assert_eq!(inserted, "");
    }

    #[test]
    fn replacing_a_selection_with_multibyte_text() {
        let (range, inserted) = changed_span("say hello now", "say ¡hola! now", Some(10));
        assert_eq!(range, 4..9);
        assert_eq!(inserted, "¡hola!");
    }

    #[test]
    fn layout_job_follows_format_runs() {
        let mut editor = TextEditor::with_text("say hello now");
        editor.set_selection(4, 9);
        editor.set_font_bold(true);

        let job = build_layout_job(
            editor.text(),
            editor.formats(),
            editor.base_font(),
            editor.base_color(),
        );

        let pieces: Vec<&str> = job
            .sections
            .iter()
            .map(|section| &job.text[section.byte_range.clone()])
            .collect();
        assert_eq!(pieces, vec!["say ", "hello", " now"]);
        assert_eq!(job.sections[1].format.extra_letter_spacing, BOLD_LETTER_SPACING);
        assert_eq!(job.sections[0].format.extra_letter_spacing, 0.0);
    }

    #[test]
    fn colors_convert_both_ways() {
        let color = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(color_from_color32(color32_from_color(color)), color);
    }

    #[test]
    fn monospace_families_map_to_monospace() {
        assert_eq!(font_family_for("Courier New"), FontFamily::Monospace);
        assert_eq!(font_family_for("Arial"), FontFamily::Proportional);
    }
}
