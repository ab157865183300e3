use std::ops::Range;

use crate::clipboard::Clipboard;
use crate::format::{word_range_at, CharFormat, Color, FontInfo, FormatRun, FormatRuns};
use crate::status::CursorStatus;
use crate::undo::{EditCommand, UndoStack};

/// 新啟動編輯器顯示的歡迎文字。 / Text shown in a freshly started editor.
pub const WELCOME_TEXT: &str = "Welcome to QuillPad!\n\n\
This small desktop editor shows the building blocks of a classic application:\n\n\
• Main window with menus and toolbars\n\
• Text editing with undo and redo\n\
• File operations (New, Open, Save, Save As)\n\
• Clipboard operations (Cut, Copy, Paste)\n\
• Preferences stored between sessions\n\
• Status bar with cursor position\n\
• About dialog\n\
• Context menu\n\
• Rich text formatting\n\n\
Explore the menus and toolbars to see what each part does.\n\n\
Right-click in this text area for the context menu with formatting options.";

/// 插入點與可選的選取錨點（以字元計）。 / Insertion point plus an optional selection anchor, both in characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caret {
    anchor: usize,
    position: usize,
}

impl Caret {
    /// 建立指定位置的游標。 / Creates a caret at the given position.
    pub fn new(position: usize) -> Self {
        Self {
            anchor: position,
            position,
        }
    }

    /// 建立從 `anchor` 選取到 `position` 的游標。 / Creates a caret selecting from `anchor` to `position`.
    pub fn with_anchor(anchor: usize, position: usize) -> Self {
        Self { anchor, position }
    }

    /// 取得游標所在位置。 / Returns the caret position.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// 取得非空的選取範圍（若有）。 / Returns the active selection if it is non-empty.
    pub fn selection(&self) -> Option<Selection> {
        if self.anchor == self.position {
            None
        } else {
            Some(Selection::new(self.anchor, self.position))
        }
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.position
    }

    fn edit_range(&self) -> Range<usize> {
        let selection = Selection::new(self.anchor, self.position);
        selection.start..selection.end
    }

    fn clamp(&mut self, len: usize) {
        self.anchor = self.anchor.min(len);
        self.position = self.position.min(len);
    }
}

/// 定義一段已排序（start <= end）的字元範圍。 / An ordered (start <= end) character range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    start: usize,
    end: usize,
}

impl Selection {
    /// 建立新的選取範圍，會自動將邊界排序。 / Creates a selection with automatically ordered bounds.
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// 選取長度。 / Returns the length of the selection.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// 編輯器發出的通知，由視窗每個影格取出。 / Notifications raised by the editor, drained by the window each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    TextChanged,
    CursorPositionChanged,
    FontChanged(FontInfo),
    ColorChanged(Color),
}

impl EditorEvent {
    /// 此事件是否需要更新狀態列的行列資訊。 / Whether the status bar's line and column must be recomputed.
    pub fn refreshes_status(&self) -> bool {
        matches!(
            self,
            EditorEvent::TextChanged | EditorEvent::CursorPositionChanged
        )
    }
}

/// 富文字編輯模型：文字、逐字格式、游標與復原歷程。 / Rich-text editing model: text, per-character formats, caret and undo history.
#[derive(Debug)]
pub struct TextEditor {
    text: String,
    char_len: usize,
    formats: FormatRuns,
    caret: Caret,
    caret_format: CharFormat,
    base_font: FontInfo,
    base_color: Color,
    undo: UndoStack,
    events: Vec<EditorEvent>,
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEditor {
    pub fn new() -> Self {
        Self::with_text(String::new())
    }

    /// 以預設格式建立未修改的編輯器。 / Creates an unmodified editor holding `text` in the default format.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self {
            formats: FormatRuns::new(char_len),
            text,
            char_len,
            caret: Caret::new(0),
            caret_format: CharFormat::default(),
            base_font: FontInfo::default(),
            base_color: Color::BLACK,
            undo: UndoStack::new(),
            events: Vec::new(),
        }
    }

    /// 建立載入歡迎文字的編輯器。 / Creates an editor showing the welcome text.
    pub fn welcome() -> Self {
        Self::with_text(WELCOME_TEXT)
    }

    /// 取得目前的內容。 / Returns the current document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.char_len
    }

    /// 取得逐字格式區段。 / Returns the per-character format runs.
    pub fn formats(&self) -> &FormatRuns {
        &self.formats
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }

    pub fn selection(&self) -> Option<Selection> {
        self.caret.selection()
    }

    /// 取得選取的文字。 / Returns the selected text, if any.
    pub fn selected_text(&self) -> Option<String> {
        let selection = self.caret.selection()?;
        Some(self.slice(selection.range()).to_string())
    }

    /// 格式未指定屬性時使用的字型。 / Font applied to characters whose format leaves an attribute unset.
    pub fn base_font(&self) -> &FontInfo {
        &self.base_font
    }

    /// 更換預設字型並通知字型變更。 / Replaces the default font and raises format events.
    pub fn set_base_font(&mut self, font: FontInfo) {
        if self.base_font != font {
            self.base_font = font;
            self.emit_format_events();
        }
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    /// 更換預設文字顏色。 / Replaces the default text color.
    pub fn set_base_color(&mut self, color: Color) {
        if self.base_color != color {
            self.base_color = color;
            self.emit_format_events();
        }
    }

    /// 文件是否偏離上次載入或儲存的狀態。 / Whether the document differs from its last load or save.
    pub fn is_modified(&self) -> bool {
        !self.undo.is_clean()
    }

    /// 將目前的復原位置標記為已儲存。 / Marks the current undo position as the saved state.
    pub fn mark_clean(&mut self) {
        self.undo.set_clean();
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// 取出並清空待處理事件。 / Drains the pending events.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// 計算狀態列的游標資訊。 / Computes the status-bar caret information.
    pub fn cursor_status(&self) -> CursorStatus {
        CursorStatus::compute(&self.text, self.caret.position)
    }

    /// 取代整份文件並清除格式與復原歷程。 / Replaces the whole document, dropping formats and undo history.
    pub fn set_plain_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.char_len = self.text.chars().count();
        self.formats = FormatRuns::new(self.char_len);
        self.caret = Caret::new(0);
        self.undo.clear();
        self.events.push(EditorEvent::TextChanged);
        self.events.push(EditorEvent::CursorPositionChanged);
        self.refresh_caret_format();
    }

    pub fn clear(&mut self) {
        self.set_plain_text(String::new());
    }

    /// 移動游標並取消選取。 / Moves the caret and clears the selection.
    pub fn set_cursor(&mut self, position: usize) {
        self.set_selection(position, position);
    }

    /// 設定選取範圍；位置改變時發出 `CursorPositionChanged`。 / Sets the selection, raising `CursorPositionChanged` when the position moves.
    pub fn set_selection(&mut self, anchor: usize, position: usize) {
        let mut caret = Caret::with_anchor(anchor, position);
        caret.clamp(self.char_len);
        if caret == self.caret {
            return;
        }
        let moved = caret.position != self.caret.position;
        self.caret = caret;
        self.undo.break_merge();
        if moved {
            self.events.push(EditorEvent::CursorPositionChanged);
            self.refresh_caret_format();
        }
    }

    /// 將選取範圍設定為整份文件。 / Selects the entire document.
    pub fn select_all(&mut self) {
        self.set_selection(0, self.char_len);
    }

    /// 以游標格式取代選取或於游標處插入。 / Replaces the selection (or inserts at the caret) using the caret format.
    pub fn insert_text(&mut self, text: &str) {
        let range = self.caret.edit_range();
        self.replace_range(range, text);
    }

    /// 取代 `range` 內的字元並記錄復原步驟。 / Replaces the characters in `range` with `text`, recording an undo step.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let start = range.start.min(self.char_len);
        let end = range.end.clamp(start, self.char_len);
        if start == end && text.is_empty() {
            return;
        }
        let inserted_len = text.chars().count();
        let inserted_formats = if inserted_len == 0 {
            Vec::new()
        } else {
            vec![FormatRun::new(inserted_len, self.caret_format.clone())]
        };
        let command = self.apply_replace(start, end, text, inserted_formats);
        self.undo.push(command);
        self.move_caret_after_edit(start + inserted_len);
    }

    /// 刪除選取內容；沒有選取時回傳 `false`。 / Removes the selection, returning `false` when there is none.
    pub fn delete_selection(&mut self) -> bool {
        match self.caret.selection() {
            Some(selection) => {
                self.undo.break_merge();
                self.replace_range(selection.range(), "");
                true
            }
            None => false,
        }
    }

    /// 複製選取內容到剪貼簿。 / Copies the selection to the clipboard.
    pub fn copy(&self, clipboard: &mut dyn Clipboard) {
        if let Some(text) = self.selected_text() {
            clipboard.set_text(&text);
        }
    }

    /// 剪下選取內容。 / Moves the selection to the clipboard.
    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) {
        if let Some(text) = self.selected_text() {
            clipboard.set_text(&text);
            self.delete_selection();
        }
    }

    /// 以剪貼簿內容取代選取。 / Replaces the selection with the clipboard text.
    pub fn paste(&mut self, clipboard: &mut dyn Clipboard) {
        let Some(text) = clipboard.get_text() else {
            return;
        };
        if text.is_empty() {
            return;
        }
        self.undo.break_merge();
        self.insert_text(&text);
        self.undo.break_merge();
    }

    /// 復原上一個編輯；沒有可復原的步驟時回傳 `false`。 / Reverts the last edit, returning `false` when there is none.
    pub fn undo(&mut self) -> bool {
        let Some(command) = self.undo.undo() else {
            return false;
        };
        match command {
            EditCommand::Replace {
                start,
                removed,
                removed_formats,
                inserted,
                ..
            } => {
                let end = start + inserted.chars().count();
                self.apply_replace(start, end, &removed, removed_formats);
                self.move_caret_after_edit(start + removed.chars().count());
            }
            EditCommand::Format { start, before, after } => {
                let len: usize = after.iter().map(|run| run.len).sum();
                self.formats.splice(start..start + len, before);
                self.events.push(EditorEvent::TextChanged);
            }
        }
        self.refresh_caret_format();
        true
    }

    /// 重做上一個被復原的編輯。 / Reapplies the last undone edit.
    pub fn redo(&mut self) -> bool {
        let Some(command) = self.undo.redo() else {
            return false;
        };
        match command {
            EditCommand::Replace {
                start,
                removed,
                inserted,
                inserted_formats,
                ..
            } => {
                let end = start + removed.chars().count();
                self.apply_replace(start, end, &inserted, inserted_formats);
                self.move_caret_after_edit(start + inserted.chars().count());
            }
            EditCommand::Format { start, before, after } => {
                let len: usize = before.iter().map(|run| run.len).sum();
                self.formats.splice(start..start + len, after);
                self.events.push(EditorEvent::TextChanged);
            }
        }
        self.refresh_caret_format();
        true
    }

    /// 下一個輸入字元使用的格式。 / Format used for the next typed character.
    pub fn current_char_format(&self) -> &CharFormat {
        &self.caret_format
    }

    /// 游標處的完整字型。 / Resolved font at the caret.
    pub fn current_font(&self) -> FontInfo {
        self.caret_format.font(&self.base_font)
    }

    pub fn current_color(&self) -> Color {
        self.caret_format.color(self.base_color)
    }

    /// 將格式合併到選取或游標所在的單字，並套用到之後輸入的文字。 / Merges `format` into the selection or the word under the caret, and into the caret format.
    ///
    /// Attributes `format` leaves unset keep their current values.
    pub fn merge_format_on_word_or_selection(&mut self, format: &CharFormat) {
        let range = match self.caret.selection() {
            Some(selection) => selection.range(),
            None => word_range_at(&self.text, self.caret.position),
        };
        if !range.is_empty() {
            let before = self.formats.slice(range.clone());
            self.formats.merge_range(range.clone(), format);
            let after = self.formats.slice(range.clone());
            if before != after {
                self.undo.push(EditCommand::Format {
                    start: range.start,
                    before,
                    after,
                });
                self.events.push(EditorEvent::TextChanged);
            }
        }
        self.caret_format.merge(format);
        self.emit_format_events();
    }

    pub fn set_font_bold(&mut self, bold: bool) {
        self.merge_format_on_word_or_selection(&CharFormat::new().with_bold(bold));
    }

    pub fn set_font_italic(&mut self, italic: bool) {
        self.merge_format_on_word_or_selection(&CharFormat::new().with_italic(italic));
    }

    pub fn set_font_underline(&mut self, underline: bool) {
        self.merge_format_on_word_or_selection(&CharFormat::new().with_underline(underline));
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.merge_format_on_word_or_selection(&CharFormat::new().with_point_size(size));
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.merge_format_on_word_or_selection(&CharFormat::new().with_family(family));
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.merge_format_on_word_or_selection(&CharFormat::new().with_foreground(color));
    }

    /// 套用字型對話框選取的所有屬性。 / Applies every attribute of a picked font.
    pub fn apply_font(&mut self, font: &FontInfo) {
        self.merge_format_on_word_or_selection(&CharFormat::from_font(font));
    }

    fn apply_replace(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        inserted_formats: Vec<FormatRun>,
    ) -> EditCommand {
        let byte_start = self.byte_offset(start);
        let byte_end = self.byte_offset(end);
        let removed = self.text[byte_start..byte_end].to_string();
        let removed_formats = self.formats.slice(start..end);
        self.text.replace_range(byte_start..byte_end, text);
        self.formats.splice(start..end, inserted_formats.clone());
        self.char_len = self.char_len - (end - start) + text.chars().count();
        self.events.push(EditorEvent::TextChanged);
        EditCommand::Replace {
            start,
            removed,
            removed_formats,
            inserted: text.to_string(),
            inserted_formats,
        }
    }

    fn move_caret_after_edit(&mut self, position: usize) {
        let caret = Caret::new(position.min(self.char_len));
        if caret != self.caret {
            self.caret = caret;
            self.events.push(EditorEvent::CursorPositionChanged);
        }
    }

    fn refresh_caret_format(&mut self) {
        let position = self.caret.position;
        let format = self.formats.format_at(position.saturating_sub(1));
        if format != self.caret_format {
            self.caret_format = format;
            self.emit_format_events();
        }
    }

    fn emit_format_events(&mut self) {
        self.events.push(EditorEvent::FontChanged(self.current_font()));
        self.events.push(EditorEvent::ColorChanged(self.current_color()));
    }

    fn slice(&self, range: Range<usize>) -> &str {
        &self.text[self.byte_offset(range.start)..self.byte_offset(range.end)]
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn bold_spans(editor: &TextEditor) -> Vec<(usize, bool)> {
        editor
            .formats()
            .iter()
            .map(|run| (run.len, run.format.is_bold()))
            .collect()
    }

    #[test]
    fn bold_applies_to_selection_only() {
        let mut editor = TextEditor::with_text("say hello now");
        editor.set_selection(4, 9);
        editor.set_font_bold(true);
        assert_eq!(bold_spans(&editor), vec![(4, false), (5, true), (4, false)]);
        assert!(editor.is_modified());
    }

    #[test]
    fn bold_without_selection_applies_to_word_under_caret() {
        let mut editor = TextEditor::with_text("say hello now");
        editor.set_cursor(6);
        editor.set_font_bold(true);
        assert_eq!(bold_spans(&editor), vec![(4, false), (5, true), (4, false)]);
        assert!(editor.current_char_format().is_bold());
    }

    #[test]
    fn merged_format_keeps_existing_attributes() {
        let mut editor = TextEditor::with_text("say hello now");
        editor.set_selection(4, 9);
        editor.set_font_italic(true);
        editor.set_font_bold(true);
        let format = editor.formats().format_at(5);
        assert!(format.is_bold());
        assert!(format.is_italic());
        assert!(!format.is_underline());
    }

    #[test]
    fn typed_text_inherits_caret_format() {
        let mut editor = TextEditor::with_text("say hello now");
        editor.set_selection(4, 9);
        editor.set_font_bold(true);
        editor.set_cursor(9);
        editor.insert_text("!");
        assert_eq!(editor.text(), "say hello! now");
        assert!(editor.formats().format_at(9).is_bold());
        assert!(!editor.formats().format_at(10).is_bold());
    }

    #[test]
    fn format_change_raises_font_and_color_events() {
        let mut editor = TextEditor::with_text("word");
        editor.take_events();
        editor.set_cursor(2);
        assert_eq!(editor.take_events(), vec![EditorEvent::CursorPositionChanged]);
        editor.set_text_color(Color::rgb(0xCC, 0, 0));
        let events = editor.take_events();
        assert!(events.contains(&EditorEvent::TextChanged));
        assert!(events
            .iter()
            .any(|event| matches!(event, EditorEvent::FontChanged(font) if font.family == "Arial")));
        assert!(events.contains(&EditorEvent::ColorChanged(Color::rgb(0xCC, 0, 0))));
    }

    #[test]
    fn undo_and_redo_restore_text_and_formats() {
        let mut editor = TextEditor::with_text("say hello now");
        editor.set_selection(4, 9);
        editor.set_font_underline(true);
        editor.set_cursor(13);
        editor.insert_text("!");
        assert_eq!(editor.text(), "say hello now!");

        assert!(editor.undo());
        assert_eq!(editor.text(), "say hello now");
        assert!(editor.formats().format_at(5).is_underline());
        assert!(editor.undo());
        assert!(!editor.formats().format_at(5).is_underline());
        assert!(!editor.is_modified());
        assert!(!editor.undo());

        assert!(editor.redo());
        assert!(editor.redo());
        assert_eq!(editor.text(), "say hello now!");
        assert!(editor.formats().format_at(5).is_underline());
        assert!(editor.is_modified());
    }

    #[test]
    fn modified_flag_follows_clean_point() {
        let mut editor = TextEditor::with_text("abc");
        assert!(!editor.is_modified());
        editor.set_cursor(3);
        editor.insert_text("d");
        assert!(editor.is_modified());
        editor.mark_clean();
        assert!(!editor.is_modified());
        editor.insert_text("e");
        assert!(editor.is_modified());
        editor.undo();
        assert!(!editor.is_modified());
    }

    #[test]
    fn set_plain_text_resets_history() {
        let mut editor = TextEditor::with_text("abc");
        editor.insert_text("x");
        editor.set_plain_text("fresh");
        assert_eq!(editor.text(), "fresh");
        assert!(!editor.is_modified());
        assert!(!editor.can_undo());
        assert_eq!(editor.caret(), Caret::new(0));
    }

    #[test]
    fn clipboard_operations_round_trip() {
        let mut clipboard = MemoryClipboard::new();
        let mut editor = TextEditor::with_text("alpha beta");
        editor.set_selection(0, 6);
        editor.copy(&mut clipboard);
        assert_eq!(clipboard.get_text().as_deref(), Some("alpha "));

        editor.cut(&mut clipboard);
        assert_eq!(editor.text(), "beta");

        editor.set_cursor(4);
        editor.paste(&mut clipboard);
        assert_eq!(editor.text(), "betaalpha ");
        assert_eq!(editor.caret().position(), 10);

        editor.select_all();
        assert_eq!(editor.selected_text().as_deref(), Some("betaalpha "));
    }

    #[test]
    fn replace_range_handles_multibyte_characters() {
        let mut editor = TextEditor::with_text("a你好c");
        editor.replace_range(1..2, "");
        assert_eq!(editor.text(), "a好c");
        assert_eq!(editor.char_count(), 3);
        assert_eq!(editor.caret().position(), 1);
    }

    fn refreshing(events: &[EditorEvent]) -> bool {
        events.iter().any(EditorEvent::refreshes_status)
    }

    fn location(editor: &TextEditor) -> (usize, usize, usize) {
        let status = editor.cursor_status();
        (status.line, status.column, status.characters)
    }

    #[test]
    fn caret_moves_and_edits_refresh_status() {
        let mut editor = TextEditor::with_text("one\ntwo");
        editor.take_events();

        editor.set_cursor(6);
        assert!(editor
            .take_events()
            .contains(&EditorEvent::CursorPositionChanged));
        assert_eq!(location(&editor), (2, 3, 7));

        editor.insert_text("!");
        let events = editor.take_events();
        assert!(events.contains(&EditorEvent::TextChanged));
        assert!(events.contains(&EditorEvent::CursorPositionChanged));
        assert_eq!(location(&editor), (2, 4, 8));

        // forward delete keeps the caret where it is
        editor.replace_range(7..8, "");
        let events = editor.take_events();
        assert!(events.contains(&EditorEvent::TextChanged));
        assert!(!events.contains(&EditorEvent::CursorPositionChanged));
        assert!(refreshing(&events));
        assert_eq!(editor.text(), "one\ntw!");
        assert_eq!(location(&editor), (2, 4, 7));

        editor.set_selection(0, 2);
        assert!(refreshing(&editor.take_events()));
        assert_eq!(location(&editor), (1, 3, 7));

        editor.undo();
        assert!(refreshing(&editor.take_events()));
        assert_eq!(editor.text(), "one\ntw!o");

        editor.set_plain_text("fresh\ntext");
        assert!(refreshing(&editor.take_events()));
        assert_eq!(location(&editor), (1, 1, 10));
    }

    #[test]
    fn selection_change_without_moving_caret_does_not_refresh() {
        let mut editor = TextEditor::with_text("abc");
        editor.set_cursor(2);
        editor.take_events();
        editor.set_selection(0, 2);
        assert!(!refreshing(&editor.take_events()));
    }

    #[test]
    fn format_events_alone_do_not_refresh_status() {
        assert!(!EditorEvent::FontChanged(FontInfo::default()).refreshes_status());
        assert!(!EditorEvent::ColorChanged(Color::BLACK).refreshes_status());
    }

    #[test]
    fn cursor_status_is_one_based() {
        let mut editor = TextEditor::with_text("one\ntwo");
        assert_eq!(editor.cursor_status().location_label(), "Line 1, Column 1");
        editor.set_cursor(6);
        let status = editor.cursor_status();
        assert_eq!((status.line, status.column, status.characters), (2, 3, 7));
    }
}
