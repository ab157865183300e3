use crate::format::FormatRun;

/// 可反向套用的編輯紀錄。 / An invertible edit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditCommand {
    /// `removed` (starting at char `start`) was replaced by `inserted`.
    Replace {
        start: usize,
        removed: String,
        removed_formats: Vec<FormatRun>,
        inserted: String,
        inserted_formats: Vec<FormatRun>,
    },
    /// Formats over `start..start + len` changed from `before` to `after`.
    Format {
        start: usize,
        before: Vec<FormatRun>,
        after: Vec<FormatRun>,
    },
}

impl EditCommand {
    /// 將連續輸入或刪除合併為一筆紀錄。 / Coalesces typing and consecutive deletions into one record.
    fn try_merge(&mut self, other: &EditCommand) -> bool {
        match (self, other) {
            (
                EditCommand::Replace {
                    start,
                    removed,
                    inserted,
                    inserted_formats,
                    ..
                },
                EditCommand::Replace {
                    start: other_start,
                    removed: other_removed,
                    inserted: other_inserted,
                    inserted_formats: other_formats,
                    ..
                },
            ) if removed.is_empty() && other_removed.is_empty() => {
                if *start + inserted.chars().count() == *other_start
                    && !other_inserted.contains('\n')
                {
                    inserted.push_str(other_inserted);
                    inserted_formats.extend(other_formats.iter().cloned());
                    true
                } else {
                    false
                }
            }
            (
                EditCommand::Replace {
                    start,
                    removed,
                    removed_formats,
                    inserted,
                    ..
                },
                EditCommand::Replace {
                    start: other_start,
                    removed: other_removed,
                    removed_formats: other_formats,
                    inserted: other_inserted,
                    ..
                },
            ) if inserted.is_empty() && other_inserted.is_empty() => {
                if removed.contains('\n') || other_removed.contains('\n') {
                    return false;
                }
                if *other_start + other_removed.chars().count() == *start {
                    // backspace
                    let mut text = other_removed.clone();
                    text.push_str(removed);
                    *removed = text;
                    let mut formats = other_formats.clone();
                    formats.append(removed_formats);
                    *removed_formats = formats;
                    *start = *other_start;
                    true
                } else if *other_start == *start {
                    // forward delete
                    removed.push_str(other_removed);
                    removed_formats.extend(other_formats.iter().cloned());
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

/// 線性復原歷程，以乾淨點標記上次載入或儲存。 / Linear undo history with a clean point marking the last load or save.
#[derive(Debug)]
pub(crate) struct UndoStack {
    commands: Vec<EditCommand>,
    index: usize,
    max_size: usize,
    merge_enabled: bool,
    clean_index: Option<usize>,
}

impl UndoStack {
    pub(crate) fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: 0,
            max_size: 100,
            merge_enabled: true,
            clean_index: Some(0),
        }
    }

    pub(crate) fn push(&mut self, command: EditCommand) {
        self.commands.truncate(self.index);
        if self.clean_index.is_some_and(|clean| clean > self.index) {
            self.clean_index = None;
        }

        let at_clean_point = self.clean_index == Some(self.index);
        if self.merge_enabled && !at_clean_point {
            if let Some(last) = self.commands.last_mut() {
                if last.try_merge(&command) {
                    return;
                }
            }
        }

        self.commands.push(command);
        self.index = self.commands.len();
        self.merge_enabled = true;

        if self.commands.len() > self.max_size {
            let excess = self.commands.len() - self.max_size;
            self.commands.drain(0..excess);
            self.index = self.commands.len();
            self.clean_index = self
                .clean_index
                .and_then(|clean| clean.checked_sub(excess));
        }
    }

    pub(crate) fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub(crate) fn can_redo(&self) -> bool {
        self.index < self.commands.len()
    }

    pub(crate) fn undo(&mut self) -> Option<EditCommand> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.merge_enabled = false;
        Some(self.commands[self.index].clone())
    }

    pub(crate) fn redo(&mut self) -> Option<EditCommand> {
        if !self.can_redo() {
            return None;
        }
        let command = self.commands[self.index].clone();
        self.index += 1;
        self.merge_enabled = false;
        Some(command)
    }

    pub(crate) fn clear(&mut self) {
        self.commands.clear();
        self.index = 0;
        self.merge_enabled = true;
        self.clean_index = Some(0);
    }

    pub(crate) fn break_merge(&mut self) {
        self.merge_enabled = false;
    }

    pub(crate) fn set_clean(&mut self) {
        self.clean_index = Some(self.index);
        self.merge_enabled = false;
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.clean_index == Some(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(start: usize, text: &str) -> EditCommand {
        EditCommand::Replace {
            start,
            removed: String::new(),
            removed_formats: Vec::new(),
            inserted: text.to_string(),
            inserted_formats: Vec::new(),
        }
    }

    fn delete(start: usize, text: &str) -> EditCommand {
        EditCommand::Replace {
            start,
            removed: text.to_string(),
            removed_formats: Vec::new(),
            inserted: String::new(),
            inserted_formats: Vec::new(),
        }
    }

    #[test]
    fn typing_coalesces_until_newline() {
        let mut stack = UndoStack::new();
        stack.push(insert(0, "a"));
        stack.push(insert(1, "b"));
        stack.push(insert(2, "\n"));
        assert_eq!(stack.undo(), Some(insert(2, "\n")));
        assert_eq!(stack.undo(), Some(insert(0, "ab")));
        assert!(!stack.can_undo());
    }

    #[test]
    fn backspaces_coalesce_backwards() {
        let mut stack = UndoStack::new();
        stack.push(delete(4, "d"));
        stack.push(delete(3, "c"));
        assert_eq!(stack.undo(), Some(delete(3, "cd")));
    }

    #[test]
    fn clean_point_tracks_undo_position() {
        let mut stack = UndoStack::new();
        assert!(stack.is_clean());
        stack.push(insert(0, "a"));
        assert!(!stack.is_clean());
        stack.set_clean();
        stack.push(insert(1, "b"));
        assert!(!stack.is_clean());
        stack.undo();
        assert!(stack.is_clean());
        stack.undo();
        assert!(!stack.is_clean());
        stack.push(insert(0, "z"));
        assert!(!stack.is_clean());
        stack.undo();
        assert!(!stack.is_clean(), "redo branch holding the clean point was discarded");
    }

    #[test]
    fn history_is_bounded() {
        let mut stack = UndoStack::new();
        for idx in 0..150 {
            stack.push(insert(idx * 2, "\n"));
        }
        let mut undone = 0;
        while stack.undo().is_some() {
            undone += 1;
        }
        assert_eq!(undone, 100);
    }
}
