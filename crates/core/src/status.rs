/// 狀態列顯示的游標位置與文件大小。 / Caret location and document size shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorStatus {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    pub characters: usize,
}

impl CursorStatus {
    /// 計算位於字元索引 `position` 的游標狀態。 / Computes the status for a caret at character index `position`.
    pub fn compute(text: &str, position: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        let mut characters = 0;
        for (idx, ch) in text.chars().enumerate() {
            if idx < position {
                if ch == '\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
            }
            characters += 1;
        }
        Self {
            line,
            column,
            characters,
        }
    }

    /// 例如 "Line 2, Column 4"。 / Label such as "Line 2, Column 4".
    pub fn location_label(&self) -> String {
        format!("Line {}, Column {}", self.line, self.column)
    }

    pub fn size_label(&self) -> String {
        format!("{} characters", self.characters)
    }
}

impl Default for CursorStatus {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            characters: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_of_document_is_line_one_column_one() {
        let status = CursorStatus::compute("abc", 0);
        assert_eq!((status.line, status.column, status.characters), (1, 1, 3));
        assert_eq!(status.location_label(), "Line 1, Column 1");
        assert_eq!(status.size_label(), "3 characters");
    }

    #[test]
    fn columns_restart_after_newline() {
        let text = "first\nsecond";
        let status = CursorStatus::compute(text, 9);
        assert_eq!((status.line, status.column), (2, 4));

        let at_break = CursorStatus::compute(text, 6);
        assert_eq!((at_break.line, at_break.column), (2, 1));
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let status = CursorStatus::compute("héllo", 3);
        assert_eq!(status.column, 4);
        assert_eq!(status.characters, 5);
    }
}
