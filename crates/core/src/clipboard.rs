/// 剪下、複製、貼上使用的純文字剪貼簿。 / Plain-text clipboard used by cut, copy and paste.
pub trait Clipboard {
    /// 讀取剪貼簿文字。 / Reads the clipboard text.
    fn get_text(&mut self) -> Option<String>;
    /// 寫入剪貼簿文字。 / Replaces the clipboard text.
    fn set_text(&mut self, text: &str);
}

/// 行程內剪貼簿，無法存取系統剪貼簿時使用。 / Process-local clipboard; the fallback when no system clipboard is reachable.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.contents.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.contents = Some(text.to_string());
    }
}
