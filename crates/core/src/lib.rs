pub mod actions;
pub mod clipboard;
pub mod document;
pub mod editor;
pub mod format;
pub mod session;
pub mod status;
mod undo;

pub use actions::{Action, Shortcut, ShortcutKey};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use document::{read_text, write_text, DocumentError, Encoding, LegacyEncoding, LoadedText};
pub use editor::{Caret, EditorEvent, Selection, TextEditor, WELCOME_TEXT};
pub use format::{word_range_at, CharFormat, Color, ColorParseError, FontInfo, FormatRun, FormatRuns};
pub use session::{
    ActionOutcome, EditorSession, Prompter, SaveChoice, StatusMessage, APP_NAME,
};
pub use status::CursorStatus;
