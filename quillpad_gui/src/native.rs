//! Native dialogs and the system clipboard behind the core's seams.

use std::path::PathBuf;

use directories::UserDirs;
use quillpad_core::{Clipboard, MemoryClipboard, Prompter, SaveChoice, APP_NAME};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::warn;

const SAVE_LABEL: &str = "Save";
const DISCARD_LABEL: &str = "Discard";
const CANCEL_LABEL: &str = "Cancel";

/// Blocking `rfd` dialogs.
#[derive(Debug, Default)]
pub struct NativePrompter;

impl NativePrompter {
    fn file_dialog() -> FileDialog {
        let dialog = FileDialog::new()
            .add_filter("Text Files (*.txt)", &["txt"])
            .add_filter("All Files (*)", &["*"]);
        match documents_dir() {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn message(level: MessageLevel, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}

impl Prompter for NativePrompter {
    fn ask_save_changes(&mut self) -> SaveChoice {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(APP_NAME)
            .set_description(
                "The document has been modified.\nDo you want to save your changes?",
            )
            .set_buttons(MessageButtons::YesNoCancelCustom(
                SAVE_LABEL.to_string(),
                DISCARD_LABEL.to_string(),
                CANCEL_LABEL.to_string(),
            ))
            .show();
        match result {
            MessageDialogResult::Yes => SaveChoice::Save,
            MessageDialogResult::No => SaveChoice::Discard,
            MessageDialogResult::Custom(label) if label == SAVE_LABEL => SaveChoice::Save,
            MessageDialogResult::Custom(label) if label == DISCARD_LABEL => SaveChoice::Discard,
            _ => SaveChoice::Cancel,
        }
    }

    fn pick_open_path(&mut self) -> Option<PathBuf> {
        Self::file_dialog().set_title("Open File").pick_file()
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        Self::file_dialog().set_title("Save File").save_file()
    }

    fn warn(&mut self, title: &str, message: &str) {
        Self::message(MessageLevel::Warning, title, message);
    }

    fn inform(&mut self, title: &str, message: &str) {
        Self::message(MessageLevel::Info, title, message);
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::YesNo)
            .show();
        matches!(result, MessageDialogResult::Yes)
    }
}

fn documents_dir() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    dirs.document_dir()
        .map(|dir| dir.to_path_buf())
        .or_else(|| Some(dirs.home_dir().to_path_buf()))
}

/// The OS clipboard, falling back to a process-local one when unavailable.
pub enum SystemClipboard {
    Native(arboard::Clipboard),
    Local(MemoryClipboard),
}

impl SystemClipboard {
    pub fn new() -> Self {
        match arboard::Clipboard::new() {
            Ok(clipboard) => Self::Native(clipboard),
            Err(err) => {
                warn!(error = %err, "system clipboard unavailable, using in-process clipboard");
                Self::Local(MemoryClipboard::new())
            }
        }
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        match self {
            Self::Native(clipboard) => clipboard.get_text().ok(),
            Self::Local(clipboard) => clipboard.get_text(),
        }
    }

    fn set_text(&mut self, text: &str) {
        match self {
            Self::Native(clipboard) => {
                if let Err(err) = clipboard.set_text(text) {
                    warn!(error = %err, "failed to write clipboard");
                }
            }
            Self::Local(clipboard) => clipboard.set_text(text),
        }
    }
}
