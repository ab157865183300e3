//! 主視窗的文件流程：目前檔案、未儲存提示與動作分派。 / Main-window document logic: current file, modified gate and action dispatch.
//!
//! Everything that needs a human answer goes through [`Prompter`], so the same
//! flow runs under the GUI's native dialogs and under scripted tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::actions::Action;
use crate::clipboard::Clipboard;
use crate::document::{self, DocumentError};
use crate::editor::TextEditor;
use crate::status::CursorStatus;

/// 應用程式名稱，用於標題列與對話框。 / Application name used in the title bar and dialogs.
pub const APP_NAME: &str = "QuillPad";

const UNTITLED_NAME: &str = "untitled.txt";
const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// 未儲存變更提示的回答。 / Answer to the unsaved-changes question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

/// 文件操作所需的阻塞式使用者互動。 / Blocking user interaction needed by document operations.
pub trait Prompter {
    /// 詢問是否儲存變更（儲存／捨棄／取消）。 / Asks Save, Discard or Cancel for unsaved changes.
    fn ask_save_changes(&mut self) -> SaveChoice;
    /// 選擇要開啟的檔案；取消時回傳 `None`。 / Picks a file to open, `None` when dismissed.
    fn pick_open_path(&mut self) -> Option<PathBuf>;
    /// 選擇儲存位置；取消時回傳 `None`。 / Picks a save target, `None` when dismissed.
    fn pick_save_path(&mut self) -> Option<PathBuf>;
    /// 顯示警告訊息。 / Shows a warning box.
    fn warn(&mut self, title: &str, message: &str);
    /// 顯示資訊訊息。 / Shows an information box.
    fn inform(&mut self, title: &str, message: &str);
    /// 是／否提問；`true` 代表是。 / Yes/No question; `true` means Yes.
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

/// 分派動作後外殼需要執行的事項。 / What the shell must do after an action was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Handled,
    ShowPreferences,
    ShowAbout,
    ShowAboutToolkit,
    Quit,
}

/// 狀態列的暫時訊息。 / Transient status-bar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub timeout: Duration,
}

impl StatusMessage {
    fn transient(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timeout: STATUS_TIMEOUT,
        }
    }
}

/// 持有編輯器與目前檔案的工作階段。 / Session owning the editor and the current file.
#[derive(Debug)]
pub struct EditorSession {
    editor: TextEditor,
    current_file: Option<PathBuf>,
    status_message: Option<StatusMessage>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(TextEditor::welcome())
    }
}

impl EditorSession {
    /// 以指定編輯器建立工作階段，狀態列顯示 "Ready"。 / Creates a session around `editor` with a "Ready" status.
    pub fn new(editor: TextEditor) -> Self {
        Self {
            editor,
            current_file: None,
            status_message: Some(StatusMessage::transient("Ready")),
        }
    }

    pub fn editor(&self) -> &TextEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut TextEditor {
        &mut self.editor
    }

    /// 目前檔案路徑；未命名時為 `None`。 / Current file, `None` while untitled.
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.editor.is_modified()
    }

    pub fn cursor_status(&self) -> CursorStatus {
        self.editor.cursor_status()
    }

    /// 標題列顯示的檔名；沒有檔案時為 `untitled.txt`。 / File name shown in the title bar; `untitled.txt` when there is no file.
    pub fn display_name(&self) -> String {
        self.current_file
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED_NAME.to_string())
    }

    /// 視窗標題，修改時帶有 `[*]`。 / Window title, carrying `[*]` while modified.
    pub fn window_title(&self) -> String {
        let marker = if self.is_modified() { "[*]" } else { "" };
        format!("{}{} - {}", self.display_name(), marker, APP_NAME)
    }

    /// 取出待顯示的狀態訊息。 / Takes the pending status message.
    pub fn take_status_message(&mut self) -> Option<StatusMessage> {
        self.status_message.take()
    }

    /// 執行一個動作並回報外殼要做的事。 / Runs `action` and reports what the shell must do next.
    pub fn dispatch(
        &mut self,
        action: Action,
        prompter: &mut dyn Prompter,
        clipboard: &mut dyn Clipboard,
    ) -> ActionOutcome {
        debug!(?action, "dispatching action");
        match action {
            Action::New => {
                self.new_file(prompter);
            }
            Action::Open => {
                self.open_file(prompter);
            }
            Action::Save => {
                self.save_file(prompter);
            }
            Action::SaveAs => {
                self.save_as_file(prompter);
            }
            Action::Exit => {
                if self.request_exit(prompter) {
                    return ActionOutcome::Quit;
                }
            }
            Action::Undo => {
                self.editor.undo();
            }
            Action::Redo => {
                self.editor.redo();
            }
            Action::Cut => self.editor.cut(clipboard),
            Action::Copy => self.editor.copy(clipboard),
            Action::Paste => self.editor.paste(clipboard),
            Action::SelectAll => self.editor.select_all(),
            Action::Find => self.find(prompter),
            Action::Replace => self.replace(prompter),
            Action::Preferences => return ActionOutcome::ShowPreferences,
            Action::About => return ActionOutcome::ShowAbout,
            Action::AboutToolkit => return ActionOutcome::ShowAboutToolkit,
        }
        ActionOutcome::Handled
    }

    /// 通過未儲存提示後清空文件。 / Clears the document after the unsaved-changes gate.
    pub fn new_file(&mut self, prompter: &mut dyn Prompter) -> bool {
        if !self.maybe_save(prompter) {
            return false;
        }
        self.editor.clear();
        self.set_current_file(None);
        true
    }

    /// 以使用者選取的檔案取代文件。 / Replaces the document with a file picked by the user.
    pub fn open_file(&mut self, prompter: &mut dyn Prompter) -> bool {
        if !self.maybe_save(prompter) {
            return false;
        }
        let Some(path) = prompter.pick_open_path() else {
            return false;
        };
        match self.load(&path) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "open failed");
                prompter.warn(
                    APP_NAME,
                    &format!("Cannot read file {}:\n{}.", path.display(), err.reason()),
                );
                false
            }
        }
    }

    /// 不經提示直接載入 `path`。 / Loads `path` without prompting.
    pub fn load(&mut self, path: &Path) -> Result<(), DocumentError> {
        let loaded = document::read_text(path)?;
        self.editor.set_plain_text(loaded.text);
        self.set_current_file(Some(path.to_path_buf()));
        self.status_message = Some(StatusMessage::transient("File loaded"));
        info!(path = %path.display(), "document loaded");
        Ok(())
    }

    /// 儲存至目前檔案；沒有檔案時改為另存新檔。 / Saves to the current file, or behaves as Save As when there is none.
    pub fn save_file(&mut self, prompter: &mut dyn Prompter) -> bool {
        let Some(path) = self.current_file.clone() else {
            return self.save_as_file(prompter);
        };
        self.write_to(&path, prompter)
    }

    /// 詢問路徑後儲存，成功時成為目前檔案。 / Saves under a picked path, which becomes the current file.
    pub fn save_as_file(&mut self, prompter: &mut dyn Prompter) -> bool {
        let Some(path) = prompter.pick_save_path() else {
            return false;
        };
        if !self.write_to(&path, prompter) {
            return false;
        }
        self.set_current_file(Some(path));
        true
    }

    /// 未儲存變更的關卡；回傳 `false` 時應放棄待執行動作。 / The unsaved-changes gate. `false` means the pending action must be abandoned.
    ///
    /// Choosing Save lets the action proceed even when the save itself did not
    /// complete.
    pub fn maybe_save(&mut self, prompter: &mut dyn Prompter) -> bool {
        if !self.editor.is_modified() {
            return true;
        }
        match prompter.ask_save_changes() {
            SaveChoice::Save => {
                self.save_file(prompter);
                true
            }
            SaveChoice::Discard => true,
            SaveChoice::Cancel => false,
        }
    }

    /// 結束前的確認。 / Gate run by File > Exit.
    pub fn request_exit(&mut self, prompter: &mut dyn Prompter) -> bool {
        self.maybe_save(prompter)
    }

    /// 決定視窗關閉要求是否可繼續。 / Decides whether a window close request may proceed.
    pub fn handle_close_request(&mut self, prompter: &mut dyn Prompter) -> bool {
        self.maybe_save(prompter)
    }

    /// 尋找功能的佔位訊息。 / Placeholder for Find.
    pub fn find(&mut self, prompter: &mut dyn Prompter) {
        prompter.inform("Find", "Find functionality would be implemented here.");
    }

    /// 取代功能的佔位訊息。 / Placeholder for Replace.
    pub fn replace(&mut self, prompter: &mut dyn Prompter) {
        prompter.inform("Replace", "Replace functionality would be implemented here.");
    }

    fn write_to(&mut self, path: &Path, prompter: &mut dyn Prompter) -> bool {
        match document::write_text(path, self.editor.text()) {
            Ok(()) => {
                self.editor.mark_clean();
                self.status_message = Some(StatusMessage::transient("File saved"));
                info!(path = %path.display(), "document saved");
                true
            }
            Err(err) => {
                warn!(error = %err, "save failed");
                prompter.warn(
                    APP_NAME,
                    &format!("Cannot write file {}:\n{}.", path.display(), err.reason()),
                );
                false
            }
        }
    }

    fn set_current_file(&mut self, path: Option<PathBuf>) {
        self.current_file = path;
        self.editor.mark_clean();
    }
}
