//! 使用者可觸發的指令集合與選單資訊。 / The closed set of user-triggerable commands and their menu metadata.

/// 選單、工具列或快捷鍵可觸發的指令。 / Every command reachable from a menu, toolbar or shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Find,
    Replace,
    Preferences,
    About,
    AboutToolkit,
}

/// 內建快捷鍵使用的按鍵。 / Keys used by the built-in shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutKey {
    A,
    C,
    F,
    H,
    N,
    O,
    Q,
    S,
    V,
    X,
    Y,
    Z,
}

/// 快捷鍵固定使用平台的指令修飾鍵，可加上 Shift。 / A shortcut always uses the platform command modifier, optionally with shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub key: ShortcutKey,
    pub shift: bool,
}

impl Shortcut {
    const fn command(key: ShortcutKey) -> Self {
        Self { key, shift: false }
    }

    const fn command_shift(key: ShortcutKey) -> Self {
        Self { key, shift: true }
    }
}

impl Action {
    /// 依選單順序列出所有指令。 / Every action in menu order.
    pub const ALL: [Action; 16] = [
        Action::New,
        Action::Open,
        Action::Save,
        Action::SaveAs,
        Action::Exit,
        Action::Undo,
        Action::Redo,
        Action::Cut,
        Action::Copy,
        Action::Paste,
        Action::SelectAll,
        Action::Find,
        Action::Replace,
        Action::Preferences,
        Action::About,
        Action::AboutToolkit,
    ];

    /// 選單文字。 / Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Action::New => "New",
            Action::Open => "Open...",
            Action::Save => "Save",
            Action::SaveAs => "Save As...",
            Action::Exit => "Exit",
            Action::Undo => "Undo",
            Action::Redo => "Redo",
            Action::Cut => "Cut",
            Action::Copy => "Copy",
            Action::Paste => "Paste",
            Action::SelectAll => "Select All",
            Action::Find => "Find...",
            Action::Replace => "Replace...",
            Action::Preferences => "Preferences...",
            Action::About => "About",
            Action::AboutToolkit => "About egui",
        }
    }

    /// 滑鼠停留時顯示於狀態列的提示。 / Hint shown in the status bar on hover.
    pub fn status_tip(self) -> &'static str {
        match self {
            Action::New => "Create a new file",
            Action::Open => "Open an existing file",
            Action::Save => "Save the document to disk",
            Action::SaveAs => "Save the document under a new name",
            Action::Exit => "Exit the application",
            Action::Undo => "Undo the last operation",
            Action::Redo => "Redo the last operation",
            Action::Cut => "Cut the current selection's contents to the clipboard",
            Action::Copy => "Copy the current selection's contents to the clipboard",
            Action::Paste => "Paste the clipboard's contents into the current selection",
            Action::SelectAll => "Select all text",
            Action::Find => "Find text",
            Action::Replace => "Replace text",
            Action::Preferences => "Configure application preferences",
            Action::About => "Show the application's About box",
            Action::AboutToolkit => "Show the GUI toolkit's About box",
        }
    }

    pub fn shortcut(self) -> Option<Shortcut> {
        use ShortcutKey as K;
        match self {
            Action::New => Some(Shortcut::command(K::N)),
            Action::Open => Some(Shortcut::command(K::O)),
            Action::Save => Some(Shortcut::command(K::S)),
            Action::SaveAs => Some(Shortcut::command_shift(K::S)),
            Action::Exit => Some(Shortcut::command(K::Q)),
            Action::Undo => Some(Shortcut::command(K::Z)),
            Action::Redo => Some(Shortcut::command(K::Y)),
            Action::Cut => Some(Shortcut::command(K::X)),
            Action::Copy => Some(Shortcut::command(K::C)),
            Action::Paste => Some(Shortcut::command(K::V)),
            Action::SelectAll => Some(Shortcut::command(K::A)),
            Action::Find => Some(Shortcut::command(K::F)),
            Action::Replace => Some(Shortcut::command(K::H)),
            Action::Preferences | Action::About | Action::AboutToolkit => None,
        }
    }

    /// 由文字元件原生處理快捷鍵的指令。 / Commands whose shortcuts a focused text widget already handles.
    ///
    /// The shell does not intercept these.
    pub fn is_text_widget_native(self) -> bool {
        matches!(
            self,
            Action::Cut | Action::Copy | Action::Paste | Action::SelectAll
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn shortcuts_are_unique() {
        let shortcuts: Vec<Shortcut> = Action::ALL.iter().filter_map(|a| a.shortcut()).collect();
        let unique: HashSet<_> = shortcuts.iter().copied().collect();
        assert_eq!(shortcuts.len(), unique.len());
    }

    #[test]
    fn every_action_has_label_and_tip() {
        for action in Action::ALL {
            assert!(!action.label().is_empty(), "{action:?}");
            assert!(!action.status_tip().is_empty(), "{action:?}");
        }
    }
}
