use std::ops::RangeInclusive;

use quillpad_core::Color;

use crate::store::SettingsStore;

/// 各偏好設定在設定檔中的鍵。 / Store keys of every preference.
pub mod keys {
    pub const AUTHOR: &str = "general/author";
    pub const AUTO_SAVE: &str = "general/autoSave";
    pub const AUTO_SAVE_INTERVAL: &str = "general/autoSaveInterval";
    pub const SHOW_STATUS_BAR: &str = "general/showStatusBar";
    pub const SHOW_TOOL_BAR: &str = "general/showToolBar";
    pub const FONT_FAMILY: &str = "editor/fontFamily";
    pub const FONT_SIZE: &str = "editor/fontSize";
    pub const BACKGROUND_COLOR: &str = "editor/backgroundColor";
    pub const TEXT_COLOR: &str = "editor/textColor";
    pub const WORD_WRAP: &str = "editor/wordWrap";
    pub const LINE_NUMBERS: &str = "editor/lineNumbers";
    pub const TAB_SIZE: &str = "editor/tabSize";
}

/// 自動儲存間隔（分鐘）。 / Minutes between automatic saves.
pub const AUTO_SAVE_INTERVAL_RANGE: RangeInclusive<u32> = 1..=60;
/// 字型大小範圍（點）。 / Allowed font sizes, in points.
pub const FONT_SIZE_RANGE: RangeInclusive<u16> = 8..=72;
/// Tab 寬度範圍。 / Allowed tab widths.
pub const TAB_SIZE_RANGE: RangeInclusive<u32> = 2..=8;

/// 偏好設定對話框提供的字型。 / Font families offered by the preferences dialog.
pub const FONT_FAMILIES: [&str; 6] = [
    "Arial",
    "Courier New",
    "Georgia",
    "Helvetica",
    "Times New Roman",
    "Verdana",
];

/// 一般分頁的設定。 / Settings on the General tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralPreferences {
    pub author: String,
    pub auto_save: bool,
    pub auto_save_interval: u32,
    pub show_status_bar: bool,
    pub show_tool_bar: bool,
}

impl Default for GeneralPreferences {
    fn default() -> Self {
        Self {
            author: String::new(),
            auto_save: false,
            auto_save_interval: 5,
            show_status_bar: true,
            show_tool_bar: true,
        }
    }
}

/// 編輯器分頁的設定。 / Settings on the Editor tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorPreferences {
    pub font_family: String,
    pub font_size: u16,
    pub background_color: Color,
    pub text_color: Color,
    pub word_wrap: bool,
    pub line_numbers: bool,
    pub tab_size: u32,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 11,
            background_color: Color::WHITE,
            text_color: Color::BLACK,
            word_wrap: true,
            line_numbers: false,
            tab_size: 4,
        }
    }
}

/// 完整的偏好設定，`Default` 即重設值。 / The full preferences record. `Default` holds the reset values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub general: GeneralPreferences,
    pub editor: EditorPreferences,
}

impl Preferences {
    /// 讀取所有偏好設定，缺少或型別錯誤時使用預設值並限制數值範圍。 / Reads every preference, falling back to the default for absent or
    /// mistyped keys, then clamps numeric fields.
    pub fn load(store: &SettingsStore) -> Self {
        let defaults = Self::default();
        let mut prefs = Self {
            general: GeneralPreferences {
                author: store.string_or(keys::AUTHOR, &defaults.general.author),
                auto_save: store.bool_or(keys::AUTO_SAVE, defaults.general.auto_save),
                auto_save_interval: clamp_stored(
                    store.int_or(
                        keys::AUTO_SAVE_INTERVAL,
                        defaults.general.auto_save_interval.into(),
                    ),
                    &AUTO_SAVE_INTERVAL_RANGE,
                ),
                show_status_bar: store
                    .bool_or(keys::SHOW_STATUS_BAR, defaults.general.show_status_bar),
                show_tool_bar: store.bool_or(keys::SHOW_TOOL_BAR, defaults.general.show_tool_bar),
            },
            editor: EditorPreferences {
                font_family: store.string_or(keys::FONT_FAMILY, &defaults.editor.font_family),
                font_size: clamp_stored(
                    store.int_or(keys::FONT_SIZE, defaults.editor.font_size.into()),
                    &FONT_SIZE_RANGE,
                ),
                background_color: store
                    .color_or(keys::BACKGROUND_COLOR, defaults.editor.background_color),
                text_color: store.color_or(keys::TEXT_COLOR, defaults.editor.text_color),
                word_wrap: store.bool_or(keys::WORD_WRAP, defaults.editor.word_wrap),
                line_numbers: store.bool_or(keys::LINE_NUMBERS, defaults.editor.line_numbers),
                tab_size: clamp_stored(
                    store.int_or(keys::TAB_SIZE, defaults.editor.tab_size.into()),
                    &TAB_SIZE_RANGE,
                ),
            },
        };
        prefs.sanitize();
        prefs
    }

    /// 將數值限制在允許範圍內，空白字型改回預設。 / Clamps numeric fields and restores a blank font family.
    pub fn sanitize(&mut self) {
        let general = &mut self.general;
        general.auto_save_interval = general.auto_save_interval.clamp(
            *AUTO_SAVE_INTERVAL_RANGE.start(),
            *AUTO_SAVE_INTERVAL_RANGE.end(),
        );
        let editor = &mut self.editor;
        editor.font_size = editor
            .font_size
            .clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
        editor.tab_size = editor
            .tab_size
            .clamp(*TAB_SIZE_RANGE.start(), *TAB_SIZE_RANGE.end());
        if editor.font_family.trim().is_empty() {
            editor.font_family = EditorPreferences::default().font_family;
        }
    }

    /// 將所有偏好設定寫入 `store`，需呼叫 [`SettingsStore::sync`] 才會存檔。 / Writes every preference into `store`; call [`SettingsStore::sync`] to persist.
    pub fn write_to(&self, store: &mut SettingsStore) {
        let general = &self.general;
        store.set_string(keys::AUTHOR, general.author.as_str());
        store.set_bool(keys::AUTO_SAVE, general.auto_save);
        store.set_int(keys::AUTO_SAVE_INTERVAL, general.auto_save_interval.into());
        store.set_bool(keys::SHOW_STATUS_BAR, general.show_status_bar);
        store.set_bool(keys::SHOW_TOOL_BAR, general.show_tool_bar);

        let editor = &self.editor;
        store.set_string(keys::FONT_FAMILY, editor.font_family.as_str());
        store.set_int(keys::FONT_SIZE, editor.font_size.into());
        store.set_color(keys::BACKGROUND_COLOR, editor.background_color);
        store.set_color(keys::TEXT_COLOR, editor.text_color);
        store.set_bool(keys::WORD_WRAP, editor.word_wrap);
        store.set_bool(keys::LINE_NUMBERS, editor.line_numbers);
        store.set_int(keys::TAB_SIZE, editor.tab_size.into());
    }
}

fn clamp_stored<T>(value: i64, range: &RangeInclusive<T>) -> T
where
    T: Copy + Into<i64> + TryFrom<i64>,
{
    let clamped = value.clamp((*range.start()).into(), (*range.end()).into());
    T::try_from(clamped).unwrap_or(*range.start())
}
