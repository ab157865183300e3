pub mod layout;
pub mod paths;
pub mod preferences;
pub mod store;

pub use layout::{WindowGeometry, WindowState, GEOMETRY_KEY, WINDOW_STATE_KEY};
pub use paths::settings_path;
pub use preferences::{
    keys, EditorPreferences, GeneralPreferences, Preferences, AUTO_SAVE_INTERVAL_RANGE,
    FONT_FAMILIES, FONT_SIZE_RANGE, TAB_SIZE_RANGE,
};
pub use store::{SettingValue, SettingsError, SettingsStore};
