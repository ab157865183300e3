use std::path::PathBuf;

use directories::ProjectDirs;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "QuillPad";
const APP_NAME: &str = "QuillPad";
const SETTINGS_FILENAME: &str = "settings.json";

/// 使用者設定檔路徑；平台沒有設定目錄時為 `None`。 / Per-user settings file, or `None` when the platform has no config directory.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILENAME))
}
