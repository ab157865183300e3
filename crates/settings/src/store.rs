use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use quillpad_core::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

const SETTINGS_VERSION: u32 = 1;

/// 設定檔讀寫錯誤。 / Errors raised while loading or persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize settings {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {key} blob: {source}")]
    Blob {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no configuration directory is available on this platform")]
    NoConfigDir,
}

/// 單一設定值；顏色與二進位資料以字串保存。 / A single stored value. Colors and byte blobs are kept as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    /// 手動編輯的非整數數值。 / Non-integral number, usually from a hand-edited file.
    Float(f64),
    Text(String),
}

#[derive(Debug, Serialize)]
struct SettingsFile<'a> {
    version: u32,
    values: &'a BTreeMap<String, SettingValue>,
}

/// Entries are decoded one by one so a single bad value cannot discard the file.
#[derive(Debug, Deserialize)]
struct RawSettingsFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    values: BTreeMap<String, serde_json::Value>,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

/// 以 JSON 檔保存的命名空間鍵值設定。 / Namespaced key-value settings backed by a JSON file.
///
/// Keys look like `group/name`. Writes only reach the disk on [`SettingsStore::sync`].
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, SettingValue>,
}

impl SettingsStore {
    /// 不寫入磁碟的設定。 / A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// 載入 `path`；檔案不存在時回傳綁定該路徑的空設定。 / Loads `path`; a missing file yields an empty store bound to that path.
    ///
    /// Entries whose value is not a bool, number or string are logged and skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self {
                    path: Some(path),
                    values: BTreeMap::new(),
                });
            }
            Err(source) => return Err(SettingsError::Read { path, source }),
        };
        let file: RawSettingsFile =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?;
        let mut values = BTreeMap::new();
        for (key, raw) in file.values {
            match serde_json::from_value::<SettingValue>(raw) {
                Ok(value) => {
                    values.insert(key, value);
                }
                Err(err) => warn!(key = key.as_str(), error = %err, "skipping unreadable setting"),
            }
        }
        info!(
            path = %path.display(),
            version = file.version,
            entries = values.len(),
            "loaded settings"
        );
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// 同 [`SettingsStore::load`]，但無法讀取的檔案會記錄後以空設定取代。 / Like [`SettingsStore::load`], but an unreadable file is logged and
    /// replaced by an empty store at the same path.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "settings file ignored");
                Self {
                    path: Some(path.to_path_buf()),
                    values: BTreeMap::new(),
                }
            }
        }
    }

    /// 開啟使用者層級的設定檔。 / Opens the per-user settings file.
    pub fn open_default() -> Result<Self, SettingsError> {
        let path = crate::paths::settings_path().ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::load_or_empty(path))
    }

    /// 設定檔路徑；記憶體設定為 `None`。 / Backing file, `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// 寫入任意設定值。 / Stores a raw value.
    pub fn set_value(&mut self, key: impl Into<String>, value: SettingValue) {
        self.values.insert(key.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// 讀取布林值；缺少或型別不符時回傳 `default`。 / Reads a bool, or `default` when absent or mistyped.
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(SettingValue::Bool(value)) => *value,
            _ => default,
        }
    }

    /// 讀取整數；小數會四捨五入。 / Reads an integer, rounding stored fractions.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(SettingValue::Int(value)) => *value,
            Some(SettingValue::Float(value)) if value.is_finite() => value.round() as i64,
            _ => default,
        }
    }

    /// 讀取字串。 / Reads a string.
    pub fn string_or(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(SettingValue::Text(value)) => value.clone(),
            _ => default.to_string(),
        }
    }

    /// 讀取 `#rrggbb` 顏色；格式錯誤時回傳 `default`。 / Reads a `#rrggbb` color, or `default` when malformed.
    pub fn color_or(&self, key: &str, default: Color) -> Color {
        match self.values.get(key) {
            Some(SettingValue::Text(value)) => Color::from_hex(value).unwrap_or_else(|err| {
                warn!(key, value = value.as_str(), error = %err, "invalid stored color");
                default
            }),
            _ => default,
        }
    }

    /// 讀取 base64 資料；缺少或無效時回傳 `None`。 / Returns a stored blob, or `None` when absent or not valid base64.
    pub fn bytes(&self, key: &str) -> Option<Vec<u8>> {
        match self.values.get(key) {
            Some(SettingValue::Text(value)) => BASE64.decode(value).ok(),
            _ => None,
        }
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set_value(key, SettingValue::Bool(value));
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.set_value(key, SettingValue::Int(value));
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set_value(key, SettingValue::Text(value.into()));
    }

    /// 以十六進位字串保存顏色。 / Stores a color as a hex string.
    pub fn set_color(&mut self, key: impl Into<String>, color: Color) {
        self.set_value(key, SettingValue::Text(color.to_hex()));
    }

    /// 以 base64 保存二進位資料。 / Stores a blob as base64.
    pub fn set_bytes(&mut self, key: impl Into<String>, bytes: &[u8]) {
        self.set_value(key, SettingValue::Text(BASE64.encode(bytes)));
    }

    /// 透過暫存檔將所有設定寫入磁碟。 / Flushes every value to disk through a temporary file.
    pub fn sync(&self) -> Result<(), SettingsError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = SettingsFile {
            version: SETTINGS_VERSION,
            values: &self.values,
        };
        let payload =
            serde_json::to_string_pretty(&file).map_err(|source| SettingsError::Serialize {
                path: path.to_path_buf(),
                source,
            })?;

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| SettingsError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, path).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "settings synced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_fall_back_on_type_mismatch() {
        let mut store = SettingsStore::in_memory();
        store.set_string("editor/fontSize", "large");
        store.set_int("general/autoSave", 1);

        assert_eq!(store.int_or("editor/fontSize", 11), 11);
        assert!(!store.bool_or("general/autoSave", false));
        assert_eq!(store.string_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn fractional_numbers_round_to_integers() {
        let mut store = SettingsStore::in_memory();
        store.set_value("editor/fontSize", SettingValue::Float(11.6));
        store.set_value("editor/tabSize", SettingValue::Float(f64::NAN));
        assert_eq!(store.int_or("editor/fontSize", 9), 12);
        assert_eq!(store.int_or("editor/tabSize", 4), 4);
    }

    #[test]
    fn colors_are_stored_as_hex() {
        let mut store = SettingsStore::in_memory();
        store.set_color("editor/textColor", Color::rgb(0x12, 0xab, 0x00));

        assert_eq!(
            store.value("editor/textColor"),
            Some(&SettingValue::Text("#12ab00".to_string()))
        );
        assert_eq!(
            store.color_or("editor/textColor", Color::BLACK),
            Color::rgb(0x12, 0xab, 0x00)
        );
    }

    #[test]
    fn malformed_color_uses_default() {
        let mut store = SettingsStore::in_memory();
        store.set_string("editor/backgroundColor", "white");
        assert_eq!(
            store.color_or("editor/backgroundColor", Color::WHITE),
            Color::WHITE
        );
    }

    #[test]
    fn blobs_round_trip_through_base64() {
        let mut store = SettingsStore::in_memory();
        store.set_bytes("geometry", &[0, 1, 2, 250]);
        assert_eq!(store.bytes("geometry"), Some(vec![0, 1, 2, 250]));

        store.set_string("geometry", "not base64!");
        assert_eq!(store.bytes("geometry"), None);
    }

    #[test]
    fn in_memory_sync_is_a_no_op() {
        let mut store = SettingsStore::in_memory();
        store.set_bool("general/showToolBar", false);
        store.sync().expect("sync");
        assert!(store.path().is_none());
    }
}
