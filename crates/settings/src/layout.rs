use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{SettingsError, SettingsStore};

/// 視窗位置與大小的設定鍵。 / Store key of the window geometry blob.
pub const GEOMETRY_KEY: &str = "geometry";
/// 面板狀態的設定鍵。 / Store key of the panel state blob.
pub const WINDOW_STATE_KEY: &str = "windowState";

pub const MIN_WINDOW_WIDTH: f32 = 320.0;
pub const MIN_WINDOW_HEIGHT: f32 = 240.0;
pub const FILE_LIST_MIN_WIDTH: f32 = 150.0;
pub const FILE_LIST_MAX_WIDTH: f32 = 200.0;

/// 視窗外框位置（邏輯點）。 / Outer window placement, in logical points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            x: 100.0,
            y: 100.0,
            width: 1000.0,
            height: 700.0,
            maximized: false,
        }
    }
}

impl WindowGeometry {
    /// 修正非有限值並套用最小尺寸。 / Replaces non-finite values and enforces the minimum size.
    pub fn sanitize(&mut self) {
        if !self.x.is_finite() || !self.y.is_finite() {
            let fallback = Self::default();
            self.x = fallback.x;
            self.y = fallback.y;
        }
        if !self.width.is_finite() || self.width < MIN_WINDOW_WIDTH {
            self.width = MIN_WINDOW_WIDTH;
        }
        if !self.height.is_finite() || self.height < MIN_WINDOW_HEIGHT {
            self.height = MIN_WINDOW_HEIGHT;
        }
    }

    /// 還原儲存的位置；缺少或無法讀取時使用預設。 / Restores the saved geometry, or the default placement when absent or unreadable.
    pub fn restore(store: &SettingsStore) -> Self {
        let mut geometry: Self = read_blob(store, GEOMETRY_KEY).unwrap_or_default();
        geometry.sanitize();
        geometry
    }

    /// 寫入設定（尚未同步到磁碟）。 / Writes the blob into `store` without syncing.
    pub fn save(&self, store: &mut SettingsStore) -> Result<(), SettingsError> {
        write_blob(store, GEOMETRY_KEY, self)
    }
}

/// 不屬於視窗位置的側欄狀態。 / Dock and splitter state that is not part of the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    pub file_list_width: f32,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            file_list_width: FILE_LIST_MIN_WIDTH,
        }
    }
}

impl WindowState {
    pub fn sanitize(&mut self) {
        if !self.file_list_width.is_finite() {
            self.file_list_width = FILE_LIST_MIN_WIDTH;
        }
        self.file_list_width = self
            .file_list_width
            .clamp(FILE_LIST_MIN_WIDTH, FILE_LIST_MAX_WIDTH);
    }

    /// 還原側欄寬度。 / Restores the side panel width.
    pub fn restore(store: &SettingsStore) -> Self {
        let mut state: Self = read_blob(store, WINDOW_STATE_KEY).unwrap_or_default();
        state.sanitize();
        state
    }

    pub fn save(&self, store: &mut SettingsStore) -> Result<(), SettingsError> {
        write_blob(store, WINDOW_STATE_KEY, self)
    }
}

fn read_blob<T: DeserializeOwned>(store: &SettingsStore, key: &str) -> Option<T> {
    let bytes = store.bytes(key)?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "discarding unreadable layout blob");
            None
        }
    }
}

fn write_blob<T: Serialize>(
    store: &mut SettingsStore,
    key: &str,
    value: &T,
) -> Result<(), SettingsError> {
    let bytes = serde_json::to_vec(value).map_err(|source| SettingsError::Blob {
        key: key.to_string(),
        source,
    })?;
    store.set_bytes(key, &bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_window_is_grown_to_minimum() {
        let mut geometry = WindowGeometry {
            x: 10.0,
            y: 20.0,
            width: 50.0,
            height: f32::NAN,
            maximized: false,
        };
        geometry.sanitize();
        assert_eq!(geometry.width, MIN_WINDOW_WIDTH);
        assert_eq!(geometry.height, MIN_WINDOW_HEIGHT);
        assert_eq!((geometry.x, geometry.y), (10.0, 20.0));
    }

    #[test]
    fn file_list_width_is_clamped() {
        let mut state = WindowState {
            file_list_width: 900.0,
        };
        state.sanitize();
        assert_eq!(state.file_list_width, FILE_LIST_MAX_WIDTH);
    }
}
