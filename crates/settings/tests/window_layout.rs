use quillpad_settings::{SettingsStore, WindowGeometry, WindowState, GEOMETRY_KEY};
use tempfile::tempdir;

#[test]
fn absent_layout_uses_default_placement() {
    let store = SettingsStore::in_memory();

    let geometry = WindowGeometry::restore(&store);
    assert_eq!((geometry.x, geometry.y), (100.0, 100.0));
    assert_eq!((geometry.width, geometry.height), (1000.0, 700.0));
    assert!(!geometry.maximized);
    assert_eq!(WindowState::restore(&store), WindowState::default());
}

#[test]
fn geometry_and_state_survive_a_restart() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");

    let mut store = SettingsStore::load(&path).expect("load");
    let geometry = WindowGeometry {
        x: 40.0,
        y: 60.0,
        width: 1280.0,
        height: 800.0,
        maximized: true,
    };
    let state = WindowState {
        file_list_width: 175.0,
    };
    geometry.save(&mut store).expect("geometry blob");
    state.save(&mut store).expect("state blob");
    store.sync().expect("sync");

    let reloaded = SettingsStore::load(&path).expect("reload");
    assert_eq!(WindowGeometry::restore(&reloaded), geometry);
    assert_eq!(WindowState::restore(&reloaded), state);
}

#[test]
fn corrupt_geometry_blob_falls_back_to_default() {
    let mut store = SettingsStore::in_memory();
    store.set_bytes(GEOMETRY_KEY, b"\x00\x01garbage");

    assert_eq!(WindowGeometry::restore(&store), WindowGeometry::default());
}
