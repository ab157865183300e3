use quillpad_core::Color;
use quillpad_settings::{keys, Preferences, SettingValue, SettingsStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");

    let store = SettingsStore::load(&path).expect("load defaults");
    let prefs = Preferences::load(&store);

    assert_eq!(prefs, Preferences::default());
    assert_eq!(prefs.general.author, "");
    assert!(!prefs.general.auto_save);
    assert_eq!(prefs.general.auto_save_interval, 5);
    assert!(prefs.general.show_status_bar);
    assert!(prefs.general.show_tool_bar);
    assert_eq!(prefs.editor.font_family, "Arial");
    assert_eq!(prefs.editor.font_size, 11);
    assert_eq!(prefs.editor.background_color, Color::WHITE);
    assert_eq!(prefs.editor.text_color, Color::BLACK);
    assert!(prefs.editor.word_wrap);
    assert!(!prefs.editor.line_numbers);
    assert_eq!(prefs.editor.tab_size, 4);
    assert!(!path.exists(), "loading must not create the file");
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("config").join("settings.json");

    let mut store = SettingsStore::load(&path).expect("load");
    let mut prefs = Preferences::default();
    prefs.general.author = "Ada".to_string();
    prefs.general.auto_save = true;
    prefs.general.auto_save_interval = 12;
    prefs.editor.font_family = "Georgia".to_string();
    prefs.editor.background_color = Color::rgb(0x20, 0x20, 0x28);
    prefs.write_to(&mut store);
    store.sync().expect("sync");

    let reloaded = Preferences::load(&SettingsStore::load(&path).expect("reload"));
    assert_eq!(reloaded, prefs);
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn persisted_file_uses_hex_colors_and_namespaced_keys() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");

    let mut store = SettingsStore::load(&path).expect("load");
    Preferences::default().write_to(&mut store);
    store.sync().expect("sync");

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(raw["values"]["editor/backgroundColor"], "#ffffff");
    assert_eq!(raw["values"]["editor/textColor"], "#000000");
    assert_eq!(raw["values"]["general/autoSaveInterval"], 5);
    assert_eq!(raw["values"]["editor/wordWrap"], true);
}

#[test]
fn unparsable_file_is_replaced_by_empty_store() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    fs::write(&path, "{ not json").expect("seed");

    assert!(SettingsStore::load(&path).is_err());

    let store = SettingsStore::load_or_empty(&path);
    assert_eq!(store.keys().count(), 0);
    assert_eq!(store.path(), Some(path.as_path()));
    assert_eq!(Preferences::load(&store), Preferences::default());
}

#[test]
fn hand_edited_values_are_clamped() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    fs::write(
        &path,
        r##"{
            "version": 1,
            "values": {
                "general/autoSaveInterval": 600,
                "editor/fontSize": 2,
                "editor/tabSize": 16,
                "editor/textColor": "#ff0000",
                "editor/wordWrap": false
            }
        }"##,
    )
    .expect("write settings");

    let prefs = Preferences::load(&SettingsStore::load(&path).expect("load"));
    assert_eq!(prefs.general.auto_save_interval, 60);
    assert_eq!(prefs.editor.font_size, 8);
    assert_eq!(prefs.editor.tab_size, 8);
    assert_eq!(prefs.editor.text_color, Color::rgb(0xff, 0, 0));
    assert!(!prefs.editor.word_wrap);
}

#[test]
fn unrelated_keys_survive_a_preferences_write() {
    let mut store = SettingsStore::in_memory();
    store.set_bytes("geometry", b"{}");
    Preferences::default().write_to(&mut store);

    assert!(store.contains("geometry"));
    assert_eq!(
        store.value(keys::AUTHOR),
        Some(&SettingValue::Text(String::new()))
    );
}

#[test]
fn fractional_and_unexpected_values_keep_the_rest_of_the_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("settings.json");
    fs::write(
        &path,
        r##"{
            "version": 1,
            "values": {
                "general/author": "Grace",
                "editor/fontSize": 13.0,
                "editor/tabSize": 5.6,
                "editor/wordWrap": false,
                "editor/lineNumbers": [true],
                "geometry": null
            }
        }"##,
    )
    .expect("write settings");

    let store = SettingsStore::load(&path).expect("load");
    assert!(!store.contains("editor/lineNumbers"));
    assert!(!store.contains("geometry"));

    let prefs = Preferences::load(&store);
    assert_eq!(prefs.general.author, "Grace");
    assert_eq!(prefs.editor.font_size, 13);
    assert_eq!(prefs.editor.tab_size, 6);
    assert!(!prefs.editor.word_wrap);
    assert!(!prefs.editor.line_numbers);

    store.sync().expect("sync");
    let reloaded = SettingsStore::load(&path).expect("reload");
    assert_eq!(reloaded.string_or(keys::AUTHOR, ""), "Grace");
}
