use camkit_core::Units;
use camkit_editor::EditorConfig;
use tempfile::tempdir;

#[test]
fn test_toml_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("editor.toml");

    let mut config = EditorConfig::default();
    config.units = Units::Imperial;
    config.snap.grid_x = 0.05;
    config.drawing.circle_steps = 64;
    config.drill.array.size = 8;
    config.save_to_file(&path).unwrap();

    let loaded = EditorConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("editor.json");
    let mut config = EditorConfig::default();
    config.drawing.selection_color = "#00FF00".to_string();
    config.save_to_file(&path).unwrap();
    assert_eq!(EditorConfig::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = EditorConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, EditorConfig::default());
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("editor.toml");
    std::fs::write(&path, "[snap]\ngrid_x = 0.5\ncorner_snap = true\n").unwrap();
    let config = EditorConfig::load_from_file(&path).unwrap();
    assert_eq!(config.snap.grid_x, 0.5);
    assert!(config.snap.corner_snap);
    assert_eq!(config.drawing, EditorConfig::default().drawing);
}

#[test]
fn test_unknown_extension_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("editor.yaml");
    let err = EditorConfig::default().save_to_file(&path).unwrap_err();
    assert!(matches!(err, camkit_core::Error::UnsupportedFormat { .. }));
}
