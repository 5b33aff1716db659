use ck_session::*;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(name)
}

#[test]
fn roundtrip_yaml_session() {
    let session = SessionDef::new(vec!["Track1".to_string(), "Track2".to_string()], true);
    let path = temp_path("ck_session_roundtrip.yaml");

    save_yaml(&path, &session).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(session, loaded);
}

#[test]
fn roundtrip_json_session() {
    let session = SessionDef::new(vec!["A".to_string()], false);
    let path = temp_path("ck_session_roundtrip.json");

    save(&path, &session).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"selected_curves\""));

    let loaded = load(&path).unwrap();
    assert_eq!(session, loaded);
}

#[test]
fn missing_fields_default() {
    let path = temp_path("ck_session_minimal.yaml");
    std::fs::write(&path, "version: 1\n").unwrap();

    let loaded = load_yaml(&path).unwrap();
    assert!(loaded.selected_curves.is_empty());
    assert!(!loaded.show_all);
}

#[test]
fn legacy_file_is_migrated_on_load() {
    let path = temp_path("ck_session_v0.json");
    std::fs::write(
        &path,
        r#"{"version": 0, "selected_curves": ["A", "B", "A"], "show_all": false}"#,
    )
    .unwrap();

    let loaded = load_json(&path).unwrap();
    assert_eq!(loaded.version, LATEST_VERSION);
    assert_eq!(loaded.selected_curves, vec!["A", "B"]);
}

#[test]
fn invalid_session_is_not_written() {
    let path = temp_path("ck_session_invalid.yaml");
    let _ = std::fs::remove_file(&path);

    let session = SessionDef::new(vec!["A".to_string(), "A".to_string()], false);
    let err = save_yaml(&path, &session).unwrap_err();

    assert!(matches!(err, SessionError::Validation(_)));
    assert!(!path.exists());
}
