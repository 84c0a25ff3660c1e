use cellbind_core::{ConfigError, CoreConfig, ObjectRegistry};
use std::fs;

#[test]
fn load_reads_json_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cellbind.json");
    let log_dir = dir.path().join("logs");
    let raw = serde_json::json!({
        "logging": { "level": "warn", "dir": log_dir },
        "registry": { "max_entries": 2, "max_age_secs": 600 }
    });
    fs::write(&path, raw.to_string()).expect("write config");

    let config = CoreConfig::load(&path).expect("load config");
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.dir.as_deref(), Some(log_dir.as_path()));
    assert_eq!(config.registry.max_entries, Some(2));
    assert_eq!(config.registry.max_age_secs, Some(600));
}

#[test]
fn load_reports_missing_file_and_bad_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = CoreConfig::load(dir.path().join("absent.json")).expect_err("missing file");
    assert!(matches!(err, ConfigError::Io(_)));

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write config");
    let err = CoreConfig::load(&path).expect_err("bad json");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn registry_applies_configured_capacity() {
    let config =
        CoreConfig::from_json_str(r#"{"registry": {"max_entries": 1}}"#).expect("config");
    let mut registry = ObjectRegistry::with_config(config.registry);

    let first = registry.register("a", 1_u8).expect("first");
    let second = registry.register("b", 2_u8).expect("second");

    assert!(!registry.contains(&first));
    assert!(registry.contains(&second));
    assert_eq!(registry.len(), 1);
}
