//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use smartcon_domain::SmartconError;
use smartcon_infra::config;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create config file");
    file.write_all(contents.as_bytes()).expect("Failed to write config file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "smartcon.json",
        r#"{
            "database": { "path": "/tmp/integration_test.db", "pool_size": 10 },
            "server": { "bind_addr": "0.0.0.0:9000" },
            "invoice_api": { "base_url": "https://invoice.example.com", "timeout_secs": 5 },
            "export": { "output_dir": "/tmp/exports" },
            "integrity": { "batch_size": 200, "auto_reconcile_interval_secs": 600 },
            "registration": { "construction_company_name": "한빛종합건설" }
        }"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from JSON file");

    assert_eq!(config.database.path, "/tmp/integration_test.db");
    assert_eq!(config.database.pool_size, 10);
    assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
    assert_eq!(config.invoice_api.base_url.as_deref(), Some("https://invoice.example.com"));
    assert_eq!(config.invoice_api.timeout_secs, 5);
    assert_eq!(config.export.output_dir, "/tmp/exports");
    assert_eq!(config.integrity.batch_size, 200);
    assert_eq!(config.integrity.auto_reconcile_interval_secs, Some(600));
    assert_eq!(config.registration.construction_company_name, "한빛종합건설");
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "smartcon.toml",
        r#"
[database]
path = "/tmp/integration_test_toml.db"
pool_size = 3

[integrity]
batch_size = 50
"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from TOML file");

    assert_eq!(config.database.path, "/tmp/integration_test_toml.db");
    assert_eq!(config.database.pool_size, 3);
    assert_eq!(config.integrity.batch_size, 50);
    assert_eq!(config.integrity.auto_reconcile_interval_secs, None);
}

#[test]
fn test_load_config_with_minimal_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "smartcon.json",
        r#"{ "database": { "path": "minimal.db", "pool_size": 1 } }"#,
    );

    let config = config::load_from_file(Some(path)).unwrap();

    assert_eq!(config.database.path, "minimal.db");
    assert_eq!(config.export.output_dir, "exports");
    assert_eq!(config.integrity.batch_size, 500);
    assert_eq!(config.registration.construction_company_name, "청연");
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/smartcon.json".into()));
    assert!(matches!(result, Err(SmartconError::Config(msg)) if msg.contains("not found")));
}

#[test]
fn test_load_config_with_invalid_format() {
    let dir = TempDir::new().unwrap();

    let bad_json = write_config(&dir, "broken.json", "{ not json");
    assert!(matches!(
        config::load_from_file(Some(bad_json)),
        Err(SmartconError::Config(msg)) if msg.contains("Invalid JSON")
    ));

    let yaml = write_config(&dir, "smartcon.yaml", "database: {}");
    assert!(matches!(
        config::load_from_file(Some(yaml)),
        Err(SmartconError::Config(msg)) if msg.contains("Unsupported")
    ));
}

#[test]
fn test_missing_database_section_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "smartcon.json", r#"{ "server": { "bind_addr": "x" } }"#);
    assert!(matches!(config::load_from_file(Some(path)), Err(SmartconError::Config(_))));
}
