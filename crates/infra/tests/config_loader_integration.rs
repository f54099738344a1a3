//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use tempfile::NamedTempFile;
use vendorlink_domain::VendorLinkError;
use vendorlink_infra::config;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "base_url": "https://vendors.example.com/api/v2",
        "token": "json-token",
        "timeout_secs": 12,
        "max_workers": 3,
        "retry": {
            "base_delay_ms": 200,
            "max_attempts": 4
        }
    }"#;
    let path = write_config(json_content, "json");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    let config = result.expect("Failed to load config from JSON file");
    assert_eq!(config.base_url, "https://vendors.example.com/api/v2");
    assert_eq!(config.timeout_secs, 12);
    assert_eq!(config.max_workers, 3);
    assert_eq!(config.retry.base_delay_ms, 200);
    assert_eq!(config.retry.max_attempts, 4);
}

#[test]
fn test_load_config_from_toml_file_with_defaults() {
    let toml_content = r#"
token = "toml-token"
max_workers = 7
"#;
    let path = write_config(toml_content, "toml");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    let config = result.expect("Failed to load config from TOML file");
    assert_eq!(config.max_workers, 7);
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.base_delay_ms, 1000);
}

#[test]
fn test_invalid_values_are_rejected() {
    let path = write_config(r#"{ "token": "t", "retry": { "max_attempts": 0 } }"#, "json");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(VendorLinkError::Config(_))));
}

#[test]
fn test_invalid_json_is_a_config_error() {
    let path = write_config(r#"{ "this is": "not valid json" "#, "json");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(VendorLinkError::Config(msg)) if msg.contains("JSON")));
}

#[test]
fn test_token_is_not_serialized() {
    let path = write_config(r#"{ "token": "secret-token" }"#, "json");
    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(&path).ok();

    let rendered = serde_json::to_string(&result.expect("config")).expect("serialize");
    assert!(!rendered.contains("secret-token"));
}
