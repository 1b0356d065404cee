//! Tests for config error context preservation
//!
//! Verifies that configuration loading errors keep the original
//! std::io::Error and toml::de::Error as their source.

use fizzbuzz_stats::config::Config;
use fizzbuzz_stats::error::AppError;
use std::error::Error;
use std::fs;
use std::str::FromStr;
use tempfile::TempDir;

#[test]
fn test_config_file_read_error_preserves_io_error() {
    let result = Config::from_file("/nonexistent/path/to/config.toml");

    let err = result.expect_err("Reading nonexistent file should fail");
    assert!(
        err.to_string().contains("/nonexistent/path/to/config.toml"),
        "Error should include the file path, got: {}",
        err
    );

    let source = err.source().expect("Should have source error");
    assert!(
        source.is::<std::io::Error>(),
        "Source error should be io::Error, got: {:?}",
        source
    );
}

#[test]
fn test_config_parse_error_preserves_toml_error() {
    let invalid_toml = r#"
this is [[[[ not valid toml
it has {{{{ broken syntax
"#;

    let err = Config::from_str(invalid_toml).expect_err("Parsing invalid TOML should fail");

    let source = err.source().expect("Should have source error");
    assert!(
        source.is::<toml::de::Error>(),
        "Source error should be toml::de::Error, got: {:?}",
        source
    );
    assert!(err.to_string().contains("TOML"), "got: {}", err);
}

#[test]
fn test_config_validation_failure_names_file_and_reason() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[prometheus]\ntimeout_seconds = 0\n").unwrap();

    let err = Config::from_file(&path).expect_err("zero timeout should fail validation");

    match &err {
        AppError::ConfigValidationFailed { path: p, reason } => {
            assert!(p.ends_with("config.toml"), "path: {}", p);
            assert!(reason.contains("timeout_seconds"), "reason: {}", reason);
        }
        other => panic!("expected ConfigValidationFailed, got {:?}", other),
    }
}

#[test]
fn test_config_file_loads_valid_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        "[server]\nport = 9000\n\n[prometheus]\nurl = \"http://localhost:9090\"\n",
    )
    .unwrap();

    let config = Config::from_file(&path).expect("valid file should load");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.prometheus.url, "http://localhost:9090");
}
