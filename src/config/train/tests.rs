//! Tests for YAML loading

use super::*;
use crate::error::Error;
use tempfile::TempDir;

#[test]
fn test_load_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gan.yaml");
    std::fs::write(&path, "data:\n  dir: ./images\ntraining:\n  epochs: 2\n").unwrap();
    let spec = load_config(&path).unwrap();
    assert_eq!(spec.training.epochs, 2);
    assert_eq!(spec.data.image_size, 64);
}

#[test]
fn test_load_config_missing_file() {
    let err = load_config("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, Error::ConfigError(_)));
}

#[test]
fn test_parse_config_rejects_bad_yaml() {
    assert!(matches!(parse_config("data: [unclosed"), Err(Error::ConfigError(_))));
}

#[test]
fn test_parse_config_runs_validation() {
    let err = parse_config("data: { dir: x, batch_size: 0 }\n").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_train_from_yaml_missing_dataset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gan.yaml");
    let yaml = format!("data:\n  dir: {}\n", dir.path().join("missing").display());
    std::fs::write(&path, yaml).unwrap();
    assert!(matches!(train_from_yaml(&path), Err(Error::DatasetNotFound(_))));
}
