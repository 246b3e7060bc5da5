#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use uapx_config::{ConfigError, load};

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn loads_complete_config() {
    let file = write_config(
        r"
global:
  port: 9200
  timeout: 10
accesspoints:
  - name: lobby
    address: 10.20.0.11
    username: admin
    password: secret
  - name: warehouse
    address: ap-warehouse.lan
    username: admin
    keyfile: /etc/uapx/id_ed25519
",
    );
    let config = load(file.path()).unwrap();

    assert_eq!(config.listen_port, 9200);
    assert_eq!(config.timeout, Duration::from_secs(10));
    let names: Vec<_> = config.devices.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["lobby", "warehouse"]);
}

#[test]
fn missing_file_is_an_error() {
    let err = load(Path::new("/nonexistent/unifi-ap-exporter.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }), "{err:?}");
}

#[test]
fn empty_fleet_is_rejected() {
    let file = write_config("global:\n  port: 9130\naccesspoints: []\n");
    let err = load(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "no access points defined");
}

#[test]
fn missing_name_is_rejected() {
    let file = write_config(
        "accesspoints:\n  - address: 10.0.0.1\n    username: admin\n    password: pw\n",
    );
    let err = load(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "accesspoint #1 is missing `name`");
}

#[test]
fn missing_username_is_rejected() {
    let file = write_config(
        "accesspoints:\n  - name: a\n    address: 10.0.0.1\n    password: pw\n",
    );
    let err = load(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "accesspoint #1 is missing `username`");
}

#[test]
fn credential_is_required() {
    let file = write_config("accesspoints:\n  - name: a\n    address: 10.0.0.1\n    username: admin\n");
    let err = load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::NoCredentials { index: 1 }), "{err:?}");
}

#[test]
fn unknown_keys_are_rejected() {
    let file = write_config(
        "accesspoints:\n  - name: a\n    address: 10.0.0.1\n    username: admin\n    password: pw\n    community: public\n",
    );
    let err = load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Figment(_)), "{err:?}");
}

#[test]
fn malformed_yaml_is_rejected() {
    let file = write_config("accesspoints: [\n");
    assert!(matches!(load(file.path()), Err(ConfigError::Figment(_))));
}
