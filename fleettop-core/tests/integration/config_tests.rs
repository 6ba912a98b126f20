//! End-to-end configuration pipeline tests: file on disk through the
//! resolver to connection specs

use std::fs;

use fleettop_core::config::{ConfigResolver, FleetConfig};
use fleettop_core::error::ConfigError;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("fleet.json");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn test_flat_file_to_connection_specs() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"[
            {"name": "web-1", "remote": "10.0.0.1", "username": "root", "password": "pw1"},
            {"name": "db-1", "remote": "10.0.0.2", "username": "admin", "password": "pw2", "port": "2222"}
        ]"#,
    );

    let config = FleetConfig::load(&path).expect("load");
    let resolver = ConfigResolver::new(config.directory().expect("directory"));
    let specs: Vec<_> = config
        .hosts
        .iter()
        .map(|h| resolver.resolve_descriptor(h))
        .collect();

    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0].name, "web-1");
    assert_eq!(specs[0].host, "10.0.0.1");
    assert_eq!(specs[0].port, 0);
    assert_eq!(specs[0].password.as_deref(), Some("pw1"));
    assert_eq!(specs[1].name, "db-1");
    assert_eq!(specs[1].port, 2222);
    assert_eq!(specs[1].user, "admin");
}

#[test]
fn test_overrides_apply_through_the_pipeline() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"{
            "hosts": [
                {"name": "web-1", "remote": "10.0.0.1", "username": "root", "password": "pw"},
                {"name": "db-1", "remote": "10.0.0.2", "username": "root", "password": "pw"}
            ],
            "overrides": [
                {"host": "web-*", "user": "deploy", "identity_file": "/keys/web"},
                {"host": "*", "port": 2200}
            ]
        }"#,
    );

    let config = FleetConfig::load(&path).expect("load");
    let resolver = ConfigResolver::new(config.directory().expect("directory"));
    let specs: Vec<_> = config
        .hosts
        .iter()
        .map(|h| resolver.resolve_descriptor(h))
        .collect();

    // web-1: pattern override supplies user and key, default supplies port
    assert_eq!(specs[0].user, "deploy");
    assert_eq!(specs[0].identity_file.as_deref(), Some("/keys/web"));
    assert_eq!(specs[0].port, 2200);
    assert_eq!(specs[0].host, "10.0.0.1");

    // db-1: only the default applies
    assert_eq!(specs[1].user, "root");
    assert_eq!(specs[1].identity_file, None);
    assert_eq!(specs[1].port, 2200);
}

#[test]
fn test_host_order_is_file_order() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"[
            {"name": "c", "remote": "10.0.0.3", "username": "u", "password": "p"},
            {"name": "a", "remote": "10.0.0.1", "username": "u", "password": "p"},
            {"name": "b", "remote": "10.0.0.2", "username": "u", "password": "p"}
        ]"#,
    );
    let config = FleetConfig::load(&path).expect("load");
    let names: Vec<_> = config.hosts.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn test_invalid_override_pattern_fails_at_load() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        &dir,
        r#"{
            "hosts": [{"name": "a", "remote": "h", "username": "u", "password": "p"}],
            "overrides": [{"host": "db-[0-9", "user": "dba"}]
        }"#,
    );
    let config = FleetConfig::load(&path).expect("load");
    let err = config.directory().expect_err("pattern must be rejected");
    assert!(matches!(err, ConfigError::InvalidPattern { .. }));
}

#[test]
fn test_empty_host_list_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(&dir, r#"{"hosts": [], "overrides": []}"#);
    let err = FleetConfig::load(&path).expect_err("empty hosts");
    assert!(matches!(err, ConfigError::NoHosts));
}
