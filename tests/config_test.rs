//! Integration tests for Settings layered loading.
//!
//! Layers: defaults → global file → explicit file. These tests pass the
//! global path explicitly (temp directories only), so a real user config
//! never leaks in. Env var overrides live in `config_env_test.rs`, which runs
//! as its own binary so the variables cannot race with these tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use cursortree::application::ApplicationError;
use cursortree::config::Settings;
use cursortree::RenderStyle;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_no_config_files_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();
    let missing_global = dir.path().join("cursortree.toml");

    let settings = Settings::load_with_global(Some(&missing_global), None).expect("load settings");

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.indent, "\t");
    assert_eq!(settings.null_marker, "NULL");
}

#[test]
fn given_global_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let global = write(
        dir.path(),
        "cursortree.toml",
        r#"
indent = "    "
style = "outline"
max_nodes = 100
"#,
    );

    let settings = Settings::load_with_global(Some(&global), None).expect("load settings");

    assert_eq!(settings.indent, "    ");
    assert_eq!(settings.style, RenderStyle::Outline);
    assert_eq!(settings.max_nodes, Some(100));
    assert_eq!(settings.header, "Tree", "unspecified fields keep defaults");
}

#[test]
fn given_explicit_config_when_load_then_wins_over_global() {
    let dir = TempDir::new().unwrap();
    let global = write(
        dir.path(),
        "cursortree.toml",
        r#"
header = "Global"
strict = true
"#,
    );
    let explicit = write(
        dir.path(),
        "local.toml",
        r#"
header = "Local"
"#,
    );

    let settings =
        Settings::load_with_global(Some(&global), Some(&explicit)).expect("load settings");

    assert_eq!(settings.header, "Local");
    assert!(settings.strict, "global value survives where explicit is silent");
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let err = Settings::load_with_global(None, Some(&missing)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn given_malformed_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let bad = write(dir.path(), "bad.toml", "style = \"sparkly\"\n");

    let err = Settings::load_with_global(None, Some(&bad)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("parse"));
}

#[test]
fn given_settings_when_serialized_then_toml_has_render_fields() {
    let settings = Settings {
        max_nodes: Some(8),
        ..Settings::default()
    };

    let text = settings.to_toml().unwrap();

    assert!(text.contains("null_marker = \"NULL\""));
    assert!(text.contains("style = \"plain\""));
    assert!(text.contains("max_nodes = 8"));
}
