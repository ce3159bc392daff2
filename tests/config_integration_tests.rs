//! Integration tests for ConfigManager and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Default configuration generation
//! - Partial files fall back to defaults field by field
//! - Integration with EditorSession

use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;
use typesforge::models::CATEGORY_PRESETS;
use typesforge::{ConfigManager, EditorConfig, EditorSession, TypeRecord};

fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

#[test]
fn test_create_config_manager() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert_eq!(manager.config_dir(), config_path.as_path());
    assert_eq!(
        manager.config_path(),
        config_path.join("typesforge.yaml").as_path()
    );
}

#[test]
fn test_new_creates_missing_directory() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let nested = config_path.join("a").join("b");

    ConfigManager::new(&nested).unwrap();

    assert!(nested.exists());
}

#[test]
fn test_default_config_written_and_reloaded() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();

    assert!(manager.ensure_default_config().unwrap());
    let contents = fs::read_to_string(manager.config_path()).unwrap();
    assert!(contents.contains("Vocabulary:"));
    assert!(contents.contains("Indent: 4"));

    let config = manager.load_config().unwrap();
    assert_eq!(config, EditorConfig::default());
    assert_eq!(config.vocabulary.categories.len(), CATEGORY_PRESETS.len());
}

#[test]
fn test_partial_config_uses_defaults() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    fs::write(
        manager.config_path(),
        "Export:\n  Indent: 2\nLogging:\n  Debug Mode: true\n",
    )
    .unwrap();

    let config = manager.load_config().unwrap();

    assert_eq!(config.export.indent, 2);
    assert!(config.export.xml_declaration);
    assert!(config.logging.debug_mode);
    assert_eq!(config.logging.log_dir, "logs");
    assert_eq!(config.vocabulary, EditorConfig::default().vocabulary);
}

#[test]
fn test_config_drives_session_export() {
    let (_temp_dir, config_path) = create_test_config_dir();
    let manager = ConfigManager::new(&config_path).unwrap();
    fs::write(
        manager.config_path(),
        "Vocabulary:\n  Categories: [food, tools]\nExport:\n  Indent: 2\n  XML Declaration: false\n",
    )
    .unwrap();
    let config = manager.load_config().unwrap();

    let session = EditorSession::new(&config);
    assert_eq!(session.category_pool(), vec!["food", "tools"]);

    session.save_edit(None, TypeRecord::new("Apple")).unwrap();
    let output = config_path.join("types.xml");
    session.export(&output).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("<types>"));
    assert!(written.contains("\n  <type name=\"Apple\">"));
}
