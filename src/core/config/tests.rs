use super::data::Config;
use super::io::ConfigError;
use crate::gateway::gemini::{DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_SUMMARY_MODEL};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set_value("image-model", "custom-image-model").unwrap();
    config.set_value("export-dir", "/tmp/designs").unwrap();
    config.set_value("request-timeout-secs", "45").unwrap();
    config.save_to_path(&config_path).expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.image_model(), "custom-image-model");
    assert_eq!(loaded.export_dir(), PathBuf::from("/tmp/designs"));
    assert_eq!(loaded.request_timeout(), Duration::from_secs(45));

    let mut loaded = loaded;
    loaded.unset_value("image-model").unwrap();
    loaded.save_to_path(&config_path).expect("Failed to save config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.image_model(), DEFAULT_IMAGE_MODEL);
    assert_eq!(reloaded.export_dir, Some(PathBuf::from("/tmp/designs")));
}

#[test]
fn defaults_point_at_public_gemini_endpoint() {
    let config = Config::default();
    let settings = config.gemini_settings("key".into(), None);
    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.image_model, DEFAULT_IMAGE_MODEL);
    assert_eq!(settings.summary_model, DEFAULT_SUMMARY_MODEL);
}

#[test]
fn model_override_wins_over_config() {
    let config = Config {
        image_model: Some("configured".into()),
        ..Default::default()
    };
    assert_eq!(
        config.gemini_settings("key".into(), Some("flag")).image_model,
        "flag"
    );
    assert_eq!(
        config.gemini_settings("key".into(), None).image_model,
        "configured"
    );
}

#[test]
fn rejects_unknown_keys_and_bad_values() {
    let mut config = Config::default();
    let err = config.set_value("theme", "dark").unwrap_err();
    assert!(err.contains("Unknown config key: theme"));
    assert!(config.set_value("request-timeout-secs", "0").is_err());
    assert!(config.set_value("request-timeout-secs", "soon").is_err());
    assert!(config.set_value("base-url", "   ").is_err());
    assert!(config.unset_value("theme").is_err());
    assert_eq!(config, Config::default());
}

#[test]
fn invalid_toml_reports_parse_error_with_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "image_model = [unterminated").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn config_file_uses_snake_case_fields() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "base_url = \"https://proxy.test/v1beta\"\nsummary_model = \"summary\"\n",
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.base_url(), "https://proxy.test/v1beta");
    assert_eq!(config.summary_model(), "summary");
}
