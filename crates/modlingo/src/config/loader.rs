use std::path::{Path, PathBuf};

use crate::config::schema::OrchestratorConfig;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/orchestrator-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OrchestratorConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<OrchestratorConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: OrchestratorConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads the config at `path`, or returns defaults when the file does not exist.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<OrchestratorConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("No config at {:?}, using defaults", path);
        return Ok(OrchestratorConfig::default());
    }
    load_config(path)
}

/// Returns the default config file path for the current platform.
/// - macOS: ~/Library/Application Support/modlingo/orchestrator.json
/// - Linux: ~/.config/modlingo/orchestrator.json
/// - Windows: %APPDATA%/modlingo/orchestrator.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("modlingo").join("orchestrator.json"))
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &OrchestratorConfig) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.default_target_language.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "defaultTargetLanguage must not be blank".to_string(),
        });
    }

    if config.fallback_source_language.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "fallbackSourceLanguage must not be blank".to_string(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for lang in &config.language_priority {
        if lang.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "languagePriority entries must not be blank".to_string(),
            });
        }
        if !seen.insert(lang.to_ascii_lowercase()) {
            return Err(ConfigError::Validation {
                message: format!("Duplicate language in languagePriority: {}", lang),
            });
        }
    }

    if config.progress_channel_capacity == 0 {
        return Err(ConfigError::Validation {
            message: "progressChannelCapacity must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config, OrchestratorConfig::default());
        assert_eq!(config.default_target_language, "zh-CN");
        assert_eq!(config.language_priority[0], "en");
    }

    #[test]
    fn test_full_config() {
        let config = load_config_from_str(
            r#"{
                "version": "1.0",
                "defaultTargetLanguage": "ko",
                "fallbackSourceLanguage": "ja",
                "languagePriority": ["ja", "en"],
                "progressChannelCapacity": 16
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_target_language, "ko");
        assert_eq!(config.fallback_source_language, "ja");
        assert_eq!(config.language_priority, vec!["ja", "en"]);
        assert_eq!(config.progress_channel_capacity, 16);
    }

    #[test]
    fn test_schema_rejects_unknown_keys_and_bad_types() {
        let err = load_config_from_str(r#"{"workerCount": 2}"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));

        let err = load_config_from_str(r#"{"progressChannelCapacity": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));

        let err = load_config_from_str(r#"{"version": "2.0"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::SchemaValidation { .. }));
    }

    #[test]
    fn test_semantic_validation() {
        let err = load_config_from_str(r#"{"defaultTargetLanguage": "   "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));

        let err = load_config_from_str(r#"{"languagePriority": ["en", "EN"]}"#).unwrap_err();
        assert!(err.to_string().contains("Duplicate language"));
    }

    #[test]
    fn test_invalid_json() {
        let err = load_config_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"defaultTargetLanguage": "ru"}}"#).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.default_target_language, "ru");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));

        let config = load_or_default(&path).unwrap();
        assert_eq!(config, OrchestratorConfig::default());
    }
}
