use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_target_language")]
    pub default_target_language: String,
    #[serde(default = "default_source_language")]
    pub fallback_source_language: String,
    /// Languages tried in order when guessing a job's source language.
    #[serde(default = "default_language_priority")]
    pub language_priority: Vec<String>,
    #[serde(default = "default_channel_capacity")]
    pub progress_channel_capacity: usize,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_target_language() -> String {
    "zh-CN".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_language_priority() -> Vec<String> {
    ["en", "zh-CN", "zh-TW", "ja", "ko", "ru", "de", "fr", "es", "pt-BR"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_target_language: default_target_language(),
            fallback_source_language: default_source_language(),
            language_priority: default_language_priority(),
            progress_channel_capacity: default_channel_capacity(),
        }
    }
}
