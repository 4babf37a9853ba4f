//! Shared settings for the CLI and GUI.
//! Persisted in the platform-specific config directory via `directories::ProjectDirs`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::capture::DEFAULT_CAPTURE_DELAY_MS;
use crate::config::DEFAULT_SOLUTION_LANGUAGE;
use crate::model::{
    ModelConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MODEL_NAME,
    DEFAULT_RETRY_DELAY_SECS,
};

/// Application settings that can be saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Model API base URL
    pub base_url: String,
    /// Model API key
    pub api_key: String,
    /// Model name
    pub model_name: String,
    /// Maximum tokens in the answer
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Image detail hint ("low", "high" or "auto")
    pub image_detail: String,
    /// Maximum retries for model requests
    pub max_retries: u32,
    /// Retry delay in seconds
    pub retry_delay: u64,
    /// Delay before the screen is grabbed, in milliseconds
    pub capture_delay_ms: u64,
    /// Screenshots wider than this are scaled down (0 disables)
    pub max_image_width: u32,
    /// Programming language the solution should be written in
    pub solution_language: String,
    /// UI language code ("en" or "cn")
    pub lang: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            max_tokens: 4096,
            temperature: 0.2,
            image_detail: "auto".to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY_SECS,
            capture_delay_ms: DEFAULT_CAPTURE_DELAY_MS,
            max_image_width: 2048,
            solution_language: DEFAULT_SOLUTION_LANGUAGE.to_string(),
            lang: "en".to_string(),
        }
    }
}

impl AppSettings {
    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "moderras", "coding-helper")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path.
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings from the config file.
    pub fn load() -> Self {
        Self::settings_path()
            .and_then(|path| fs::read_to_string(&path).ok())
            .map(|content| Self::from_json(&content))
            .unwrap_or_default()
    }

    /// Load saved settings and overlay the process environment (including `.env`).
    pub fn load_with_env() -> Self {
        let mut settings = Self::load();
        settings.apply_env_overrides(|key| env::var(key).ok());
        settings
    }

    /// Parse settings JSON, falling back to defaults for anything missing or blank.
    pub fn from_json(content: &str) -> Self {
        let defaults = Self::default();

        let mut loaded: Self = match serde_json::from_str(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings file: {}", e);
                return defaults;
            }
        };

        // Backfill fields left blank by older config files
        if loaded.base_url.trim().is_empty() {
            loaded.base_url = defaults.base_url;
        }
        if loaded.model_name.trim().is_empty() {
            loaded.model_name = defaults.model_name;
        }
        if loaded.solution_language.trim().is_empty() {
            loaded.solution_language = defaults.solution_language;
        }
        if loaded.max_tokens == 0 {
            loaded.max_tokens = defaults.max_tokens;
        }

        loaded
    }

    /// Overlay values from environment variables.
    ///
    /// `lookup` returns the value of a variable, if set. Empty values and
    /// values that do not parse are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            self.api_key = key;
        }
        if let Some(url) = get("OPENAI_BASE_URL").or_else(|| get("MODEL_BASE_URL")) {
            self.base_url = url;
        }
        if let Some(name) = get("MODEL_NAME") {
            self.model_name = name;
        }
        if let Some(retries) = get("MODEL_MAX_RETRIES").and_then(|s| s.parse().ok()) {
            self.max_retries = retries;
        }
        if let Some(delay) = get("MODEL_RETRY_DELAY").and_then(|s| s.parse().ok()) {
            self.retry_delay = delay;
        }
        if let Some(delay) = get("CAPTURE_DELAY_MS").and_then(|s| s.parse().ok()) {
            self.capture_delay_ms = delay;
        }
        if let Some(language) = get("SOLUTION_LANGUAGE") {
            self.solution_language = language;
        }
        if let Some(lang) = get("HELPER_LANG") {
            self.lang = lang;
        }
    }

    /// Whether an API key is available.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Build the model configuration for these settings.
    pub fn to_model_config(&self) -> ModelConfig {
        ModelConfig::default()
            .with_base_url(&self.base_url)
            .with_api_key(self.api_key.trim())
            .with_model_name(&self.model_name)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_image_detail(&self.image_detail)
            .with_max_retries(self.max_retries)
            .with_retry_delay(self.retry_delay)
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::config_dir().ok_or("Cannot determine config directory")?;

        // Create config directory if it doesn't exist
        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        let path = dir.join("settings.json");
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(&path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        tracing::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Get logs directory path.
    pub fn logs_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "moderras", "coding-helper")
            .map(|dirs| dirs.data_dir().join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.base_url, "https://api.openai.com/v1");
        assert_eq!(settings.model_name, "gpt-4o-mini");
        assert_eq!(settings.capture_delay_ms, 500);
        assert_eq!(settings.solution_language, "Python");
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = AppSettings::default();
        settings.apply_env_overrides(lookup_from(&[
            ("OPENAI_API_KEY", " sk-test "),
            ("MODEL_BASE_URL", "http://localhost:8000/v1"),
            ("MODEL_NAME", "qwen2-vl"),
            ("MODEL_MAX_RETRIES", "5"),
            ("CAPTURE_DELAY_MS", "not-a-number"),
            ("SOLUTION_LANGUAGE", ""),
        ]));

        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.base_url, "http://localhost:8000/v1");
        assert_eq!(settings.model_name, "qwen2-vl");
        assert_eq!(settings.max_retries, 5);
        assert_eq!(settings.capture_delay_ms, 500);
        assert_eq!(settings.solution_language, "Python");
        assert!(settings.has_api_key());
    }

    #[test]
    fn test_openai_base_url_wins_over_alias() {
        let mut settings = AppSettings::default();
        settings.apply_env_overrides(lookup_from(&[
            ("OPENAI_BASE_URL", "https://proxy.example.com/v1"),
            ("MODEL_BASE_URL", "http://localhost:8000/v1"),
        ]));
        assert_eq!(settings.base_url, "https://proxy.example.com/v1");
    }

    #[test]
    fn test_empty_env_key_keeps_saved_key() {
        let mut settings = AppSettings {
            api_key: "sk-saved".to_string(),
            ..AppSettings::default()
        };
        settings.apply_env_overrides(lookup_from(&[("OPENAI_API_KEY", "")]));
        assert_eq!(settings.api_key, "sk-saved");
    }

    #[test]
    fn test_from_json_backfills_missing_fields() {
        let settings = AppSettings::from_json(r#"{"api_key": "sk-x", "model_name": ""}"#);
        assert_eq!(settings.api_key, "sk-x");
        assert_eq!(settings.model_name, "gpt-4o-mini");
        assert_eq!(settings.max_retries, 3);

        assert_eq!(AppSettings::from_json("{not json"), AppSettings::default());
    }

    #[test]
    fn test_settings_json_roundtrip() {
        let settings = AppSettings {
            solution_language: "Go".to_string(),
            max_image_width: 0,
            ..AppSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(AppSettings::from_json(&json), settings);
    }

    #[test]
    fn test_to_model_config() {
        let settings = AppSettings {
            api_key: "  sk-abc\n".to_string(),
            retry_delay: 7,
            image_detail: "high".to_string(),
            ..AppSettings::default()
        };
        let config = settings.to_model_config();
        assert_eq!(config.api_key, "sk-abc");
        assert_eq!(config.retry_delay_secs, 7);
        assert_eq!(config.image_detail, "high");
        assert_eq!(config.model_name, settings.model_name);
    }
}
