mod env_manager;

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};
use crate::types::DEFAULT_MODEL;

pub use env_manager::{first_env_value, get_env_value, API_KEY_VARS, ENDPOINT_VAR, MODEL_VARS};

/// Default chat-completion endpoint
pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Main configuration struct for the application
///
/// Values are layered: built-in defaults, then the optional config file,
/// then environment variables, then explicit command-line flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote model settings
    #[serde(default)]
    pub llm: LlmSettings,
}

/// Settings for the remote completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenRouter API key
    pub api_key: Option<String>,
    /// Model identifier, e.g. `openai/gpt-4o-mini`
    pub model: String,
    /// Chat-completion URL
    pub endpoint: String,
    /// Per-request timeout applied by the HTTP client
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: OPENROUTER_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl Config {
    /// Path of the optional user config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hayagriva-llm").join("config.toml"))
    }

    /// Loads defaults, the user config file if present, then the environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Parses a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading config {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| GeneratorError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| GeneratorError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Overrides settings from environment variables; empty values are ignored
    pub fn apply_env(&mut self) {
        if let Some(key) = first_env_value(API_KEY_VARS) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = first_env_value(MODEL_VARS) {
            self.llm.model = model;
        }
        if let Some(endpoint) = get_env_value(ENDPOINT_VAR) {
            self.llm.endpoint = endpoint;
        }
    }

    /// Applies explicit command-line values, which win over everything else
    pub fn apply_overrides(&mut self, api_key: Option<String>, model: Option<String>, endpoint: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.llm.model = model;
        }
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.llm.endpoint = endpoint;
        }
    }

    /// Checks the endpoint URL and timeout
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.llm.endpoint)
            .map_err(|e| GeneratorError::Config(format!("Invalid endpoint {}: {}", self.llm.endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GeneratorError::Config(format!(
                "Endpoint must use http or https: {}",
                self.llm.endpoint
            )));
        }
        if self.llm.timeout_secs == 0 {
            return Err(GeneratorError::Config("timeout_secs must be greater than zero".into()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(GeneratorError::Config("model must not be empty".into()));
        }
        Ok(())
    }

    /// Trimmed API key, if one is configured
    pub fn api_key(&self) -> Option<&str> {
        self.llm.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.endpoint, OPENROUTER_URL);
        assert!(config.validate().is_ok());
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_from_file_partial() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "[llm]\nmodel = \"anthropic/claude-3-haiku\"\ntimeout_secs = 30\n")?;

        let config = Config::from_file(&path)?;
        assert_eq!(config.llm.model, "anthropic/claude-3-haiku");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.llm.endpoint, OPENROUTER_URL);
        Ok(())
    }

    #[test]
    fn test_from_file_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[llm\nmodel = ").unwrap();
        assert!(matches!(Config::from_file(&path), Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_overrides_win_and_blank_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(Some("  ".into()), Some("meta/llama".into()), None);
        assert!(config.api_key().is_none());
        assert_eq!(config.llm.model, "meta/llama");

        config.apply_overrides(Some(" sk-or-123 ".into()), None, None);
        assert_eq!(config.api_key(), Some("sk-or-123"));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.llm.endpoint = "ftp://example.com".into();
        assert!(config.validate().is_err());
        config.llm.endpoint = "not a url".into();
        assert!(config.validate().is_err());
    }
}
