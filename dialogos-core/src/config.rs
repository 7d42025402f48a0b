//! Configuration types for the Dialogos core

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::normalize::DEFAULT_MAX_CHARS;

/// Main configuration for the conversation core
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DialogosConfig {
    /// Completion provider tuning
    pub completion: CompletionConfig,

    /// History window configuration
    pub history: HistoryConfig,

    /// Message normalization configuration
    pub normalizer: NormalizerConfig,

    /// Moderation configuration
    pub moderation: ModerationConfig,

    /// Persona instruction override (defaults to the built-in persona)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
}

/// Completion provider tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Model name sent to the provider
    pub model: String,

    /// Sampling temperature for single-pass completions
    pub temperature: f32,

    /// Maximum output tokens per completion
    pub max_tokens: usize,

    /// Looser temperature for the exploratory draft pass
    pub draft_temperature: f32,

    /// Tighter temperature for the refinement pass
    pub refine_temperature: f32,

    /// Bound on one provider round trip
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Custom API base URL (for compatible endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key (prefer env vars)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.8,
            max_tokens: 500,
            draft_temperature: 0.9,
            refine_temperature: 0.7,
            request_timeout: Duration::from_secs(30),
            base_url: None,
            api_key: None,
        }
    }
}

/// History window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum stored entries per session (even; two per turn)
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 20 }
    }
}

/// Message normalization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Length ceiling in characters
    pub max_chars: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Moderation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModerationConfig {
    /// Terms denied by the whole-word deny-list policy
    #[serde(default)]
    pub deny_patterns: Vec<String>,
}

impl DialogosConfig {
    /// Load configuration from file and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. Configuration file (dialogos.toml or path from DIALOGOS_CONFIG_PATH)
    /// 3. Environment variable overrides (DIALOGOS_ prefix, `__` nesting)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid or validation
    /// fails.
    pub fn load() -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(DialogosConfig::default()))
            .merge(Toml::file("dialogos.toml"));

        if let Ok(path) = std::env::var("DIALOGOS_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("DIALOGOS_").split("__"));

        let config: DialogosConfig = figment.extract().map_err(|e| {
            crate::error::DialogosError::Configuration(format!("failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or validation
    /// fails.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let config: DialogosConfig = Figment::from(Serialized::defaults(DialogosConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                crate::error::DialogosError::Configuration(format!(
                    "failed to load configuration file: {}",
                    e
                ))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::DialogosError;

        if self.history.max_entries == 0 || self.history.max_entries % 2 != 0 {
            return Err(DialogosError::Configuration(format!(
                "history.max_entries must be a positive even number, got {}",
                self.history.max_entries
            )));
        }

        if self.normalizer.max_chars == 0 {
            return Err(DialogosError::Configuration(
                "normalizer.max_chars must be positive".to_string(),
            ));
        }

        for (name, value) in [
            ("temperature", self.completion.temperature),
            ("draft_temperature", self.completion.draft_temperature),
            ("refine_temperature", self.completion.refine_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(DialogosError::Configuration(format!(
                    "completion.{} must be within 0.0-2.0, got {}",
                    name, value
                )));
            }
        }

        if self.completion.request_timeout.is_zero() {
            return Err(DialogosError::Configuration(
                "completion.request_timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
