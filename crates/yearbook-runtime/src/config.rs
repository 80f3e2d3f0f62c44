//! Runtime configuration.
//!
//! Loaded from YAML. Durations are written the human way (`45s`, `2m`,
//! `1h 30m`). Provider fields missing from the file fall back to
//! environment variables, then to built-in defaults:
//!
//! ```yaml
//! provider:
//!   kind: openai
//!   model: gpt-4o-mini
//! summary:
//!   temperature: 0.8
//!   max_tokens: 2048
//!   timeout: 60s
//! circuit_breaker:
//!   failure_threshold: 3
//!   recovery_timeout: 30s
//! summary_fallback: deterministic
//! duplicate_ids: last_wins
//! ```
//!
//! A missing API key is not an error here; it surfaces on the first
//! remote call.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use yearbook_core::DuplicateIdPolicy;

use crate::cache::CacheConfig;
use crate::providers::CompletionConfig;
use crate::resilience::{CircuitBreakerConfig, SummaryFallback};

/// Environment variable overriding the default endpoint.
pub const BASE_URL_ENV: &str = "YEARBOOK_BASE_URL";

/// Environment variable overriding the default model.
pub const MODEL_ENV: &str = "YEARBOOK_MODEL";

const DEFAULT_KIND: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Serde helpers for durations written as `30s`, `2m`, `1h 5m`.
pub(crate) mod duration_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

fn default_base_url() -> String {
    env_or(BASE_URL_ENV, DEFAULT_BASE_URL)
}

fn default_model() -> String {
    env_or(MODEL_ENV, DEFAULT_MODEL)
}

/// Which backend to call and how to reach it.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Registered provider type
    #[serde(default = "default_kind")]
    pub kind: String,

    /// API key; `YEARBOOK_API_KEY` is read when absent
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
        }
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl ProviderSettings {
    /// JSON handed to the provider factory.
    pub fn factory_config(&self) -> JsonValue {
        let mut config = serde_json::json!({ "base_url": self.base_url });
        if let Some(key) = &self.api_key {
            config["api_key"] = JsonValue::String(key.clone());
        }
        config
    }
}

/// Sampling and timeout settings for one kind of remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSettings {
    pub temperature: f32,

    pub max_tokens: u32,

    #[serde(with = "duration_str")]
    pub timeout: Duration,
}

impl CallSettings {
    pub fn new(temperature: f32, max_tokens: u32, timeout: Duration) -> Self {
        Self {
            temperature,
            max_tokens,
            timeout,
        }
    }

    /// Completion config for `model`.
    pub fn completion(&self, model: &str) -> CompletionConfig {
        CompletionConfig {
            model: model.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
            response_schema: None,
        }
    }
}

fn default_summary_call() -> CallSettings {
    CallSettings::new(0.8, 2048, Duration::from_secs(60))
}

fn default_extraction_call() -> CallSettings {
    CallSettings::new(0.1, 4096, Duration::from_secs(90))
}

fn default_inspiration_call() -> CallSettings {
    CallSettings::new(0.9, 120, Duration::from_secs(10))
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default = "default_summary_call")]
    pub summary: CallSettings,

    #[serde(default = "default_extraction_call")]
    pub extraction: CallSettings,

    #[serde(default = "default_inspiration_call")]
    pub inspiration: CallSettings,

    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub summary_fallback: SummaryFallback,

    #[serde(default)]
    pub duplicate_ids: DuplicateIdPolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            provider: ProviderSettings::default(),
            summary: default_summary_call(),
            extraction: default_extraction_call(),
            inspiration: default_inspiration_call(),
            circuit_breaker: CircuitBreakerConfig::default(),
            cache: CacheConfig::default(),
            summary_fallback: SummaryFallback::default(),
            duplicate_ids: DuplicateIdPolicy::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.provider.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "provider.base_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.model must not be empty".into()));
        }
        for (name, call) in [
            ("summary", &self.summary),
            ("extraction", &self.extraction),
            ("inspiration", &self.inspiration),
        ] {
            if !(0.0..=2.0).contains(&call.temperature) {
                return Err(ConfigError::Invalid(format!(
                    "{}.temperature must be within 0.0..=2.0",
                    name
                )));
            }
            if call.max_tokens == 0 || call.timeout.is_zero() {
                return Err(ConfigError::Invalid(format!(
                    "{}.max_tokens and {}.timeout must be positive",
                    name, name
                )));
            }
        }
        if self.circuit_breaker.failure_threshold == 0 {
            return Err(ConfigError::Invalid(
                "circuit_breaker.failure_threshold must be positive".into(),
            ));
        }
        Ok(())
    }
}
