//! API key handling.
//!
//! The key lives in a [`SecretString`]: it is zeroed on drop and never
//! printed by `Debug` or `Display`. Code that needs the raw value calls
//! [`ApiCredential::expose`] at the point of use (the bearer header).

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use std::fmt;

use super::{ProviderError, API_KEY_ENV};

/// Config field holding the key.
const CONFIG_FIELD: &str = "api_key";

/// Where the key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `api_key` in the provider settings
    Config,
    /// The `YEARBOOK_API_KEY` environment variable
    Environment,
    /// Passed in by the caller
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CredentialSource::Config => "config",
            CredentialSource::Environment => "environment",
            CredentialSource::Programmatic => "caller",
        };
        f.write_str(label)
    }
}

pub struct ApiCredential {
    key: SecretString,
    source: CredentialSource,
}

impl ApiCredential {
    pub fn new(key: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            key: SecretString::from(key.into()),
            source,
        }
    }

    /// Key from the provider config, else `YEARBOOK_API_KEY`.
    ///
    /// A blank value counts as missing.
    pub fn resolve(config: &JsonValue) -> Result<Self, ProviderError> {
        Self::resolve_with(config, API_KEY_ENV)
    }

    fn resolve_with(config: &JsonValue, env_var: &str) -> Result<Self, ProviderError> {
        if let Some(key) = non_blank(config[CONFIG_FIELD].as_str()) {
            return Ok(Self::new(key, CredentialSource::Config));
        }
        if let Some(key) = non_blank(std::env::var(env_var).ok().as_deref()) {
            return Ok(Self::new(key, CredentialSource::Environment));
        }
        Err(ProviderError::NotConfigured(format!(
            "API key is missing: set provider.api_key or {}",
            env_var
        )))
    }

    pub fn expose(&self) -> &str {
        self.key.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.key.expose_secret().trim().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("key", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API key ({}) [REDACTED]", self.source)
    }
}
