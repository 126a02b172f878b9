//! Runtime configuration (rivet.toml)
//!
//! ```toml
//! numeric_widening = true
//! overloads = "reject-ambiguous"
//! catch_panics = true
//! max_json_depth = 32
//! ```
//!
//! Every key is optional. `RIVET_*` environment variables override the file
//! through `RuntimeConfig::apply_env`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `numeric_widening`
pub const ENV_NUMERIC_WIDENING: &str = "RIVET_NUMERIC_WIDENING";
/// Environment variable overriding `overloads`
pub const ENV_OVERLOADS: &str = "RIVET_OVERLOADS";
/// Environment variable overriding `catch_panics`
pub const ENV_CATCH_PANICS: &str = "RIVET_CATCH_PANICS";
/// Environment variable overriding `max_json_depth`
pub const ENV_MAX_JSON_DEPTH: &str = "RIVET_MAX_JSON_DEPTH";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),

    /// Environment override could not be parsed
    #[error("Invalid value '{value}' for {var}")]
    EnvError {
        /// Variable name
        var: String,
        /// Offending value
        value: String,
    },
}

/// How to choose between equally good overloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverloadPolicy {
    /// Take the first candidate in search order
    #[default]
    FirstMatch,
    /// Fail with `AmbiguousMethod`
    RejectAmbiguous,
}

impl OverloadPolicy {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "first-match" => Some(OverloadPolicy::FirstMatch),
            "reject-ambiguous" => Some(OverloadPolicy::RejectAmbiguous),
            _ => None,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Allow primitive widening (Integer argument for a Long parameter, ...)
    pub numeric_widening: bool,

    /// Tie-breaking between overloads
    pub overloads: OverloadPolicy,

    /// Turn panics in method bodies into thrown errors
    pub catch_panics: bool,

    /// Maximum nesting of JSON argument descriptors
    pub max_json_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            numeric_widening: true,
            overloads: OverloadPolicy::FirstMatch,
            catch_panics: true,
            max_json_depth: 64,
        }
    }
}

impl RuntimeConfig {
    /// Load a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a config from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_json_depth == 0 {
            return Err(ConfigError::ValidationError(
                "max_json_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply `RIVET_*` overrides from the process environment
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_NUMERIC_WIDENING) {
            self.numeric_widening = parse_bool(ENV_NUMERIC_WIDENING, &value)?;
        }
        if let Some(value) = lookup(ENV_OVERLOADS) {
            self.overloads = OverloadPolicy::parse(value.trim()).ok_or_else(|| env_error(ENV_OVERLOADS, &value))?;
        }
        if let Some(value) = lookup(ENV_CATCH_PANICS) {
            self.catch_panics = parse_bool(ENV_CATCH_PANICS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_JSON_DEPTH) {
            self.max_json_depth = value
                .trim()
                .parse()
                .map_err(|_| env_error(ENV_MAX_JSON_DEPTH, &value))?;
        }
        self.validate()?;
        Ok(self)
    }
}

fn env_error(var: &str, value: &str) -> ConfigError {
    ConfigError::EnvError {
        var: var.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(env_error(var, value)),
    }
}
