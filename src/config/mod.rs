//! # Registry Configuration
//!
//! Settings that shape how the [`crate::DecoderRegistry`] resolves and caches
//! decoders.
//!
//! ## Sources
//!
//! Values are layered, later sources winning:
//!
//! 1. Built-in defaults ([`RegistryConfig::default`])
//! 2. An optional TOML, YAML or JSON file (format picked by extension)
//! 3. `PARCEL_REGISTRY_*` environment variables, e.g.
//!    `PARCEL_REGISTRY_RESOLUTION_MODE=at_least_once`
//!
//! See [`ConfigLoader`] for the entry points.

pub mod error;
pub mod loader;

use crate::constants::defaults::{DECODER_FIELD, MAX_TYPE_NAME_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// How a cache miss is turned into a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// The cache lock is held across the resolver call; each key is resolved
    /// at most once per process.
    #[default]
    ExactlyOnce,
    /// The resolver runs outside the lock. Concurrent misses on one key may
    /// each resolve, but the first stored decoder wins and is returned to
    /// every caller.
    AtLeastOnce,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::ExactlyOnce => write!(f, "exactly_once"),
            ResolutionMode::AtLeastOnce => write!(f, "at_least_once"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub resolution_mode: ResolutionMode,

    /// Static field through which a type exposes its decoder
    pub decoder_field: String,

    /// Named scopes fall back to the default scope on a miss
    pub scope_fallback: bool,

    /// Longest type name accepted from a record or at registration, in bytes
    pub max_type_name_length: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            resolution_mode: ResolutionMode::default(),
            decoder_field: DECODER_FIELD.to_string(),
            scope_fallback: true,
            max_type_name_length: MAX_TYPE_NAME_LENGTH,
        }
    }
}

impl RegistryConfig {
    #[must_use]
    pub fn with_resolution_mode(mut self, mode: ResolutionMode) -> Self {
        self.resolution_mode = mode;
        self
    }

    #[must_use]
    pub fn with_decoder_field(mut self, field: impl Into<String>) -> Self {
        self.decoder_field = field.into();
        self
    }

    #[must_use]
    pub fn with_scope_fallback(mut self, enabled: bool) -> Self {
        self.scope_fallback = enabled;
        self
    }

    #[must_use]
    pub fn with_max_type_name_length(mut self, max: usize) -> Self {
        self.max_type_name_length = max;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.decoder_field.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "decoder_field",
                &self.decoder_field,
                "must name a field",
            ));
        }

        if self.max_type_name_length == 0 {
            return Err(ConfigurationError::invalid_value(
                "max_type_name_length",
                self.max_type_name_length,
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}
