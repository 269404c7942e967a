//! Engine configuration
//!
//! Loaded from TOML or YAML by file extension. Every field has a default, so a
//! config file only names what it overrides.

use crate::error::ConfigError;
use mxt_model::TERMINAL_ORDER_NUMBER;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

/// Mutation engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    /// Order number reserved for terminal iteration-review nodes
    pub terminal_order: u32,
    /// Accepted length range of a free-text entry
    pub char_limit: CharLimit,
    /// Label in the title suffix, as in " (Generated 2024-01-31)"
    pub suffix_label: String,
    /// Marker in the product code suffix, as in "-GEN-2024-01-31"
    pub product_marker: String,
    /// Run the structural gate on every output
    pub validate_output: bool,
    /// Reject baselines that already contain duplicate numeric ids
    pub require_unique_ids: bool,
}

/// Character-limit trigger bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharLimit {
    pub min: u32,
    pub max: u32,
}

impl CharLimit {
    /// Bounds as an inclusive range
    #[inline]
    #[must_use]
    pub fn range(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }
}

impl Default for CharLimit {
    fn default() -> Self {
        Self { min: 1, max: 120 }
    }
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With character limit range
    #[inline]
    #[must_use]
    pub fn with_char_limit(mut self, range: RangeInclusive<u32>) -> Self {
        self.char_limit = CharLimit {
            min: *range.start(),
            max: *range.end(),
        };
        self
    }

    /// With title suffix label
    #[inline]
    #[must_use]
    pub fn with_suffix_label(mut self, label: impl Into<String>) -> Self {
        self.suffix_label = label.into();
        self
    }

    /// With product code marker
    #[inline]
    #[must_use]
    pub fn with_product_marker(mut self, marker: impl Into<String>) -> Self {
        self.product_marker = marker.into();
        self
    }

    /// With output validation gate on or off
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_output = enabled;
        self
    }

    /// With duplicate-id precondition on or off
    #[inline]
    #[must_use]
    pub fn with_unique_ids_required(mut self, required: bool) -> Self {
        self.require_unique_ids = required;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns error on malformed TOML or inconsistent values
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.checked()
    }

    /// Parse YAML text
    ///
    /// # Errors
    /// Returns error on malformed YAML or inconsistent values
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.checked()
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, has another extension, or
    /// does not parse
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&text),
            Some("yaml" | "yml") => Self::from_yaml(&text),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    fn checked(self) -> Result<Self, ConfigError> {
        if self.char_limit.min > self.char_limit.max {
            return Err(ConfigError::Invalid(format!(
                "char_limit.min ({}) exceeds char_limit.max ({})",
                self.char_limit.min, self.char_limit.max
            )));
        }
        if self.terminal_order < 2 {
            return Err(ConfigError::Invalid(format!(
                "terminal_order must leave room for ordinary phases, got {}",
                self.terminal_order
            )));
        }
        Ok(self)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            terminal_order: TERMINAL_ORDER_NUMBER,
            char_limit: CharLimit::default(),
            suffix_label: "Generated".to_string(),
            product_marker: "GEN".to_string(),
            validate_output: true,
            require_unique_ids: true,
        }
    }
}
