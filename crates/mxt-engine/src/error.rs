//! Error types for the mutation engine
//!
//! Recognition misses are not errors: the engine reports them as an
//! unapplied outcome. Everything here aborts the edit before a document is
//! returned.

use std::path::PathBuf;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// The requested OPERATION does not exist
    #[error("target not found: {0}")]
    TargetNotFound(String),

    /// A structural precondition of the baseline does not hold
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The request matched a phase-creation pattern but is unusable
    #[error("malformed instruction: {0}")]
    MalformedInstruction(#[from] InterpretError),

    /// The finished document failed the structural gate
    #[error("validation failed with {} error(s): {}", errors.len(), errors.join("; "))]
    ValidationFailed { errors: Vec<String> },
}

impl MutationError {
    /// Create an invariant violation
    #[inline]
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::InvariantViolation(reason.into())
    }

    /// Check if the error was caused by the caller's request rather than the
    /// baseline or the engine
    #[inline]
    #[must_use]
    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::TargetNotFound(_) | Self::MalformedInstruction(_))
    }
}

/// Request interpretation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpretError {
    /// A phase-creation phrase matched without a usable title
    #[error("no phase title found in {request:?}")]
    MissingTitle { request: String },
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failed_lists_every_error() {
        let err = MutationError::ValidationFailed {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("2 error(s)"));
        assert!(text.contains("a; b"));
    }

    #[test]
    fn request_errors_are_classified() {
        assert!(MutationError::TargetNotFound("Mixing".into()).is_request_error());
        assert!(MutationError::from(InterpretError::MissingTitle {
            request: "add phase".into()
        })
        .is_request_error());
        assert!(!MutationError::invariant("no terminal phase").is_request_error());
    }
}
