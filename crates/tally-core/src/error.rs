//! Error types for tally-core.

use thiserror::Error;

/// Why raw text from the numeric field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Text is not a number at all.
    #[error("not a number: {0:?}")]
    NotANumber(String),

    /// Text is a number, but not a whole one.
    #[error("not a whole number: {0:?}")]
    Fractional(String),

    /// Text is a whole number outside the representable range.
    #[error("number out of range: {0:?}")]
    OutOfRange(String),
}

/// Errors raised while loading a [`WidgetConfig`](crate::WidgetConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON could not be parsed into a config.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the widget cannot run with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
