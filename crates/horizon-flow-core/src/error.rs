//! Error types for Horizon Flow.

use thiserror::Error;

/// The main error type for Horizon Flow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// An argument was outside its accepted range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// Human readable explanation.
        reason: String,
    },

    /// No window has been made active yet.
    #[error("no window is active")]
    NotActive,

    /// The window has been closed and its runtime torn down.
    #[error("the window has been closed")]
    WindowClosed,

    /// `run()` was called while the loop is already running.
    #[error("the window loop is already running")]
    AlreadyRunning,

    /// A view id that does not belong to this window.
    #[error("unknown view: {0}")]
    UnknownView(String),

    /// Failed to create the native window or its surface.
    #[error("failed to create window: {0}")]
    WindowCreation(String),

    /// The rendering or event backend reported a failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// A configuration value could not be loaded or is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Every custom event type identifier has been handed out.
    #[error("custom event types exhausted")]
    EventTypesExhausted,
}

impl FlowError {
    /// Create an invalid argument error.
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` for [`FlowError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// A specialized Result type for Horizon Flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = FlowError::invalid_argument("ms", "must be a positive integer, got 0");
        assert!(err.is_invalid_argument());
        assert_eq!(
            err.to_string(),
            "invalid argument `ms`: must be a positive integer, got 0"
        );
    }

    #[test]
    fn test_not_active_display() {
        assert_eq!(FlowError::NotActive.to_string(), "no window is active");
        assert!(!FlowError::NotActive.is_invalid_argument());
    }
}
