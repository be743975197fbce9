//! Animation error types

use thiserror::Error;

/// Errors raised while building animation descriptors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Easing name not recognized
    #[error("unknown easing: {0}")]
    UnknownEasing(String),

    /// Scroll trigger position could not be parsed
    #[error("invalid trigger position '{input}': {reason}")]
    InvalidTriggerPosition { input: String, reason: &'static str },

    /// Toggle action list could not be parsed
    #[error("invalid toggle actions '{0}': expected four of play|pause|resume|reverse|restart|reset|complete|none")]
    InvalidToggleActions(String),

    /// Visibility amount outside 0.0 - 1.0
    #[error("visibility amount {0} must be between 0 and 1")]
    InvalidAmount(f32),
}

/// Result type for animation descriptor construction
pub type Result<T> = std::result::Result<T, AnimationError>;
