//! Error types for habit-core.

use thiserror::Error;

/// Result type alias using ValidationError.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised when mutation input or stored data fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("habit name must not be empty")]
    EmptyName,

    #[error("daily target must be at least 1, got {value}")]
    TargetBelowOne { value: i64 },

    #[error("commit value must be positive, got {value}")]
    NonPositiveValue { value: i64 },

    #[error("cannot move habit from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("invalid date string: {value}")]
    InvalidDate { value: String },

    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
