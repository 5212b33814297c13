//! Animation error types

use thiserror::Error;

/// Animation-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Bezier control point x values outside `[0, 1]`
    #[error("bezier x values must be in [0, 1] range (got x1 = {x1}, x2 = {x2})")]
    InvalidCurveParameters { x1: f64, x2: f64 },

    /// A required timing option was not provided
    #[error("missing animation option: {0}")]
    MissingOption(&'static str),

    /// Easing name or `cubic-bezier(...)` expression could not be parsed
    #[error("invalid easing: {0}")]
    InvalidEasing(String),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
