//! Animation error types

use thiserror::Error;

/// Errors raised while building animations from textual definitions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A border-radius value that is not `<number>px` or `<number>%`
    #[error("invalid border-radius component `{0}`")]
    InvalidLength(String),

    /// Wrong number of values on one side of the `/`
    #[error("border-radius expects 1 to 4 values per axis, got {0}")]
    ValueCount(usize),

    /// A morph needs at least two keyframes to move between
    #[error("morph `{0}` needs at least two keyframes")]
    TooFewKeyframes(&'static str),
}

/// Result type for animation construction
pub type Result<T> = std::result::Result<T, AnimationError>;
