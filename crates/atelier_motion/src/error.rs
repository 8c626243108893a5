//! Motion error types

use atelier_core::CoreError;
use thiserror::Error;

/// Motion engine errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// The reference container has not been laid out yet
    #[error("reference container geometry unavailable")]
    GeometryUnavailable,

    /// A rig needs at least one depth layer
    #[error("motion field needs at least one layer")]
    NoLayers,

    /// Timer setup failed
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
