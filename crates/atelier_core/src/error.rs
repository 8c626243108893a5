//! Core error types

use thiserror::Error;

/// Core runtime errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Timers need a positive period
    #[error("timer period must be positive, got {0}ms")]
    InvalidPeriod(u32),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
