//! Site error types

use atelier_core::CoreError;
use atelier_motion::MotionError;
use thiserror::Error;

use crate::catalog::ItemId;

/// Gallery selection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    /// The id is not in the catalog
    #[error("unknown gallery item {0}")]
    UnknownItem(ItemId),
}

/// Site-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SiteError {
    /// Category name outside `all`, `portrait`, `creative`, `family`
    #[error("unknown category `{0}`")]
    UnknownCategory(String),

    /// Session type outside the offered set
    #[error("unknown session type `{0}`")]
    UnknownSessionType(String),

    /// Path that no page is mounted under
    #[error("unknown route `{0}`")]
    UnknownRoute(String),

    #[error(transparent)]
    Gallery(#[from] GalleryError),

    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for site operations
pub type Result<T> = std::result::Result<T, SiteError>;
