//! Atelier Motion Engine
//!
//! Pointer-driven motion for the portfolio pages.
//!
//! # Features
//!
//! - **Pointer Tracking**: coalesced, container-normalized samples read once per frame
//! - **Motion Fields**: depth-layered parallax and rotation from a single pair of springs
//! - **Active Cycling**: timer-driven highlight with eased scale and opacity
//! - **Rigs**: hero, custom cursor, and scroll-keyed parallax
//!
//! Narrow viewports switch pointer motion off and every dependent transform
//! collapses to identity.

pub mod cursor;
pub mod error;
pub mod field;
pub mod hero;
pub mod pointer;
pub mod scroll;
pub mod transform;

pub use cursor::{CursorFrame, CustomCursor};
pub use error::{MotionError, Result};
pub use field::{
    ActiveCycle, BackdropParallax, DepthLayer, Emphasis, FieldFrame, LayerTransform, MotionField, SpringOutputs,
    ViewportParallax,
};
pub use hero::{HeroConfig, HeroFrame, HeroLayerFrame, HeroMotion, Placement};
pub use pointer::{ContainerRect, MotionProfile, Origin, PointerSample, PointerTracker, MOBILE_BREAKPOINT_PX};
pub use scroll::{ScrollFrame, ScrollParallax};
pub use transform::{map_range, RangeMap};
