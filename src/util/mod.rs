//! Shared utility helpers.

pub mod error;
pub mod vec2;

pub use error::{HdrAlignError, HdrAlignResult};
pub use vec2::Vec2;
