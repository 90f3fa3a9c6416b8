//! sitai-core: the excavation point model and the unified error type.
//!
//! This crate is the leaf dependency of the workspace. It owns the record
//! type, its construction-time validation, and the [`Error`] every other
//! crate reports through.

pub mod error;
pub mod ids;
pub mod point;
pub mod timestamp;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result, ValidationError};
pub use ids::PointId;
pub use point::{ExcavationPoint, PointDraft, DEFAULT_SRID};
