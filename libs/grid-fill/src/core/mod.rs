//! Core data structures and predicates shared by every pipeline stage.
//!
//! Includes the 2D vector alias (`Vec2`), the per-call precision model,
//! exact segment predicates and the uniform bucket grid used for spatial
//! queries.

pub mod precision;
pub mod segment;
pub mod spatial;
pub mod vec2;

pub use precision::{PointKey, Precision};
pub use spatial::SpatialGrid;
pub use vec2::Vec2;
