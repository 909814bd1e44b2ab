//! # Config Crate
//!
//! Centralized configuration constants for the grid fill pipeline.
//! All tolerances, defaults and safety limits are defined here so the
//! geometry stages never carry their own literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_SPACING, EPSILON_TOLERANCE};
//!
//! // Use EPSILON_TOLERANCE for floating-point comparisons
//! let value: f64 = 1e-12;
//! assert!(value.abs() < EPSILON_TOLERANCE);
//!
//! // Default lattice step when the host does not supply one
//! assert!(DEFAULT_SPACING > EPSILON_TOLERANCE);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Explicit**: Stages receive configuration as values, never read globals
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
