//! # Precision Model
//!
//! One `Precision` value is derived per call from the spacing and the
//! options, then handed explicitly to every stage.
//!
//! ## Canonical Keys
//!
//! Two points are the same point iff their [`PointKey`]s are equal. A key is
//! the point rounded to the nearest multiple of `quantum`, where
//! `quantum = max(spacing * quantization_ratio, tolerance)`.

use serde::Serialize;

use crate::config::GridOptions;
use crate::core::vec2::Vec2;
use crate::error::{GridError, GridResult};

/// Quantized integer coordinates of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PointKey(pub i64, pub i64);

/// Tolerances for one pipeline invocation.
///
/// # Examples
/// ```
/// use grid_fill::config::GridOptions;
/// use grid_fill::core::{Precision, Vec2};
///
/// let precision = Precision::for_spacing(0.5, &GridOptions::default()).unwrap();
/// assert!(precision.same_point(Vec2::new(1.0, 1.0), Vec2::new(1.0 + 1e-9, 1.0)));
/// assert!(!precision.same_point(Vec2::new(1.0, 1.0), Vec2::new(1.001, 1.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Precision {
    /// Absolute tolerance for degenerate-length checks.
    pub epsilon: f64,
    /// Rounding step of the canonical key.
    pub quantum: f64,
}

impl Precision {
    /// Creates a precision from explicit values.
    pub fn new(epsilon: f64, quantum: f64) -> Self {
        Self { epsilon, quantum }
    }

    /// Derives the precision for a spacing, validating the spacing first.
    ///
    /// Fails with [`GridError::InvalidSpacing`] when the spacing is not
    /// finite or not greater than the tolerance.
    pub fn for_spacing(spacing: f64, options: &GridOptions) -> GridResult<Self> {
        if !spacing.is_finite() || spacing <= options.tolerance {
            return Err(GridError::InvalidSpacing {
                spacing,
                epsilon: options.tolerance,
            });
        }
        let quantum = (spacing * options.quantization_ratio).max(options.tolerance);
        Ok(Self::new(options.tolerance, quantum))
    }

    /// Canonical key of a point.
    #[inline]
    pub fn key(&self, p: Vec2) -> PointKey {
        PointKey(
            (p.x / self.quantum).round() as i64,
            (p.y / self.quantum).round() as i64,
        )
    }

    /// Whether two points share a canonical key.
    #[inline]
    pub fn same_point(&self, a: Vec2, b: Vec2) -> bool {
        self.key(a) == self.key(b)
    }

    /// Whether a scalar is zero under the absolute tolerance.
    #[inline]
    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.epsilon
    }

    /// Index of the lattice line within one quantum of `value`, if any.
    ///
    /// # Examples
    /// ```
    /// use grid_fill::core::Precision;
    ///
    /// let precision = Precision::new(1e-9, 1e-6);
    /// assert_eq!(precision.lattice_line(1.5000000001, 0.5), Some(3));
    /// assert_eq!(precision.lattice_line(1.6, 0.5), None);
    /// ```
    pub fn lattice_line(&self, value: f64, spacing: f64) -> Option<i64> {
        let k = (value / spacing).round();
        if (value - k * spacing).abs() <= self.quantum {
            Some(k as i64)
        } else {
            None
        }
    }

    /// Squared distance measured in whole quanta, used to rank candidates
    /// without float ties.
    #[inline]
    pub fn quantized_distance_sq(&self, a: Vec2, b: Vec2) -> u64 {
        (a.distance_squared(b) / (self.quantum * self.quantum)).round() as u64
    }
}

#[cfg(test)]
mod tests;
