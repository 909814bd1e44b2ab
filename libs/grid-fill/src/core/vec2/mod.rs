//! 2D vector definitions for the grid fill pipeline.
//!
//! Provides the type alias for `glam::DVec2` and polygon helpers over point
//! slices.

pub use glam::DVec2 as Vec2;

/// Position of lattice point `(i, j)` for the given spacing.
///
/// Lattice coordinates are always produced by this multiplication so the
/// same lattice line yields bit-identical values everywhere.
///
/// # Examples
/// ```
/// use grid_fill::core::vec2::{lattice_point, Vec2};
///
/// assert_eq!(lattice_point(3, -2, 0.5), Vec2::new(1.5, -1.0));
/// ```
#[inline]
pub fn lattice_point(i: i64, j: i64, spacing: f64) -> Vec2 {
    Vec2::new(i as f64 * spacing, j as f64 * spacing)
}

/// Signed area of a closed polygon (positive when counter-clockwise).
///
/// # Examples
/// ```
/// use grid_fill::core::vec2::{signed_area, Vec2};
///
/// let ccw = [Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0)];
/// assert_eq!(signed_area(&ccw), 2.0);
/// ```
pub fn signed_area(points: &[Vec2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (idx, a) in points.iter().enumerate() {
        let b = points[(idx + 1) % points.len()];
        twice += a.perp_dot(b);
    }
    twice * 0.5
}

/// Axis-aligned bounding box of a point set, `None` when empty.
pub fn bounds(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
    )
}

/// Angle of `to - from` in `(-π, π]`.
#[inline]
pub fn direction_angle(from: Vec2, to: Vec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}
