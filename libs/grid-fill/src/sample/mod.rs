//! # Interior Sampling
//!
//! Classifies the lattice points of the outline's bounding box against the
//! original loop.
//!
//! ## Containment Rule
//!
//! - A point within one quantum of any edge is `OnBoundary` (inclusive)
//! - Otherwise a horizontal ray to `+∞` is cast; an edge counts iff
//!   `p.y ∈ [min(y0, y1), max(y0, y1))` and the crossing lies strictly right
//!   of `p`; an odd count means `Inside`
//!
//! ## Strategies
//!
//! | Strategy | Cost | Notes |
//! |----------|------|-------|
//! | `PerPoint` | O(points × edges) | Reference implementation |
//! | `Scanline` | O(rows × edges log edges + points) | Sorted crossings per row |
//!
//! Both strategies evaluate the same float expressions and agree exactly.
//! Rows are independent and are classified on the rayon pool when enabled.

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use config::constants::SCANLINE_WORK_THRESHOLD;

use crate::boundary::BoundaryLoop;
use crate::config::{GridOptions, SamplingStrategy};
use crate::core::segment::{crossing_x, distance_to_segment};
use crate::core::vec2::lattice_point;
use crate::core::{Precision, Vec2};
use crate::error::{GridError, GridResult};

// =============================================================================
// TYPES
// =============================================================================

/// Result of a point-in-polygon test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Containment {
    /// Strictly inside, farther than one quantum from every edge.
    Inside,
    /// Within one quantum of an edge.
    OnBoundary,
    /// Strictly outside.
    Outside,
}

/// Integer lattice range covering a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatticeBounds {
    /// Lowest column index
    pub i_min: i64,
    /// Highest column index
    pub i_max: i64,
    /// Lowest row index
    pub j_min: i64,
    /// Highest row index
    pub j_max: i64,
}

impl LatticeBounds {
    /// Number of columns, zero when the range is empty.
    pub fn columns(&self) -> usize {
        span(self.i_min, self.i_max)
    }

    /// Number of rows, zero when the range is empty.
    pub fn rows(&self) -> usize {
        span(self.j_min, self.j_max)
    }

    /// Number of lattice points, saturating on overflow.
    pub fn point_count(&self) -> usize {
        self.columns().saturating_mul(self.rows())
    }
}

fn span(lo: i64, hi: i64) -> usize {
    if hi < lo {
        0
    } else {
        usize::try_from(hi.saturating_sub(lo)).map_or(usize::MAX, |n| n.saturating_add(1))
    }
}

/// A lattice point that is inside or on the outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatticePoint {
    /// Column index
    pub i: i64,
    /// Row index
    pub j: i64,
    /// `(i * spacing, j * spacing)`
    pub position: Vec2,
    /// `Inside` or `OnBoundary`
    pub containment: Containment,
}

// =============================================================================
// BOUNDS
// =============================================================================

/// Lattice index range inside the box `[min, max]` grown by one quantum.
///
/// # Examples
/// ```
/// use grid_fill::core::{Precision, Vec2};
/// use grid_fill::sample::lattice_bounds;
///
/// let bounds = lattice_bounds(Vec2::new(0.2, -0.1), Vec2::new(2.0, 0.9), 0.5, &Precision::new(1e-9, 5e-7));
/// assert_eq!((bounds.i_min, bounds.i_max), (1, 4));
/// assert_eq!((bounds.j_min, bounds.j_max), (0, 1));
/// ```
pub fn lattice_bounds(min: Vec2, max: Vec2, spacing: f64, precision: &Precision) -> LatticeBounds {
    let q = precision.quantum;
    LatticeBounds {
        i_min: ((min.x - q) / spacing).ceil() as i64,
        i_max: ((max.x + q) / spacing).floor() as i64,
        j_min: ((min.y - q) / spacing).ceil() as i64,
        j_max: ((max.y + q) / spacing).floor() as i64,
    }
}

/// Fails with [`GridError::LatticeTooDense`] above the configured limit.
pub fn check_lattice_size(bounds: &LatticeBounds, limit: usize) -> GridResult<()> {
    let points = bounds.point_count();
    if points > limit {
        return Err(GridError::LatticeTooDense { points, limit });
    }
    Ok(())
}

// =============================================================================
// POINT CLASSIFICATION
// =============================================================================

/// Classifies one point against the loop.
///
/// # Examples
/// ```
/// use grid_fill::boundary::BoundaryLoop;
/// use grid_fill::core::{Precision, Vec2};
/// use grid_fill::sample::{classify_point, Containment};
///
/// let precision = Precision::new(1e-9, 1e-6);
/// let tri = vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0)];
/// let boundary = BoundaryLoop::new(tri, &precision).unwrap();
///
/// assert_eq!(classify_point(Vec2::new(0.5, 0.5), &boundary, &precision), Containment::Inside);
/// assert_eq!(classify_point(Vec2::new(1.0, 1.0), &boundary, &precision), Containment::OnBoundary);
/// assert_eq!(classify_point(Vec2::new(2.0, 2.0), &boundary, &precision), Containment::Outside);
/// ```
pub fn classify_point(p: Vec2, boundary: &BoundaryLoop, precision: &Precision) -> Containment {
    let mut inside = false;
    for (a, b) in boundary.edges() {
        if distance_to_segment(p, a, b) <= precision.quantum {
            return Containment::OnBoundary;
        }
        if (a.y <= p.y) != (b.y <= p.y) && crossing_x(a, b, p.y) > p.x {
            inside = !inside;
        }
    }
    if inside {
        Containment::Inside
    } else {
        Containment::Outside
    }
}

/// Inclusive point-in-polygon test.
pub fn point_in_polygon(p: Vec2, boundary: &BoundaryLoop, precision: &Precision) -> bool {
    classify_point(p, boundary, precision) != Containment::Outside
}

// =============================================================================
// LATTICE SAMPLING
// =============================================================================

/// Every lattice point of `bounds` that is inside or on the loop, ordered by
/// row then column.
pub fn sample_interior(
    boundary: &BoundaryLoop,
    bounds: &LatticeBounds,
    spacing: f64,
    precision: &Precision,
    options: &GridOptions,
) -> Vec<LatticePoint> {
    let strategy = resolve_strategy(options.sampling, bounds, boundary.len());
    let rows: Vec<i64> = (bounds.j_min..=bounds.j_max).collect();

    let classify_row = |&j: &i64| -> Vec<LatticePoint> {
        match strategy {
            SamplingStrategy::Scanline => scan_row(j, boundary, bounds, spacing, precision),
            _ => probe_row(j, boundary, bounds, spacing, precision),
        }
    };

    let per_row: Vec<Vec<LatticePoint>> = if options.parallel {
        rows.par_iter().map(classify_row).collect()
    } else {
        rows.iter().map(classify_row).collect()
    };
    let points: Vec<LatticePoint> = per_row.into_iter().flatten().collect();

    debug!(
        ?strategy,
        rows = rows.len(),
        columns = bounds.columns(),
        kept = points.len(),
        "Sampled lattice"
    );
    points
}

fn resolve_strategy(
    requested: SamplingStrategy,
    bounds: &LatticeBounds,
    edges: usize,
) -> SamplingStrategy {
    match requested {
        SamplingStrategy::Auto => {
            if bounds.point_count().saturating_mul(edges) > SCANLINE_WORK_THRESHOLD {
                SamplingStrategy::Scanline
            } else {
                SamplingStrategy::PerPoint
            }
        }
        other => other,
    }
}

fn probe_row(
    j: i64,
    boundary: &BoundaryLoop,
    bounds: &LatticeBounds,
    spacing: f64,
    precision: &Precision,
) -> Vec<LatticePoint> {
    (bounds.i_min..=bounds.i_max)
        .filter_map(|i| {
            let position = lattice_point(i, j, spacing);
            match classify_point(position, boundary, precision) {
                Containment::Outside => None,
                containment => Some(LatticePoint {
                    i,
                    j,
                    position,
                    containment,
                }),
            }
        })
        .collect()
}

fn scan_row(
    j: i64,
    boundary: &BoundaryLoop,
    bounds: &LatticeBounds,
    spacing: f64,
    precision: &Precision,
) -> Vec<LatticePoint> {
    let y = lattice_point(0, j, spacing).y;
    let q = precision.quantum;
    let columns = bounds.columns();
    let mut near_edge = vec![false; columns];
    let mut crossings: Vec<f64> = Vec::new();

    for (a, b) in boundary.edges() {
        if (a.y <= y) != (b.y <= y) {
            crossings.push(crossing_x(a, b, y));
        }

        // Columns that may lie within one quantum of this edge
        if a.y.min(b.y) > y + q || a.y.max(b.y) < y - q {
            continue;
        }
        let (lo, hi) = band_extent(a, b, y, q);
        let pad = 2.0 * q;
        let first = (((lo - pad) / spacing).ceil() as i64).max(bounds.i_min);
        let last = (((hi + pad) / spacing).floor() as i64).min(bounds.i_max);
        for i in first..=last {
            let slot = (i - bounds.i_min) as usize;
            if !near_edge[slot]
                && distance_to_segment(lattice_point(i, j, spacing), a, b) <= q
            {
                near_edge[slot] = true;
            }
        }
    }
    crossings.sort_by(f64::total_cmp);

    (bounds.i_min..=bounds.i_max)
        .filter_map(|i| {
            let position = lattice_point(i, j, spacing);
            let containment = if near_edge[(i - bounds.i_min) as usize] {
                Containment::OnBoundary
            } else {
                let right = crossings.len() - crossings.partition_point(|&x| x <= position.x);
                if right % 2 == 1 {
                    Containment::Inside
                } else {
                    return None;
                }
            };
            Some(LatticePoint {
                i,
                j,
                position,
                containment,
            })
        })
        .collect()
}

/// X extent of the part of segment `a-b` inside the band `|y' - y| <= q`.
fn band_extent(a: Vec2, b: Vec2, y: f64, q: f64) -> (f64, f64) {
    let dy = b.y - a.y;
    if dy == 0.0 {
        return (a.x.min(b.x), a.x.max(b.x));
    }
    let t0 = ((y - q - a.y) / dy).clamp(0.0, 1.0);
    let t1 = ((y + q - a.y) / dy).clamp(0.0, 1.0);
    let x0 = a.x + t0 * (b.x - a.x);
    let x1 = a.x + t1 * (b.x - a.x);
    (x0.min(x1), x0.max(x1))
}
