//! # Grid Line Intersection
//!
//! Splits every boundary edge at the vertical lines `x = k * spacing` and
//! horizontal lines `y = k * spacing` it crosses.
//!
//! ## Algorithm
//!
//! For each loop edge `(p0, p1)`:
//!
//! 1. Emit `p0`, tagged by whether it lies on a lattice line
//! 2. Collect the parametric crossings `0 < t < 1` with every spanned line
//! 3. Snap the free coordinate of a crossing onto a lattice line when it is
//!    within one quantum, so lattice corners come out exact and the vertical
//!    and horizontal crossing collapse into one key
//! 4. Insert crossings in increasing `t`, skipping keys already emitted

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::boundary::BoundaryLoop;
use crate::core::{PointKey, Precision, Vec2};
use crate::error::GridResult;

/// Where a boundary vertex of the snapped outline comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BoundaryOrigin {
    /// Original outline vertex off every lattice line.
    Corner,
    /// Original outline vertex lying on a lattice line.
    CornerOnLattice,
    /// Intersection of an outline edge with a lattice line.
    LatticeCrossing,
}

/// One vertex of the snapped outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnappedVertex {
    /// Position on the original outline
    pub position: Vec2,
    /// Corner or crossing
    pub origin: BoundaryOrigin,
    /// Index of the loop edge the vertex lies on
    pub source_edge: usize,
    /// Parameter along the source edge, `0.0` for corners
    pub t: f64,
}

/// The outline after splitting at lattice lines, in loop order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnappedBoundary {
    /// Vertices in counter-clockwise order
    pub vertices: Vec<SnappedVertex>,
}

impl SnappedBoundary {
    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether no vertex survived.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex positions in loop order.
    pub fn positions(&self) -> Vec<Vec2> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Number of vertices with the given origin.
    pub fn count(&self, origin: BoundaryOrigin) -> usize {
        self.vertices.iter().filter(|v| v.origin == origin).count()
    }

    /// Validates the snapped outline as a loop of its own.
    pub fn to_loop(&self, precision: &Precision) -> GridResult<BoundaryLoop> {
        BoundaryLoop::new(self.positions(), precision)
    }
}

/// Splits `boundary` at every lattice line it crosses.
///
/// Loop edges always have distinct endpoints under the canonical key, so
/// every edge contributes its start point and nothing here is recoverable.
/// With `preserve_corners` off, corners off every lattice line are dropped
/// unless fewer than three vertices would remain.
///
/// # Examples
/// ```
/// use grid_fill::boundary::extract_boundary_from_polygon;
/// use grid_fill::core::{Precision, Vec2};
/// use grid_fill::intersect::{snap_to_lattice, BoundaryOrigin};
///
/// let precision = Precision::new(1e-9, 5e-7);
/// let square = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
/// let (boundary, _) = extract_boundary_from_polygon(&square, &precision).unwrap();
///
/// let snapped = snap_to_lattice(&boundary, 0.5, &precision, true);
/// assert_eq!(snapped.len(), 8);
/// assert_eq!(snapped.count(BoundaryOrigin::LatticeCrossing), 4);
/// ```
pub fn snap_to_lattice(
    boundary: &BoundaryLoop,
    spacing: f64,
    precision: &Precision,
    preserve_corners: bool,
) -> SnappedBoundary {
    let mut emitted: HashSet<PointKey> = HashSet::new();
    let mut vertices: Vec<SnappedVertex> = Vec::new();

    for (edge, (p0, p1)) in boundary.edges().enumerate() {
        let (k0, k1) = (precision.key(p0), precision.key(p1));
        let on_lattice = precision.lattice_line(p0.x, spacing).is_some()
            || precision.lattice_line(p0.y, spacing).is_some();
        let origin = if on_lattice {
            BoundaryOrigin::CornerOnLattice
        } else {
            BoundaryOrigin::Corner
        };
        if emitted.insert(k0) {
            vertices.push(SnappedVertex {
                position: p0,
                origin,
                source_edge: edge,
                t: 0.0,
            });
        }

        for (t, position) in edge_crossings(p0, p1, spacing, precision) {
            let key = precision.key(position);
            if key == k0 || key == k1 || !emitted.insert(key) {
                continue;
            }
            vertices.push(SnappedVertex {
                position,
                origin: BoundaryOrigin::LatticeCrossing,
                source_edge: edge,
                t,
            });
        }
    }

    if !preserve_corners {
        let kept: Vec<SnappedVertex> = vertices
            .iter()
            .filter(|v| v.origin != BoundaryOrigin::Corner)
            .copied()
            .collect();
        if kept.len() >= 3 {
            vertices = kept;
        } else {
            warn!(
                remaining = kept.len(),
                "Too few lattice vertices to drop outline corners, keeping them"
            );
        }
    }

    let snapped = SnappedBoundary { vertices };
    debug!(
        vertices = snapped.len(),
        crossings = snapped.count(BoundaryOrigin::LatticeCrossing),
        "Snapped boundary to lattice"
    );
    snapped
}

/// Crossings of segment `p0-p1` with lattice lines, sorted by `t`.
fn edge_crossings(p0: Vec2, p1: Vec2, spacing: f64, precision: &Precision) -> Vec<(f64, Vec2)> {
    let d = p1 - p0;
    let mut crossings = Vec::new();

    if !precision.is_zero(d.x) {
        for ix in line_range(p0.x, p1.x, spacing) {
            let x = ix as f64 * spacing;
            let t = (x - p0.x) / d.x;
            if t <= 0.0 || t >= 1.0 {
                continue;
            }
            let y = snap_coordinate(p0.y + t * d.y, spacing, precision);
            crossings.push((t, Vec2::new(x, y)));
        }
    }

    if !precision.is_zero(d.y) {
        for iy in line_range(p0.y, p1.y, spacing) {
            let y = iy as f64 * spacing;
            let t = (y - p0.y) / d.y;
            if t <= 0.0 || t >= 1.0 {
                continue;
            }
            let x = snap_coordinate(p0.x + t * d.x, spacing, precision);
            crossings.push((t, Vec2::new(x, y)));
        }
    }

    crossings.sort_by(|a, b| a.0.total_cmp(&b.0));
    crossings
}

/// Indices of the lattice lines inside `[min(a, b), max(a, b)]`.
fn line_range(a: f64, b: f64, spacing: f64) -> std::ops::RangeInclusive<i64> {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    ((lo / spacing).ceil() as i64)..=((hi / spacing).floor() as i64)
}

fn snap_coordinate(value: f64, spacing: f64, precision: &Precision) -> f64 {
    match precision.lattice_line(value, spacing) {
        Some(k) => k as f64 * spacing,
        None => value,
    }
}
