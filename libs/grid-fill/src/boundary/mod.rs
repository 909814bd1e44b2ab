//! # Boundary Extraction
//!
//! Turns an unordered set of boundary edges into one ordered, closed,
//! counter-clockwise loop.
//!
//! ## Algorithm
//!
//! 1. Intern every endpoint into an arena keyed by its canonical
//!    [`PointKey`](crate::core::PointKey)
//! 2. Skip zero-length edges (recoverable) and collapse repeated edges
//! 3. Require every vertex to have exactly two neighbors
//! 4. Walk the neighbor lists once from the first surviving edge
//! 5. Reject walks that close before visiting every vertex
//! 6. Reject loops whose edges cross, overlap, or touch a non-incident vertex
//!
//! ## Example
//!
//! ```rust
//! use grid_fill::boundary::{extract_boundary_loop, BoundaryEdge};
//! use grid_fill::core::Precision;
//!
//! let edges: Vec<BoundaryEdge> = vec![
//!     [[0.0, 0.0], [1.0, 0.0]].into(),
//!     [[0.0, 1.0], [0.0, 0.0]].into(),
//!     [[1.0, 0.0], [1.0, 1.0]].into(),
//!     [[1.0, 1.0], [0.0, 1.0]].into(),
//! ];
//! let (boundary, diagnostics) = extract_boundary_loop(&edges, &Precision::new(1e-9, 1e-7)).unwrap();
//! assert_eq!(boundary.len(), 4);
//! assert!(diagnostics.is_empty());
//! assert_eq!(boundary.area(), 1.0);
//! ```

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::segment::{distance_to_segment, segments_cross_properly};
use crate::core::vec2::{bounds, signed_area};
use crate::core::{PointKey, Precision, SpatialGrid, Vec2};
use crate::error::{Diagnostic, GridError, GridResult, Stage};

// =============================================================================
// INPUT EDGES
// =============================================================================

/// One raw boundary edge as supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundaryEdge {
    /// First endpoint
    pub start: Vec2,
    /// Second endpoint
    pub end: Vec2,
}

impl BoundaryEdge {
    /// Creates an edge.
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

impl From<(Vec2, Vec2)> for BoundaryEdge {
    fn from((start, end): (Vec2, Vec2)) -> Self {
        Self::new(start, end)
    }
}

impl From<[[f64; 2]; 2]> for BoundaryEdge {
    fn from([start, end]: [[f64; 2]; 2]) -> Self {
        Self::new(Vec2::from_array(start), Vec2::from_array(end))
    }
}

// =============================================================================
// BOUNDARY LOOP
// =============================================================================

/// Orientation of the loop as it was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Winding {
    /// Positive signed area
    CounterClockwise,
    /// Negative signed area
    Clockwise,
}

/// Ordered simple closed polygon, normalized to counter-clockwise.
///
/// Invariants: at least 3 points, consecutive points distinct under the
/// canonical key (last to first included), non-zero area, and no edge
/// meeting another anywhere but a shared endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryLoop {
    points: Vec<Vec2>,
    source_winding: Winding,
}

impl BoundaryLoop {
    /// Validates and normalizes an ordered point cycle.
    ///
    /// # Examples
    /// ```
    /// use grid_fill::boundary::{BoundaryLoop, Winding};
    /// use grid_fill::core::{Precision, Vec2};
    ///
    /// let cw = vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)];
    /// let boundary = BoundaryLoop::new(cw, &Precision::new(1e-9, 1e-7)).unwrap();
    /// assert_eq!(boundary.source_winding(), Winding::Clockwise);
    /// assert!(boundary.signed_area() > 0.0);
    /// ```
    pub fn new(mut points: Vec<Vec2>, precision: &Precision) -> GridResult<Self> {
        if points.len() < 3 {
            return Err(GridError::MalformedBoundary(format!(
                "loop needs at least 3 distinct points, got {}",
                points.len()
            )));
        }
        for (idx, &p) in points.iter().enumerate() {
            let next = points[(idx + 1) % points.len()];
            if precision.same_point(p, next) {
                return Err(GridError::MalformedBoundary(format!(
                    "consecutive points coincide at ({}, {})",
                    p.x, p.y
                )));
            }
        }

        let area = signed_area(&points);
        if precision.is_zero(area) {
            return Err(GridError::MalformedBoundary(
                "loop encloses zero area".to_string(),
            ));
        }
        if let Some(p) = self_contact(&points, precision) {
            return Err(GridError::MalformedBoundary(format!(
                "loop intersects itself at ({}, {})",
                p.x, p.y
            )));
        }

        let source_winding = if area > 0.0 {
            Winding::CounterClockwise
        } else {
            points.reverse();
            Winding::Clockwise
        };

        Ok(Self {
            points,
            source_winding,
        })
    }

    /// Points in counter-clockwise order.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Number of points (equal to the number of edges).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed loop.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Orientation the points had before normalization.
    pub fn source_winding(&self) -> Winding {
        self.source_winding
    }

    /// Signed area, positive after normalization.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    /// Enclosed area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Total edge length.
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        bounds(&self.points).unwrap_or((Vec2::ZERO, Vec2::ZERO))
    }

    /// Edges `(p[k], p[k + 1])` including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |k| (self.points[k], self.points[(k + 1) % n]))
    }
}

/// First place where the closed polyline `points` meets itself.
///
/// Edges are binned in a [`SpatialGrid`] sized to the mean edge length, so
/// each edge is only tested against its neighbors in space. Two edges meet
/// when they cross properly or when an endpoint of one, other than a shared
/// one, lies within a quantum of the other. The second test also catches
/// collinear overlap and spikes that fold back onto the previous edge.
fn self_contact(points: &[Vec2], precision: &Precision) -> Option<Vec2> {
    let n = points.len();
    let ends = |k: usize| [k, (k + 1) % n];
    let segment = |k: usize| (points[k], points[(k + 1) % n]);

    let perimeter: f64 = (0..n).map(|k| points[k].distance(points[(k + 1) % n])).sum();
    let mut grid = SpatialGrid::new(perimeter / n as f64);
    for k in 0..n {
        let (a, b) = segment(k);
        grid.insert_edge(k, a, b);
    }

    let pad = precision.quantum;
    for k in 0..n {
        let (a, b) = segment(k);
        for m in grid.edges_near(a, b, pad) {
            if m <= k {
                continue;
            }
            let (c, d) = segment(m);
            if segments_cross_properly(a, b, c, d) {
                let t = (c - a).perp_dot(d - c) / (b - a).perp_dot(d - c);
                return Some(a + (b - a) * t);
            }

            let (own, other) = (ends(k), ends(m));
            let loose = |i: &usize| !(own.contains(i) && other.contains(i));
            let touching = own
                .iter()
                .filter(|&i| loose(i))
                .map(|&i| (i, c, d))
                .chain(other.iter().filter(|&i| loose(i)).map(|&i| (i, a, b)))
                .find(|&(i, s, t)| distance_to_segment(points[i], s, t) <= pad);
            if let Some((i, _, _)) = touching {
                return Some(points[i]);
            }
        }
    }
    None
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Endpoint arena: canonical keys to dense ids plus neighbor lists.
#[derive(Default)]
struct Arena {
    ids: HashMap<PointKey, usize>,
    positions: Vec<Vec2>,
    neighbors: Vec<Vec<usize>>,
}

impl Arena {
    fn intern(&mut self, key: PointKey, p: Vec2) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.positions.len();
        self.ids.insert(key, id);
        self.positions.push(p);
        self.neighbors.push(Vec::new());
        id
    }
}

/// Orders raw boundary edges into a single closed loop.
///
/// Zero-length edges are skipped and reported as
/// [`GridError::DegenerateEdge`] diagnostics; every other defect is fatal
/// [`GridError::MalformedBoundary`].
pub fn extract_boundary_loop(
    edges: &[BoundaryEdge],
    precision: &Precision,
) -> GridResult<(BoundaryLoop, Vec<Diagnostic>)> {
    let mut arena = Arena::default();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut first: Option<(usize, usize)> = None;
    let mut diagnostics = Vec::new();

    for (idx, edge) in edges.iter().enumerate() {
        if !edge.start.is_finite() || !edge.end.is_finite() {
            return Err(GridError::MalformedBoundary(format!(
                "edge {} has a non-finite coordinate",
                idx
            )));
        }
        let (ka, kb) = (precision.key(edge.start), precision.key(edge.end));
        if ka == kb {
            warn!(edge = idx, x = edge.start.x, y = edge.start.y, "Skipping zero-length boundary edge");
            diagnostics.push(Diagnostic::new(
                Stage::Extract,
                GridError::DegenerateEdge {
                    edge: idx,
                    x: edge.start.x,
                    y: edge.start.y,
                },
            ));
            continue;
        }

        let a = arena.intern(ka, edge.start);
        let b = arena.intern(kb, edge.end);
        if !seen.insert((a.min(b), a.max(b))) {
            debug!(edge = idx, "Collapsing repeated boundary edge");
            continue;
        }
        arena.neighbors[a].push(b);
        arena.neighbors[b].push(a);
        first.get_or_insert((a, b));
    }

    let (start, second) = first.ok_or_else(|| {
        GridError::MalformedBoundary("no non-degenerate boundary edges".to_string())
    })?;

    for (id, neighbors) in arena.neighbors.iter().enumerate() {
        if neighbors.len() != 2 {
            let p = arena.positions[id];
            let shape = if neighbors.len() < 2 {
                "open chain"
            } else {
                "branching vertex"
            };
            return Err(GridError::MalformedBoundary(format!(
                "{} at ({}, {}) with {} incident edges",
                shape,
                p.x,
                p.y,
                neighbors.len()
            )));
        }
    }

    let mut order = vec![start];
    let (mut prev, mut current) = (start, second);
    while current != start {
        order.push(current);
        let neighbors = &arena.neighbors[current];
        let next = if neighbors[0] == prev {
            neighbors[1]
        } else {
            neighbors[0]
        };
        prev = current;
        current = next;
    }

    if order.len() != arena.positions.len() {
        return Err(GridError::MalformedBoundary(format!(
            "edges form more than one loop ({} of {} vertices reached)",
            order.len(),
            arena.positions.len()
        )));
    }

    let points = order.into_iter().map(|id| arena.positions[id]).collect();
    let boundary = BoundaryLoop::new(points, precision)?;
    debug!(
        vertices = boundary.len(),
        area = boundary.area(),
        skipped = diagnostics.len(),
        "Extracted boundary loop"
    );
    Ok((boundary, diagnostics))
}

/// Extracts a loop from an ordered point list, closing it implicitly.
///
/// A trailing point equal to the first one is treated as an explicit close
/// and dropped.
///
/// # Examples
/// ```
/// use grid_fill::boundary::extract_boundary_from_polygon;
/// use grid_fill::core::{Precision, Vec2};
///
/// let points = [Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0), Vec2::new(0.0, 0.0)];
/// let (boundary, diagnostics) = extract_boundary_from_polygon(&points, &Precision::new(1e-9, 1e-7)).unwrap();
/// assert_eq!(boundary.len(), 3);
/// assert!(diagnostics.is_empty());
/// ```
pub fn extract_boundary_from_polygon(
    points: &[Vec2],
    precision: &Precision,
) -> GridResult<(BoundaryLoop, Vec<Diagnostic>)> {
    let mut points = points;
    if let (Some(&first), Some((&last, rest))) = (points.first(), points.split_last()) {
        if points.len() > 1 && precision.same_point(first, last) {
            debug!("Dropping explicit closing point");
            points = rest;
        }
    }

    let edges: Vec<BoundaryEdge> = (0..points.len())
        .map(|k| BoundaryEdge::new(points[k], points[(k + 1) % points.len()]))
        .collect();
    extract_boundary_loop(&edges, precision)
}

#[cfg(test)]
mod tests;
