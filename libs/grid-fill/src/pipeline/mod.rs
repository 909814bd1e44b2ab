//! # Grid Fill Pipeline
//!
//! Runs the five stages in order and collects their diagnostics.
//!
//! ```text
//! boundary edges + spacing
//!       ↓ extract_boundary_loop
//! BoundaryLoop
//!       ↓ snap_to_lattice        ↓ sample_interior
//! SnappedBoundary            Vec<LatticePoint>
//!       ↓ build_edge_network
//! EdgeNetwork
//!       ↓ fill_faces, then unresolved_fans
//! Mesh + diagnostics
//! ```
//!
//! Options and spacing are validated before any geometry is touched, and the
//! lattice size is checked before sampling allocates anything. A host gate is
//! consulted before every stage; stage boundaries are the only abort points.

use serde::Serialize;
use tracing::{debug, info};

use crate::boundary::{extract_boundary_from_polygon, extract_boundary_loop, BoundaryEdge, BoundaryLoop};
use crate::config::GridOptions;
use crate::core::{Precision, Vec2};
use crate::error::{Diagnostic, GridError, GridResult, Stage};
use crate::fill::fill_faces;
use crate::intersect::snap_to_lattice;
use crate::mesh::Mesh;
use crate::network::{build_edge_network, unresolved_fans, EdgeKind, EdgeNetwork, FanRole};
use crate::sample::{check_lattice_size, lattice_bounds, sample_interior};

// =============================================================================
// OUTCOME
// =============================================================================

/// Counts describing one grid fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GridStats {
    /// Outline vertices in the mesh
    pub boundary_vertices: usize,
    /// Lattice vertices in the mesh
    pub interior_vertices: usize,
    /// Edges between 4-neighbor lattice vertices
    pub lattice_edges: usize,
    /// Edges fanning from the outline inward
    pub spoke_edges: usize,
    /// Edges along the outline
    pub outline_edges: usize,
    /// Four-sided faces
    pub quads: usize,
    /// Three-sided faces
    pub triangles: usize,
}

impl GridStats {
    fn collect(network: &EdgeNetwork, mesh: &Mesh) -> Self {
        Self {
            boundary_vertices: mesh.boundary_vertex_count(),
            interior_vertices: mesh.interior_vertex_count(),
            lattice_edges: network.count_edges(EdgeKind::Lattice),
            spoke_edges: network.count_edges(EdgeKind::Fan(FanRole::Spoke)),
            outline_edges: network.count_edges(EdgeKind::Fan(FanRole::Outline)),
            quads: mesh.quad_count(),
            triangles: mesh.triangle_count(),
        }
    }
}

/// Result of a successful grid fill.
///
/// The mesh is best effort: regions listed in `diagnostics` as
/// [`GridError::UnfillableRegion`] are missing from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridOutcome {
    /// The generated mesh
    pub mesh: Mesh,
    /// Recoverable errors in stage order
    pub diagnostics: Vec<Diagnostic>,
    /// Topology counts
    pub stats: GridStats,
}

impl GridOutcome {
    /// Whether any region of the outline was left unfilled.
    pub fn has_partial_failures(&self) -> bool {
        self.unfilled_regions() > 0
    }

    fn unfilled_regions(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.error, GridError::UnfillableRegion { .. }))
            .count()
    }

    /// One-line warning for hosts, `None` when nothing needs reporting.
    ///
    /// # Examples
    /// ```
    /// use grid_fill::{generate_grid, BoundaryEdge, Vec2};
    ///
    /// let square = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    /// let edges: Vec<BoundaryEdge> = (0..4)
    ///     .map(|k| {
    ///         let (a, b) = (square[k], square[(k + 1) % 4]);
    ///         BoundaryEdge::new(Vec2::new(a.0, a.1), Vec2::new(b.0, b.1))
    ///     })
    ///     .collect();
    ///
    /// let outcome = generate_grid(&edges, 0.5).unwrap();
    /// assert!(outcome.summary().is_none());
    /// ```
    pub fn summary(&self) -> Option<String> {
        let unfilled = self.unfilled_regions();
        let other = self.diagnostics.len() - unfilled;
        match (unfilled, other) {
            (0, 0) => None,
            (0, n) => Some(format!("{} boundary issues were repaired", n)),
            (1, _) => Some("1 boundary region could not be filled".to_string()),
            (n, _) => Some(format!("{} boundary regions could not be filled", n)),
        }
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Fills the loop formed by `edges` with a square grid of `spacing`, using
/// default options.
///
/// # Examples
/// ```
/// use grid_fill::{generate_grid, BoundaryEdge, Vec2};
///
/// let corners = [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(4.0, 4.0), Vec2::new(0.0, 4.0)];
/// let edges: Vec<BoundaryEdge> = (0..4).map(|k| BoundaryEdge::new(corners[k], corners[(k + 1) % 4])).collect();
///
/// let outcome = generate_grid(&edges, 1.0).unwrap();
/// assert_eq!(outcome.stats.quads, 4);
/// assert_eq!(outcome.stats.interior_vertices, 9);
/// assert!((outcome.mesh.area() - 16.0).abs() < 1e-9);
/// ```
pub fn generate_grid(edges: &[BoundaryEdge], spacing: f64) -> GridResult<GridOutcome> {
    generate_grid_with(edges, spacing, &GridOptions::default())
}

/// [`generate_grid`] with explicit options.
pub fn generate_grid_with(
    edges: &[BoundaryEdge],
    spacing: f64,
    options: &GridOptions,
) -> GridResult<GridOutcome> {
    generate_grid_gated(edges, spacing, options, |_| true)
}

/// Fills a polygon given as an ordered point list.
///
/// A trailing point equal to the first one is treated as an explicit closing
/// point and ignored.
pub fn generate_grid_from_polygon(
    points: &[Vec2],
    spacing: f64,
    options: &GridOptions,
) -> GridResult<GridOutcome> {
    let precision = prepare(points.len(), spacing, options)?;
    let (boundary, diagnostics) = extract_boundary_from_polygon(points, &precision)?;
    let mut proceed = |_: Stage| true;
    fill_boundary(boundary, diagnostics, spacing, options, &precision, &mut proceed)
}

/// [`generate_grid_with`] with a host gate consulted before each stage.
///
/// Returning `false` from `gate` aborts with [`GridError::Aborted`] naming the
/// stage that was about to run.
///
/// # Examples
/// ```
/// use grid_fill::{generate_grid_gated, BoundaryEdge, GridError, GridOptions, Stage, Vec2};
///
/// let corners = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
/// let edges: Vec<BoundaryEdge> = (0..3).map(|k| BoundaryEdge::new(corners[k], corners[(k + 1) % 3])).collect();
///
/// let result = generate_grid_gated(&edges, 0.25, &GridOptions::default(), |stage| stage != Stage::Network);
/// assert_eq!(result, Err(GridError::Aborted { stage: Stage::Network }));
/// ```
pub fn generate_grid_gated<G>(
    edges: &[BoundaryEdge],
    spacing: f64,
    options: &GridOptions,
    mut gate: G,
) -> GridResult<GridOutcome>
where
    G: FnMut(Stage) -> bool,
{
    let precision = prepare(edges.len(), spacing, options)?;
    enter(&mut gate, Stage::Extract)?;
    let (boundary, diagnostics) = extract_boundary_loop(edges, &precision)?;
    fill_boundary(boundary, diagnostics, spacing, options, &precision, &mut gate)
}

// =============================================================================
// STAGES
// =============================================================================

fn prepare(inputs: usize, spacing: f64, options: &GridOptions) -> GridResult<Precision> {
    options.validate()?;
    let precision = Precision::for_spacing(spacing, options)?;
    info!(
        inputs,
        spacing,
        quantum = precision.quantum,
        preserve_corners = options.preserve_corners,
        "Starting grid fill"
    );
    Ok(precision)
}

fn enter<G>(gate: &mut G, stage: Stage) -> GridResult<()>
where
    G: FnMut(Stage) -> bool + ?Sized,
{
    if gate(stage) {
        debug!(%stage, "Entering stage");
        Ok(())
    } else {
        info!(%stage, "Grid fill aborted by host");
        Err(GridError::Aborted { stage })
    }
}

fn fill_boundary<G>(
    boundary: BoundaryLoop,
    mut diagnostics: Vec<Diagnostic>,
    spacing: f64,
    options: &GridOptions,
    precision: &Precision,
    gate: &mut G,
) -> GridResult<GridOutcome>
where
    G: FnMut(Stage) -> bool + ?Sized,
{
    debug!(
        vertices = boundary.len(),
        area = boundary.area(),
        winding = ?boundary.source_winding(),
        "Extracted boundary loop"
    );
    let (min, max) = boundary.bounds();
    let bounds = lattice_bounds(min, max, spacing, precision);
    check_lattice_size(&bounds, options.max_lattice_points)?;

    enter(gate, Stage::Intersect)?;
    let snapped = snap_to_lattice(&boundary, spacing, precision, options.preserve_corners);

    enter(gate, Stage::Sample)?;
    let lattice = sample_interior(&boundary, &bounds, spacing, precision, options);

    enter(gate, Stage::Network)?;
    let mut network = build_edge_network(
        &snapped,
        &boundary,
        &lattice,
        spacing,
        precision,
        options.fan_search_radius,
    );
    diagnostics.append(&mut network.diagnostics);

    enter(gate, Stage::Fill)?;
    let (faces, found) = fill_faces(&network, precision);
    diagnostics.extend(unresolved_fans(&network, &faces));
    diagnostics.extend(found);

    let mesh = Mesh::from_network(&network, faces);
    let stats = GridStats::collect(&network, &mesh);
    info!(
        vertices = mesh.vertex_count(),
        quads = stats.quads,
        triangles = stats.triangles,
        diagnostics = diagnostics.len(),
        "Grid fill complete"
    );
    Ok(GridOutcome {
        mesh,
        diagnostics,
        stats,
    })
}

#[cfg(test)]
mod tests;
