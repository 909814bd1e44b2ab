//! # Edge Network
//!
//! Assembles the planar edge network that the face filler resolves into
//! faces: lattice edges between interior vertices, outline edges along the
//! snapped boundary, and spokes fanning from boundary vertices inward.
//!
//! ## Algorithm
//!
//! 1. Insert boundary vertices in loop order, then interior lattice points
//!    whose key is not already taken
//! 2. Connect consecutive boundary vertices (`Fan(Outline)`)
//! 3. Connect 4-neighbor interior vertices whose segment is clear (`Lattice`)
//! 4. Give every boundary vertex one spoke to the best feasible interior
//!    vertex in its search window (`Fan(Spoke)`)
//! 5. Tether lattice islands to the outline, drop the ones that cannot be
//!    reached
//! 6. Compact away vertices without edges
//!
//! Boundary vertices that saw candidates but ended up without a spoke are
//! kept in [`EdgeNetwork::spokeless`]; whether their fan is unresolvable is
//! decided by [`unresolved_fans`] once the faces are known.
//!
//! A segment is clear when no other vertex lies within one quantum of it and
//! it crosses no existing edge properly. Every vertex exists before the first
//! edge is added, so the network stays planar.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::boundary::BoundaryLoop;
use crate::core::segment::{distance_to_segment, segments_cross_properly};
use crate::core::vec2::direction_angle;
use crate::core::{PointKey, Precision, SpatialGrid, Vec2};
use crate::error::{Diagnostic, GridError, Stage};
use crate::intersect::SnappedBoundary;
use crate::sample::{classify_point, Containment, LatticePoint};

pub use crate::intersect::BoundaryOrigin;

// =============================================================================
// TYPES
// =============================================================================

/// Role of a network vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VertexKind {
    /// Lattice point strictly inside the outline.
    Interior {
        /// Column index
        i: i64,
        /// Row index
        j: i64,
    },
    /// Vertex of the snapped outline.
    Boundary(BoundaryOrigin),
}

impl VertexKind {
    /// Whether this is a lattice vertex.
    pub fn is_interior(&self) -> bool {
        matches!(self, VertexKind::Interior { .. })
    }

    /// Whether this is an outline vertex.
    pub fn is_boundary(&self) -> bool {
        matches!(self, VertexKind::Boundary(_))
    }
}

/// A vertex of the network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridVertex {
    /// Position in the input plane
    pub position: Vec2,
    /// Lattice or outline vertex
    pub kind: VertexKind,
}

/// Role of a fan edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FanRole {
    /// Boundary vertex to interior vertex.
    Spoke,
    /// Consecutive boundary vertices.
    Outline,
}

/// Kind of a network edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeKind {
    /// Between 4-neighbor interior vertices.
    Lattice,
    /// Along the outline or fanning from it.
    Fan(FanRole),
}

/// Undirected edge, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    /// Smaller vertex id
    pub a: usize,
    /// Larger vertex id
    pub b: usize,
    /// Edge role
    pub kind: EdgeKind,
}

impl Edge {
    /// Creates an edge with normalized endpoint order.
    pub fn new(u: usize, v: usize, kind: EdgeKind) -> Self {
        Self {
            a: u.min(v),
            b: u.max(v),
            kind,
        }
    }

    /// Whether `v` is an endpoint.
    pub fn touches(&self, v: usize) -> bool {
        self.a == v || self.b == v
    }
}

/// The planar edge network handed to the face filler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeNetwork {
    /// Vertex arena
    pub vertices: Vec<GridVertex>,
    /// Undirected edges
    pub edges: Vec<Edge>,
    /// Boundary vertex ids in counter-clockwise loop order
    pub outline: Vec<usize>,
    /// Boundary vertex ids that had spoke candidates but got no spoke
    pub spokeless: Vec<usize>,
    /// Lattice spacing
    pub spacing: f64,
    /// Recoverable errors raised while building
    pub diagnostics: Vec<Diagnostic>,
}

impl EdgeNetwork {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges of one kind.
    pub fn count_edges(&self, kind: EdgeKind) -> usize {
        self.edges.iter().filter(|e| e.kind == kind).count()
    }

    /// Number of interior vertices.
    pub fn interior_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.kind.is_interior()).count()
    }

    /// Number of boundary vertices.
    pub fn boundary_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.kind.is_boundary()).count()
    }

    /// Neighbor lists indexed by vertex id.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.vertices.len()];
        for edge in &self.edges {
            adjacency[edge.a].push(edge.b);
            adjacency[edge.b].push(edge.a);
        }
        adjacency
    }

    /// Edge kinds keyed by normalized endpoint pair.
    pub fn edge_kinds(&self) -> HashMap<(usize, usize), EdgeKind> {
        self.edges.iter().map(|e| ((e.a, e.b), e.kind)).collect()
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builds the edge network for a snapped outline and its sampled lattice.
///
/// `original` is the unsnapped loop; spoke midpoints are tested against it.
///
/// # Examples
/// ```
/// use grid_fill::boundary::extract_boundary_from_polygon;
/// use grid_fill::config::GridOptions;
/// use grid_fill::core::{Precision, Vec2};
/// use grid_fill::intersect::snap_to_lattice;
/// use grid_fill::network::{build_edge_network, EdgeKind, FanRole};
/// use grid_fill::sample::{lattice_bounds, sample_interior};
///
/// let spacing = 0.5;
/// let precision = Precision::for_spacing(spacing, &GridOptions::default()).unwrap();
/// let square = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
/// let (boundary, _) = extract_boundary_from_polygon(&square, &precision).unwrap();
/// let snapped = snap_to_lattice(&boundary, spacing, &precision, true);
/// let (min, max) = boundary.bounds();
/// let bounds = lattice_bounds(min, max, spacing, &precision);
/// let lattice = sample_interior(&boundary, &bounds, spacing, &precision, &GridOptions::default());
///
/// let network = build_edge_network(&snapped, &boundary, &lattice, spacing, &precision, 1);
/// assert_eq!(network.interior_count(), 1);
/// assert_eq!(network.count_edges(EdgeKind::Fan(FanRole::Spoke)), 8);
/// ```
pub fn build_edge_network(
    snapped: &SnappedBoundary,
    original: &BoundaryLoop,
    interior: &[LatticePoint],
    spacing: f64,
    precision: &Precision,
    fan_search_radius: u32,
) -> EdgeNetwork {
    let mut builder = NetworkBuilder::new(original, spacing, precision);
    builder.insert_vertices(snapped, interior);
    builder.connect_outline();
    builder.connect_lattice();
    let had_candidates = builder.connect_spokes(fan_search_radius);
    builder.tether_islands();
    builder.mark_spokeless(&had_candidates);
    builder.finish()
}

/// Reports the spokeless boundary vertices that no face in `faces` uses.
///
/// A vertex without a spoke only has its two outline edges, so it lies on
/// exactly one bounded face; it is missing from `faces` exactly when that
/// face was omitted. The reported `vertex` is the id in `network`, which is
/// also the vertex index of the mesh built from it.
///
/// # Examples
/// ```
/// use grid_fill::core::Vec2;
/// use grid_fill::network::{unresolved_fans, BoundaryOrigin, EdgeNetwork, GridVertex, VertexKind};
///
/// let corner = |x, y| GridVertex {
///     position: Vec2::new(x, y),
///     kind: VertexKind::Boundary(BoundaryOrigin::Corner),
/// };
/// let network = EdgeNetwork {
///     vertices: vec![corner(0.0, 0.0), corner(1.0, 0.0), corner(0.0, 1.0)],
///     edges: Vec::new(),
///     outline: vec![0, 1, 2],
///     spokeless: vec![1],
///     spacing: 1.0,
///     diagnostics: Vec::new(),
/// };
///
/// assert!(unresolved_fans(&network, &[vec![0, 1, 2]]).is_empty());
/// assert_eq!(unresolved_fans(&network, &[]).len(), 1);
/// ```
pub fn unresolved_fans(network: &EdgeNetwork, faces: &[Vec<usize>]) -> Vec<Diagnostic> {
    let used: HashSet<usize> = faces.iter().flatten().copied().collect();
    network
        .spokeless
        .iter()
        .filter(|&v| !used.contains(v))
        .map(|&vertex| {
            let p = network.vertices[vertex].position;
            warn!(vertex, x = p.x, y = p.y, "No fan spoke around boundary vertex");
            Diagnostic::new(
                Stage::Network,
                GridError::UnresolvableFan {
                    vertex,
                    x: p.x,
                    y: p.y,
                },
            )
        })
        .collect()
}

struct NetworkBuilder<'a> {
    original: &'a BoundaryLoop,
    spacing: f64,
    precision: &'a Precision,
    vertices: Vec<GridVertex>,
    keys: HashMap<PointKey, usize>,
    lattice: HashMap<(i64, i64), usize>,
    outline: Vec<usize>,
    edges: Vec<Edge>,
    edge_set: HashSet<(usize, usize)>,
    grid: SpatialGrid,
    removed: HashSet<usize>,
    spokeless: Vec<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> NetworkBuilder<'a> {
    fn new(original: &'a BoundaryLoop, spacing: f64, precision: &'a Precision) -> Self {
        Self {
            original,
            spacing,
            precision,
            vertices: Vec::new(),
            keys: HashMap::new(),
            lattice: HashMap::new(),
            outline: Vec::new(),
            edges: Vec::new(),
            edge_set: HashSet::new(),
            grid: SpatialGrid::new(spacing),
            removed: HashSet::new(),
            spokeless: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn position(&self, v: usize) -> Vec2 {
        self.vertices[v].position
    }

    fn add_vertex(&mut self, position: Vec2, kind: VertexKind) -> Option<usize> {
        let key = self.precision.key(position);
        if self.keys.contains_key(&key) {
            return None;
        }
        let id = self.vertices.len();
        self.keys.insert(key, id);
        self.vertices.push(GridVertex { position, kind });
        self.grid.insert_vertex(id, position);
        Some(id)
    }

    fn add_edge(&mut self, u: usize, v: usize, kind: EdgeKind) -> bool {
        let edge = Edge::new(u, v, kind);
        if u == v || !self.edge_set.insert((edge.a, edge.b)) {
            return false;
        }
        let id = self.edges.len();
        self.grid.insert_edge(id, self.position(u), self.position(v));
        self.edges.push(edge);
        true
    }

    /// No vertex within one quantum of `u-v` and no proper crossing.
    fn is_clear(&self, u: usize, v: usize) -> bool {
        let (pu, pv) = (self.position(u), self.position(v));
        let q = self.precision.quantum;

        let blocked_by_vertex = self
            .grid
            .vertices_near(pu, pv, q)
            .into_iter()
            .filter(|&w| w != u && w != v)
            .any(|w| distance_to_segment(self.position(w), pu, pv) <= q);
        if blocked_by_vertex {
            return false;
        }

        !self
            .grid
            .edges_near(pu, pv, q)
            .into_iter()
            .map(|e| self.edges[e])
            .filter(|e| !e.touches(u) && !e.touches(v))
            .any(|e| segments_cross_properly(pu, pv, self.position(e.a), self.position(e.b)))
    }

    /// Clear and running through the inside of the original loop.
    fn spoke_feasible(&self, b: usize, v: usize) -> bool {
        let midpoint = (self.position(b) + self.position(v)) * 0.5;
        self.is_clear(b, v)
            && classify_point(midpoint, self.original, self.precision) != Containment::Outside
    }

    // -------------------------------------------------------------------------
    // Phases
    // -------------------------------------------------------------------------

    fn insert_vertices(&mut self, snapped: &SnappedBoundary, interior: &[LatticePoint]) {
        for sv in &snapped.vertices {
            if let Some(id) = self.add_vertex(sv.position, VertexKind::Boundary(sv.origin)) {
                self.outline.push(id);
            }
        }

        let mut merged = 0usize;
        for lp in interior {
            if lp.containment != Containment::Inside {
                merged += 1;
                continue;
            }
            match self.add_vertex(lp.position, VertexKind::Interior { i: lp.i, j: lp.j }) {
                Some(id) => {
                    self.lattice.insert((lp.i, lp.j), id);
                }
                None => merged += 1,
            }
        }
        debug!(
            boundary = self.outline.len(),
            interior = self.lattice.len(),
            merged,
            "Inserted network vertices"
        );
    }

    fn connect_outline(&mut self) {
        let n = self.outline.len();
        for k in 0..n {
            let (u, v) = (self.outline[k], self.outline[(k + 1) % n]);
            self.add_edge(u, v, EdgeKind::Fan(FanRole::Outline));
        }
    }

    fn connect_lattice(&mut self) {
        let mut cells: Vec<((i64, i64), usize)> =
            self.lattice.iter().map(|(&ij, &id)| (ij, id)).collect();
        cells.sort_unstable_by_key(|&((i, j), _)| (j, i));

        let mut blocked = 0usize;
        for ((i, j), u) in cells {
            for (di, dj) in [(1, 0), (0, 1)] {
                let Some(&v) = self.lattice.get(&(i + di, j + dj)) else {
                    continue;
                };
                if self.is_clear(u, v) {
                    self.add_edge(u, v, EdgeKind::Lattice);
                } else {
                    blocked += 1;
                }
            }
        }
        if blocked > 0 {
            debug!(blocked, "Lattice edges blocked by the outline");
        }
    }

    /// Connects spokes and returns, per outline position, whether the
    /// vertex had any candidate in its window.
    fn connect_spokes(&mut self, radius: u32) -> Vec<bool> {
        let n = self.outline.len();
        let mut had_candidates = vec![false; n];
        let mut spokes = 0usize;
        let r = i64::from(radius);

        for position in 0..n {
            let b = self.outline[position];
            let p = self.position(b);
            let ci = (p.x / self.spacing).floor() as i64;
            let cj = (p.y / self.spacing).floor() as i64;

            let mut candidates: Vec<(u64, (i64, i64), f64, usize)> = Vec::new();
            for i in (ci - r)..=(ci + 1 + r) {
                for j in (cj - r)..=(cj + 1 + r) {
                    if let Some(&v) = self.lattice.get(&(i, j)) {
                        let pv = self.position(v);
                        let d2 = self.precision.quantized_distance_sq(p, pv);
                        candidates.push((d2, (i, j), direction_angle(p, pv), v));
                    }
                }
            }
            candidates.sort_by(|x, y| {
                x.0.cmp(&y.0)
                    .then_with(|| x.1.cmp(&y.1))
                    .then_with(|| x.2.total_cmp(&y.2))
            });

            had_candidates[position] = !candidates.is_empty();
            if let Some(&(_, _, _, v)) = candidates.iter().find(|c| self.spoke_feasible(b, c.3)) {
                if self.add_edge(b, v, EdgeKind::Fan(FanRole::Spoke)) {
                    spokes += 1;
                }
            }
        }

        debug!(spokes, boundary = n, "Connected fan spokes");
        had_candidates
    }

    /// Records outline vertices that had candidates but hold no spoke after
    /// tethering.
    fn mark_spokeless(&mut self, had_candidates: &[bool]) {
        let spoke = EdgeKind::Fan(FanRole::Spoke);
        let with_spoke: HashSet<usize> = self
            .edges
            .iter()
            .filter(|e| e.kind == spoke)
            .flat_map(|e| [e.a, e.b])
            .collect();
        self.spokeless = self
            .outline
            .iter()
            .zip(had_candidates)
            .filter(|&(b, &had)| had && !with_spoke.contains(b))
            .map(|(&b, _)| b)
            .collect();
        if !self.spokeless.is_empty() {
            debug!(count = self.spokeless.len(), "Boundary vertices left without a spoke");
        }
    }

    /// Components without a boundary vertex, smallest id first.
    fn islands(&self) -> Vec<Vec<usize>> {
        let mut sets = DisjointSet::new(self.vertices.len());
        for edge in &self.edges {
            sets.union(edge.a, edge.b);
        }
        let Some(&anchor) = self.outline.first() else {
            return Vec::new();
        };
        let mainland = sets.find(anchor);

        let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for v in 0..self.vertices.len() {
            let root = sets.find(v);
            if root != mainland {
                components.entry(root).or_default().push(v);
            }
        }
        let mut islands: Vec<Vec<usize>> = components.into_values().collect();
        islands.sort_by_key(|island| island[0]);
        islands
    }

    fn tether_islands(&mut self) {
        for island in self.islands() {
            let mut pairs: Vec<(u64, usize, usize)> = Vec::new();
            for &b in &self.outline {
                for &v in &island {
                    let d2 = self
                        .precision
                        .quantized_distance_sq(self.position(b), self.position(v));
                    pairs.push((d2, b, v));
                }
            }
            pairs.sort_unstable();

            if let Some(&(_, b, v)) = pairs.iter().find(|&&(_, b, v)| self.spoke_feasible(b, v)) {
                self.add_edge(b, v, EdgeKind::Fan(FanRole::Spoke));
                debug!(size = island.len(), "Tethered lattice island");
                continue;
            }

            let has_edges = self
                .edges
                .iter()
                .any(|e| island.contains(&e.a) || island.contains(&e.b));
            if has_edges {
                warn!(size = island.len(), "Dropping lattice island that cannot reach the outline");
                self.diagnostics.push(Diagnostic::new(
                    Stage::Network,
                    GridError::UnfillableRegion {
                        vertex_count: island.len(),
                        reason: "lattice island cannot be tethered to the outline".to_string(),
                    },
                ));
            } else {
                debug!("Dropping unreachable lattice point");
            }
            self.removed.extend(island);
        }
    }

    /// Drops removed and unused vertices and remaps ids.
    fn finish(self) -> EdgeNetwork {
        let removed = &self.removed;
        let edges: Vec<Edge> = self
            .edges
            .into_iter()
            .filter(|e| !removed.contains(&e.a) && !removed.contains(&e.b))
            .collect();

        let mut used = vec![false; self.vertices.len()];
        for edge in &edges {
            used[edge.a] = true;
            used[edge.b] = true;
        }

        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.vertices.len());
        for (old, vertex) in self.vertices.into_iter().enumerate() {
            if used[old] {
                remap[old] = vertices.len();
                vertices.push(vertex);
            }
        }

        let edges: Vec<Edge> = edges
            .into_iter()
            .map(|e| Edge::new(remap[e.a], remap[e.b], e.kind))
            .collect();
        let outline: Vec<usize> = self
            .outline
            .iter()
            .filter(|&&v| used[v])
            .map(|&v| remap[v])
            .collect();
        let spokeless: Vec<usize> = self
            .spokeless
            .iter()
            .filter(|&&v| used[v])
            .map(|&v| remap[v])
            .collect();

        debug!(
            vertices = vertices.len(),
            edges = edges.len(),
            "Built edge network"
        );
        EdgeNetwork {
            vertices,
            edges,
            outline,
            spokeless,
            spacing: self.spacing,
            diagnostics: self.diagnostics,
        }
    }
}

// =============================================================================
// UNION-FIND
// =============================================================================

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut v: usize) -> usize {
        while self.parent[v] != v {
            self.parent[v] = self.parent[self.parent[v]];
            v = self.parent[v];
        }
        v
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}
