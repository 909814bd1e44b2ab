//! # Face Filling
//!
//! Resolves the planar edge network into faces.
//!
//! ## Algorithm
//!
//! 1. Sort each vertex's neighbors counter-clockwise by angle
//! 2. Trace every directed edge once with `next(u → v) = v → w`, where `w`
//!    precedes `u` in `v`'s ordering; bounded faces come out
//!    counter-clockwise and the unbounded face clockwise
//! 3. The most negative cycle is the unbounded face; any other non-positive
//!    cycle is reported
//! 4. A face of four interior vertices joined by lattice edges is a quad
//! 5. Every other face is ear clipped
//!
//! ## Ear Clipping
//!
//! Faces may be weakly simple: a spoke or lattice chain that dangles into a
//! face is walked twice, so the same vertex id appears twice in the cycle.
//! An ear `(p, k, n)` must be strictly convex under the exact orientation
//! test and its closed triangle must contain no other node, ignoring nodes
//! that share a vertex id with the ear. Among valid ears the clipper picks,
//! in order:
//!
//! - ears touching a boundary vertex that leave one in the remainder
//! - the shortest new diagonal `p-n`
//! - the lowest position in the traced cycle

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::core::segment::{orient, point_in_triangle};
use crate::core::vec2::{direction_angle, signed_area};
use crate::core::{Precision, Vec2};
use crate::error::{Diagnostic, GridError, Stage};
use crate::network::{EdgeKind, EdgeNetwork, GridVertex};

/// Resolves `network` into counter-clockwise faces of vertex ids.
///
/// # Examples
/// ```
/// use grid_fill::boundary::extract_boundary_from_polygon;
/// use grid_fill::core::{Precision, Vec2};
/// use grid_fill::fill::fill_faces;
/// use grid_fill::intersect::snap_to_lattice;
/// use grid_fill::network::build_edge_network;
///
/// let precision = Precision::new(1e-9, 5e-6);
/// let square = [Vec2::new(0.2, 0.2), Vec2::new(0.8, 0.2), Vec2::new(0.8, 0.8), Vec2::new(0.2, 0.8)];
/// let (boundary, _) = extract_boundary_from_polygon(&square, &precision).unwrap();
/// let snapped = snap_to_lattice(&boundary, 5.0, &precision, true);
/// let network = build_edge_network(&snapped, &boundary, &[], 5.0, &precision, 1);
///
/// let (faces, diagnostics) = fill_faces(&network, &precision);
/// assert_eq!(faces.len(), 2);
/// assert!(diagnostics.is_empty());
/// ```
pub fn fill_faces(network: &EdgeNetwork, precision: &Precision) -> (Vec<Vec<usize>>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let cycles = trace_cycles(network);
    let positions = |cycle: &[usize]| -> Vec<Vec2> {
        cycle.iter().map(|&v| network.vertices[v].position).collect()
    };

    let areas: Vec<f64> = cycles.iter().map(|c| signed_area(&positions(c))).collect();
    let outer = areas
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx);

    let kinds = network.edge_kinds();
    let mut faces = Vec::new();
    let mut quads = 0usize;

    for (idx, cycle) in cycles.iter().enumerate() {
        if Some(idx) == outer {
            continue;
        }
        if areas[idx] <= precision.epsilon {
            report(
                &mut diagnostics,
                distinct(cycle),
                "face does not enclose positive area".to_string(),
            );
            continue;
        }

        if is_lattice_quad(cycle, &network.vertices, &kinds) {
            faces.push(cycle.clone());
            quads += 1;
            continue;
        }

        match clip_ears(cycle, &network.vertices) {
            Ok(triangles) => faces.extend(triangles.into_iter().map(|t| t.to_vec())),
            Err(reason) => report(&mut diagnostics, distinct(cycle), reason),
        }
    }

    debug!(
        faces = faces.len(),
        quads,
        triangles = faces.len() - quads,
        omitted = diagnostics.len(),
        "Filled faces"
    );
    (faces, diagnostics)
}

fn report(diagnostics: &mut Vec<Diagnostic>, vertex_count: usize, reason: String) {
    warn!(vertex_count, %reason, "Omitting unfillable face");
    diagnostics.push(Diagnostic::new(
        Stage::Fill,
        GridError::UnfillableRegion {
            vertex_count,
            reason,
        },
    ));
}

fn distinct(cycle: &[usize]) -> usize {
    let mut ids = cycle.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}

// =============================================================================
// FACE TRACING
// =============================================================================

/// Every face cycle of the network, each directed edge used exactly once.
pub(crate) fn trace_cycles(network: &EdgeNetwork) -> Vec<Vec<usize>> {
    let positions: Vec<Vec2> = network.vertices.iter().map(|v| v.position).collect();
    let mut adjacency = network.adjacency();
    for (v, neighbors) in adjacency.iter_mut().enumerate() {
        neighbors.sort_by(|&a, &b| {
            direction_angle(positions[v], positions[a])
                .total_cmp(&direction_angle(positions[v], positions[b]))
        });
    }

    let mut visited: Vec<Vec<bool>> = adjacency.iter().map(|n| vec![false; n.len()]).collect();
    let mut cycles = Vec::new();

    for start in 0..adjacency.len() {
        for start_slot in 0..adjacency[start].len() {
            if visited[start][start_slot] {
                continue;
            }
            let mut cycle = Vec::new();
            let (mut u, mut slot) = (start, start_slot);
            while !visited[u][slot] {
                visited[u][slot] = true;
                cycle.push(u);
                let v = adjacency[u][slot];
                let degree = adjacency[v].len();
                let back = adjacency[v].iter().position(|&w| w == u).unwrap_or(0);
                slot = (back + degree - 1) % degree;
                u = v;
            }
            cycles.push(cycle);
        }
    }
    cycles
}

fn is_lattice_quad(
    cycle: &[usize],
    vertices: &[GridVertex],
    kinds: &HashMap<(usize, usize), EdgeKind>,
) -> bool {
    cycle.len() == 4
        && cycle.iter().all(|&v| vertices[v].kind.is_interior())
        && (0..4).all(|k| {
            let (u, v) = (cycle[k], cycle[(k + 1) % 4]);
            kinds.get(&(u.min(v), u.max(v))) == Some(&EdgeKind::Lattice)
        })
}

// =============================================================================
// EAR CLIPPING
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Ear {
    touches_boundary: bool,
    tip_is_boundary: bool,
    diagonal: f64,
}

impl Ear {
    fn rank(&self, boundary_left: usize) -> u8 {
        let keeps_boundary = boundary_left > usize::from(self.tip_is_boundary);
        match (self.touches_boundary, keeps_boundary) {
            (true, true) => 0,
            (true, false) => 1,
            _ => 2,
        }
    }
}

/// Linked ring over the nodes of one face cycle.
struct Ring<'a> {
    cycle: &'a [usize],
    vertices: &'a [GridVertex],
    prev: Vec<usize>,
    next: Vec<usize>,
}

impl Ring<'_> {
    fn position(&self, node: usize) -> Vec2 {
        self.vertices[self.cycle[node]].position
    }

    fn is_boundary(&self, node: usize) -> bool {
        self.vertices[self.cycle[node]].kind.is_boundary()
    }

    fn triangle(&self, k: usize) -> [usize; 3] {
        [self.cycle[self.prev[k]], self.cycle[k], self.cycle[self.next[k]]]
    }

    fn ear_at(&self, k: usize) -> Option<Ear> {
        let (p, n) = (self.prev[k], self.next[k]);
        let ids = self.triangle(k);
        if ids[0] == ids[1] || ids[1] == ids[2] || ids[0] == ids[2] {
            return None;
        }
        let (a, b, c) = (self.position(p), self.position(k), self.position(n));
        if orient(a, b, c) <= 0.0 {
            return None;
        }

        let mut m = self.next[n];
        while m != p {
            if !ids.contains(&self.cycle[m]) && point_in_triangle(self.position(m), a, b, c) {
                return None;
            }
            m = self.next[m];
        }

        Some(Ear {
            touches_boundary: self.is_boundary(p) || self.is_boundary(k) || self.is_boundary(n),
            tip_is_boundary: self.is_boundary(k),
            diagonal: a.distance_squared(c),
        })
    }

    fn unlink(&mut self, k: usize) {
        let (p, n) = (self.prev[k], self.next[k]);
        self.next[p] = n;
        self.prev[n] = p;
    }
}

/// Triangulates one counter-clockwise, possibly weakly simple, face.
pub(crate) fn clip_ears(cycle: &[usize], vertices: &[GridVertex]) -> Result<Vec<[usize; 3]>, String> {
    let n = cycle.len();
    if n < 3 {
        return Err(format!("face cycle has only {} nodes", n));
    }

    let mut ring = Ring {
        cycle,
        vertices,
        prev: (0..n).map(|k| (k + n - 1) % n).collect(),
        next: (0..n).map(|k| (k + 1) % n).collect(),
    };
    let mut alive = vec![true; n];
    let mut ears: Vec<Option<Ear>> = (0..n).map(|k| ring.ear_at(k)).collect();
    let mut boundary_left = (0..n).filter(|&k| ring.is_boundary(k)).count();
    let mut triangles = Vec::with_capacity(n - 2);

    for remaining in (4..=n).rev() {
        let best = (0..n)
            .filter(|&k| alive[k])
            .filter_map(|k| ears[k].map(|ear| (k, ear)))
            .min_by(|(ka, a), (kb, b)| {
                a.rank(boundary_left)
                    .cmp(&b.rank(boundary_left))
                    .then_with(|| a.diagonal.total_cmp(&b.diagonal))
                    .then_with(|| ka.cmp(kb))
            })
            .map(|(k, _)| k);
        let Some(k) = best else {
            return Err(format!("no clippable ear among {} remaining nodes", remaining));
        };

        triangles.push(ring.triangle(k));
        if ring.is_boundary(k) {
            boundary_left -= 1;
        }
        alive[k] = false;
        ring.unlink(k);
        let (p, nx) = (ring.prev[k], ring.next[k]);
        ears[p] = ring.ear_at(p);
        ears[nx] = ring.ear_at(nx);
    }

    let last = (0..n).find(|&k| alive[k]).ok_or("face collapsed while clipping")?;
    if ring.ear_at(last).is_none() {
        return Err("final triangle is degenerate".to_string());
    }
    triangles.push(ring.triangle(last));
    Ok(triangles)
}
