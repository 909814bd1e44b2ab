//! Uniform bucket grid over vertices and edges.
//!
//! Space is partitioned into square cells and ids are binned into every cell
//! they touch. Queries return candidate ids only; callers refine them with
//! exact predicates.

use std::collections::HashMap;

use crate::core::vec2::Vec2;

type Cell = (i64, i64);

/// Bucket grid with a fixed cell size.
///
/// # Examples
/// ```
/// use grid_fill::core::{SpatialGrid, Vec2};
///
/// let mut grid = SpatialGrid::new(1.0);
/// grid.insert_vertex(7, Vec2::new(0.5, 0.5));
/// grid.insert_edge(3, Vec2::new(0.0, 2.0), Vec2::new(4.0, 2.0));
///
/// assert_eq!(grid.vertices_near(Vec2::ZERO, Vec2::new(1.0, 0.0), 0.0), vec![7]);
/// assert_eq!(grid.edges_near(Vec2::new(3.0, 1.5), Vec2::new(3.0, 2.5), 0.0), vec![3]);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    vertices: HashMap<Cell, Vec<usize>>,
    edges: HashMap<Cell, Vec<usize>>,
}

impl SpatialGrid {
    /// Creates an empty grid.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(f64::MIN_POSITIVE),
            vertices: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    fn cell_of(&self, p: Vec2) -> Cell {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }

    /// Cells covered by segment `a-b` grown by `pad`.
    ///
    /// The segment is cut into pieces no longer than one cell and the padded
    /// box of each piece is enumerated, so long edges stay linear in length.
    fn cells_along(&self, a: Vec2, b: Vec2, pad: f64) -> Vec<Cell> {
        let pieces = ((a.distance(b) / self.cell_size).ceil() as usize).max(1);
        let mut cells = Vec::new();
        for k in 0..pieces {
            let p = a.lerp(b, k as f64 / pieces as f64);
            let q = a.lerp(b, (k + 1) as f64 / pieces as f64);
            let lo = self.cell_of(p.min(q) - Vec2::splat(pad));
            let hi = self.cell_of(p.max(q) + Vec2::splat(pad));
            for cx in lo.0..=hi.0 {
                for cy in lo.1..=hi.1 {
                    cells.push((cx, cy));
                }
            }
        }
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Bins a vertex id at `p`.
    pub fn insert_vertex(&mut self, id: usize, p: Vec2) {
        let cell = self.cell_of(p);
        self.vertices.entry(cell).or_default().push(id);
    }

    /// Bins an edge id into every cell the segment touches.
    pub fn insert_edge(&mut self, id: usize, a: Vec2, b: Vec2) {
        for cell in self.cells_along(a, b, 0.0) {
            self.edges.entry(cell).or_default().push(id);
        }
    }

    /// Vertex ids binned in cells within `pad` of segment `a-b`.
    pub fn vertices_near(&self, a: Vec2, b: Vec2, pad: f64) -> Vec<usize> {
        collect(&self.vertices, self.cells_along(a, b, pad))
    }

    /// Edge ids binned in cells within `pad` of segment `a-b`.
    pub fn edges_near(&self, a: Vec2, b: Vec2, pad: f64) -> Vec<usize> {
        collect(&self.edges, self.cells_along(a, b, pad))
    }
}

fn collect(buckets: &HashMap<Cell, Vec<usize>>, cells: Vec<Cell>) -> Vec<usize> {
    let mut ids: Vec<usize> = cells
        .iter()
        .filter_map(|cell| buckets.get(cell))
        .flatten()
        .copied()
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
