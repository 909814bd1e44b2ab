//! # Output Mesh
//!
//! Indexed polygon mesh produced by the grid fill, plus flat `f32` buffer
//! export for renderers.
//!
//! Faces are counter-clockwise lists of vertex indices: quads from the
//! lattice and triangles along the outline. Every vertex carries a
//! [`VertexClass`] so hosts can select the boundary ring.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::vec2::signed_area;
use crate::core::Vec2;
use crate::error::{GridError, GridResult};
use crate::network::EdgeNetwork;

/// Whether a mesh vertex is a lattice point or lies on the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VertexClass {
    /// Lattice point strictly inside the outline.
    Interior,
    /// Vertex on the outline.
    Boundary,
}

/// Indexed planar mesh.
///
/// # Examples
/// ```
/// use grid_fill::mesh::{Mesh, VertexClass};
/// use grid_fill::Vec2;
///
/// let mesh = Mesh {
///     vertices: vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)],
///     classes: vec![VertexClass::Boundary; 4],
///     faces: vec![vec![0, 1, 2, 3]],
/// };
/// assert_eq!(mesh.quad_count(), 1);
/// assert!((mesh.area() - 1.0).abs() < 1e-12);
/// assert!(mesh.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    /// Vertex positions in the input plane
    pub vertices: Vec<Vec2>,
    /// Class of each vertex, parallel to `vertices`
    pub classes: Vec<VertexClass>,
    /// Counter-clockwise faces of three or more vertex indices
    pub faces: Vec<Vec<u32>>,
}

impl Mesh {
    /// Builds the mesh from a network and the faces resolved over it.
    ///
    /// Network vertex ids become mesh indices unchanged.
    pub fn from_network(network: &EdgeNetwork, faces: Vec<Vec<usize>>) -> Self {
        let vertices = network.vertices.iter().map(|v| v.position).collect();
        let classes = network
            .vertices
            .iter()
            .map(|v| {
                if v.kind.is_interior() {
                    VertexClass::Interior
                } else {
                    VertexClass::Boundary
                }
            })
            .collect();
        let faces = faces
            .into_iter()
            .map(|face| face.into_iter().map(|v| v as u32).collect())
            .collect();
        Self {
            vertices,
            classes,
            faces,
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of four-sided faces.
    pub fn quad_count(&self) -> usize {
        self.faces.iter().filter(|f| f.len() == 4).count()
    }

    /// Number of three-sided faces.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().filter(|f| f.len() == 3).count()
    }

    /// Number of vertices classed [`VertexClass::Interior`].
    pub fn interior_vertex_count(&self) -> usize {
        self.classes
            .iter()
            .filter(|&&c| c == VertexClass::Interior)
            .count()
    }

    /// Number of vertices classed [`VertexClass::Boundary`].
    pub fn boundary_vertex_count(&self) -> usize {
        self.classes
            .iter()
            .filter(|&&c| c == VertexClass::Boundary)
            .count()
    }

    /// Signed area of one face; positive for counter-clockwise faces.
    pub fn face_area(&self, face: usize) -> f64 {
        let points: Vec<Vec2> = self.faces[face]
            .iter()
            .map(|&v| self.vertices[v as usize])
            .collect();
        signed_area(&points)
    }

    /// Sum of the signed face areas.
    pub fn area(&self) -> f64 {
        (0..self.faces.len()).map(|f| self.face_area(f)).sum()
    }

    /// How many faces use each undirected edge, keyed `(low, high)`.
    pub fn edge_use_counts(&self) -> BTreeMap<(u32, u32), usize> {
        let mut counts = BTreeMap::new();
        for face in &self.faces {
            for (a, b) in face_edges(face) {
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Checks indices, face sizes and edge manifoldness.
    ///
    /// A directed edge used twice means two faces disagree on orientation;
    /// an undirected edge used by more than two faces is non-manifold.
    pub fn validate(&self) -> GridResult<()> {
        if self.classes.len() != self.vertices.len() {
            return Err(GridError::InvalidMesh(format!(
                "{} vertex classes for {} vertices",
                self.classes.len(),
                self.vertices.len()
            )));
        }

        let n = self.vertices.len();
        let mut directed: BTreeMap<(u32, u32), usize> = BTreeMap::new();
        for (idx, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(GridError::InvalidMesh(format!(
                    "face {} has {} vertices",
                    idx,
                    face.len()
                )));
            }
            if let Some(&v) = face.iter().find(|&&v| v as usize >= n) {
                return Err(GridError::InvalidMesh(format!(
                    "face {} references vertex {} of {}",
                    idx, v, n
                )));
            }
            let mut ids = face.clone();
            ids.sort_unstable();
            if ids.windows(2).any(|w| w[0] == w[1]) {
                return Err(GridError::InvalidMesh(format!(
                    "face {} repeats a vertex",
                    idx
                )));
            }
            for edge in face_edges(face) {
                if let Some(other) = directed.insert(edge, idx) {
                    return Err(GridError::InvalidMesh(format!(
                        "faces {} and {} both use edge {} -> {}",
                        other, idx, edge.0, edge.1
                    )));
                }
            }
        }

        if let Some(((a, b), uses)) = self.edge_use_counts().into_iter().find(|&(_, c)| c > 2) {
            return Err(GridError::InvalidMesh(format!(
                "edge {}-{} is shared by {} faces",
                a, b, uses
            )));
        }
        Ok(())
    }

    /// Exports flat buffers at height `z`.
    ///
    /// Quads are split along their shorter diagonal; larger faces are fanned
    /// from their first vertex.
    ///
    /// # Examples
    /// ```
    /// use grid_fill::mesh::{Mesh, VertexClass};
    /// use grid_fill::Vec2;
    ///
    /// let mesh = Mesh {
    ///     vertices: vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)],
    ///     classes: vec![VertexClass::Interior; 4],
    ///     faces: vec![vec![0, 1, 2, 3]],
    /// };
    /// let buffers = mesh.to_buffers(0.0);
    /// assert_eq!(buffers.vertex_count(), 4);
    /// assert_eq!(buffers.triangle_count(), 2);
    /// ```
    pub fn to_buffers(&self, z: f32) -> MeshBuffers {
        let mut buffers = MeshBuffers::new();

        for p in &self.vertices {
            buffers.vertices.extend_from_slice(&[p.x as f32, p.y as f32, z]);
        }

        for face in &self.faces {
            match face.as_slice() {
                &[a, b, c, d] => {
                    let pos = |v: u32| self.vertices[v as usize];
                    let ac = pos(a).distance_squared(pos(c));
                    let bd = pos(b).distance_squared(pos(d));
                    if ac <= bd {
                        buffers.indices.extend_from_slice(&[a, b, c, a, c, d]);
                    } else {
                        buffers.indices.extend_from_slice(&[a, b, d, b, c, d]);
                    }
                }
                _ => {
                    for k in 1..face.len().saturating_sub(1) {
                        buffers.indices.extend_from_slice(&[face[0], face[k], face[k + 1]]);
                    }
                }
            }
        }

        buffers
    }
}

fn face_edges(face: &[u32]) -> impl Iterator<Item = (u32, u32)> + '_ {
    (0..face.len()).map(move |k| (face[k], face[(k + 1) % face.len()]))
}

// =============================================================================
// BUFFER EXPORT
// =============================================================================

/// Flat buffers for GPU upload.
///
/// Positions are `[x, y, z, x, y, z, ...]` in `f32`; indices list one
/// counter-clockwise triangle per three entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshBuffers {
    /// Vertex positions as flat array.
    pub vertices: Vec<f32>,

    /// Triangle indices as flat array.
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Creates empty mesh buffers.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Default for MeshBuffers {
    fn default() -> Self {
        Self::new()
    }
}
