//! Grid fill for planar outlines
//!
//! This crate fills a closed planar polygon with an axis-aligned square grid.
//! Interior lattice points are joined into quads, and the ring between the
//! lattice and the outline is closed with triangle fans, so the result keeps
//! the exact outline while its inside stays perfectly regular.
//!
//! ## Pipeline
//!
//! ```text
//! boundary edges ─→ boundary ─→ intersect ─→ sample ─→ network ─→ fill ─→ Mesh
//! ```
//!
//! Each stage lives in its own module and can be run on its own; the
//! [`generate_grid`] family runs them all and collects diagnostics.
//!
//! ## Example
//!
//! ```rust
//! use grid_fill::{generate_grid, BoundaryEdge, Vec2};
//!
//! let corners = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
//! let edges: Vec<BoundaryEdge> = (0..4).map(|k| BoundaryEdge::new(corners[k], corners[(k + 1) % 4])).collect();
//!
//! let outcome = generate_grid(&edges, 0.5).unwrap();
//! assert_eq!(outcome.mesh.interior_vertex_count(), 1);
//! assert_eq!(outcome.mesh.boundary_vertex_count(), 8);
//! assert!((outcome.mesh.area() - 1.0).abs() < 1e-12);
//! ```

pub mod boundary;
pub mod config;
pub mod core;
pub mod error;
pub mod fill;
pub mod intersect;
pub mod mesh;
pub mod network;
pub mod pipeline;
pub mod sample;

pub use crate::boundary::BoundaryEdge;
pub use crate::config::{GridOptions, SamplingStrategy};
pub use crate::core::Vec2;
pub use crate::error::{Diagnostic, GridError, GridResult, Stage};
pub use crate::mesh::{Mesh, MeshBuffers, VertexClass};
pub use crate::pipeline::{
    generate_grid, generate_grid_from_polygon, generate_grid_gated, generate_grid_with,
    GridOutcome, GridStats,
};
