//! # Error Types
//!
//! Error types for the grid fill pipeline. Every failure is explicit and
//! carries enough context to locate the offending geometry.
//!
//! ## Error Policy
//!
//! - Fatal errors abort the call and no mesh is returned
//! - Recoverable errors are wrapped in a [`Diagnostic`] and returned next to a
//!   best-effort mesh
//! - Every recoverable error is also logged with `tracing::warn!`

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// PIPELINE STAGES
// =============================================================================

/// Pipeline stage that produced a diagnostic or where an abort happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    /// Boundary edges → ordered loop.
    Extract,
    /// Loop edges split at lattice lines.
    Intersect,
    /// Lattice point classification.
    Sample,
    /// Lattice, spoke and outline edges.
    Network,
    /// Face resolution.
    Fill,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 5] = [
        Stage::Extract,
        Stage::Intersect,
        Stage::Sample,
        Stage::Network,
        Stage::Fill,
    ];
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Extract => "boundary extraction",
            Stage::Intersect => "grid line intersection",
            Stage::Sample => "interior sampling",
            Stage::Network => "edge network",
            Stage::Fill => "face filling",
        };
        f.write_str(name)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while generating a grid fill.
///
/// ## Example
///
/// ```rust
/// use grid_fill::{generate_grid, GridError};
///
/// match generate_grid(&[], 0.5) {
///     Ok(outcome) => println!("{} faces", outcome.mesh.face_count()),
///     Err(GridError::MalformedBoundary(msg)) => eprintln!("bad outline: {}", msg),
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum GridError {
    /// Spacing is not finite or not larger than the tolerance.
    #[error("Invalid spacing: {spacing} (must be finite and greater than {epsilon})")]
    InvalidSpacing {
        /// Requested spacing
        spacing: f64,
        /// Tolerance it was compared against
        epsilon: f64,
    },

    /// The boundary edges do not form exactly one simple closed loop.
    #[error("Malformed boundary: {0}")]
    MalformedBoundary(String),

    /// The lattice over the outline's bounding box is too large to sample.
    #[error("Lattice too dense: {points} points exceeds the limit of {limit}")]
    LatticeTooDense {
        /// Lattice points inside the bounding box
        points: usize,
        /// Configured limit
        limit: usize,
    },

    /// Options rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The host gate stopped the pipeline before a stage started.
    #[error("Aborted before {stage}")]
    Aborted {
        /// Stage that was not started
        stage: Stage,
    },

    /// A mesh failed structural validation.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// A zero-length edge was skipped.
    #[error("Degenerate edge {edge} at ({x}, {y}) skipped")]
    DegenerateEdge {
        /// Index of the edge in its source sequence
        edge: usize,
        /// X coordinate of the collapsed edge
        x: f64,
        /// Y coordinate of the collapsed edge
        y: f64,
    },

    /// A boundary vertex found no spoke and the face around it was omitted.
    #[error("Unresolvable fan at boundary vertex {vertex} ({x}, {y})")]
    UnresolvableFan {
        /// Index of the vertex in the output mesh
        vertex: usize,
        /// X coordinate of the vertex
        x: f64,
        /// Y coordinate of the vertex
        y: f64,
    },

    /// A region of the edge network could not be closed into faces.
    #[error("Unfillable region of {vertex_count} vertices: {reason}")]
    UnfillableRegion {
        /// Vertices in the omitted region
        vertex_count: usize,
        /// Why the region was omitted
        reason: String,
    },
}

impl GridError {
    /// Whether the pipeline continues after this error.
    ///
    /// ```rust
    /// use grid_fill::GridError;
    ///
    /// let err = GridError::DegenerateEdge { edge: 2, x: 0.0, y: 0.0 };
    /// assert!(err.is_recoverable());
    /// assert!(!GridError::MalformedBoundary("open chain".into()).is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GridError::DegenerateEdge { .. }
                | GridError::UnresolvableFan { .. }
                | GridError::UnfillableRegion { .. }
        )
    }
}

// =============================================================================
// DIAGNOSTICS
// =============================================================================

/// A recoverable error tagged with the stage that raised it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Stage that raised the error
    pub stage: Stage,
    /// The recoverable error
    pub error: GridError,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(stage: Stage, error: GridError) -> Self {
        Self { stage, error }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.stage, self.error)
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for grid fill operations.
pub type GridResult<T> = Result<T, GridError>;

// =============================================================================
// TESTS
// =============================================================================
