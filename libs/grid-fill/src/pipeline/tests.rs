use super::*;
use crate::config::SamplingStrategy;
use approx::assert_relative_eq;

fn loop_edges(points: &[[f64; 2]]) -> Vec<BoundaryEdge> {
    (0..points.len())
        .map(|k| BoundaryEdge::from([points[k], points[(k + 1) % points.len()]]))
        .collect()
}

fn unit_square() -> Vec<BoundaryEdge> {
    loop_edges(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
}

// =============================================================================
// OUTCOME
// =============================================================================

#[test]
fn test_stats_match_mesh() {
    let outcome = generate_grid(&unit_square(), 0.5).unwrap();
    let stats = outcome.stats;
    assert_eq!(stats.boundary_vertices, 8);
    assert_eq!(stats.interior_vertices, 1);
    assert_eq!(stats.outline_edges, 8);
    assert_eq!(stats.spoke_edges, 8);
    assert_eq!(stats.lattice_edges, 0);
    assert_eq!(stats.triangles, 8);
    assert_eq!(stats.quads, 0);
    assert_eq!(stats.triangles + stats.quads, outcome.mesh.face_count());
    assert!(!outcome.has_partial_failures());
}

#[test]
fn test_summary_lines() {
    let mut outcome = generate_grid(&unit_square(), 0.5).unwrap();
    assert_eq!(outcome.summary(), None);

    outcome.diagnostics.push(Diagnostic::new(
        Stage::Extract,
        GridError::DegenerateEdge { edge: 0, x: 0.0, y: 0.0 },
    ));
    assert_eq!(outcome.summary().as_deref(), Some("1 boundary issues were repaired"));
    assert!(!outcome.has_partial_failures());

    for _ in 0..3 {
        outcome.diagnostics.push(Diagnostic::new(
            Stage::Fill,
            GridError::UnfillableRegion {
                vertex_count: 4,
                reason: "stalled".to_string(),
            },
        ));
    }
    assert_eq!(outcome.summary().as_deref(), Some("3 boundary regions could not be filled"));
    assert!(outcome.has_partial_failures());
}

#[test]
fn test_polygon_entry_matches_edge_entry() {
    let points = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, 0.0),
    ];
    let from_points = generate_grid_from_polygon(&points, 0.5, &GridOptions::default()).unwrap();
    let from_edges = generate_grid(&unit_square(), 0.5).unwrap();
    assert_eq!(from_points, from_edges);
}

#[test]
fn test_clockwise_input_gives_counter_clockwise_faces() {
    let edges = loop_edges(&[[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0]]);
    let outcome = generate_grid(&edges, 0.5).unwrap();
    assert!((0..outcome.mesh.face_count()).all(|f| outcome.mesh.face_area(f) > 0.0));
    assert_relative_eq!(outcome.mesh.area(), 4.0, epsilon = 1e-9);
}

#[test]
fn test_degenerate_edge_is_reported_not_fatal() {
    let mut edges = unit_square();
    edges.push(BoundaryEdge::from([[1.0, 1.0], [1.0, 1.0]]));
    let outcome = generate_grid(&edges, 0.5).unwrap();
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].stage, Stage::Extract);
    assert!(matches!(outcome.diagnostics[0].error, GridError::DegenerateEdge { .. }));
    assert_relative_eq!(outcome.mesh.area(), 1.0, epsilon = 1e-9);
}

// =============================================================================
// FATAL ERRORS
// =============================================================================

#[test]
fn test_invalid_spacing() {
    for spacing in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = generate_grid(&unit_square(), spacing).unwrap_err();
        assert!(matches!(err, GridError::InvalidSpacing { .. }), "{:?}", err);
    }
}

#[test]
fn test_invalid_options() {
    let options = GridOptions::default().with_tolerance(-1.0);
    let err = generate_grid_with(&unit_square(), 0.5, &options).unwrap_err();
    assert!(matches!(err, GridError::InvalidConfig(_)));
}

#[test]
fn test_empty_input_is_malformed() {
    assert!(matches!(generate_grid(&[], 0.5), Err(GridError::MalformedBoundary(_))));
}

#[test]
fn test_lattice_limit_checked_before_sampling() {
    let options = GridOptions::default().with_max_lattice_points(1_000);
    let err = generate_grid_with(&unit_square(), 0.01, &options).unwrap_err();
    assert_eq!(err, GridError::LatticeTooDense { points: 101 * 101, limit: 1_000 });
}

// =============================================================================
// GATE
// =============================================================================

#[test]
fn test_gate_sees_every_stage_in_order() {
    let mut seen = Vec::new();
    let outcome = generate_grid_gated(&unit_square(), 0.5, &GridOptions::default(), |stage| {
        seen.push(stage);
        true
    });
    assert!(outcome.is_ok());
    assert_eq!(seen, Stage::ALL.to_vec());
}

#[test]
fn test_gate_aborts_at_each_stage() {
    for stage in Stage::ALL {
        let result = generate_grid_gated(&unit_square(), 0.5, &GridOptions::default(), |s| s != stage);
        assert_eq!(result, Err(GridError::Aborted { stage }));
    }
}

#[test]
fn test_gate_not_consulted_for_invalid_input() {
    let mut calls = 0;
    let result = generate_grid_gated(&unit_square(), -0.5, &GridOptions::default(), |_| {
        calls += 1;
        true
    });
    assert!(result.is_err());
    assert_eq!(calls, 0);
}

#[test]
fn test_strategies_give_identical_outcomes() {
    let edges = loop_edges(&[[0.1, 0.0], [3.7, 0.4], [3.2, 3.1], [1.8, 1.9], [0.2, 3.3]]);
    let base = GridOptions::default();
    let per_point = generate_grid_with(&edges, 0.35, &base.with_sampling(SamplingStrategy::PerPoint)).unwrap();
    let scanline = generate_grid_with(&edges, 0.35, &base.with_sampling(SamplingStrategy::Scanline)).unwrap();
    assert_eq!(per_point, scanline);
}
