use super::*;
use approx::assert_relative_eq;

fn precision() -> Precision {
    Precision::new(1.0e-9, 1.0e-7)
}

fn edge(a: [f64; 2], b: [f64; 2]) -> BoundaryEdge {
    [a, b].into()
}

fn square_edges() -> Vec<BoundaryEdge> {
    vec![
        edge([0.0, 0.0], [1.0, 0.0]),
        edge([1.0, 1.0], [1.0, 0.0]),
        edge([0.0, 1.0], [1.0, 1.0]),
        edge([0.0, 0.0], [0.0, 1.0]),
    ]
}

// =============================================================================
// LOOP CONSTRUCTION
// =============================================================================

#[test]
fn test_unordered_mixed_direction_edges_form_loop() {
    let (boundary, diagnostics) = extract_boundary_loop(&square_edges(), &precision()).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(boundary.len(), 4);
    assert_relative_eq!(boundary.area(), 1.0);
    assert_relative_eq!(boundary.perimeter(), 4.0);
    assert!(boundary.signed_area() > 0.0);
}

#[test]
fn test_walk_starts_at_first_edge() {
    let (boundary, _) = extract_boundary_loop(&square_edges(), &precision()).unwrap();
    // First edge runs (0,0) → (1,0), which is already counter-clockwise.
    assert_eq!(boundary.points()[0], Vec2::new(0.0, 0.0));
    assert_eq!(boundary.points()[1], Vec2::new(1.0, 0.0));
    assert_eq!(boundary.source_winding(), Winding::CounterClockwise);
}

#[test]
fn test_clockwise_input_is_normalized() {
    let edges = vec![
        edge([0.0, 0.0], [0.0, 1.0]),
        edge([0.0, 1.0], [1.0, 1.0]),
        edge([1.0, 1.0], [1.0, 0.0]),
        edge([1.0, 0.0], [0.0, 0.0]),
    ];
    let (boundary, _) = extract_boundary_loop(&edges, &precision()).unwrap();
    assert_eq!(boundary.source_winding(), Winding::Clockwise);
    assert_relative_eq!(boundary.signed_area(), 1.0);
}

#[test]
fn test_bounds_and_edges() {
    let (boundary, _) = extract_boundary_loop(&square_edges(), &precision()).unwrap();
    assert_eq!(boundary.bounds(), (Vec2::ZERO, Vec2::ONE));
    let edges: Vec<_> = boundary.edges().collect();
    assert_eq!(edges.len(), 4);
    assert_eq!(edges[3].1, boundary.points()[0]);
}

// =============================================================================
// RECOVERABLE DEFECTS
// =============================================================================

#[test]
fn test_zero_length_edge_is_skipped_with_diagnostic() {
    let mut edges = square_edges();
    edges.insert(2, edge([1.0, 1.0], [1.0, 1.0 + 1.0e-9]));
    let (boundary, diagnostics) = extract_boundary_loop(&edges, &precision()).unwrap();
    assert_eq!(boundary.len(), 4);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].stage, Stage::Extract);
    assert!(matches!(diagnostics[0].error, GridError::DegenerateEdge { edge: 2, .. }));
}

#[test]
fn test_repeated_edges_collapse() {
    let mut edges = square_edges();
    edges.push(edge([1.0, 0.0], [0.0, 0.0]));
    let (boundary, diagnostics) = extract_boundary_loop(&edges, &precision()).unwrap();
    assert_eq!(boundary.len(), 4);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_near_coincident_endpoints_share_a_vertex() {
    let mut edges = square_edges();
    edges[1] = edge([1.0, 1.0], [1.0 + 1.0e-9, 0.0]);
    let (boundary, _) = extract_boundary_loop(&edges, &precision()).unwrap();
    assert_eq!(boundary.len(), 4);
}

// =============================================================================
// FATAL DEFECTS
// =============================================================================

#[test]
fn test_back_and_forth_edge_is_malformed() {
    let edges = vec![edge([0.0, 0.0], [1.0, 0.0]), edge([1.0, 0.0], [0.0, 0.0])];
    let err = extract_boundary_loop(&edges, &precision()).unwrap_err();
    assert!(matches!(err, GridError::MalformedBoundary(_)));
}

#[test]
fn test_empty_input_is_malformed() {
    let err = extract_boundary_loop(&[], &precision()).unwrap_err();
    assert!(matches!(err, GridError::MalformedBoundary(ref msg) if msg.contains("no non-degenerate")));
}

#[test]
fn test_open_chain_is_malformed() {
    let mut edges = square_edges();
    edges.pop();
    let err = extract_boundary_loop(&edges, &precision()).unwrap_err();
    assert!(matches!(err, GridError::MalformedBoundary(ref msg) if msg.contains("open chain")));
}

#[test]
fn test_branching_vertex_is_malformed() {
    let mut edges = square_edges();
    edges.push(edge([0.0, 0.0], [1.0, 1.0]));
    let err = extract_boundary_loop(&edges, &precision()).unwrap_err();
    assert!(matches!(err, GridError::MalformedBoundary(ref msg) if msg.contains("branching")));
}

#[test]
fn test_two_loops_are_malformed() {
    let mut edges = square_edges();
    edges.extend([
        edge([3.0, 0.0], [4.0, 0.0]),
        edge([4.0, 0.0], [4.0, 1.0]),
        edge([4.0, 1.0], [3.0, 0.0]),
    ]);
    let err = extract_boundary_loop(&edges, &precision()).unwrap_err();
    assert!(matches!(err, GridError::MalformedBoundary(ref msg) if msg.contains("more than one loop")));
}

#[test]
fn test_zero_area_loop_is_malformed() {
    let edges = vec![
        edge([0.0, 0.0], [1.0, 0.0]),
        edge([1.0, 0.0], [2.0, 0.0]),
        edge([2.0, 0.0], [0.0, 0.0]),
    ];
    let err = extract_boundary_loop(&edges, &precision()).unwrap_err();
    assert!(matches!(err, GridError::MalformedBoundary(ref msg) if msg.contains("zero area")));
}

#[test]
fn test_non_finite_coordinate_is_malformed() {
    let mut edges = square_edges();
    edges[0].end = Vec2::new(f64::NAN, 0.0);
    assert!(extract_boundary_loop(&edges, &precision()).is_err());
}

// =============================================================================
// POLYGON INPUT
// =============================================================================

#[test]
fn test_polygon_input_closes_implicitly() {
    let points = [Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0)];
    let (boundary, diagnostics) = extract_boundary_from_polygon(&points, &precision()).unwrap();
    assert_eq!(boundary.len(), 3);
    assert!(diagnostics.is_empty());
    assert_relative_eq!(boundary.area(), 2.0);
}

#[test]
fn test_polygon_with_two_points_is_malformed() {
    let points = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
    let err = extract_boundary_from_polygon(&points, &precision()).unwrap_err();
    assert!(matches!(err, GridError::MalformedBoundary(_)));
}

#[test]
fn test_loop_rejects_coincident_neighbors() {
    let points = vec![Vec2::ZERO, Vec2::X, Vec2::X, Vec2::Y];
    assert!(BoundaryLoop::new(points, &precision()).is_err());
}

// =============================================================================
// SIMPLICITY
// =============================================================================

fn loop_of(points: &[[f64; 2]]) -> GridResult<BoundaryLoop> {
    BoundaryLoop::new(points.iter().map(|&p| Vec2::from_array(p)).collect(), &precision())
}

fn intersects_itself(result: GridResult<BoundaryLoop>) -> bool {
    matches!(result, Err(GridError::MalformedBoundary(ref msg)) if msg.contains("intersects itself"))
}

#[test]
fn test_crossing_edges_are_malformed() {
    let err = loop_of(&[[0.0, 0.0], [4.0, 4.0], [4.0, 0.0], [0.0, 2.0]]).unwrap_err();
    // Edges (0,0)-(4,4) and (4,0)-(0,2) cross at (4/3, 4/3).
    match err {
        GridError::MalformedBoundary(msg) => {
            assert!(msg.starts_with("loop intersects itself at (1.333"), "{}", msg)
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_crossed_edges_are_rejected_during_extraction() {
    let edges = vec![
        edge([0.0, 0.0], [4.0, 4.0]),
        edge([4.0, 4.0], [4.0, 0.0]),
        edge([4.0, 0.0], [0.0, 2.0]),
        edge([0.0, 2.0], [0.0, 0.0]),
    ];
    assert!(intersects_itself(
        extract_boundary_loop(&edges, &precision()).map(|(boundary, _)| boundary)
    ));
}

#[test]
fn test_vertex_touching_another_edge_is_malformed() {
    // (2,0) sits on the edge (0,0)-(4,0) two steps away.
    assert!(intersects_itself(loop_of(&[
        [0.0, 0.0],
        [4.0, 0.0],
        [4.0, 3.0],
        [2.0, 0.0],
        [0.0, 3.0],
    ])));
}

#[test]
fn test_spike_folding_back_is_malformed() {
    // The top edge runs out to (3,2) and straight back along itself.
    assert!(intersects_itself(loop_of(&[
        [0.0, 0.0],
        [2.0, 0.0],
        [2.0, 2.0],
        [3.0, 2.0],
        [1.0, 2.0],
        [0.0, 2.0],
    ])));
}

#[test]
fn test_collinear_overlap_is_malformed() {
    // Two separated edges share the stretch y=0, 1 <= x <= 2.
    assert!(intersects_itself(loop_of(&[
        [0.0, 0.0],
        [2.0, 0.0],
        [2.0, 1.0],
        [1.5, 1.0],
        [1.0, 0.0],
        [3.0, 0.0],
        [3.0, 2.0],
        [0.0, 2.0],
    ])));
}

#[test]
fn test_concave_simple_loop_is_accepted() {
    let boundary = loop_of(&[
        [0.0, 0.0],
        [4.0, 0.0],
        [4.0, 2.0],
        [2.0, 2.0],
        [2.0, 4.0],
        [0.0, 4.0],
    ])
    .unwrap();
    assert_relative_eq!(boundary.area(), 12.0);
}

#[test]
fn test_straight_run_through_a_vertex_is_accepted() {
    let boundary = loop_of(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0]]).unwrap();
    assert_eq!(boundary.len(), 5);
}
