//! End-to-end grid fills of small outlines with known topology.

use approx::assert_relative_eq;
use grid_fill::{
    generate_grid, generate_grid_from_polygon, generate_grid_with, BoundaryEdge, GridError,
    GridOptions, Mesh, VertexClass, Vec2,
};

fn loop_edges(points: &[[f64; 2]]) -> Vec<BoundaryEdge> {
    (0..points.len())
        .map(|k| BoundaryEdge::from([points[k], points[(k + 1) % points.len()]]))
        .collect()
}

fn positions_of(mesh: &Mesh, class: VertexClass) -> Vec<Vec2> {
    mesh.vertices
        .iter()
        .zip(&mesh.classes)
        .filter(|&(_, &c)| c == class)
        .map(|(&p, _)| p)
        .collect()
}

#[test]
fn unit_square_at_half_spacing() {
    let edges = loop_edges(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    let outcome = generate_grid(&edges, 0.5).unwrap();
    let mesh = &outcome.mesh;

    assert_eq!(positions_of(mesh, VertexClass::Interior), vec![Vec2::new(0.5, 0.5)]);
    assert_eq!(mesh.boundary_vertex_count(), 8);
    assert_eq!(mesh.triangle_count(), 8);
    assert_eq!(mesh.quad_count(), 0);
    assert_relative_eq!(mesh.area(), 1.0, epsilon = 1e-12);
    assert!(outcome.diagnostics.is_empty());
    assert!(mesh.validate().is_ok());
}

#[test]
fn triangle_with_lattice_point_on_hypotenuse() {
    let edges = loop_edges(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]]);
    let outcome = generate_grid(&edges, 1.0).unwrap();
    let mesh = &outcome.mesh;

    assert_eq!(mesh.interior_vertex_count(), 0);
    assert_eq!(mesh.boundary_vertex_count(), 6);
    assert!(positions_of(mesh, VertexClass::Boundary).contains(&Vec2::new(1.0, 1.0)));
    assert_eq!(mesh.triangle_count(), 4);
    assert_relative_eq!(mesh.area(), 2.0, epsilon = 1e-12);
    assert!(mesh.validate().is_ok());
}

#[test]
fn doubled_segment_is_malformed() {
    let edges = vec![
        BoundaryEdge::from([[0.0, 0.0], [1.0, 0.0]]),
        BoundaryEdge::from([[1.0, 0.0], [0.0, 0.0]]),
    ];
    assert!(matches!(generate_grid(&edges, 0.5), Err(GridError::MalformedBoundary(_))));
}

#[test]
fn two_point_polygon_is_malformed() {
    let points = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)];
    let result = generate_grid_from_polygon(&points, 0.5, &GridOptions::default());
    assert!(matches!(result, Err(GridError::MalformedBoundary(_))));
}

#[test]
fn crossed_quadrilateral_is_malformed() {
    let corners = [[0.0, 0.0], [4.0, 4.0], [4.0, 0.0], [0.0, 2.0]];
    let err = generate_grid(&loop_edges(&corners), 0.5).unwrap_err();
    assert!(
        matches!(err, GridError::MalformedBoundary(ref msg) if msg.contains("intersects itself")),
        "{:?}",
        err
    );

    let points: Vec<Vec2> = corners.iter().map(|&p| Vec2::from_array(p)).collect();
    let result = generate_grid_from_polygon(&points, 0.5, &GridOptions::default());
    assert!(matches!(result, Err(GridError::MalformedBoundary(_))));
}

#[test]
fn spacing_larger_than_the_shape() {
    let edges = loop_edges(&[[0.2, 0.2], [0.8, 0.2], [0.8, 0.8], [0.2, 0.8]]);
    let outcome = generate_grid(&edges, 5.0).unwrap();
    let mesh = &outcome.mesh;

    assert_eq!(mesh.interior_vertex_count(), 0);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert_relative_eq!(mesh.area(), 0.36, epsilon = 1e-12);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn four_by_four_square() {
    let edges = loop_edges(&[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]);
    let outcome = generate_grid(&edges, 1.0).unwrap();

    assert_eq!(outcome.stats.interior_vertices, 9);
    assert_eq!(outcome.stats.boundary_vertices, 16);
    assert_eq!(outcome.stats.lattice_edges, 12);
    assert_eq!(outcome.stats.quads, 4);
    assert_eq!(outcome.stats.triangles, 24);
    assert_relative_eq!(outcome.mesh.area(), 16.0, epsilon = 1e-9);
    assert!(outcome.mesh.validate().is_ok());
}

#[test]
fn l_shape_has_no_quads() {
    let edges = loop_edges(&[
        [0.0, 0.0],
        [4.0, 0.0],
        [4.0, 2.0],
        [2.0, 2.0],
        [2.0, 4.0],
        [0.0, 4.0],
    ]);
    let outcome = generate_grid(&edges, 1.0).unwrap();
    let mesh = &outcome.mesh;

    assert_eq!(mesh.interior_vertex_count(), 5);
    assert_eq!(mesh.quad_count(), 0);
    assert_relative_eq!(mesh.area(), 12.0, epsilon = 1e-9);
    for face in &mesh.faces {
        assert!(face
            .iter()
            .any(|&v| mesh.classes[v as usize] == VertexClass::Boundary));
    }
    assert!(mesh.validate().is_ok());
}

#[test]
fn shifted_square_drops_its_corners_by_default() {
    let edges = loop_edges(&[[0.25, 0.25], [2.75, 0.25], [2.75, 2.75], [0.25, 2.75]]);
    let outcome = generate_grid(&edges, 1.0).unwrap();
    let mesh = &outcome.mesh;

    // Two crossings per side; each corner is cut by a chord.
    assert_eq!(mesh.boundary_vertex_count(), 8);
    assert!(!positions_of(mesh, VertexClass::Boundary).contains(&Vec2::new(0.25, 0.25)));
    assert_eq!(mesh.interior_vertex_count(), 4);
    assert_eq!(mesh.quad_count(), 1);
    assert_eq!(mesh.triangle_count(), 12);
    assert_relative_eq!(mesh.area(), 6.25 - 4.0 * 0.28125, epsilon = 1e-9);
    assert!(outcome.diagnostics.is_empty());
    assert!(mesh.validate().is_ok());
}

#[test]
fn shifted_square_keeps_its_corners() {
    let edges = loop_edges(&[[0.25, 0.25], [2.75, 0.25], [2.75, 2.75], [0.25, 2.75]]);
    let options = GridOptions::default().with_preserve_corners(true);
    let outcome = generate_grid_with(&edges, 1.0, &options).unwrap();
    let mesh = &outcome.mesh;

    // Corners plus two crossings per side.
    assert_eq!(mesh.boundary_vertex_count(), 12);
    assert_eq!(mesh.interior_vertex_count(), 4);
    assert_eq!(mesh.quad_count(), 1);
    assert_relative_eq!(mesh.area(), 6.25, epsilon = 1e-9);
    assert!(positions_of(mesh, VertexClass::Boundary).contains(&Vec2::new(0.25, 0.25)));
}

#[test]
fn narrow_prong_without_spokes_is_still_filled() {
    // The left prong holds no lattice point and its right side only sees
    // lattice points across the slot.
    let edges = loop_edges(&[
        [1.1, 0.5],
        [4.9, 0.5],
        [4.9, 5.5],
        [2.1, 5.5],
        [2.1, 1.5],
        [1.9, 1.5],
        [1.9, 5.5],
        [1.1, 5.5],
    ]);
    let options = GridOptions::default().with_preserve_corners(true);
    let outcome = generate_grid_with(&edges, 1.0, &options).unwrap();

    let fans = outcome
        .diagnostics
        .iter()
        .filter(|d| matches!(d.error, GridError::UnresolvableFan { .. }))
        .count();
    assert_eq!(fans, 0);
    assert!(!outcome.has_partial_failures());
    assert_relative_eq!(outcome.mesh.area(), 18.2, epsilon = 1e-9);
    assert!(outcome.mesh.validate().is_ok());
}

#[test]
fn dense_lattice_is_rejected() {
    let edges = loop_edges(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]);
    let options = GridOptions::default().with_max_lattice_points(50_000);
    let err = generate_grid_with(&edges, 0.01, &options).unwrap_err();
    assert!(matches!(err, GridError::LatticeTooDense { limit: 50_000, .. }));
}
