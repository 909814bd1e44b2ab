use super::*;

#[test]
fn test_for_spacing_derives_quantum() {
    let precision = Precision::for_spacing(0.5, &GridOptions::default()).unwrap();
    assert_eq!(precision.epsilon, 1.0e-9);
    assert_eq!(precision.quantum, 0.5 * 1.0e-6);
}

#[test]
fn test_quantum_never_below_tolerance() {
    let opts = GridOptions::default().with_tolerance(1.0e-4);
    let precision = Precision::for_spacing(0.01, &opts).unwrap();
    assert_eq!(precision.quantum, 1.0e-4);
}

#[test]
fn test_invalid_spacing_rejected() {
    let opts = GridOptions::default();
    for spacing in [0.0, -1.0, f64::NAN, f64::INFINITY, 1.0e-12] {
        let err = Precision::for_spacing(spacing, &opts).unwrap_err();
        assert!(matches!(err, GridError::InvalidSpacing { .. }), "{spacing}");
    }
}

#[test]
fn test_key_rounds_to_quantum() {
    let precision = Precision::new(1.0e-9, 0.25);
    assert_eq!(precision.key(Vec2::new(0.5, -0.5)), PointKey(2, -2));
    assert_eq!(precision.key(Vec2::new(0.6, 0.1)), PointKey(2, 0));
}

#[test]
fn test_lattice_line_tolerance() {
    let precision = Precision::new(1.0e-9, 1.0e-6);
    assert_eq!(precision.lattice_line(0.0, 1.0), Some(0));
    assert_eq!(precision.lattice_line(-2.0000001, 1.0), Some(-2));
    assert_eq!(precision.lattice_line(0.3, 1.0), None);
}

#[test]
fn test_quantized_distance() {
    let precision = Precision::new(1.0e-9, 0.5);
    assert_eq!(precision.quantized_distance_sq(Vec2::ZERO, Vec2::new(1.0, 0.0)), 4);
    assert_eq!(precision.quantized_distance_sq(Vec2::ZERO, Vec2::new(1.0, 1.0)), 8);
}
