//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON_TOLERANCE > 0.0, "EPSILON_TOLERANCE must be positive");
}

#[test]
fn test_epsilon_is_small() {
    assert!(EPSILON_TOLERANCE < 1e-6, "EPSILON_TOLERANCE should be small for precision");
}

#[test]
fn test_quantization_ratio_is_fine() {
    // One quantum must be far below one lattice step
    assert!(QUANTIZATION_RATIO > 0.0);
    assert!(QUANTIZATION_RATIO <= 1e-4);
}

// =============================================================================
// GRID DEFAULT TESTS
// =============================================================================

#[test]
fn test_default_spacing_is_one_millimetre() {
    assert_eq!(DEFAULT_SPACING, 0.001);
    assert!(DEFAULT_SPACING > EPSILON_TOLERANCE);
}

#[test]
fn test_fan_search_radius_at_least_one_ring() {
    assert!(DEFAULT_FAN_SEARCH_RADIUS >= 1);
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_max_lattice_points_reasonable() {
    // Should allow dense fills but prevent memory exhaustion
    assert!(MAX_LATTICE_POINTS >= 1_000_000);
    assert!(SCANLINE_WORK_THRESHOLD < MAX_LATTICE_POINTS);
}
