//! Unit tests for the radius-to-box conversion.
//!
//! Run with: cargo test --test geo_unit_test

use sensor_registry::services::geo::{radius_to_degrees, BoundingBox, KM_PER_DEGREE};

#[test]
fn radius_converts_at_fixed_rate() {
    assert_eq!(radius_to_degrees(0.0), 0.0);
    assert_eq!(radius_to_degrees(KM_PER_DEGREE), 1.0);
    assert!((radius_to_degrees(55.56) - 0.5).abs() < 1e-12);
}

#[test]
fn box_is_symmetric_around_centre() {
    let b = BoundingBox::around(41.0, 2.0, KM_PER_DEGREE);
    assert_eq!(b.lat_min, 40.0);
    assert_eq!(b.lat_max, 42.0);
    assert_eq!(b.lon_min, 1.0);
    assert_eq!(b.lon_max, 3.0);
}

#[test]
fn box_edges_are_inclusive() {
    let b = BoundingBox::around(41.0, 2.0, KM_PER_DEGREE);
    assert!(b.contains(40.0, 1.0));
    assert!(b.contains(42.0, 3.0));
    assert!(!b.contains(42.000_001, 2.0));
    assert!(!b.contains(41.0, 0.999_999));
}

#[test]
fn zero_radius_matches_only_the_centre() {
    let b = BoundingBox::around(-33.5, 151.25, 0.0);
    assert!(b.contains(-33.5, 151.25));
    assert!(!b.contains(-33.5, 151.250_001));
}

#[test]
fn box_corner_is_kept_outside_the_circle() {
    // Square, not a circle: the corner lies ~1.41 radii away but still matches
    let b = BoundingBox::around(0.0, 0.0, KM_PER_DEGREE);
    assert!(b.contains(1.0, 1.0));
}
