//! Volume Tests - Decomposition, Mass Allocation and Slicing
//!
//! Tests for the volume module through the public API: cell decompositions,
//! composed inertia and waterline slicing.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use glam::DVec3;
use sail_physics::physics::Plane;
use sail_physics::volume::{
    CellShape, SliceResult, Tetrahedron, VolumeCell, allocate_mass, overall_inertia, slice_with_plane, volume_below,
};

fn box_cell(dx: f64, dy: f64, dz: f64) -> VolumeCell {
    VolumeCell::new(vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(dx, 0.0, 0.0),
        DVec3::new(dx, dy, 0.0),
        DVec3::new(0.0, dy, 0.0),
        DVec3::new(0.0, 0.0, dz),
        DVec3::new(dx, 0.0, dz),
        DVec3::new(dx, dy, dz),
        DVec3::new(0.0, dy, dz),
    ])
    .unwrap()
}

// ============================================================================
// Primitive Tests
// ============================================================================

#[test]
fn test_unit_right_tetrahedron() {
    let t = Tetrahedron::new(DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z);
    assert_abs_diff_eq!(t.volume(), 1.0 / 6.0, epsilon = 1e-12);
    assert!(t.centroid().abs_diff_eq(DVec3::splat(0.25), 1e-12));
}

#[test]
fn test_box_decomposition() {
    let cell = box_cell(2.0, 3.0, 0.5);
    assert_eq!(cell.shape(), CellShape::Hexahedron);
    assert_eq!(cell.tetrahedra().len(), 5);
    assert_abs_diff_eq!(cell.volume(), 3.0, epsilon = 1e-12);
    assert!(cell.centroid().abs_diff_eq(DVec3::new(1.0, 1.5, 0.25), 1e-12));

    let summed: f64 = cell.tetrahedra().iter().map(Tetrahedron::volume).sum();
    assert_abs_diff_eq!(summed, cell.volume(), epsilon = 1e-12);
}

#[test]
fn test_unsupported_vertex_count() {
    assert!(VolumeCell::new(vec![DVec3::ZERO; 7]).is_none());
    assert!(VolumeCell::new(vec![DVec3::ZERO; 3]).is_none());
}

#[test]
fn test_mirrored_hull_half() {
    let half = box_cell(1.0, 1.0, 1.0);
    let plane = Plane::new(DVec3::X, 0.0);
    let other = half.mirrored(&plane);

    assert_abs_diff_eq!(other.volume(), half.volume(), epsilon = 1e-12);
    assert!(other.centroid().abs_diff_eq(DVec3::new(-0.5, 0.5, 0.5), 1e-12));
    let centroid = other.centroid();
    for [a, b, c] in other.faces() {
        assert!((b - a).cross(c - a).dot(a - centroid) > 0.0);
    }
}

// ============================================================================
// Mass Tests
// ============================================================================

#[test]
fn test_hull_mass_properties() {
    // Two mirrored half-hull boxes with a heavier keel box below.
    let half = box_cell(1.0, 4.0, 1.0);
    let other = half.mirrored(&Plane::new(DVec3::X, 0.0));
    let keel = VolumeCell::new(
        box_cell(0.2, 1.0, 1.0)
            .vertices()
            .iter()
            .map(|v| *v + DVec3::new(-0.1, 1.5, -1.0))
            .collect(),
    )
    .unwrap()
    .with_mass_distribution(20.0);

    let mut cells = vec![half, other, keel];
    allocate_mass(&mut cells, Some(1200.0));

    // Weights 4, 4 and 0.2 * 20 = 4: equal shares.
    for cell in &cells {
        assert_relative_eq!(cell.mass.unwrap(), 400.0, max_relative = 1e-12);
    }

    let props = overall_inertia(&cells);
    assert_relative_eq!(props.mass, 1200.0, max_relative = 1e-12);
    assert_abs_diff_eq!(props.center_of_mass.x, 0.0, epsilon = 1e-9);
    // Keel pulls the center of mass down from z = 0.5.
    assert_abs_diff_eq!(props.center_of_mass.z, (0.5 + 0.5 - 0.5) / 3.0, epsilon = 1e-9);
    assert!(props.inertia.abs_diff_eq(props.inertia.transpose(), 1e-9));
}

// ============================================================================
// Slicing Tests
// ============================================================================

#[test]
fn test_slice_conserves_volume_and_mass() {
    let t = Tetrahedron::new(
        DVec3::new(-1.0, -1.0, -1.0),
        DVec3::new(2.0, 0.0, -0.5),
        DVec3::new(0.0, 2.0, 0.2),
        DVec3::new(0.3, 0.1, 1.5),
    )
    .with_mass(10.0);
    let waterline = Plane::from_point_normal(DVec3::ZERO, DVec3::Z);

    let SliceResult::Split { above, below } = slice_with_plane(&t, &waterline, true, true) else {
        panic!("waterline should cut the tetrahedron");
    };
    let volume: f64 = above.iter().chain(&below).map(Tetrahedron::volume).sum();
    assert_abs_diff_eq!(volume, t.volume(), epsilon = 1e-12);

    let mass: f64 = above.iter().chain(&below).map(Tetrahedron::mass_or_zero).sum();
    assert_abs_diff_eq!(mass, 10.0, epsilon = 1e-9);

    for piece in &below {
        for v in piece.vertices {
            assert!(v.z <= 1e-9);
        }
    }
}

#[test]
fn test_no_intersection_vs_empty_side() {
    let t = Tetrahedron::new(DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z);
    let below_all = Plane::from_point_normal(DVec3::new(0.0, 0.0, -1.0), DVec3::Z);
    assert_eq!(slice_with_plane(&t, &below_all, true, true), SliceResult::NoIntersection);

    let cut = Plane::from_point_normal(DVec3::new(0.0, 0.0, 0.5), DVec3::Z);
    match slice_with_plane(&t, &cut, true, false) {
        SliceResult::Split { above, below } => {
            assert_eq!(above.len(), 1);
            assert!(below.is_empty());
        }
        SliceResult::NoIntersection => panic!("expected a split"),
    }
}

#[test]
fn test_displaced_volume_of_box() {
    let cell = box_cell(2.0, 1.0, 1.0);
    let waterline = Plane::from_point_normal(DVec3::new(0.0, 0.0, 0.3), DVec3::Z);
    let displaced: f64 = cell.tetrahedra().iter().map(|t| volume_below(t, &waterline)).sum();
    assert_abs_diff_eq!(displaced, 0.6, epsilon = 1e-12);
}
