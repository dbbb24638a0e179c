//! Dynamics Tests - Resultants, Transform History and the Body Tree
//!
//! Exercises the per-tick caller contract end to end: clear forces, push
//! transforms, add forces, read the resultant.

use std::f64::consts::FRAC_PI_2;

use approx::assert_abs_diff_eq;
use glam::{DMat3, DMat4, DQuat, DVec3};
use sail_physics::physics::{
    BodyTree, HingeLimits, Placement, Plane, Resultant, ResultantMode, RigidBody, Sphere, TransformHistory,
    WrenchConstraint,
};

// ============================================================================
// Resultant Tests
// ============================================================================

#[test]
fn test_resultant_round_trip() {
    let mut r = Resultant::from_force(DVec3::new(1.0, -2.0, 0.5), DVec3::new(3.0, 1.0, -1.0));
    r.add_force(DVec3::new(0.0, 4.0, 1.0), DVec3::new(-2.0, 0.0, 2.0));
    let original = r;

    r.move_application_point(DVec3::new(10.0, -7.0, 3.0));
    r.move_application_point(original.application_point);
    assert!(r.force.abs_diff_eq(original.force, 1e-12));
    assert!(r.moment.abs_diff_eq(original.moment, 1e-12));
    assert!(r.application_point.abs_diff_eq(original.application_point, 1e-12));
}

#[test]
fn test_wrench_is_parallel_and_idempotent() {
    let mut r = Resultant::from_force(DVec3::new(0.0, 0.0, 5.0), DVec3::new(1.0, 2.0, 0.0));
    r.add_moment(DVec3::new(3.0, -1.0, 2.0));
    r.convert_to_wrench();
    assert!(r.force.cross(r.moment).length() < 1e-9);

    let once = r;
    r.convert_to_wrench();
    assert!(r.moment.abs_diff_eq(once.moment, 1e-12));
    assert!(r.application_point.abs_diff_eq(once.application_point, 1e-12));
}

#[test]
fn test_wrench_bound_keeps_point_unprojected() {
    // Force line hits z = 0 far outside the bound sphere.
    let mut r = Resultant::from_force(DVec3::new(1.0, 0.0, 0.01), DVec3::ZERO);
    let constraint = WrenchConstraint {
        plane: Plane::from_point_normal(DVec3::new(0.0, 0.0, -1.0), DVec3::Z),
        bound: Sphere::new(DVec3::ZERO, 10.0),
        secondary_plane: Some(Plane::from_point_normal(DVec3::new(2.0, 0.0, 0.0), DVec3::X)),
    };
    r.convert_to_wrench_constrained(&constraint);
    // Falls back to the secondary plane x = 2.
    assert_abs_diff_eq!(r.application_point.x, 2.0, epsilon = 1e-9);
}

// ============================================================================
// Transform History Tests
// ============================================================================

#[test]
fn test_point_velocity_two_entries() {
    let mut history = TransformHistory::new(4);
    history.push_transform(Some(DMat4::IDENTITY), 0.1, None);
    history.push_transform(Some(DMat4::from_translation(DVec3::X)), 0.1, None);

    let k = history.point_local_to_world(DVec3::new(0.0, 3.0, 0.0), true, true, None);
    assert!(k.world_position.abs_diff_eq(DVec3::new(1.0, 3.0, 0.0), 1e-12));
    assert!(k.world_velocity.unwrap().abs_diff_eq(DVec3::new(10.0, 0.0, 0.0), 1e-9));
    assert!(k.local_velocity.unwrap().abs_diff_eq(DVec3::new(10.0, 0.0, 0.0), 1e-9));
}

#[test]
fn test_teleport_resets_velocity() {
    let mut history = TransformHistory::new(4);
    history.push_transform(Some(DMat4::IDENTITY), 0.1, None);
    history.push_transform(Some(DMat4::from_translation(DVec3::X)), 0.1, None);
    history.push_transform(Some(DMat4::from_translation(DVec3::splat(100.0))), 0.0, None);
    assert_eq!(history.len(), 1);
    assert_eq!(history.point_velocity(DVec3::ZERO), DVec3::ZERO);
}

#[test]
fn test_angular_velocity_about_axis() {
    let mut history = TransformHistory::new(2);
    history.push_transform(Some(DMat4::IDENTITY), 0.5, None);
    history.push_transform(Some(DMat4::from_rotation_z(0.1)), 0.5, None);
    assert_abs_diff_eq!(history.angular_velocity_about_local_axis(DVec3::Z), 0.2, epsilon = 1e-9);
    assert_abs_diff_eq!(history.angular_velocity_about_local_axis(-DVec3::Z), -0.2, epsilon = 1e-9);
}

// ============================================================================
// Body Tree Tests
// ============================================================================

#[test]
fn test_two_body_aggregate() {
    let mut tree = BodyTree::new();
    let hull = tree.add_body(RigidBody::new("hull", 10.0, DVec3::ZERO, DMat3::IDENTITY));
    let ballast = tree.add_body(RigidBody::point_mass("ballast", 5.0, DVec3::new(2.0, 0.0, 0.0)));
    tree.add_part(hull, ballast).unwrap();

    assert_abs_diff_eq!(tree.total_mass(hull), 15.0, epsilon = 1e-12);
    let com = tree.total_center_of_mass(hull);
    assert_abs_diff_eq!(com.x, 0.667, epsilon = 1e-3);
    assert_abs_diff_eq!(com.y, 0.0);
    assert_abs_diff_eq!(com.z, 0.0);
}

#[test]
fn test_disabled_part_force_left_out_of_sum() {
    let mut tree = BodyTree::new();
    let hull = tree.add_body(RigidBody::new("hull", 100.0, DVec3::ZERO, DMat3::IDENTITY));
    let jib = tree.add_body(RigidBody::new("jib", 5.0, DVec3::ZERO, DMat3::IDENTITY));
    tree.add_part(hull, jib).unwrap();

    tree.add_world_force(hull, DVec3::new(10.0, 0.0, 0.0), DVec3::ZERO);
    tree.add_world_force(jib, DVec3::new(0.0, 40.0, 0.0), DVec3::new(0.0, 0.0, 3.0));
    tree.set_part_enabled(hull, jib, false);

    let r = tree.get_resultant(hull, ResultantMode::Raw);
    assert!(r.force.abs_diff_eq(DVec3::new(10.0, 0.0, 0.0), 1e-12));
    assert!(r.moment.abs_diff_eq(DVec3::ZERO, 1e-12));

    // The part still carries its own force and counts again once re-enabled.
    assert!(tree.get_resultant(jib, ResultantMode::Raw).force.abs_diff_eq(DVec3::new(0.0, 40.0, 0.0), 1e-12));
    tree.set_part_enabled(hull, jib, true);
    let r = tree.get_resultant(hull, ResultantMode::Raw);
    assert!(r.force.abs_diff_eq(DVec3::new(10.0, 40.0, 0.0), 1e-12));
    assert!(r.moment.abs_diff_eq(DVec3::new(-120.0, 0.0, 0.0), 1e-12));
}

#[test]
fn test_tick_with_rotated_part() {
    let mut tree = BodyTree::new();
    let hull = tree.add_body(RigidBody::new("hull", 100.0, DVec3::ZERO, DMat3::IDENTITY * 50.0));
    let mast = tree.add_body(
        RigidBody::new("mast", 10.0, DVec3::new(0.0, 0.0, 4.0), DMat3::IDENTITY)
            .with_placement(Placement::new(DVec3::new(1.0, 0.0, 0.0), DQuat::from_rotation_z(FRAC_PI_2))),
    );
    tree.add_part(hull, mast).unwrap();
    tree.set_placement(hull, Placement::from_position(DVec3::new(0.0, 0.0, 1.0)));

    tree.clear_forces(hull);
    tree.push_placement_transforms(0.05);
    let mast_top = tree.world_from_local(mast).transform_point3(DVec3::new(0.0, 0.0, 8.0));
    assert!(mast_top.abs_diff_eq(DVec3::new(1.0, 0.0, 9.0), 1e-12));

    tree.add_world_force(mast, DVec3::new(0.0, 200.0, 0.0), mast_top);
    tree.add_world_force(hull, DVec3::new(-50.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 1.0));

    let r = tree.get_resultant(hull, ResultantMode::CenterOfMass);
    assert!(r.force.abs_diff_eq(DVec3::new(-50.0, 200.0, 0.0), 1e-9));

    // Aggregate center of mass: hull at (0,0,1), mast CoM at (1,0,5).
    let expected_com = (DVec3::new(0.0, 0.0, 1.0) * 100.0 + DVec3::new(1.0, 0.0, 5.0) * 10.0) / 110.0;
    assert!(r.application_point.abs_diff_eq(expected_com, 1e-9));

    // Heeling moment about X from the mast force above the center of mass.
    let arm = mast_top - expected_com;
    let expected_moment = arm.cross(DVec3::new(0.0, 200.0, 0.0))
        + (DVec3::new(0.0, 0.0, 1.0) - expected_com).cross(DVec3::new(-50.0, 0.0, 0.0));
    assert!(r.moment.abs_diff_eq(expected_moment, 1e-9));
}

#[test]
fn test_hinged_rudder_limits() {
    let mut tree = BodyTree::new();
    let rudder = tree.add_body(RigidBody::new("rudder", 2.0, DVec3::ZERO, DMat3::IDENTITY * 0.01));
    tree.push_placement_transforms(0.1);
    tree.push_placement_transforms(0.1);

    // Large side force behind the stock swings the blade hard over.
    tree.add_world_force(rudder, DVec3::new(0.0, 500.0, 0.0), DVec3::new(-0.3, 0.0, 0.0));
    let limits = HingeLimits::new(-35.0, 35.0);
    let constrain = |n: f64, o: f64, dt: f64| limits.clamp(n, o, dt);
    let angle = tree.integrate_force_for_rotation(rudder, DVec3::ZERO, DVec3::Z, 0.0, Some(&constrain), None);
    assert_abs_diff_eq!(angle, -35.0, epsilon = 1e-12);

    let heading = tree.placement(rudder).orientation * DVec3::X;
    assert_abs_diff_eq!(heading.y, (-35.0_f64).to_radians().sin(), epsilon = 1e-9);
}
