//! Force resultants and wrenches
//!
//! A [`Resultant`] is the net effect of a force system: a single force, the
//! moment of the system about an application point, and that point. The
//! moment is always the moment about `application_point`, so moving the
//! point requires the transfer term `(old − new) × force`.
//!
//! # Example
//!
//! ```ignore
//! use sail_physics::physics::Resultant;
//! use glam::DVec3;
//!
//! let mut r = Resultant::default();
//! r.add_force(DVec3::new(0.0, 0.0, 10.0), DVec3::new(1.0, 0.0, 0.0));
//! r.convert_to_wrench();
//! ```

use serde::{Deserialize, Serialize};

use super::geometry::{Plane, Sphere};
use super::types::{DMat4, DVec3, NEAR_ZERO};

/// Force + moment about an application point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Resultant {
    pub force: DVec3,
    pub moment: DVec3,
    pub application_point: DVec3,
}

/// Where a wrench's application point may be re-projected to.
///
/// The unconstrained wrench axis can sit arbitrarily far away when the force
/// has almost no component along the direction that would pin it down, so the
/// point is pulled back onto `plane` (or `secondary_plane`) as long as the
/// intersection stays inside `bound`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WrenchConstraint {
    pub plane: Plane,
    pub bound: Sphere,
    pub secondary_plane: Option<Plane>,
}

impl Resultant {
    pub fn new(force: DVec3, moment: DVec3, application_point: DVec3) -> Self {
        Self {
            force,
            moment,
            application_point,
        }
    }

    /// A pure force acting at `point`.
    pub fn from_force(force: DVec3, point: DVec3) -> Self {
        Self::new(force, DVec3::ZERO, point)
    }

    /// Zero force and moment; keeps the application point.
    pub fn clear(&mut self) {
        self.force = DVec3::ZERO;
        self.moment = DVec3::ZERO;
    }

    pub fn is_zero(&self) -> bool {
        self.force.length_squared() <= NEAR_ZERO * NEAR_ZERO
            && self.moment.length_squared() <= NEAR_ZERO * NEAR_ZERO
    }

    /// Adds `force` acting at `point` without moving the application point.
    pub fn add_force(&mut self, force: DVec3, point: DVec3) {
        self.moment += (point - self.application_point).cross(force);
        self.force += force;
    }

    /// Adds a free couple.
    pub fn add_moment(&mut self, moment: DVec3) {
        self.moment += moment;
    }

    /// Adds another resultant, transferring its moment to this application point.
    pub fn add_resultant(&mut self, other: &Resultant) {
        self.moment += other.moment + (other.application_point - self.application_point).cross(other.force);
        self.force += other.force;
    }

    /// Moves the application point, keeping the force system equivalent.
    pub fn move_application_point(&mut self, new_point: DVec3) {
        self.moment += (self.application_point - new_point).cross(self.force);
        self.application_point = new_point;
    }

    /// Moment component parallel to the force (zero for a vanishing force).
    pub fn parallel_moment(&self) -> DVec3 {
        let f2 = self.force.length_squared();
        if f2 <= NEAR_ZERO * NEAR_ZERO {
            return DVec3::ZERO;
        }
        self.force * (self.moment.dot(self.force) / f2)
    }

    /// Reduces to a wrench: the moment parallel to the force is kept and the
    /// application point moves onto the central axis so the perpendicular
    /// moment vanishes.
    ///
    /// A vanishing force leaves a pure couple untouched.
    pub fn convert_to_wrench(&mut self) {
        let f2 = self.force.length_squared();
        if f2 <= NEAR_ZERO * NEAR_ZERO {
            return;
        }
        let parallel = self.parallel_moment();
        let perpendicular = self.moment - parallel;
        // r × F = M⊥  =>  r = (F × M⊥) / |F|²
        let shift = self.force.cross(perpendicular) / f2;
        self.application_point += shift;
        self.moment = parallel;
    }

    /// [`convert_to_wrench`](Self::convert_to_wrench), then slides the
    /// application point along the force line onto the constraint plane if
    /// the hit lies inside the bound, else onto the secondary plane under the
    /// same bound, else leaves it where the wrench put it.
    pub fn convert_to_wrench_constrained(&mut self, constraint: &WrenchConstraint) {
        self.convert_to_wrench();

        let candidates = std::iter::once(constraint.plane).chain(constraint.secondary_plane);
        for plane in candidates {
            if let Some(hit) = plane.intersect_ray(self.application_point, self.force) {
                if constraint.bound.contains(hit) {
                    // Sliding along the force line adds no transfer moment.
                    self.application_point = hit;
                    return;
                }
            }
        }
    }

    /// The same resultant expressed through a rigid transform.
    pub fn transformed(&self, matrix: &DMat4) -> Resultant {
        Resultant {
            force: matrix.transform_vector3(self.force),
            moment: matrix.transform_vector3(self.moment),
            application_point: matrix.transform_point3(self.application_point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_add_force_accumulates_moment() {
        let mut r = Resultant::default();
        r.add_force(DVec3::new(0.0, 10.0, 0.0), DVec3::new(2.0, 0.0, 0.0));
        assert!(r.force.abs_diff_eq(DVec3::new(0.0, 10.0, 0.0), EPS));
        assert!(r.moment.abs_diff_eq(DVec3::new(0.0, 0.0, 20.0), EPS));
    }

    #[test]
    fn test_move_application_point_round_trip() {
        let mut r = Resultant::new(
            DVec3::new(1.0, -2.0, 0.5),
            DVec3::new(0.3, 0.1, -4.0),
            DVec3::new(1.0, 1.0, 1.0),
        );
        r.add_force(DVec3::new(3.0, 0.0, 1.0), DVec3::new(-2.0, 5.0, 0.0));
        let before = r;

        r.move_application_point(DVec3::new(10.0, -3.0, 7.0));
        r.move_application_point(before.application_point);

        assert!(r.force.abs_diff_eq(before.force, EPS));
        assert!(r.moment.abs_diff_eq(before.moment, EPS));
        assert!(r.application_point.abs_diff_eq(before.application_point, EPS));
    }

    #[test]
    fn test_add_resultant_matches_add_force() {
        let f = DVec3::new(0.0, 0.0, 4.0);
        let p = DVec3::new(1.0, 2.0, 0.0);

        let mut direct = Resultant::default();
        direct.add_force(f, p);

        let mut composed = Resultant::default();
        composed.add_resultant(&Resultant::from_force(f, p));

        assert!(direct.moment.abs_diff_eq(composed.moment, EPS));
        assert!(direct.force.abs_diff_eq(composed.force, EPS));
    }

    #[test]
    fn test_wrench_moment_parallel_and_idempotent() {
        let mut r = Resultant::new(
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(-4.0, 0.5, 2.0),
            DVec3::new(0.2, 0.0, -1.0),
        );
        let original = r;
        r.convert_to_wrench();

        assert!(r.force.cross(r.moment).length() < 1e-9);

        // Still the same force system about the original point.
        let mut check = r;
        check.move_application_point(original.application_point);
        assert!(check.moment.abs_diff_eq(original.moment, 1e-9));

        let once = r;
        r.convert_to_wrench();
        assert!(r.application_point.abs_diff_eq(once.application_point, 1e-12));
        assert!(r.moment.abs_diff_eq(once.moment, 1e-12));
    }

    #[test]
    fn test_wrench_of_pure_couple_untouched() {
        let mut r = Resultant::new(DVec3::ZERO, DVec3::new(0.0, 0.0, 3.0), DVec3::X);
        r.convert_to_wrench();
        assert_eq!(r.moment, DVec3::new(0.0, 0.0, 3.0));
        assert_eq!(r.application_point, DVec3::X);
    }

    #[test]
    fn test_constrained_wrench_projects_onto_plane() {
        // Vertical force at (2, 0, 0) seen from the origin.
        let mut r = Resultant::default();
        r.add_force(DVec3::new(0.0, 0.0, 5.0), DVec3::new(2.0, 0.0, 3.0));
        let constraint = WrenchConstraint {
            plane: Plane::from_point_normal(DVec3::ZERO, DVec3::Z),
            bound: Sphere::new(DVec3::ZERO, 10.0),
            secondary_plane: None,
        };
        r.convert_to_wrench_constrained(&constraint);
        assert!(r.application_point.abs_diff_eq(DVec3::new(2.0, 0.0, 0.0), 1e-9));
        assert!(r.moment.abs_diff_eq(DVec3::ZERO, 1e-9));
    }

    #[test]
    fn test_constrained_wrench_falls_back_to_secondary_plane() {
        let mut r = Resultant::default();
        r.add_force(DVec3::new(0.0, 0.0, 5.0), DVec3::new(2.0, 0.0, 3.0));
        let constraint = WrenchConstraint {
            // Parallel to the force: no hit.
            plane: Plane::from_point_normal(DVec3::ZERO, DVec3::Y),
            bound: Sphere::new(DVec3::ZERO, 10.0),
            secondary_plane: Some(Plane::from_point_normal(DVec3::new(0.0, 0.0, 1.0), DVec3::Z)),
        };
        r.convert_to_wrench_constrained(&constraint);
        assert!(r.application_point.abs_diff_eq(DVec3::new(2.0, 0.0, 1.0), 1e-9));
    }

    #[test]
    fn test_constrained_wrench_respects_bound() {
        let mut r = Resultant::default();
        r.add_force(DVec3::new(0.0, 0.0, 5.0), DVec3::new(20.0, 0.0, 3.0));
        let constraint = WrenchConstraint {
            plane: Plane::from_point_normal(DVec3::new(0.0, 0.0, 1.0), DVec3::Z),
            bound: Sphere::new(DVec3::ZERO, 10.0),
            secondary_plane: None,
        };
        let mut unconstrained = r;
        unconstrained.convert_to_wrench();
        r.convert_to_wrench_constrained(&constraint);
        assert!(r.application_point.abs_diff_eq(unconstrained.application_point, 1e-9));
    }

    #[test]
    fn test_transformed_translation() {
        let r = Resultant::new(DVec3::X, DVec3::Z, DVec3::ZERO);
        let m = DMat4::from_translation(DVec3::new(0.0, 0.0, 2.0));
        let t = r.transformed(&m);
        assert_eq!(t.force, DVec3::X);
        assert_eq!(t.moment, DVec3::Z);
        assert!(t.application_point.abs_diff_eq(DVec3::new(0.0, 0.0, 2.0), 1e-12));
    }
}
