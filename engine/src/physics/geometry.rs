//! Geometry primitives layered on glam
//!
//! glam covers vectors, matrices and quaternions. The core additionally
//! needs planes (slicing, wrench re-projection, mirroring), bounding
//! spheres (wrench guard) and 2D chord segments (foils).

use serde::{Deserialize, Serialize};

use super::types::{DVec2, DVec3, NEAR_ZERO, is_near_zero};

/// Plane `normal · p + d = 0` with a unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal; the "above" side is the side it points to.
    pub normal: DVec3,
    /// Offset so that `normal · p + d == 0` on the plane.
    pub d: f64,
}

impl Plane {
    /// Creates a plane, normalizing `normal` and scaling `d` with it.
    ///
    /// A zero normal yields the XZ plane through the origin rather than NaNs.
    pub fn new(normal: DVec3, d: f64) -> Self {
        let length = normal.length();
        if is_near_zero(length) {
            return Self { normal: DVec3::Y, d: 0.0 };
        }
        Self {
            normal: normal / length,
            d: d / length,
        }
    }

    /// Plane through `point` with the given normal.
    pub fn from_point_normal(point: DVec3, normal: DVec3) -> Self {
        let n = normal.normalize_or_zero();
        if n == DVec3::ZERO {
            return Self::new(DVec3::Y, -point.y);
        }
        Self { normal: n, d: -n.dot(point) }
    }

    /// Signed distance; positive above the plane.
    #[inline]
    pub fn distance_to_point(&self, point: DVec3) -> f64 {
        self.normal.dot(point) + self.d
    }

    /// Intersection of the infinite line through `a` and `b` with the plane.
    ///
    /// Returns `None` when the line is parallel to the plane.
    pub fn intersect_line(&self, a: DVec3, b: DVec3) -> Option<DVec3> {
        self.intersect_ray(a, b - a)
    }

    /// Intersection of the line `origin + t * direction` with the plane.
    pub fn intersect_ray(&self, origin: DVec3, direction: DVec3) -> Option<DVec3> {
        let denom = self.normal.dot(direction);
        if is_near_zero(denom) {
            return None;
        }
        let t = -self.distance_to_point(origin) / denom;
        Some(origin + direction * t)
    }

    /// Orthogonal projection of `point` onto the plane.
    pub fn project_point(&self, point: DVec3) -> DVec3 {
        point - self.normal * self.distance_to_point(point)
    }

    /// Mirror image of `point` through the plane.
    pub fn reflect_point(&self, point: DVec3) -> DVec3 {
        point - self.normal * (2.0 * self.distance_to_point(point))
    }
}

/// Bounding sphere used to keep wrench application points from running away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, point: DVec3) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Chord line of a foil section, leading edge to trailing edge, in the
/// section's local 2D plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordLine {
    pub leading: DVec2,
    pub trailing: DVec2,
}

impl ChordLine {
    pub fn new(leading: DVec2, trailing: DVec2) -> Self {
        Self { leading, trailing }
    }

    /// Leading → trailing edge vector.
    pub fn vector(&self) -> DVec2 {
        self.trailing - self.leading
    }

    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    /// Unit chord direction, or zero for a degenerate chord.
    pub fn direction(&self) -> DVec2 {
        self.vector().normalize_or_zero()
    }

    /// Point at `fraction` of the chord measured from the leading edge.
    pub fn point_at(&self, fraction: f64) -> DVec2 {
        self.leading + self.vector() * fraction
    }
}

/// Signed angle in radians rotating `from` onto `to` (counter-clockwise positive).
pub fn signed_angle_2d(from: DVec2, to: DVec2) -> f64 {
    from.perp_dot(to).atan2(from.dot(to))
}

/// Unsigned angle between two 3D vectors, robust near 0 and π.
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    let cross = a.cross(b).length();
    let dot = a.dot(b);
    if cross < NEAR_ZERO && dot.abs() < NEAR_ZERO {
        return 0.0;
    }
    cross.atan2(dot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_plane_normalizes() {
        let plane = Plane::new(DVec3::new(0.0, 2.0, 0.0), -4.0);
        assert_abs_diff_eq!(plane.normal.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(plane.distance_to_point(DVec3::new(5.0, 2.0, 1.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_intersect_line() {
        let plane = Plane::from_point_normal(DVec3::new(0.0, 1.0, 0.0), DVec3::Y);
        let hit = plane
            .intersect_line(DVec3::new(1.0, 0.0, 0.0), DVec3::new(1.0, 3.0, 0.0))
            .expect("line crosses plane");
        assert!(hit.abs_diff_eq(DVec3::new(1.0, 1.0, 0.0), 1e-12));

        assert!(plane.intersect_line(DVec3::ZERO, DVec3::X).is_none());
    }

    #[test]
    fn test_plane_project_and_reflect() {
        let plane = Plane::from_point_normal(DVec3::ZERO, DVec3::Z);
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert!(plane.project_point(p).abs_diff_eq(DVec3::new(1.0, 2.0, 0.0), 1e-12));
        assert!(plane.reflect_point(p).abs_diff_eq(DVec3::new(1.0, 2.0, -3.0), 1e-12));
    }

    #[test]
    fn test_signed_angle_2d() {
        let a = signed_angle_2d(DVec2::X, DVec2::Y);
        assert_abs_diff_eq!(a, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        let b = signed_angle_2d(DVec2::X, -DVec2::Y);
        assert_abs_diff_eq!(b, -std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_chord_line_point_at() {
        let chord = ChordLine::new(DVec2::new(1.0, 0.0), DVec2::new(3.0, 0.0));
        assert_abs_diff_eq!(chord.length(), 2.0, epsilon = 1e-12);
        assert!(chord.point_at(0.25).abs_diff_eq(DVec2::new(1.5, 0.0), 1e-12));
    }
}
