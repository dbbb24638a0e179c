//! Coordinate transform history
//!
//! Every tick the caller pushes the body's current `world_from_local`
//! transform. A short ring buffer of past transforms lets the core estimate
//! point velocities and angular rates by backward finite differences without
//! the integrator having to hand velocities in.
//!
//! Pushing with `dt <= 0` marks a discontinuity (teleport, reset) and clears
//! the buffer so the next estimate does not see a spurious jump.

use std::collections::VecDeque;

use super::types::{DMat4, DQuat, DVec3, NEAR_ZERO, is_near_zero};

/// Largest history a body may keep.
pub const MAX_HISTORY: usize = 8;

/// Largest backward-difference stencil used for velocity estimates.
pub const MAX_TERMS: usize = 4;

/// Uniform-step backward difference stencils for the first derivative,
/// newest sample first, together with their common denominator.
const BACKWARD_STENCILS: [(&[f64], f64); MAX_TERMS - 1] = [
    (&[1.0, -1.0], 1.0),
    (&[3.0, -4.0, 1.0], 2.0),
    (&[11.0, -18.0, 9.0, -2.0], 6.0),
];

/// A `world_from_local` transform together with its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    pub world_from_local: DMat4,
    pub local_from_world: DMat4,
}

impl CoordinateTransform {
    pub const IDENTITY: Self = Self {
        world_from_local: DMat4::IDENTITY,
        local_from_world: DMat4::IDENTITY,
    };

    /// Builds the pair from whichever matrices are known.
    pub fn from_parts(world_from_local: Option<DMat4>, local_from_world: Option<DMat4>) -> Self {
        match (world_from_local, local_from_world) {
            (Some(w), Some(l)) => Self {
                world_from_local: w,
                local_from_world: l,
            },
            (Some(w), None) => Self {
                world_from_local: w,
                local_from_world: w.inverse(),
            },
            (None, Some(l)) => Self {
                world_from_local: l.inverse(),
                local_from_world: l,
            },
            (None, None) => Self::IDENTITY,
        }
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Position and orientation of a body relative to its parent frame.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl Placement {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        orientation: DQuat::IDENTITY,
    };

    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn from_position(position: DVec3) -> Self {
        Self::new(position, DQuat::IDENTITY)
    }

    /// `parent_from_local` matrix.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.orientation, self.position)
    }

    /// Rotates the body by `angle` radians about the local `axis` passing
    /// through the local point `origin`; `origin` stays fixed in the parent frame.
    pub fn rotate_about_local_axis(&mut self, origin: DVec3, axis: DVec3, angle: f64) {
        let axis = axis.normalize_or_zero();
        if axis == DVec3::ZERO || is_near_zero(angle) {
            return;
        }
        let pivot = self.position + self.orientation * origin;
        self.orientation = (self.orientation * DQuat::from_axis_angle(axis, angle)).normalize();
        self.position = pivot - self.orientation * origin;
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// World position of a point plus optional velocity estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointKinematics {
    pub world_position: DVec3,
    pub world_velocity: Option<DVec3>,
    pub local_velocity: Option<DVec3>,
}

/// Ring buffer of recent coordinate transforms, newest first.
#[derive(Debug, Clone)]
pub struct TransformHistory {
    entries: VecDeque<CoordinateTransform>,
    capacity: usize,
    dt: f64,
}

impl Default for TransformHistory {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TransformHistory {
    /// Creates an empty history; `capacity` is clamped to `1..=MAX_HISTORY`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_HISTORY);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            dt: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time step of the most recent push.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entry `age` steps back (0 = current).
    pub fn get(&self, age: usize) -> Option<&CoordinateTransform> {
        self.entries.get(age)
    }

    /// Current transform, or identity before the first push.
    pub fn current(&self) -> CoordinateTransform {
        self.entries.front().copied().unwrap_or_default()
    }

    /// Pushes a new transform.
    ///
    /// Either matrix may be omitted and is then derived from the other; with
    /// neither, identity is pushed. `dt <= 0` clears the history first.
    pub fn push_transform(&mut self, world_from_local: Option<DMat4>, dt: f64, local_from_world: Option<DMat4>) {
        if dt <= 0.0 {
            self.entries.clear();
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries
            .push_front(CoordinateTransform::from_parts(world_from_local, local_from_world));
        self.dt = dt;
    }

    /// Pushes the transform of a world placement.
    pub fn push_placement(&mut self, placement: &Placement, dt: f64) {
        self.push_transform(Some(placement.matrix()), dt, None);
    }

    /// Number of history entries usable for a difference stencil.
    fn usable_terms(&self) -> usize {
        if self.dt <= NEAR_ZERO {
            return 0;
        }
        self.entries.len().min(MAX_TERMS)
    }

    /// Transforms a local point into world space and optionally estimates its
    /// velocity by backward difference over past transforms.
    ///
    /// `previous_local_points[i]` is the point's local position `i + 1` steps
    /// back; when given it replaces the static point for those entries and
    /// caps the stencil at `previous_local_points.len() + 1` terms.
    pub fn point_local_to_world(
        &self,
        local_point: DVec3,
        want_world_velocity: bool,
        want_local_velocity: bool,
        previous_local_points: Option<&[DVec3]>,
    ) -> PointKinematics {
        let current = self.current();
        let world_position = current.world_from_local.transform_point3(local_point);

        let world_velocity = if want_world_velocity || want_local_velocity {
            let mut terms = self.usable_terms();
            if let Some(previous) = previous_local_points {
                terms = terms.min(previous.len() + 1);
            }
            if terms < 2 {
                Some(DVec3::ZERO)
            } else {
                let mut positions = [DVec3::ZERO; MAX_TERMS];
                positions[0] = world_position;
                for (age, slot) in positions.iter_mut().enumerate().take(terms).skip(1) {
                    let local = previous_local_points
                        .and_then(|previous| previous.get(age - 1).copied())
                        .unwrap_or(local_point);
                    *slot = self.entries[age].world_from_local.transform_point3(local);
                }
                Some(backward_difference(&positions[..terms], self.dt))
            }
        } else {
            None
        };

        let local_velocity = if want_local_velocity {
            world_velocity.map(|v| current.local_from_world.transform_vector3(v))
        } else {
            None
        };

        PointKinematics {
            world_position,
            world_velocity: if want_world_velocity { world_velocity } else { None },
            local_velocity,
        }
    }

    /// World velocity of a local point (zero until two transforms are known).
    pub fn point_velocity(&self, local_point: DVec3) -> DVec3 {
        self.point_local_to_world(local_point, true, false, None)
            .world_velocity
            .unwrap_or(DVec3::ZERO)
    }

    /// Angular rate in rad/s about a local axis between the two newest entries.
    ///
    /// A reference vector orthogonal to `axis` is rotated into world space at
    /// both entries, both images are projected onto the plane perpendicular
    /// to the current world axis, and the signed angle between them is
    /// divided by `dt`.
    pub fn angular_velocity_about_local_axis(&self, axis: DVec3) -> f64 {
        let axis = axis.normalize_or_zero();
        if axis == DVec3::ZERO || self.usable_terms() < 2 {
            return 0.0;
        }
        let current = &self.entries[0];
        let previous = &self.entries[1];

        let reference = axis.any_orthonormal_vector();
        let world_axis = current.world_from_local.transform_vector3(axis).normalize_or_zero();
        if world_axis == DVec3::ZERO {
            return 0.0;
        }

        let project = |v: DVec3| v - world_axis * v.dot(world_axis);
        let cur = project(current.world_from_local.transform_vector3(reference));
        let prev = project(previous.world_from_local.transform_vector3(reference));
        if is_near_zero(cur.length()) || is_near_zero(prev.length()) {
            return 0.0;
        }

        let angle = super::geometry::angle_between(prev, cur);
        let sign = if prev.cross(cur).dot(world_axis) < 0.0 { -1.0 } else { 1.0 };
        sign * angle / self.dt
    }
}

/// First derivative from `samples` (newest first) spaced `dt` apart.
fn backward_difference(samples: &[DVec3], dt: f64) -> DVec3 {
    let Some((weights, denominator)) = samples
        .len()
        .checked_sub(2)
        .and_then(|i| BACKWARD_STENCILS.get(i))
    else {
        return DVec3::ZERO;
    };
    let sum = samples
        .iter()
        .zip(weights.iter())
        .fold(DVec3::ZERO, |acc, (x, w)| acc + *x * *w);
    sum / (denominator * dt)
}
