//! Rigid-body dynamics
//!
//! Bodies live in a [`BodyTree`] arena and are addressed by [`BodyHandle`].
//! Each tick the caller clears forces, pushes the new pose of every body,
//! accumulates forces in world coordinates and finally reads back the net
//! [`Resultant`] of an assembly. Pose integration itself happens outside
//! this module, except for the single-axis helper
//! [`BodyTree::integrate_force_for_rotation`] used for hinged parts.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Mass in kg
//! - Forces in N, moments in N·m
//! - Angles in radians unless a name ends in `_deg`
//!
//! # Submodules
//!
//! - [`types`] - glam f64 types and near-zero helpers
//! - [`geometry`] - Plane, sphere and 2D chord line
//! - [`resultant`] - Force + moment + application point, wrench conversion
//! - [`transform_history`] - Placement and the finite-difference velocity history
//! - [`rigid_body`] - Single body: mass properties, placement, accumulator
//! - [`body_tree`] - Arena hierarchy, aggregate totals, rotation integration
//!
//! # Frames
//!
//! Mass properties are local to their body. Placements are relative to the
//! owning parent (world for roots). Resultants are accumulated and returned
//! in world coordinates.

pub mod body_tree;
pub mod geometry;
pub mod resultant;
pub mod rigid_body;
pub mod transform_history;
pub mod types;

// Re-export commonly used types at the physics module level
pub use body_tree::{BodyHandle, BodyTree, HingeLimits, PartLink, ResultantMode};
pub use geometry::{ChordLine, Plane, Sphere, angle_between, signed_angle_2d};
pub use resultant::{Resultant, WrenchConstraint};
pub use rigid_body::{MassTotals, RigidBody, safe_inverse};
pub use transform_history::{
    CoordinateTransform, MAX_HISTORY, MAX_TERMS, Placement, PointKinematics, TransformHistory,
};
pub use types::{DMat3, DMat4, DQuat, DVec2, DVec3, NEAR_ZERO};
