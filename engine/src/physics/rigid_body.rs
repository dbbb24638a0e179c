//! Rigid body state
//!
//! A [`RigidBody`] carries its own mass properties (in its local frame), its
//! placement relative to the owning parent, the transform history pushed by
//! the caller each tick, and the resultant of forces added this tick.
//! Hierarchy and aggregate totals live in [`BodyTree`](super::BodyTree).

use super::resultant::Resultant;
use super::transform_history::{Placement, TransformHistory};
use super::types::{DMat3, DVec3, NEAR_ZERO, is_near_zero};

/// Mass properties of a body or of a whole subtree, in the body's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassTotals {
    pub mass: f64,
    pub center_of_mass: DVec3,
    pub inertia: DMat3,
    pub inverse_inertia: DMat3,
}

/// A single rigid body.
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Name used in logs and configuration lookups
    pub name: String,
    /// Mass in kilograms (may be zero for massless fixtures)
    pub mass: f64,
    /// Center of mass in the body's local frame (meters)
    pub center_of_mass: DVec3,
    /// Symmetric inertia tensor about `center_of_mass`, local axes (kg·m²)
    pub inertia: DMat3,
    pub(crate) placement: Placement,
    pub(crate) history: TransformHistory,
    pub(crate) resultant: Resultant,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            name: String::new(),
            mass: 0.0,
            center_of_mass: DVec3::ZERO,
            inertia: DMat3::ZERO,
            placement: Placement::IDENTITY,
            history: TransformHistory::default(),
            resultant: Resultant::default(),
        }
    }
}

impl RigidBody {
    pub fn new(name: impl Into<String>, mass: f64, center_of_mass: DVec3, inertia: DMat3) -> Self {
        Self {
            name: name.into(),
            mass,
            center_of_mass,
            inertia,
            ..Self::default()
        }
    }

    /// A point mass at `position` in the parent frame.
    pub fn point_mass(name: impl Into<String>, mass: f64, position: DVec3) -> Self {
        let mut body = Self::new(name, mass, DVec3::ZERO, DMat3::ZERO);
        body.placement = Placement::from_position(position);
        body
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = TransformHistory::new(capacity);
        self
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn history(&self) -> &TransformHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut TransformHistory {
        &mut self.history
    }

    /// Forces added to this body alone this tick (world frame).
    pub fn own_resultant(&self) -> &Resultant {
        &self.resultant
    }

    /// Adds a world-frame force acting at a world point.
    pub fn add_world_force(&mut self, force: DVec3, world_point: DVec3) {
        self.resultant.add_force(force, world_point);
    }

    /// Adds a world-frame resultant.
    pub fn add_world_resultant(&mut self, resultant: &Resultant) {
        self.resultant.add_resultant(resultant);
    }

    /// Own mass properties, without parts.
    pub fn own_totals(&self) -> MassTotals {
        MassTotals {
            mass: self.mass,
            center_of_mass: self.center_of_mass,
            inertia: self.inertia,
            inverse_inertia: safe_inverse(&self.inertia),
        }
    }
}

/// Inverse of an inertia tensor, or the zero matrix when the tensor is
/// degenerate so rotational integration yields zero acceleration instead of
/// infinities.
pub fn safe_inverse(inertia: &DMat3) -> DMat3 {
    let diagonal = DVec3::new(inertia.x_axis.x, inertia.y_axis.y, inertia.z_axis.z);
    let largest = diagonal.abs().max_element();
    if largest <= NEAR_ZERO {
        return DMat3::ZERO;
    }
    // Determinant relative to the tensor's own scale.
    if is_near_zero(inertia.determinant() / (largest * largest * largest)) {
        return DMat3::ZERO;
    }
    inertia.inverse()
}
