//! Body hierarchy
//!
//! A [`BodyTree`] is an arena owning every [`RigidBody`] of an assembly
//! (hull, keel, rudder, mast, sails). Bodies are addressed by [`BodyHandle`];
//! each entry keeps an optional parent handle and its list of parts, so a
//! part always has at most one owner and re-parenting is a handle update.
//!
//! Aggregate mass properties are cached per entry and invalidated, for the
//! entry and all its ancestors, whenever structure, enablement, mass or pose
//! changes.
//!
//! # Frames
//!
//! - Mass properties are in each body's local frame; a part's placement is
//!   relative to its owner.
//! - Forces and resultants are accumulated in world coordinates.

use std::cell::Cell;

use crate::error::HierarchyError;

use super::resultant::{Resultant, WrenchConstraint};
use super::rigid_body::{MassTotals, RigidBody, safe_inverse};
use super::transform_history::{Placement, TransformHistory};
use super::types::{DMat3, DMat4, DVec3, NEAR_ZERO};

/// Index of a body inside its [`BodyTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(usize);

impl BodyHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A part attached to an owning body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartLink {
    pub handle: BodyHandle,
    /// Disabled parts are kept attached but contribute neither mass nor force.
    pub enabled: bool,
}

/// How [`BodyTree::get_resultant`] post-processes the summed resultant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResultantMode {
    /// Keep the accumulated application point.
    #[default]
    Raw,
    /// Move the application point to the aggregate center of mass.
    CenterOfMass,
    /// Reduce to a wrench, optionally re-projected onto a constraint plane.
    Wrench(Option<WrenchConstraint>),
}

/// Clamp for hinged parts (rudders, booms) used with
/// [`BodyTree::integrate_force_for_rotation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeLimits {
    pub min_deg: f64,
    pub max_deg: f64,
}

impl HingeLimits {
    pub fn new(min_deg: f64, max_deg: f64) -> Self {
        Self {
            min_deg: min_deg.min(max_deg),
            max_deg: min_deg.max(max_deg),
        }
    }

    /// Constrainer signature `(new_deg, old_deg, dt) -> clamped_deg`.
    pub fn clamp(&self, new_deg: f64, _old_deg: f64, _dt: f64) -> f64 {
        new_deg.clamp(self.min_deg, self.max_deg)
    }
}

#[derive(Debug)]
struct BodyEntry {
    body: RigidBody,
    parent: Option<BodyHandle>,
    parts: Vec<PartLink>,
    totals: Cell<Option<MassTotals>>,
}

/// Arena of bodies forming one or more assemblies.
#[derive(Debug, Default)]
pub struct BodyTree {
    entries: Vec<BodyEntry>,
}

impl BodyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached body and returns its handle.
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = BodyHandle(self.entries.len());
        self.entries.push(BodyEntry {
            body,
            parent: None,
            parts: Vec::new(),
            totals: Cell::new(None),
        });
        handle
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        (0..self.entries.len()).map(BodyHandle)
    }

    /// Bodies without an owner.
    pub fn roots(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.handles().filter(|h| self.entries[h.0].parent.is_none())
    }

    pub fn find(&self, name: &str) -> Option<BodyHandle> {
        self.handles().find(|h| self.entries[h.0].body.name == name)
    }

    pub fn body(&self, handle: BodyHandle) -> &RigidBody {
        &self.entries[handle.0].body
    }

    /// Mutable access; aggregate caches up the chain are invalidated since
    /// the caller may change mass properties.
    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut RigidBody {
        self.invalidate(handle);
        &mut self.entries[handle.0].body
    }

    pub fn parent(&self, handle: BodyHandle) -> Option<BodyHandle> {
        self.entries[handle.0].parent
    }

    pub fn parts(&self, handle: BodyHandle) -> &[PartLink] {
        &self.entries[handle.0].parts
    }

    fn is_ancestor(&self, candidate: BodyHandle, of: BodyHandle) -> bool {
        let mut current = self.entries[of.0].parent;
        while let Some(h) = current {
            if h == candidate {
                return true;
            }
            current = self.entries[h.0].parent;
        }
        false
    }

    /// Attaches `part` to `parent`, detaching it from any previous owner.
    pub fn add_part(&mut self, parent: BodyHandle, part: BodyHandle) -> Result<(), HierarchyError> {
        if parent == part {
            return Err(HierarchyError::SelfPart(part.0));
        }
        if self.is_ancestor(part, parent) {
            return Err(HierarchyError::Cycle {
                parent: parent.0,
                part: part.0,
            });
        }
        if let Some(previous) = self.entries[part.0].parent {
            self.remove_part(previous, part);
        }
        self.entries[parent.0].parts.push(PartLink {
            handle: part,
            enabled: true,
        });
        self.entries[part.0].parent = Some(parent);
        self.invalidate(parent);
        Ok(())
    }

    /// Detaches `part` from `parent`; returns false if it was not attached there.
    pub fn remove_part(&mut self, parent: BodyHandle, part: BodyHandle) -> bool {
        let parts = &mut self.entries[parent.0].parts;
        let Some(index) = parts.iter().position(|link| link.handle == part) else {
            return false;
        };
        parts.remove(index);
        self.entries[part.0].parent = None;
        self.invalidate(parent);
        true
    }

    /// Enables or disables an attached part; returns false if not attached.
    pub fn set_part_enabled(&mut self, parent: BodyHandle, part: BodyHandle, enabled: bool) -> bool {
        let Some(link) = self.entries[parent.0]
            .parts
            .iter_mut()
            .find(|link| link.handle == part)
        else {
            return false;
        };
        link.enabled = enabled;
        self.invalidate(parent);
        true
    }

    fn enabled_parts(&self, handle: BodyHandle) -> impl Iterator<Item = BodyHandle> + '_ {
        self.entries[handle.0]
            .parts
            .iter()
            .filter(|link| link.enabled)
            .map(|link| link.handle)
    }

    fn invalidate(&self, handle: BodyHandle) {
        let mut current = Some(handle);
        while let Some(h) = current {
            let entry = &self.entries[h.0];
            entry.totals.set(None);
            current = entry.parent;
        }
    }

    // ------------------------------------------------------------------
    // Pose
    // ------------------------------------------------------------------

    pub fn placement(&self, handle: BodyHandle) -> &Placement {
        &self.entries[handle.0].body.placement
    }

    /// Sets the body's placement relative to its owner (world for roots).
    pub fn set_placement(&mut self, handle: BodyHandle, placement: Placement) {
        self.entries[handle.0].body.placement = placement;
        self.invalidate(handle);
    }

    /// `world_from_local` composed from placements up the owner chain.
    pub fn placement_world_matrix(&self, handle: BodyHandle) -> DMat4 {
        let mut matrix = self.entries[handle.0].body.placement.matrix();
        let mut current = self.entries[handle.0].parent;
        while let Some(h) = current {
            matrix = self.entries[h.0].body.placement.matrix() * matrix;
            current = self.entries[h.0].parent;
        }
        matrix
    }

    /// Current `world_from_local`: the newest history entry, or the composed
    /// placement before the first push.
    pub fn world_from_local(&self, handle: BodyHandle) -> DMat4 {
        let history = &self.entries[handle.0].body.history;
        if history.is_empty() {
            self.placement_world_matrix(handle)
        } else {
            history.current().world_from_local
        }
    }

    pub fn local_from_world(&self, handle: BodyHandle) -> DMat4 {
        let history = &self.entries[handle.0].body.history;
        if history.is_empty() {
            self.placement_world_matrix(handle).inverse()
        } else {
            history.current().local_from_world
        }
    }

    pub fn history(&self, handle: BodyHandle) -> &TransformHistory {
        &self.entries[handle.0].body.history
    }

    /// Pushes a transform into one body's history.
    pub fn push_transform(
        &mut self,
        handle: BodyHandle,
        world_from_local: Option<DMat4>,
        dt: f64,
        local_from_world: Option<DMat4>,
    ) {
        self.entries[handle.0]
            .body
            .history
            .push_transform(world_from_local, dt, local_from_world);
    }

    /// Pushes every body's composed placement into its history.
    pub fn push_placement_transforms(&mut self, dt: f64) {
        let matrices: Vec<DMat4> = self.handles().map(|h| self.placement_world_matrix(h)).collect();
        for (entry, matrix) in self.entries.iter_mut().zip(matrices) {
            entry.body.history.push_transform(Some(matrix), dt, None);
        }
    }

    // ------------------------------------------------------------------
    // Forces
    // ------------------------------------------------------------------

    /// Zeroes the resultant of the body and of all its parts.
    pub fn clear_forces(&mut self, handle: BodyHandle) {
        let mut stack = vec![handle];
        while let Some(h) = stack.pop() {
            let entry = &mut self.entries[h.0];
            entry.body.resultant.clear();
            stack.extend(entry.parts.iter().map(|link| link.handle));
        }
    }

    /// Adds a world force at a world point to this body (not its parts).
    pub fn add_world_force(&mut self, handle: BodyHandle, force: DVec3, world_point: DVec3) {
        self.entries[handle.0].body.add_world_force(force, world_point);
    }

    /// Adds a world resultant to this body (not its parts).
    pub fn add_world_resultant(&mut self, handle: BodyHandle, resultant: &Resultant) {
        self.entries[handle.0].body.add_world_resultant(resultant);
    }

    /// Own resultant plus every enabled part's resultant, in world coordinates.
    ///
    /// Only meaningful once every force of the tick has been added.
    pub fn get_resultant(&self, handle: BodyHandle, mode: ResultantMode) -> Resultant {
        let mut total = self.summed_resultant(handle);
        match mode {
            ResultantMode::Raw => {}
            ResultantMode::CenterOfMass => {
                let com = self.world_from_local(handle).transform_point3(self.total_center_of_mass(handle));
                total.move_application_point(com);
            }
            ResultantMode::Wrench(None) => total.convert_to_wrench(),
            ResultantMode::Wrench(Some(constraint)) => total.convert_to_wrench_constrained(&constraint),
        }
        total
    }

    fn summed_resultant(&self, handle: BodyHandle) -> Resultant {
        let mut total = self.entries[handle.0].body.resultant;
        for part in self.enabled_parts(handle) {
            total.add_resultant(&self.summed_resultant(part));
        }
        total
    }

    // ------------------------------------------------------------------
    // Aggregate mass properties
    // ------------------------------------------------------------------

    /// Aggregate totals of the body and its enabled parts, in the body's frame.
    ///
    /// The inertia tensor is the body's own tensor only: part tensors are not
    /// composed into it.
    pub fn totals(&self, handle: BodyHandle) -> MassTotals {
        let entry = &self.entries[handle.0];
        if let Some(cached) = entry.totals.get() {
            return cached;
        }

        let own = &entry.body;
        let mut mass = own.mass;
        let mut weighted = own.center_of_mass * own.mass;
        for part in self.enabled_parts(handle) {
            let part_totals = self.totals(part);
            let part_com = self.entries[part.0]
                .body
                .placement
                .matrix()
                .transform_point3(part_totals.center_of_mass);
            mass += part_totals.mass;
            weighted += part_com * part_totals.mass;
        }
        let center_of_mass = if mass.abs() > NEAR_ZERO {
            weighted / mass
        } else {
            own.center_of_mass
        };

        let totals = MassTotals {
            mass,
            center_of_mass,
            inertia: own.inertia,
            inverse_inertia: safe_inverse(&own.inertia),
        };
        entry.totals.set(Some(totals));
        totals
    }

    pub fn total_mass(&self, handle: BodyHandle) -> f64 {
        self.totals(handle).mass
    }

    pub fn total_center_of_mass(&self, handle: BodyHandle) -> DVec3 {
        self.totals(handle).center_of_mass
    }

    pub fn total_inertia(&self, handle: BodyHandle) -> DMat3 {
        self.totals(handle).inertia
    }

    pub fn total_inverse_inertia(&self, handle: BodyHandle) -> DMat3 {
        self.totals(handle).inverse_inertia
    }

    // ------------------------------------------------------------------
    // Single-axis rotation
    // ------------------------------------------------------------------

    /// Integrates one step of rotation about a local hinge axis and applies it
    /// to the body's placement. Returns the new hinge angle in degrees.
    ///
    /// The resultant (this tick's, or `resultant_override`) is taken to the
    /// local frame and to `axis_origin`; its moment about `axis` drives an
    /// angular acceleration through the inverse inertia. The angular rate is
    /// seeded from the transform history. `constrainer(new_deg, old_deg, dt)`
    /// may clamp the result, e.g. [`HingeLimits::clamp`].
    pub fn integrate_force_for_rotation(
        &mut self,
        handle: BodyHandle,
        axis_origin: DVec3,
        axis: DVec3,
        current_angle_deg: f64,
        constrainer: Option<&dyn Fn(f64, f64, f64) -> f64>,
        resultant_override: Option<&Resultant>,
    ) -> f64 {
        let axis = axis.normalize_or_zero();
        let history = self.history(handle);
        let dt = history.dt();
        if axis == DVec3::ZERO || history.is_empty() || dt <= NEAR_ZERO {
            return current_angle_deg;
        }

        let world = match resultant_override {
            Some(r) => *r,
            None => self.get_resultant(handle, ResultantMode::Raw),
        };
        let mut local = world.transformed(&self.local_from_world(handle));
        local.move_application_point(axis_origin);
        let moment_about_axis = local.moment.dot(axis);

        let inverse_inertia = self.total_inverse_inertia(handle);
        let angular_acceleration = (inverse_inertia * (axis * moment_about_axis)).dot(axis);
        let angular_velocity = history.angular_velocity_about_local_axis(axis) + angular_acceleration * dt;

        let candidate_deg = current_angle_deg + (angular_velocity * dt).to_degrees();
        let new_deg = match constrainer {
            Some(constrain) => constrain(candidate_deg, current_angle_deg, dt),
            None => candidate_deg,
        };

        let entry = &mut self.entries[handle.0];
        entry
            .body
            .placement
            .rotate_about_local_axis(axis_origin, axis, (new_deg - current_angle_deg).to_radians());
        self.invalidate(handle);
        new_deg
    }
}
