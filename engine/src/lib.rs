//! Sail Physics Library
//!
//! Physics core for a sailing simulation: a hierarchical rigid-body engine,
//! a tetrahedral volume/mass engine and a lift/drag/moment foil model. Once
//! per tick they produce the net force and moment on an assembly of hull,
//! spars, sails, keel and rudder. Pose integration is left to the caller.
//!
//! # Modules
//!
//! - [`physics`] - Body tree, transform history, resultants, hinge rotation
//! - [`volume`] - Tetrahedral cells, mass allocation, inertia, plane slicing
//! - [`aero`] - Coefficient curves and foil forces
//! - [`config`] - JSON records and load-time builders
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use sail_physics::aero::{AIR_DENSITY, CurveLibrary, Foil};
//! use sail_physics::physics::{BodyTree, DVec3, ResultantMode};
//!
//! let mut tree = BodyTree::new();
//! let boat = tree.load_body_json(&boat_json)?;
//! let mast = tree.find("mast").unwrap();
//!
//! // One tick
//! tree.clear_forces(boat);
//! tree.push_placement_transforms(dt);
//! let sail_force = main_sail.calc_world_force(AIR_DENSITY, tree.history(mast), wind);
//! tree.add_world_resultant(mast, &sail_force.resultant);
//! let net = tree.get_resultant(boat, ResultantMode::CenterOfMass);
//! integrator.step(net, tree.total_mass(boat), tree.total_inverse_inertia(boat), dt);
//! ```

pub mod aero;
pub mod config;
pub mod error;
pub mod physics;
pub mod volume;

// Re-export the types most callers touch at crate level for convenience
pub use aero::{AerodynamicCurve, CurveLibrary, Foil};
pub use error::{AeroError, ConfigError, HierarchyError};
pub use physics::{BodyHandle, BodyTree, Resultant, ResultantMode, RigidBody};
pub use volume::{SliceResult, Tetrahedron, VolumeCell};
