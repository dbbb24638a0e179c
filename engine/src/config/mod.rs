//! Load-time configuration
//!
//! Bodies, volumes, aerodynamic curves and foils are described in JSON with
//! camelCase field names and loaded once. A foil may embed its curve or name
//! one from a shared [`CurveLibrary`](crate::aero::CurveLibrary).
//!
//! # Example
//!
//! ```ignore
//! use sail_physics::aero::{CurveLibrary, Foil};
//! use sail_physics::config::{FoilRecord, from_json_str};
//! use sail_physics::physics::BodyTree;
//!
//! let mut tree = BodyTree::new();
//! let boat = tree.load_body_json(include_str!("boat.json"))?;
//!
//! let library = CurveLibrary::from_json(include_str!("curves.json"))?;
//! let record: FoilRecord = from_json_str(include_str!("main_sail.json"))?;
//! let main_sail = Foil::from_record(&record, &library)?;
//! ```

pub mod loader;
pub mod records;

pub use loader::{build_volume_cells, from_json_file, from_json_str, resolve_mass_properties};
pub use records::{
    BodyRecord, ChordLineRecord, ClCdInterpRecord, ClCdStallRecord, CurveRecord, CurveSource, FoilRecord,
    IndexEntry, InertiaRecord, PlaneRecord, QuatRecord, VolumesRecord, XyRecord, XyzRecord,
};
