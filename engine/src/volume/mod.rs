//! Volumetric mass properties
//!
//! Bodies that carry a `volumes` record describe their mass distribution as
//! a set of convex cells. Every cell is decomposed into tetrahedra, which are
//! the only primitive the mass and inertia maths ever sees.
//!
//! # Submodules
//!
//! - [`tetrahedron`] - Leaf primitive: volume, centroid, inertia about its centroid
//! - [`cell`] - Tetrahedron / bipyramid / prism / hexahedron cells and their wirings
//! - [`mass`] - Mass allocation over cells and the composed inertia tensor
//! - [`slice`] - Splitting a tetrahedron by a plane (waterline cuts)
//!
//! # Example
//!
//! ```ignore
//! use sail_physics::volume::{VolumeCell, allocate_mass, overall_inertia};
//!
//! let mut cells = vec![VolumeCell::new(box_vertices).unwrap()];
//! allocate_mass(&mut cells, Some(120.0));
//! let props = overall_inertia(&cells);
//! println!("mass {} at {:?}", props.mass, props.center_of_mass);
//! ```

pub mod cell;
pub mod mass;
pub mod slice;
pub mod tetrahedron;

pub use cell::{CellShape, VolumeCell};
pub use mass::{MassProperties, allocate_mass, overall_inertia, overall_inertia_of, parallel_axis_term};
pub use slice::{SliceResult, slice_with_plane, volume_below};
pub use tetrahedron::{TETRAHEDRON_FACES, Tetrahedron};
