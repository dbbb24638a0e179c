//! Aerodynamic and hydrodynamic foil model
//!
//! Sails, keels and rudders are all foils: a chord line, a reference area
//! and a curve mapping angle of attack to lift, drag and moment
//! coefficients. The same code serves air and water; only the density
//! passed to the force calculation differs.
//!
//! # Submodules
//!
//! - [`spline`] - Natural cubic spline used for tabulated coefficients
//! - [`interp`] - Attached-flow coefficient table with fore/aft mirroring
//! - [`stall`] - Closed-form post-stall model
//! - [`curve`] - Full-circle curve blending both models, curve library
//! - [`foil`] - Local and world-frame force on one foil section

pub mod curve;
pub mod foil;
pub mod interp;
pub mod spline;
pub mod stall;

pub use curve::{AeroCoefficients, AerodynamicCurve, CurveLibrary, smoothstep, wrap_degrees};
pub use foil::{AIR_DENSITY, Foil, FoilForce, SEA_WATER_DENSITY, WorldFoilForce};
pub use interp::{ClCdInterp, default_center_of_pressure};
pub use spline::CubicSpline;
pub use stall::ClCdStall;
