//! Error types for the sailing physics core
//!
//! Load-time problems surface as errors; per-tick numerical degeneracies
//! (singular tensors, zero flow speed) are handled in place and never raise.

use thiserror::Error;

/// Errors from body hierarchy edits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// A body cannot be a part of itself
    #[error("body {0} cannot be added as a part of itself")]
    SelfPart(usize),

    /// Attaching would create a cycle in the body tree
    #[error("attaching body {part} under body {parent} would create a cycle")]
    Cycle {
        /// Intended owner
        parent: usize,
        /// Body being attached
        part: usize,
    },
}

/// Errors building aerodynamic curves from tabulated data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AeroError {
    /// A coefficient column does not match the angle column
    #[error("{column} table has {got} samples but {expected} angles were given")]
    TableLengthMismatch {
        /// Column name ("cls", "cds")
        column: &'static str,
        /// Samples in the column
        got: usize,
        /// Samples in the angle column
        expected: usize,
    },

    /// Not enough samples to build a spline
    #[error("at least 2 samples are required, got {0}")]
    TooFewSamples(usize),

    /// Angles must be strictly increasing
    #[error("angle table not strictly increasing at index {index} ({angle}°)")]
    NonIncreasingAngles {
        /// Offending index
        index: usize,
        /// Angle at that index
        angle: f64,
    },

    /// Stall boundaries violate 0 <= stall start <= lift end <= 90
    #[error("invalid stall boundaries: stall start {stall_start_deg}°, lift end {lift_end_deg}°")]
    InvalidBoundaries {
        /// Start of the lifting → stalled transition
        stall_start_deg: f64,
        /// End of the lifting region
        lift_end_deg: f64,
    },

    /// Independent fore/aft stall bands are not supported
    #[error(
        "aft stall band ({aft_lift_end_deg}°..{aft_stall_start_deg}°) must mirror the fore band; \
         asymmetric stall bands are unsupported"
    )]
    AsymmetricStallBands {
        /// Requested aft end of the lifting region
        aft_lift_end_deg: f64,
        /// Requested aft start of the transition
        aft_stall_start_deg: f64,
    },
}

/// Errors loading configuration records.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed JSON or a record that does not match the schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Flat vertex list is not a multiple of three
    #[error("vertex list length {0} is not a multiple of 3")]
    VertexListLength(usize),

    /// A cell references a vertex that does not exist
    #[error("vertex index {index} out of range ({count} vertices)")]
    VertexIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of vertices available
        count: usize,
    },

    /// A foil references a curve that is not in the library
    #[error("unknown aerodynamic curve '{0}'")]
    UnknownCurve(String),

    /// Curve data failed validation
    #[error(transparent)]
    Aero(#[from] AeroError),

    /// Body hierarchy could not be assembled
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}
