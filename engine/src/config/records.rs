//! Configuration records
//!
//! Plain serde mirrors of the JSON body, volume, curve and foil
//! descriptions. Field names are camelCase on the wire. Records carry no
//! behavior beyond conversions into glam types; the builders in
//! [`super::loader`] turn them into engine objects.

use serde::{Deserialize, Serialize};

use crate::aero::ClCdStall;
use crate::physics::geometry::{ChordLine, Plane};
use crate::physics::types::{DMat3, DQuat, DVec2, DVec3};

// ============================================================================
// PRIMITIVES
// ============================================================================

/// `{x, y, z}`; missing components are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XyzRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<XyzRecord> for DVec3 {
    fn from(r: XyzRecord) -> Self {
        DVec3::new(r.x, r.y, r.z)
    }
}

/// `{x, y}`; missing components are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XyRecord {
    pub x: f64,
    pub y: f64,
}

impl From<XyRecord> for DVec2 {
    fn from(r: XyRecord) -> Self {
        DVec2::new(r.x, r.y)
    }
}

/// Upper triangle of a symmetric inertia tensor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaRecord {
    pub xx: f64,
    pub xy: f64,
    pub xz: f64,
    pub yy: f64,
    pub yz: f64,
    pub zz: f64,
}

impl From<InertiaRecord> for DMat3 {
    fn from(r: InertiaRecord) -> Self {
        DMat3::from_cols(
            DVec3::new(r.xx, r.xy, r.xz),
            DVec3::new(r.xy, r.yy, r.yz),
            DVec3::new(r.xz, r.yz, r.zz),
        )
    }
}

/// Orientation quaternion; defaults to identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuatRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for QuatRecord {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl From<QuatRecord> for DQuat {
    fn from(r: QuatRecord) -> Self {
        let q = DQuat::from_xyzw(r.x, r.y, r.z, r.w);
        if q.length_squared() > 0.0 { q.normalize() } else { DQuat::IDENTITY }
    }
}

/// Plane `normal · p + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneRecord {
    pub normal: XyzRecord,
    #[serde(default)]
    pub d: f64,
}

impl From<PlaneRecord> for Plane {
    fn from(r: PlaneRecord) -> Self {
        Plane::new(r.normal.into(), r.d)
    }
}

// ============================================================================
// BODIES AND VOLUMES
// ============================================================================

/// One cell of a volumes record: bare vertex indices or indices with mass.
///
/// The shape follows from the index count (4, 5, 6 or 8).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexEntry {
    /// `[0, 1, 2, 3]`
    Bare(Vec<usize>),
    /// `{"indices": [...], "mass": 2.0, "massDistribution": 0.5}`
    Detailed {
        indices: Vec<usize>,
        #[serde(default)]
        mass: Option<f64>,
        #[serde(default, rename = "massDistribution")]
        mass_distribution: Option<f64>,
    },
}

impl IndexEntry {
    pub fn indices(&self) -> &[usize] {
        match self {
            IndexEntry::Bare(indices) => indices,
            IndexEntry::Detailed { indices, .. } => indices,
        }
    }

    pub fn mass(&self) -> Option<f64> {
        match self {
            IndexEntry::Bare(_) => None,
            IndexEntry::Detailed { mass, .. } => *mass,
        }
    }

    pub fn mass_distribution(&self) -> Option<f64> {
        match self {
            IndexEntry::Bare(_) => None,
            IndexEntry::Detailed { mass_distribution, .. } => *mass_distribution,
        }
    }
}

/// Mass-carrying volume of a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesRecord {
    /// Flat coordinate list `[x0, y0, z0, x1, ...]`
    pub vertices: Vec<f64>,
    /// One entry per cell
    pub indices: Vec<IndexEntry>,
    /// When present every cell is duplicated by reflection through it
    #[serde(default)]
    pub mirror_plane: Option<PlaneRecord>,
}

fn enabled_default() -> bool {
    true
}

/// A rigid body and, recursively, its parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyRecord {
    #[serde(default)]
    pub name: Option<String>,
    /// Total mass; spread over `volumes` when both are given
    #[serde(default)]
    pub mass: Option<f64>,
    /// Overrides the volume-derived center of mass
    #[serde(default)]
    pub center_of_mass: Option<XyzRecord>,
    /// Overrides the volume-derived inertia tensor
    #[serde(default)]
    pub moment_inertia: Option<InertiaRecord>,
    /// Position relative to the owning body (world for roots)
    #[serde(default)]
    pub position: Option<XyzRecord>,
    #[serde(default)]
    pub orientation: Option<QuatRecord>,
    #[serde(default)]
    pub volumes: Option<VolumesRecord>,
    /// Transforms kept for velocity estimates (2..=8; more allows higher-order differences)
    #[serde(default)]
    pub history_capacity: Option<usize>,
    #[serde(default)]
    pub parts: Vec<BodyRecord>,
    /// Whether this body counts when it is a part of another
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

// ============================================================================
// CURVES AND FOILS
// ============================================================================

/// Attached-flow coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClCdInterpRecord {
    /// Angles of attack (degrees), strictly increasing
    pub alphas: Vec<f64>,
    pub cls: Vec<f64>,
    pub cds: Vec<f64>,
    /// Moment coefficients; absent or mismatched means chord-fraction moments
    #[serde(default)]
    pub cms: Option<Vec<f64>>,
}

/// Post-stall parameters; omitted fields take the flat-plate defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClCdStallRecord {
    pub cl45_deg: f64,
    pub cd45_deg: f64,
    pub cd90_deg: f64,
}

impl Default for ClCdStallRecord {
    fn default() -> Self {
        let stall = ClCdStall::default();
        Self {
            cl45_deg: stall.cl45,
            cd45_deg: stall.cd45,
            cd90_deg: stall.cd90,
        }
    }
}

impl From<ClCdStallRecord> for ClCdStall {
    fn from(r: ClCdStallRecord) -> Self {
        ClCdStall::new(r.cl45_deg, r.cd45_deg, r.cd90_deg)
    }
}

/// Full aerodynamic curve description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveRecord {
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    /// Reynolds number of the source data
    #[serde(default)]
    pub re: Option<f64>,
    pub cl_cd_interp: ClCdInterpRecord,
    #[serde(default)]
    pub cl_cd_stall: Option<ClCdStallRecord>,
    #[serde(default)]
    pub stall_start_deg: f64,
    #[serde(default)]
    pub lift_end_deg: f64,
    /// Must mirror `liftEndDeg` about 90° when given
    #[serde(default)]
    pub aft_lift_end_deg: Option<f64>,
    /// Must mirror `stallStartDeg` about 90° when given
    #[serde(default)]
    pub aft_stall_start_deg: Option<f64>,
    #[serde(default)]
    pub is_fore_aft_symmetric: bool,
    #[serde(default)]
    pub is_symmetric: bool,
}

/// Leading and trailing edge of a foil section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordLineRecord {
    pub start: XyRecord,
    pub end: XyRecord,
}

impl From<ChordLineRecord> for ChordLine {
    fn from(r: ChordLineRecord) -> Self {
        ChordLine::new(r.start.into(), r.end.into())
    }
}

/// A foil's curve: a name in the curve library or an inline record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurveSource {
    Named(String),
    Inline(Box<CurveRecord>),
}

/// One foil section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoilRecord {
    pub chord_line: ChordLineRecord,
    #[serde(default)]
    pub slice_z: f64,
    pub area: f64,
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    pub curve: CurveSource,
}
