//! Aerodynamic curve: full-circle coefficients for one section
//!
//! The angle domain is split by four boundaries,
//! `stall_start ≤ lift_end ≤ 90° ≤ aft_lift_end ≤ aft_stall_start`:
//!
//! ```text
//! 0°      stall_start   lift_end      aft_lift_end   aft_stall_start     180°
//! |-lifting-|---blend-----|----stalled----|------blend-----|-----lifting----|
//! ```
//!
//! The aft boundaries always mirror the fore ones about 90°. Inside a blend
//! band the two models are mixed with the smoothstep `s = 3x² − 2x³`, which
//! keeps the value continuous and the slope flat at both band edges.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::interp::ClCdInterp;
use super::stall::ClCdStall;
use crate::error::AeroError;

// Curve libraries are shared between foils and possibly threads.
static_assertions::assert_impl_all!(AerodynamicCurve: Send, Sync);

/// Tolerance when checking that aft bands mirror the fore bands.
const BAND_TOLERANCE_DEG: f64 = 1e-6;

/// Lift, drag and moment coefficients at one angle of attack.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AeroCoefficients {
    pub cl: f64,
    pub cd: f64,
    /// Moment coefficient, or pressure-center chord fraction when
    /// `cm_is_chord_fraction` is set.
    pub cm: f64,
    pub cm_is_chord_fraction: bool,
}

impl AeroCoefficients {
    /// `self·(1−s) + other·s`; the moment comes from the dominant model when
    /// the two disagree on what `cm` means.
    fn blend(&self, other: &AeroCoefficients, s: f64) -> AeroCoefficients {
        let (cm, cm_is_chord_fraction) = if self.cm_is_chord_fraction == other.cm_is_chord_fraction {
            (self.cm * (1.0 - s) + other.cm * s, self.cm_is_chord_fraction)
        } else if s < 0.5 {
            (self.cm, self.cm_is_chord_fraction)
        } else {
            (other.cm, other.cm_is_chord_fraction)
        };
        AeroCoefficients {
            cl: self.cl * (1.0 - s) + other.cl * s,
            cd: self.cd * (1.0 - s) + other.cd * s,
            cm,
            cm_is_chord_fraction,
        }
    }
}

/// Cubic smoothstep on `x` clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Wraps an angle into `[-180, 180)`.
#[inline]
pub fn wrap_degrees(angle_deg: f64) -> f64 {
    (angle_deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Coefficients over the full circle for one wing section.
#[derive(Debug, Clone, PartialEq)]
pub struct AerodynamicCurve {
    pub aspect_ratio: Option<f64>,
    /// Reynolds number the table was measured at; informational.
    pub reynolds: Option<f64>,
    lifting: ClCdInterp,
    stall: Option<ClCdStall>,
    stall_start_deg: f64,
    lift_end_deg: f64,
    fore_aft_symmetric: bool,
    symmetric: bool,
}

impl AerodynamicCurve {
    /// Curve from a lifting table with an optional stall model.
    ///
    /// Requires `0 ≤ stall_start_deg ≤ lift_end_deg ≤ 90`.
    pub fn new(
        lifting: ClCdInterp,
        stall: Option<ClCdStall>,
        stall_start_deg: f64,
        lift_end_deg: f64,
    ) -> Result<Self, AeroError> {
        let ordered = 0.0 <= stall_start_deg && stall_start_deg <= lift_end_deg && lift_end_deg <= 90.0;
        if !ordered {
            return Err(AeroError::InvalidBoundaries {
                stall_start_deg,
                lift_end_deg,
            });
        }
        Ok(Self {
            aspect_ratio: None,
            reynolds: None,
            lifting,
            stall,
            stall_start_deg,
            lift_end_deg,
            fore_aft_symmetric: false,
            symmetric: false,
        })
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: Option<f64>) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_reynolds(mut self, reynolds: Option<f64>) -> Self {
        self.reynolds = reynolds;
        self
    }

    /// `symmetric` mirrors negative angles onto positive ones;
    /// `fore_aft_symmetric` records that the lifting table was mirrored
    /// about 90°.
    pub fn with_symmetry(mut self, symmetric: bool, fore_aft_symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self.fore_aft_symmetric = fore_aft_symmetric;
        self
    }

    /// Accepts explicit aft boundaries only when they mirror the fore ones.
    pub fn with_aft_bands(self, aft_lift_end_deg: f64, aft_stall_start_deg: f64) -> Result<Self, AeroError> {
        let mirrored = (aft_lift_end_deg - self.aft_lift_end_deg()).abs() <= BAND_TOLERANCE_DEG
            && (aft_stall_start_deg - self.aft_stall_start_deg()).abs() <= BAND_TOLERANCE_DEG;
        if !mirrored {
            return Err(AeroError::AsymmetricStallBands {
                aft_lift_end_deg,
                aft_stall_start_deg,
            });
        }
        Ok(self)
    }

    pub fn stall_start_deg(&self) -> f64 {
        self.stall_start_deg
    }

    pub fn lift_end_deg(&self) -> f64 {
        self.lift_end_deg
    }

    pub fn aft_lift_end_deg(&self) -> f64 {
        180.0 - self.lift_end_deg
    }

    pub fn aft_stall_start_deg(&self) -> f64 {
        180.0 - self.stall_start_deg
    }

    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn is_fore_aft_symmetric(&self) -> bool {
        self.fore_aft_symmetric
    }

    pub fn lifting(&self) -> &ClCdInterp {
        &self.lifting
    }

    pub fn stall(&self) -> Option<&ClCdStall> {
        self.stall.as_ref()
    }

    /// Weight of the stalled model at `|α|`; 0 in the lifting region, 1 in
    /// the stalled region.
    fn stall_weight(&self, magnitude: f64) -> f64 {
        let (start, end) = (self.stall_start_deg, self.lift_end_deg);
        let (aft_end, aft_start) = (self.aft_lift_end_deg(), self.aft_stall_start_deg());

        if magnitude < start || magnitude > aft_start {
            0.0
        } else if magnitude >= end && magnitude <= aft_end {
            1.0
        } else if magnitude < end {
            smoothstep((magnitude - start) / (end - start))
        } else {
            smoothstep((aft_start - magnitude) / (aft_start - aft_end))
        }
    }

    /// Coefficients at `angle_deg` (any angle; wrapped to `[-180, 180)`).
    pub fn evaluate(&self, angle_deg: f64) -> AeroCoefficients {
        let mut alpha = wrap_degrees(angle_deg);
        let mirrored = self.symmetric && alpha < 0.0;
        if mirrored {
            alpha = -alpha;
        }

        let mut coefficients = match &self.stall {
            None => self.lifting.evaluate(alpha),
            Some(stall) => {
                let s = self.stall_weight(alpha.abs());
                if s <= 0.0 {
                    self.lifting.evaluate(alpha)
                } else if s >= 1.0 {
                    stall.evaluate(alpha)
                } else {
                    self.lifting.evaluate(alpha).blend(&stall.evaluate(alpha), s)
                }
            }
        };

        if mirrored {
            coefficients.cl = -coefficients.cl;
            if !coefficients.cm_is_chord_fraction {
                coefficients.cm = -coefficients.cm;
            }
        }
        coefficients
    }

    /// Samples the curve from -180° up to 180° in `step_deg` increments.
    pub fn polar(&self, step_deg: f64) -> Vec<(f64, AeroCoefficients)> {
        let step = step_deg.abs().max(0.01);
        let count = (360.0 / step).floor() as usize;
        (0..=count)
            .map(|i| {
                let angle = -180.0 + i as f64 * step;
                (angle, self.evaluate(angle))
            })
            .collect()
    }
}

/// Named curves shared between foils.
#[derive(Debug, Clone, Default)]
pub struct CurveLibrary {
    curves: HashMap<String, Arc<AerodynamicCurve>>,
}

impl CurveLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, curve: AerodynamicCurve) -> Arc<AerodynamicCurve> {
        let curve = Arc::new(curve);
        self.curves.insert(name.into(), Arc::clone(&curve));
        curve
    }

    pub fn get(&self, name: &str) -> Option<Arc<AerodynamicCurve>> {
        self.curves.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Curve names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.curves.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
