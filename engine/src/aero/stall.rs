//! Closed-form post-stall coefficients
//!
//! Past stall a section behaves much like a flat plate. Three numbers pin the
//! model down: `Cl` at 45° and `Cd` at 45° and 90°. Drag is a parabola in
//! `x = (|α| − 45°) / 90°` through `(0, Cd45)`, `(½, Cd90)` and `(1, Cd45)`;
//! lift follows `Cl45 · cos(2(|α| − 45°))`, peaking at 45°, vanishing at 90°
//! and reversing aft of it; the pressure center moves linearly from quarter
//! chord at 0° to three-quarter chord at 180°.

use serde::{Deserialize, Serialize};

use super::curve::AeroCoefficients;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClCdStall {
    pub cl45: f64,
    pub cd45: f64,
    pub cd90: f64,
}

impl Default for ClCdStall {
    fn default() -> Self {
        Self {
            cl45: 1.08,
            cd45: 1.11,
            cd90: 1.80,
        }
    }
}

impl ClCdStall {
    pub fn new(cl45: f64, cd45: f64, cd90: f64) -> Self {
        Self { cl45, cd45, cd90 }
    }

    /// Coefficients for `angle_deg` in `[-180, 180]`.
    pub fn evaluate(&self, angle_deg: f64) -> AeroCoefficients {
        let magnitude = angle_deg.abs();
        let x = (magnitude - 45.0) / 90.0;
        // Far below 45° the parabola would dip under zero.
        let cd = (self.cd45 + 4.0 * (self.cd90 - self.cd45) * x * (1.0 - x)).max(0.0);

        let sign = if angle_deg < 0.0 { -1.0 } else { 1.0 };
        let cl = sign * self.cl45 * (2.0 * (magnitude - 45.0)).to_radians().cos();

        AeroCoefficients {
            cl,
            cd,
            cm: 0.25 + 0.5 * magnitude / 180.0,
            cm_is_chord_fraction: true,
        }
    }
}
