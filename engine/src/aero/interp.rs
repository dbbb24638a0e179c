//! Tabulated lift/drag/moment coefficients for the attached-flow region

use tracing::warn;

use super::curve::AeroCoefficients;
use super::spline::CubicSpline;
use crate::error::AeroError;

/// Pressure-center chord fraction used when no moment table is supplied.
pub fn default_center_of_pressure(angle_deg: f64) -> f64 {
    if angle_deg.abs() <= 90.0 { 0.25 } else { 0.75 }
}

/// Spline interpolation over `(angle, Cl, Cd, Cm?)` samples.
///
/// With fore/aft mirroring the table is taken as symmetric about 90°:
/// every sample `α` also yields a sample at `180° − α` with `Cl` negated and
/// `Cd`/`Cm` unchanged, so a 0..90° table covers 0..180°.
#[derive(Debug, Clone, PartialEq)]
pub struct ClCdInterp {
    cl: CubicSpline,
    cd: CubicSpline,
    /// True moment coefficient; `None` falls back to the chord-fraction default.
    cm: Option<CubicSpline>,
}

impl ClCdInterp {
    pub fn new(
        alphas: &[f64],
        cls: &[f64],
        cds: &[f64],
        cms: Option<&[f64]>,
        fore_aft_symmetric: bool,
    ) -> Result<Self, AeroError> {
        for (column, values) in [("cls", cls), ("cds", cds)] {
            if values.len() != alphas.len() {
                return Err(AeroError::TableLengthMismatch {
                    column,
                    got: values.len(),
                    expected: alphas.len(),
                });
            }
        }

        let cms = match cms {
            Some(cms) if cms.len() == alphas.len() => Some(cms),
            Some(cms) if !cms.is_empty() => {
                warn!(
                    cms = cms.len(),
                    alphas = alphas.len(),
                    "moment table length mismatch; using chord-fraction moment"
                );
                None
            }
            _ => None,
        };

        let mut angles = alphas.to_vec();
        let mut cl = cls.to_vec();
        let mut cd = cds.to_vec();
        let mut cm = cms.map(<[f64]>::to_vec);

        if fore_aft_symmetric {
            let last = angles.last().copied().unwrap_or(f64::NEG_INFINITY);
            // 180 − α runs backwards, so walk the table in reverse.
            for i in (0..alphas.len()).rev() {
                let mirrored = 180.0 - alphas[i];
                if mirrored <= last {
                    continue;
                }
                angles.push(mirrored);
                cl.push(-cls[i]);
                cd.push(cds[i]);
                if let (Some(cm), Some(source)) = (cm.as_mut(), cms) {
                    cm.push(source[i]);
                }
            }
        }

        Ok(Self {
            cl: CubicSpline::new(&angles, &cl)?,
            cd: CubicSpline::new(&angles, &cd)?,
            cm: cm.map(|cm| CubicSpline::new(&angles, &cm)).transpose()?,
        })
    }

    /// Angle range covered by the (possibly mirrored) table.
    pub fn domain(&self) -> (f64, f64) {
        self.cl.domain()
    }

    pub fn has_moment_table(&self) -> bool {
        self.cm.is_some()
    }

    /// Maps `angle_deg` into the table domain, trying one turn either way
    /// before clamping.
    fn wrap_into_domain(&self, angle_deg: f64) -> f64 {
        let (lo, hi) = self.domain();
        if (lo..=hi).contains(&angle_deg) {
            return angle_deg;
        }
        [angle_deg + 360.0, angle_deg - 360.0]
            .into_iter()
            .find(|a| (lo..=hi).contains(a))
            .unwrap_or(angle_deg)
    }

    pub fn evaluate(&self, angle_deg: f64) -> AeroCoefficients {
        let alpha = self.wrap_into_domain(angle_deg);
        let (cm, cm_is_chord_fraction) = match &self.cm {
            Some(cm) => (cm.evaluate(alpha), false),
            None => (default_center_of_pressure(alpha), true),
        };
        AeroCoefficients {
            cl: self.cl.evaluate(alpha),
            cd: self.cd.evaluate(alpha),
            cm,
            cm_is_chord_fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn flat_plate() -> ClCdInterp {
        let alphas = [0.0, 10.0, 20.0, 45.0, 90.0];
        let cls = [0.0, 0.9, 1.1, 1.0, 0.0];
        let cds = [0.02, 0.05, 0.3, 1.0, 1.8];
        ClCdInterp::new(&alphas, &cls, &cds, None, true).unwrap()
    }

    #[test]
    fn test_fore_aft_mirror() {
        let interp = flat_plate();
        assert_eq!(interp.domain(), (0.0, 180.0));
        for alpha in [10.0, 20.0, 45.0] {
            let fore = interp.evaluate(alpha);
            let aft = interp.evaluate(180.0 - alpha);
            assert_abs_diff_eq!(aft.cl, -fore.cl, epsilon = 1e-12);
            assert_abs_diff_eq!(aft.cd, fore.cd, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_default_moment_is_chord_fraction() {
        let interp = flat_plate();
        let fore = interp.evaluate(30.0);
        assert!(fore.cm_is_chord_fraction);
        assert_abs_diff_eq!(fore.cm, 0.25);
        assert_abs_diff_eq!(interp.evaluate(150.0).cm, 0.75);
    }

    #[test]
    fn test_moment_table_mismatch_falls_back() {
        let alphas = [0.0, 10.0, 20.0];
        let interp = ClCdInterp::new(&alphas, &[0.0, 0.5, 0.8], &[0.01, 0.02, 0.1], Some(&[0.1, 0.2][..]), false).unwrap();
        assert!(!interp.has_moment_table());
        assert!(interp.evaluate(5.0).cm_is_chord_fraction);
    }

    #[test]
    fn test_moment_table_is_coefficient() {
        let alphas = [0.0, 10.0, 20.0];
        let interp =
            ClCdInterp::new(&alphas, &[0.0, 0.5, 0.8], &[0.01, 0.02, 0.1], Some(&[0.0, -0.05, -0.1][..]), false).unwrap();
        let c = interp.evaluate(10.0);
        assert!(!c.cm_is_chord_fraction);
        assert_abs_diff_eq!(c.cm, -0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_wraps_negative_angles() {
        let alphas = [0.0, 90.0, 180.0, 270.0, 360.0];
        let interp = ClCdInterp::new(&alphas, &[0.0, 1.0, 0.0, -1.0, 0.0], &[0.1; 5], None, false).unwrap();
        assert_abs_diff_eq!(interp.evaluate(-90.0).cl, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let err = ClCdInterp::new(&[0.0, 10.0], &[0.0], &[0.1, 0.2], None, false).unwrap_err();
        assert_eq!(
            err,
            AeroError::TableLengthMismatch {
                column: "cls",
                got: 1,
                expected: 2
            }
        );
    }
}
