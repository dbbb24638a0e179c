//! Natural cubic spline over tabulated samples
//!
//! Second derivatives are solved once at construction (tridiagonal system,
//! zero curvature at both ends); evaluation is a binary search plus one
//! cubic. Inputs outside the sample range are clamped to the end values.

use crate::error::AeroError;

/// Piecewise-cubic interpolant with continuous first and second derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivative at each knot.
    second: Vec<f64>,
}

impl CubicSpline {
    /// Fits a natural spline through `(xs[i], ys[i])`.
    ///
    /// `xs` must be strictly increasing and hold at least two samples.
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self, AeroError> {
        if xs.len() != ys.len() {
            return Err(AeroError::TableLengthMismatch {
                column: "values",
                got: ys.len(),
                expected: xs.len(),
            });
        }
        if xs.len() < 2 {
            return Err(AeroError::TooFewSamples(xs.len()));
        }
        if let Some(index) = (1..xs.len()).find(|&i| xs[i] <= xs[i - 1]) {
            return Err(AeroError::NonIncreasingAngles {
                index,
                angle: xs[index],
            });
        }

        let second = solve_second_derivatives(xs, ys);
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            second,
        })
    }

    /// Lowest and highest sample positions.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Index `i` of the interval `[xs[i], xs[i + 1]]` holding `x`.
    fn interval(&self, x: f64) -> usize {
        let upper = self.xs.partition_point(|&k| k <= x);
        upper.saturating_sub(1).min(self.xs.len() - 2)
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let (lo, hi) = self.domain();
        let x = x.clamp(lo, hi);
        let i = self.interval(x);

        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.second[i] + (b * b * b - b) * self.second[i + 1]) * h * h / 6.0
    }

    /// First derivative; zero outside the sample range.
    pub fn derivative(&self, x: f64) -> f64 {
        let (lo, hi) = self.domain();
        if x < lo || x > hi {
            return 0.0;
        }
        let i = self.interval(x);

        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        (self.ys[i + 1] - self.ys[i]) / h - (3.0 * a * a - 1.0) * h / 6.0 * self.second[i]
            + (3.0 * b * b - 1.0) * h / 6.0 * self.second[i + 1]
    }
}

/// Thomas algorithm on the natural-spline system.
fn solve_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut second = vec![0.0; n];
    if n < 3 {
        return second;
    }

    // Forward sweep over the interior knots 1..n-1.
    let mut diag = vec![0.0; n];
    let mut rhs = vec![0.0; n];
    for i in 1..n - 1 {
        let h0 = xs[i] - xs[i - 1];
        let h1 = xs[i + 1] - xs[i];
        diag[i] = 2.0 * (h0 + h1);
        rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h1 - (ys[i] - ys[i - 1]) / h0);
        if i > 1 {
            let factor = h0 / diag[i - 1];
            diag[i] -= factor * h0;
            rhs[i] -= factor * rhs[i - 1];
        }
    }

    // Back substitution.
    for i in (1..n - 1).rev() {
        let h1 = xs[i + 1] - xs[i];
        second[i] = (rhs[i] - h1 * second[i + 1]) / diag[i];
    }
    second
}
