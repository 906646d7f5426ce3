//! Bivariate Gaussian kernel density estimation.
//!
//! The kernel covariance is the (weighted) data covariance scaled by Scott's
//! factor `n_eff^(-1/6)`.
//!
//! # References
//!
//! - Scott, D. W. (1992). *Multivariate Density Estimation*. Wiley.
//! - Silverman, B. W. (1986). *Density Estimation for Statistics and Data Analysis*.

use std::f64::consts::PI;

/// Correlation above which the covariance is treated as singular.
const MAX_CORRELATION: f64 = 0.999;

/// Minimum bandwidth as a fraction of the axis range.
const MIN_BANDWIDTH_FRACTION: f64 = 0.01;

/// A fitted 2D Gaussian KDE.
#[derive(Debug, Clone)]
pub(crate) struct GaussianKde {
    points: Vec<(f64, f64)>,
    /// Weights normalized to sum to one.
    weights: Vec<f64>,
    /// Inverse of the kernel covariance, as (a, b, c) for [[a, b], [b, c]].
    inv_cov: (f64, f64, f64),
    norm: f64,
}

impl GaussianKde {
    /// Fit to the given points. `x` and `y` must have equal, non-zero length;
    /// `weights`, when given, must match and be non-negative with a positive sum.
    pub(crate) fn fit(x: &[f32], y: &[f32], weights: Option<&[f32]>) -> Self {
        let n = x.len().min(y.len());
        let points: Vec<(f64, f64)> =
            (0..n).map(|i| (f64::from(x[i]), f64::from(y[i]))).collect();

        let raw: Vec<f64> = match weights {
            Some(w) => w.iter().take(n).map(|&v| f64::from(v.max(0.0))).collect(),
            None => vec![1.0; n],
        };
        let total: f64 = raw.iter().sum();
        let weights: Vec<f64> = if total > 0.0 {
            raw.iter().map(|w| w / total).collect()
        } else {
            vec![1.0 / n as f64; n]
        };

        let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
        let n_eff = if sum_sq > 0.0 { 1.0 / sum_sq } else { n as f64 };
        let factor = n_eff.powf(-1.0 / 6.0);

        let (mx, my) = points
            .iter()
            .zip(&weights)
            .fold((0.0, 0.0), |(ax, ay), (&(px, py), w)| (ax + w * px, ay + w * py));

        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for (&(px, py), w) in points.iter().zip(&weights) {
            let dx = px - mx;
            let dy = py - my;
            sxx += w * dx * dx;
            sxy += w * dx * dy;
            syy += w * dy * dy;
        }
        // Unbiased weighted covariance.
        let bias = 1.0 - sum_sq;
        if bias > 0.0 {
            sxx /= bias;
            sxy /= bias;
            syy /= bias;
        }

        let f2 = factor * factor;
        let correlation = if sxx > 0.0 && syy > 0.0 { sxy / (sxx * syy).sqrt() } else { 1.0 };

        let (a, b, c) = if correlation.abs() < MAX_CORRELATION {
            (sxx * f2, sxy * f2, syy * f2)
        } else {
            let (x_range, y_range) = ranges(&points);
            let hx = (sxx.sqrt() * factor).max(min_bandwidth(x_range));
            let hy = (syy.sqrt() * factor).max(min_bandwidth(y_range));
            (hx * hx, 0.0, hy * hy)
        };

        let det = a * c - b * b;
        let inv_cov = (c / det, -b / det, a / det);
        let norm = 1.0 / (2.0 * PI * det.sqrt());

        Self { points, weights, inv_cov, norm }
    }

    /// Density at `(px, py)`.
    pub(crate) fn evaluate(&self, px: f32, py: f32) -> f64 {
        let (px, py) = (f64::from(px), f64::from(py));
        let (ia, ib, ic) = self.inv_cov;
        let sum: f64 = self
            .points
            .iter()
            .zip(&self.weights)
            .map(|(&(xi, yi), w)| {
                let dx = px - xi;
                let dy = py - yi;
                let q = ia * dx * dx + 2.0 * ib * dx * dy + ic * dy * dy;
                w * (-0.5 * q).exp()
            })
            .sum();
        sum * self.norm
    }
}

fn ranges(points: &[(f64, f64)]) -> (f64, f64) {
    let (mut x_lo, mut x_hi, mut y_lo, mut y_hi) =
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_lo = x_lo.min(x);
        x_hi = x_hi.max(x);
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }
    (x_hi - x_lo, y_hi - y_lo)
}

fn min_bandwidth(range: f64) -> f64 {
    if range > 0.0 {
        range * MIN_BANDWIDTH_FRACTION
    } else {
        1.0
    }
}
