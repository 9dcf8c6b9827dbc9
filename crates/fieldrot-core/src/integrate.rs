use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::CUBIC_MIN_SAMPLES;
use crate::error::{FieldRotError, Result};

/// How to fit the rate samples when fewer than four are usable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Cubic spline only; fewer than four samples is an error.
    #[default]
    Cubic,
    /// Fall back to the highest polynomial degree the samples support.
    AllowDegraded,
}

impl std::fmt::Display for FitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cubic => write!(f, "Cubic"),
            Self::AllowDegraded => write!(f, "Cubic (degraded fallback allowed)"),
        }
    }
}

/// Piecewise polynomial through (t, value) samples.
///
/// With four or more samples this is the interpolating cubic spline with
/// not-a-knot end conditions. Outside the sampled range the end pieces are
/// extrapolated.
#[derive(Clone, Debug)]
pub struct RateSpline {
    /// Segment boundaries; `breaks.len() == coeffs.len() + 1`.
    breaks: Vec<f64>,
    /// Per segment `[a, b, c, d]` of `a + b*dx + c*dx^2 + d*dx^3`, `dx = t - breaks[i]`.
    coeffs: Vec<[f64; 4]>,
    degree: usize,
}

impl RateSpline {
    /// Fit through samples with strictly increasing `t`.
    pub fn fit(t: &[f64], values: &[f64], mode: FitMode) -> Result<Self> {
        if t.len() != values.len() {
            return Err(FieldRotError::InvalidSamples(format!(
                "{} times but {} values",
                t.len(),
                values.len()
            )));
        }
        if !t.windows(2).all(|w| w[1] > w[0]) {
            return Err(FieldRotError::InvalidSamples(
                "times must be strictly increasing".into(),
            ));
        }

        let n = t.len();
        if n >= CUBIC_MIN_SAMPLES {
            return Ok(not_a_knot_cubic(t, values));
        }
        if n == 0 || mode == FitMode::Cubic {
            return Err(FieldRotError::InsufficientSamples {
                usable: n,
                required: CUBIC_MIN_SAMPLES,
            });
        }

        warn!(
            samples = n,
            degree = n - 1,
            "Too few samples for a cubic spline, using a lower-degree fit"
        );
        Ok(low_degree(t, values))
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let i = self.segment(t);
        let dx = t - self.breaks[i];
        let [a, b, c, d] = self.coeffs[i];
        a + dx * (b + dx * (c + dx * d))
    }

    /// Definite integral from `lo` to `hi`. Reversed bounds give the negated value.
    pub fn integral(&self, lo: f64, hi: f64) -> f64 {
        if hi < lo {
            return -self.integral(hi, lo);
        }
        let last = self.coeffs.len() - 1;
        let mut total = 0.0;
        let mut cursor = lo;
        let mut i = self.segment(lo);
        while cursor < hi {
            let end = if i < last { self.breaks[i + 1].min(hi) } else { hi };
            total += self.antiderivative(i, end) - self.antiderivative(i, cursor);
            cursor = end;
            i += 1;
        }
        total
    }

    /// Running integral from `t[0]` to every `t[i]`; `t` must be ascending.
    pub fn cumulative(&self, t: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(t.len());
        let mut acc = 0.0;
        for (i, &ti) in t.iter().enumerate() {
            if i > 0 {
                acc += self.integral(t[i - 1], ti);
            }
            out.push(acc);
        }
        out
    }

    fn segment(&self, t: f64) -> usize {
        let interior = &self.breaks[1..self.breaks.len() - 1];
        interior.partition_point(|&b| b <= t)
    }

    fn antiderivative(&self, i: usize, t: f64) -> f64 {
        let dx = t - self.breaks[i];
        let [a, b, c, d] = self.coeffs[i];
        dx * (a + dx * (b / 2.0 + dx * (c / 3.0 + dx * d / 4.0)))
    }
}

fn not_a_knot_cubic(t: &[f64], y: &[f64]) -> RateSpline {
    let n = t.len();
    let h: Vec<f64> = t.windows(2).map(|w| w[1] - w[0]).collect();
    let slope: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

    // Second derivatives M[1..n-1]; M[0] and M[n-1] are eliminated with the
    // not-a-knot conditions (third derivative continuous at t[1] and t[n-2]).
    let m = n - 2;
    let mut sub = vec![0.0; m];
    let mut diag = vec![0.0; m];
    let mut sup = vec![0.0; m];
    let mut rhs = vec![0.0; m];
    for k in 0..m {
        let i = k + 1;
        sub[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        sup[k] = h[i];
        rhs[k] = 6.0 * (slope[i] - slope[i - 1]);
    }

    let (h0, h1) = (h[0], h[1]);
    diag[0] += h0 * (h0 + h1) / h1;
    sup[0] -= h0 * h0 / h1;

    let (ha, hb) = (h[n - 3], h[n - 2]);
    diag[m - 1] += hb * (ha + hb) / ha;
    sub[m - 1] -= hb * hb / ha;

    let inner = solve_tridiagonal(&sub, &diag, &sup, &rhs);

    let mut second = Vec::with_capacity(n);
    second.push(((h0 + h1) * inner[0] - h0 * inner[1]) / h1);
    second.extend_from_slice(&inner);
    second.push(((ha + hb) * inner[m - 1] - hb * inner[m - 2]) / ha);

    let coeffs = (0..n - 1)
        .map(|i| {
            [
                y[i],
                slope[i] - h[i] * (2.0 * second[i] + second[i + 1]) / 6.0,
                second[i] / 2.0,
                (second[i + 1] - second[i]) / (6.0 * h[i]),
            ]
        })
        .collect();

    RateSpline {
        breaks: t.to_vec(),
        coeffs,
        degree: 3,
    }
}

/// Single polynomial of degree `n - 1` through 1..=3 samples.
fn low_degree(t: &[f64], y: &[f64]) -> RateSpline {
    let (coeffs, end) = match t.len() {
        1 => ([y[0], 0.0, 0.0, 0.0], t[0]),
        2 => ([y[0], (y[1] - y[0]) / (t[1] - t[0]), 0.0, 0.0], t[1]),
        _ => {
            // Newton form expanded around t[0].
            let f01 = (y[1] - y[0]) / (t[1] - t[0]);
            let f12 = (y[2] - y[1]) / (t[2] - t[1]);
            let f012 = (f12 - f01) / (t[2] - t[0]);
            ([y[0], f01 - f012 * (t[1] - t[0]), f012, 0.0], t[2])
        }
    };
    RateSpline {
        breaks: vec![t[0], end],
        coeffs: vec![coeffs],
        degree: t.len() - 1,
    }
}

/// Thomas algorithm. `sub[0]` and `sup[n-1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = if i < n - 1 { sup[i] / denom } else { 0.0 };
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    x
}
