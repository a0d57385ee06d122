use crate::algorithms::segment_index;
use crate::errors::BladeError;
use crate::Result;

/// Boundary condition for the cubic spline modes. `Clamped` pins the first
/// derivative to zero at both ends, `Natural` pins the second derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Clamped,
    Natural,
}

impl Default for Boundary {
    fn default() -> Self {
        Boundary::Clamped
    }
}

/// Interpolation mode for a control schedule channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpMode {
    /// Piecewise-linear; queries outside the parameter range clamp to the
    /// nearest endpoint value.
    Linear,
    /// Cubic spline through all control points. Outside the parameter range
    /// the boundary segment's polynomial extrapolates freely, which can
    /// overshoot; this is accepted for smoothness.
    Cubic(Boundary),
    /// Shape-preserving piecewise cubic (Fritsch-Carlson). Never overshoots
    /// between adjacent control points. Outside the range the boundary
    /// Hermite segment continues.
    Monotone,
}

impl InterpMode {
    fn name(&self) -> &'static str {
        match self {
            InterpMode::Linear => "linear",
            InterpMode::Cubic(_) => "cubic",
            InterpMode::Monotone => "monotone",
        }
    }

    fn min_points(&self) -> usize {
        match self {
            InterpMode::Linear => 1,
            _ => 2,
        }
    }
}

/// A sparse designer-supplied schedule of (parameter, value) control points.
/// Construction order is irrelevant; the points are stable-sorted by parameter
/// when an interpolator is built from them. Duplicate parameter values are
/// rejected rather than silently resolved.
#[derive(Debug, Clone, Default)]
pub struct ControlSchedule {
    points: Vec<(f64, f64)>,
}

impl ControlSchedule {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn from_pairs(points: &[(f64, f64)]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Returns the control points split into parameter and value vectors,
    /// stable-sorted by parameter ascending. Fails on duplicate parameters.
    pub fn sorted_axes(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut sorted = self.points.clone();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        for pair in sorted.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(BladeError::DuplicateParameter(pair[0].0));
            }
        }

        Ok(sorted.into_iter().unzip())
    }
}

/// A cubic spline stored as knot values plus second derivatives, fit with the
/// classic tridiagonal sweep. Evaluation outside the knot range continues the
/// boundary segment's polynomial.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    y2s: Vec<f64>,
}

impl CubicSpline {
    /// Fits a spline through the given knots. `xs` must be strictly
    /// increasing with at least two entries; callers validate this.
    pub fn fit(xs: Vec<f64>, ys: Vec<f64>, boundary: Boundary) -> Self {
        let n = xs.len();
        debug_assert!(n >= 2);
        debug_assert_eq!(n, ys.len());

        let mut y2s = vec![0.0; n];
        let mut u = vec![0.0; n - 1];

        match boundary {
            Boundary::Natural => {
                // y2s[0] and u[0] stay zero
            }
            Boundary::Clamped => {
                y2s[0] = -0.5;
                let h = xs[1] - xs[0];
                u[0] = (3.0 / h) * ((ys[1] - ys[0]) / h);
            }
        }

        for i in 1..n - 1 {
            let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
            let p = sig * y2s[i - 1] + 2.0;
            y2s[i] = (sig - 1.0) / p;
            u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
            u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
        }

        let (qn, un) = match boundary {
            Boundary::Natural => (0.0, 0.0),
            Boundary::Clamped => {
                let h = xs[n - 1] - xs[n - 2];
                (0.5, (3.0 / h) * (-(ys[n - 1] - ys[n - 2]) / h))
            }
        };

        y2s[n - 1] = (un - qn * u[n - 2]) / (qn * y2s[n - 2] + 1.0);
        for k in (0..n - 1).rev() {
            y2s[k] = y2s[k] * y2s[k + 1] + u[k];
        }

        CubicSpline { xs, ys, y2s }
    }

    pub fn value_at(&self, x: f64) -> f64 {
        let i = segment_index(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.y2s[i] + (b * b * b - b) * self.y2s[i + 1]) * h * h / 6.0
    }
}

/// Shape-preserving monotone cubic (PCHIP) built from Fritsch-Carlson
/// derivative estimates, evaluated as a cubic Hermite per segment.
#[derive(Debug, Clone)]
pub struct MonotoneCubic {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

// One-sided three-point derivative estimate for the endpoints, limited so the
// boundary segment stays shape-faithful.
fn edge_slope(h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
    let mut m = ((2.0 * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
    if sign(m) != sign(d0) {
        m = 0.0;
    } else if sign(d0) != sign(d1) && m.abs() > 3.0 * d0.abs() {
        m = 3.0 * d0;
    }
    m
}

impl MonotoneCubic {
    /// Fits the interpolant. `xs` must be strictly increasing with at least
    /// two entries; callers validate this.
    pub fn fit(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        let n = xs.len();
        debug_assert!(n >= 2);
        debug_assert_eq!(n, ys.len());

        let hs: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let ds: Vec<f64> = hs
            .iter()
            .zip(ys.windows(2))
            .map(|(h, w)| (w[1] - w[0]) / h)
            .collect();

        let mut slopes = vec![0.0; n];
        if n == 2 {
            slopes[0] = ds[0];
            slopes[1] = ds[0];
        } else {
            for k in 1..n - 1 {
                if sign(ds[k - 1]) * sign(ds[k]) > 0.0 {
                    let w1 = 2.0 * hs[k] + hs[k - 1];
                    let w2 = hs[k] + 2.0 * hs[k - 1];
                    slopes[k] = (w1 + w2) / (w1 / ds[k - 1] + w2 / ds[k]);
                }
            }
            slopes[0] = edge_slope(hs[0], hs[1], ds[0], ds[1]);
            slopes[n - 1] = edge_slope(hs[n - 2], hs[n - 3], ds[n - 2], ds[n - 3]);
        }

        MonotoneCubic { xs, ys, slopes }
    }

    pub fn value_at(&self, x: f64) -> f64 {
        let i = segment_index(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * self.ys[i]
            + h10 * h * self.slopes[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.slopes[i + 1]
    }
}

/// An immutable interpolator compiled once from a control schedule and reused
/// for every evaluation. Dispatches on the mode selected at build time.
#[derive(Debug, Clone)]
pub enum ScheduleInterpolator {
    Linear { xs: Vec<f64>, ys: Vec<f64> },
    Cubic(CubicSpline),
    Monotone(MonotoneCubic),
}

impl ScheduleInterpolator {
    pub fn build(schedule: &ControlSchedule, mode: InterpMode) -> Result<Self> {
        if schedule.len() < mode.min_points() {
            return Err(BladeError::InsufficientControlPoints {
                mode: mode.name(),
                needed: mode.min_points(),
                got: schedule.len(),
            });
        }

        let (xs, ys) = schedule.sorted_axes()?;
        Ok(match mode {
            InterpMode::Linear => ScheduleInterpolator::Linear { xs, ys },
            InterpMode::Cubic(boundary) => {
                ScheduleInterpolator::Cubic(CubicSpline::fit(xs, ys, boundary))
            }
            InterpMode::Monotone => ScheduleInterpolator::Monotone(MonotoneCubic::fit(xs, ys)),
        })
    }

    pub fn evaluate_one(&self, x: f64) -> f64 {
        match self {
            ScheduleInterpolator::Linear { xs, ys } => {
                if xs.len() == 1 {
                    return ys[0];
                }
                // Clamp outside the range; no linear extrapolation
                let x = x.clamp(xs[0], xs[xs.len() - 1]);
                let i = segment_index(xs, x);
                let f = (x - xs[i]) / (xs[i + 1] - xs[i]);
                ys[i] + f * (ys[i + 1] - ys[i])
            }
            ScheduleInterpolator::Cubic(spline) => spline.value_at(x),
            ScheduleInterpolator::Monotone(pchip) => pchip.value_at(x),
        }
    }

    pub fn evaluate(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|x| self.evaluate_one(*x)).collect()
    }
}
