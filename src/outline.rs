use crate::errors::BladeError;
use crate::interpolate::{Boundary, CubicSpline};
use crate::Result;
use itertools::Itertools;
use ncollide2d::na::Point2;
use std::path::Path;

/// Coincident raw outline points closer than this are collapsed before the
/// arc-length splines are fit, keeping the parametrization strictly
/// increasing.
const COINCIDENT_TOL: f64 = 1e-10;

/// A named raw 2D airfoil outline tagged with its nominal relative thickness.
/// Points are in the order supplied by the designer (open or closed, arbitrary
/// spacing); the winding direction is preserved through resampling.
#[derive(Debug, Clone)]
pub struct OutlineSample {
    pub name: String,
    pub thickness: f64,
    pub points: Vec<Point2<f64>>,
}

impl OutlineSample {
    pub fn new(name: &str, thickness: f64, points: Vec<Point2<f64>>) -> Self {
        Self {
            name: name.to_string(),
            thickness,
            points,
        }
    }
}

fn dist(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a - b).norm()
}

/// Re-parametrizes a raw outline to exactly `n` points uniformly spaced in
/// cumulative arc length, by fitting independent clamped cubic splines of
/// x(s) and y(s) and sampling them at uniform s from 0 to the total length
/// inclusive. The start and end points of the outline are preserved.
pub fn resample_outline(points: &[Point2<f64>], n: usize) -> Result<Vec<Point2<f64>>> {
    if n < 2 {
        return Err(BladeError::InsufficientControlPoints {
            mode: "arc-length resampling",
            needed: 2,
            got: n,
        });
    }

    let mut pts = points.to_vec();
    pts.dedup_by(|a, b| dist(a, b) <= COINCIDENT_TOL);
    if pts.len() < 2 {
        return Err(BladeError::DegenerateOutline);
    }

    let mut lengths: Vec<f64> = vec![0.0];
    for (a, b) in pts.iter().tuple_windows() {
        lengths.push(lengths.last().unwrap() + dist(a, b));
    }
    let total = *lengths.last().unwrap();

    let xs: Vec<f64> = pts.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
    let x_spline = CubicSpline::fit(lengths.clone(), xs, Boundary::Clamped);
    let y_spline = CubicSpline::fit(lengths, ys, Boundary::Clamped);

    let step = total / (n - 1) as f64;
    Ok((0..n)
        .map(|i| {
            let s = if i == n - 1 { total } else { i as f64 * step };
            Point2::new(x_spline.value_at(s), y_spline.value_at(s))
        })
        .collect())
}

/// Loads a raw outline from a whitespace-separated two-column text file.
/// Empty lines and lines starting with `#` are skipped.
pub fn load_outline(path: &Path) -> Result<Vec<Point2<f64>>> {
    let text = std::fs::read_to_string(path)?;
    let mut points = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
            return Err(BladeError::OutlineParse(format!(
                "line {}: expected two columns",
                line_no + 1
            )));
        };
        let x: f64 = x.parse().map_err(|_| {
            BladeError::OutlineParse(format!("line {}: bad x value {:?}", line_no + 1, x))
        })?;
        let y: f64 = y.parse().map_err(|_| {
            BladeError::OutlineParse(format!("line {}: bad y value {:?}", line_no + 1, y))
        })?;
        points.push(Point2::new(x, y));
    }

    Ok(points)
}
