use crate::algorithms::segment_index;
use crate::errors::BladeError;
use crate::Result;
use ncollide2d::na::Point2;

/// A continuous airfoil shape family over a 1D thickness axis, built from a
/// discrete stack of resampled outlines. Every outline must have the same
/// point count (the blade's chord point count); blending happens per
/// chordwise point with piecewise-linear interpolation across thickness.
///
/// Queries below the thinnest or above the thickest airfoil hold the boundary
/// shape constant instead of extrapolating, so the family never produces
/// outlines outside the designed library.
#[derive(Debug, Clone)]
pub struct ThicknessFamily {
    thicknesses: Vec<f64>,
    outlines: Vec<Vec<Point2<f64>>>,
}

impl ThicknessFamily {
    /// Builds the family from `(thickness, resampled outline)` pairs. The
    /// stack is stable-sorted by thickness ascending; an empty stack and
    /// duplicate thickness values are rejected.
    pub fn build(mut stack: Vec<(f64, Vec<Point2<f64>>)>) -> Result<Self> {
        if stack.is_empty() {
            return Err(BladeError::NoAirfoils);
        }

        stack.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in stack.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(BladeError::DuplicateThickness(pair[0].0));
            }
        }

        debug_assert!(stack.iter().all(|(_, o)| o.len() == stack[0].1.len()));

        let (thicknesses, outlines) = stack.into_iter().unzip();
        Ok(ThicknessFamily {
            thicknesses,
            outlines,
        })
    }

    pub fn chord_point_count(&self) -> usize {
        self.outlines[0].len()
    }

    pub fn thickness_range(&self) -> (f64, f64) {
        (
            self.thicknesses[0],
            self.thicknesses[self.thicknesses.len() - 1],
        )
    }

    /// Evaluates the blended outline at a single thickness value.
    pub fn outline_at(&self, thickness: f64) -> Vec<Point2<f64>> {
        if self.outlines.len() == 1 {
            return self.outlines[0].clone();
        }

        // Flat extrapolation: at or beyond either boundary the boundary
        // outline is returned exactly rather than reconstructed with a
        // degenerate interpolation weight
        let (lo, hi) = self.thickness_range();
        if thickness <= lo {
            return self.outlines[0].clone();
        }
        if thickness >= hi {
            return self.outlines[self.outlines.len() - 1].clone();
        }

        let i = segment_index(&self.thicknesses, thickness);
        let f = (thickness - self.thicknesses[i]) / (self.thicknesses[i + 1] - self.thicknesses[i]);

        self.outlines[i]
            .iter()
            .zip(self.outlines[i + 1].iter())
            .map(|(a, b)| Point2::new(a.x + f * (b.x - a.x), a.y + f * (b.y - a.y)))
            .collect()
    }

    /// Evaluates the blended outline at a batch of thickness values, with
    /// per-element results identical to the scalar path.
    pub fn outlines_at(&self, thicknesses: &[f64]) -> Vec<Vec<Point2<f64>>> {
        thicknesses.iter().map(|t| self.outline_at(*t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn flat_outline(y: f64, n: usize) -> Vec<Point2<f64>> {
        (0..n)
            .map(|i| Point2::new(i as f64 / (n - 1) as f64, y))
            .collect()
    }

    fn sample_family() -> ThicknessFamily {
        // Deliberately unsorted
        ThicknessFamily::build(vec![
            (0.4, flat_outline(0.4, 5)),
            (0.1, flat_outline(0.1, 5)),
            (0.2, flat_outline(0.2, 5)),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_stack_rejected() {
        let result = ThicknessFamily::build(Vec::new());
        assert!(matches!(result, Err(BladeError::NoAirfoils)));
    }

    #[test]
    fn test_duplicate_thickness_rejected() {
        let result = ThicknessFamily::build(vec![
            (0.2, flat_outline(0.0, 4)),
            (0.2, flat_outline(1.0, 4)),
        ]);
        assert!(matches!(result, Err(BladeError::DuplicateThickness(v)) if v == 0.2));
    }

    #[test]
    fn test_sorted_on_build() {
        let family = sample_family();
        assert_eq!((0.1, 0.4), family.thickness_range());
    }

    #[test]
    fn test_interpolates_between_airfoils() {
        let family = sample_family();
        let outline = family.outline_at(0.15);
        for p in outline.iter() {
            assert_relative_eq!(0.15, p.y, max_relative = 1e-12);
        }

        let outline = family.outline_at(0.3);
        for p in outline.iter() {
            assert_relative_eq!(0.3, p.y, max_relative = 1e-12);
        }
    }

    #[test_case(0.05)]
    #[test_case(0.1)]
    fn test_flat_extrapolation_below(t: f64) {
        let family = sample_family();
        let outline = family.outline_at(t);
        let boundary = family.outline_at(0.1);
        for (p, b) in outline.iter().zip(boundary.iter()) {
            assert_eq!(b.x, p.x);
            assert_eq!(b.y, p.y);
        }
    }

    #[test_case(0.4)]
    #[test_case(0.9)]
    fn test_flat_extrapolation_above(t: f64) {
        let family = sample_family();
        let outline = family.outline_at(t);
        for p in outline.iter() {
            assert_eq!(0.4, p.y);
        }
    }

    #[test]
    fn test_batched_matches_scalar() {
        let family = sample_family();
        let queries = [0.05, 0.1, 0.17, 0.33, 0.5];
        let batch = family.outlines_at(&queries);
        for (q, outline) in queries.iter().zip(batch.iter()) {
            let scalar = family.outline_at(*q);
            for (a, b) in scalar.iter().zip(outline.iter()) {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_single_airfoil_constant() {
        let family = ThicknessFamily::build(vec![(0.2, flat_outline(0.7, 6))]).unwrap();
        for t in [-1.0, 0.2, 5.0] {
            let outline = family.outline_at(t);
            assert_eq!(6, outline.len());
            for p in outline.iter() {
                assert_eq!(0.7, p.y);
            }
        }
    }
}
