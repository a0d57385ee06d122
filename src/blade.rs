use crate::algorithms::segment_index;
use crate::blend::ThicknessFamily;
use crate::outline::{resample_outline, OutlineSample};
use crate::planform::{PlanformField, PlanformSchedules, PlanformValues};
use crate::Result;
use log::debug;
use ncollide2d::na::{Point2, Point3, Rotation2};

/// Everything needed to construct a blade: the six spanwise schedules, the
/// airfoil library, and the sampling resolutions.
#[derive(Debug, Clone)]
pub struct BladeConfig {
    pub schedules: PlanformSchedules,
    pub airfoils: Vec<OutlineSample>,
    /// Number of chordwise points every resampled outline and section carries.
    pub chord_point_count: usize,
    /// Rotation added to every section's twist, in degrees.
    pub pre_rotation: f64,
    /// Default spanwise sampling resolution for `evaluate_sections(None)`.
    pub span_count: usize,
}

/// One fully positioned 3D cross-section of the blade at a relative span
/// position. Transient; recomputed on demand and only persisted through the
/// section mesh codec.
#[derive(Debug, Clone)]
pub struct Section {
    pub rel_span: f64,
    pub points: Vec<Point3<f64>>,
}

/// A compiled blade. The planform interpolators and the thickness family are
/// built once at construction and never mutated, so repeated section
/// evaluation only costs the per-query interpolation.
#[derive(Debug, Clone)]
pub struct Blade {
    planform: PlanformField,
    family: ThicknessFamily,
    span_count: usize,
    // Axial control points sorted by z value, for the inverse mapping
    z_knots: Vec<f64>,
    z_rels: Vec<f64>,
}

pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start];
    }
    (0..count)
        .map(|i| start + (end - start) * i as f64 / (count - 1) as f64)
        .collect()
}

impl Blade {
    pub fn build(config: BladeConfig) -> Result<Blade> {
        let planform =
            PlanformField::build(&config.schedules, config.pre_rotation, config.chord_point_count)?;

        let mut stack = Vec::with_capacity(config.airfoils.len());
        for af in config.airfoils.iter() {
            let resampled = resample_outline(&af.points, config.chord_point_count)?;
            debug!(
                "resampled airfoil {:?} (t={}) from {} to {} points",
                af.name,
                af.thickness,
                af.points.len(),
                resampled.len()
            );
            stack.push((af.thickness, resampled));
        }
        let family = ThicknessFamily::build(stack)?;

        let mut z_controls = config.schedules.z.points().to_vec();
        z_controls.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (z_rels, z_knots) = z_controls.into_iter().unzip();

        debug!(
            "blade compiled: {} airfoils, {} chordwise points",
            config.airfoils.len(),
            config.chord_point_count
        );

        Ok(Blade {
            planform,
            family,
            span_count: config.span_count,
            z_knots,
            z_rels,
        })
    }

    pub fn planform(&self) -> &PlanformField {
        &self.planform
    }

    pub fn span_count(&self) -> usize {
        self.span_count
    }

    pub fn chord_point_count(&self) -> usize {
        self.planform.chord_point_count()
    }

    /// Batched planform channel evaluation at the given relative spans.
    pub fn planform_at(&self, rel_spans: &[f64]) -> PlanformValues {
        self.planform.evaluate(rel_spans)
    }

    /// Blended normalized outlines at the given thickness values.
    pub fn blended_outline_at(&self, thicknesses: &[f64]) -> Vec<Vec<Point2<f64>>> {
        self.family.outlines_at(thicknesses)
    }

    /// Computes one oriented, positioned section per relative span value.
    ///
    /// Per span position: the blended outline at the interpolated relative
    /// thickness is shifted so the twist pivot sits at mid-chord, scaled
    /// uniformly by the chord, rotated in-plane by twist plus pre-rotation
    /// (counter-clockwise positive), translated by the in-plane offsets, and
    /// placed at the interpolated axial position.
    pub fn sections(&self, rel_spans: &[f64]) -> Vec<Section> {
        let vals = self.planform.evaluate(rel_spans);
        let outlines = self.family.outlines_at(&vals.thickness);

        rel_spans
            .iter()
            .zip(outlines)
            .enumerate()
            .map(|(i, (rel, outline))| {
                let theta = (vals.twist[i] + self.planform.pre_rotation()).to_radians();
                let rot = Rotation2::new(theta);
                let chord = vals.chord[i];

                let points = outline
                    .iter()
                    .map(|p| {
                        let local = Point2::new((p.x - 0.5) * chord, p.y * chord);
                        let turned = rot * local;
                        Point3::new(turned.x + vals.dx[i], turned.y + vals.dy[i], vals.z[i])
                    })
                    .collect();

                Section {
                    rel_span: *rel,
                    points,
                }
            })
            .collect()
    }

    /// Sections at the given relative spans, or at the blade's default
    /// uniform sampling of `[0, 1]` when no spans are supplied.
    pub fn evaluate_sections(&self, rel_spans: Option<&[f64]>) -> Vec<Section> {
        match rel_spans {
            Some(rels) => self.sections(rels),
            None => self.sections(&linspace(0.0, 1.0, self.span_count)),
        }
    }

    /// Inverts the axial-position schedule: maps an absolute axial value back
    /// to a relative span by linear interpolation over the control points
    /// sorted by axial value. Outside the known range the boundary segment
    /// extrapolates linearly, so any physically reachable query gets an
    /// answer; this deliberately differs from the clamping forward policy of
    /// the z channel.
    pub fn axial_to_rel_span(&self, z: f64) -> f64 {
        if self.z_knots.len() == 1 {
            return self.z_rels[0];
        }

        let i = segment_index(&self.z_knots, z);
        let f = (z - self.z_knots[i]) / (self.z_knots[i + 1] - self.z_knots[i]);
        self.z_rels[i] + f * (self.z_rels[i + 1] - self.z_rels[i])
    }

    /// Batched form of `axial_to_rel_span`.
    pub fn axial_to_rel_spans(&self, zs: &[f64]) -> Vec<f64> {
        zs.iter().map(|z| self.axial_to_rel_span(*z)).collect()
    }
}
