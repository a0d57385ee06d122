use crate::interpolate::{Boundary, ControlSchedule, InterpMode, ScheduleInterpolator};
use crate::Result;

/// The six designer-supplied spanwise schedules. Parameters are relative span
/// (0 at root, 1 at tip); values are the channel quantities. Twist is in
/// degrees.
#[derive(Debug, Clone, Default)]
pub struct PlanformSchedules {
    /// Axial (spanwise) position of each section.
    pub z: ControlSchedule,
    pub chord: ControlSchedule,
    /// Relative thickness, as a fraction of chord.
    pub thickness: ControlSchedule,
    pub twist: ControlSchedule,
    /// In-plane offset along the chord direction.
    pub dx: ControlSchedule,
    /// In-plane offset normal to the chord direction.
    pub dy: ControlSchedule,
}

/// Batched planform channel values at a set of relative span positions.
#[derive(Debug, Clone)]
pub struct PlanformValues {
    pub z: Vec<f64>,
    pub chord: Vec<f64>,
    pub thickness: Vec<f64>,
    pub twist: Vec<f64>,
    pub dx: Vec<f64>,
    pub dy: Vec<f64>,
    pub absolute_thickness: Vec<f64>,
}

/// Scalar planform channel values at one relative span position.
#[derive(Debug, Clone, Copy)]
pub struct PlanformSample {
    pub z: f64,
    pub chord: f64,
    pub thickness: f64,
    pub twist: f64,
    pub dx: f64,
    pub dy: f64,
    pub absolute_thickness: f64,
}

/// The compiled, immutable planform: one interpolator per channel, each with
/// its designated mode, built once and reused for every evaluation.
///
/// Channel modes: z linear, chord monotone, thickness cubic-natural, twist
/// monotone, dx cubic-natural, dy cubic-clamped. The monotone channels carry
/// designer intent of shape-faithful interpolation; the linear z channel
/// clamps rather than extrapolates.
#[derive(Debug, Clone)]
pub struct PlanformField {
    z: ScheduleInterpolator,
    chord: ScheduleInterpolator,
    thickness: ScheduleInterpolator,
    twist: ScheduleInterpolator,
    dx: ScheduleInterpolator,
    dy: ScheduleInterpolator,
    pre_rotation: f64,
    chord_point_count: usize,
}

impl PlanformField {
    pub fn build(
        schedules: &PlanformSchedules,
        pre_rotation: f64,
        chord_point_count: usize,
    ) -> Result<Self> {
        Ok(PlanformField {
            z: ScheduleInterpolator::build(&schedules.z, InterpMode::Linear)?,
            chord: ScheduleInterpolator::build(&schedules.chord, InterpMode::Monotone)?,
            thickness: ScheduleInterpolator::build(
                &schedules.thickness,
                InterpMode::Cubic(Boundary::Natural),
            )?,
            twist: ScheduleInterpolator::build(&schedules.twist, InterpMode::Monotone)?,
            dx: ScheduleInterpolator::build(&schedules.dx, InterpMode::Cubic(Boundary::Natural))?,
            dy: ScheduleInterpolator::build(&schedules.dy, InterpMode::Cubic(Boundary::Clamped))?,
            pre_rotation,
            chord_point_count,
        })
    }

    /// Rotation added to every section's twist, in degrees.
    pub fn pre_rotation(&self) -> f64 {
        self.pre_rotation
    }

    pub fn chord_point_count(&self) -> usize {
        self.chord_point_count
    }

    /// Evaluates all channels at the given relative span positions. The
    /// absolute thickness is derived as `chord * thickness` element-wise
    /// after interpolation, never interpolated directly.
    pub fn evaluate(&self, rel_spans: &[f64]) -> PlanformValues {
        let chord = self.chord.evaluate(rel_spans);
        let thickness = self.thickness.evaluate(rel_spans);
        let absolute_thickness = chord
            .iter()
            .zip(thickness.iter())
            .map(|(c, t)| c * t)
            .collect();

        PlanformValues {
            z: self.z.evaluate(rel_spans),
            twist: self.twist.evaluate(rel_spans),
            dx: self.dx.evaluate(rel_spans),
            dy: self.dy.evaluate(rel_spans),
            chord,
            thickness,
            absolute_thickness,
        }
    }

    /// Scalar form of `evaluate`, identical to the batched form at length 1.
    pub fn evaluate_one(&self, rel_span: f64) -> PlanformSample {
        let vals = self.evaluate(&[rel_span]);
        PlanformSample {
            z: vals.z[0],
            chord: vals.chord[0],
            thickness: vals.thickness[0],
            twist: vals.twist[0],
            dx: vals.dx[0],
            dy: vals.dy[0],
            absolute_thickness: vals.absolute_thickness[0],
        }
    }
}
