use blade_geom::blade::{Blade, BladeConfig};
use blade_geom::interpolate::ControlSchedule;
use blade_geom::mesh::SectionMesh;
use blade_geom::outline::OutlineSample;
use blade_geom::planform::PlanformSchedules;
use ncollide2d::na::Point2;
use std::path::Path;

/// Closed outline of a symmetric NACA 00xx foil, trailing edge to trailing
/// edge over the upper then lower surface.
fn symmetric_foil(t_max: f64, samples: usize) -> Vec<Point2<f64>> {
    let half = |x: f64| {
        t_max / 0.2
            * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x * x + 0.2843 * x * x * x
                - 0.1015 * x * x * x * x)
    };

    let mut points = Vec::new();
    for i in 0..samples {
        let x = 1.0 - i as f64 / (samples - 1) as f64;
        points.push(Point2::new(x, half(x)));
    }
    for i in 1..samples {
        let x = i as f64 / (samples - 1) as f64;
        points.push(Point2::new(x, -half(x)));
    }
    points
}

fn main() {
    let schedules = PlanformSchedules {
        z: ControlSchedule::from_pairs(&[(0.0, 0.0), (1.0, -100.0)]),
        chord: ControlSchedule::from_pairs(&[(0.0, 3.0), (0.5, 4.0), (1.0, 1.0)]),
        thickness: ControlSchedule::from_pairs(&[(0.0, 0.24), (0.5, 0.18), (1.0, 0.12)]),
        twist: ControlSchedule::from_pairs(&[(0.0, 12.0), (0.5, 6.0), (1.0, 0.0)]),
        dx: ControlSchedule::from_pairs(&[(0.0, 0.0), (1.0, 1.5)]),
        dy: ControlSchedule::from_pairs(&[(0.0, 0.0), (1.0, 0.5)]),
    };

    let config = BladeConfig {
        schedules,
        airfoils: vec![
            OutlineSample::new("naca0012", 0.12, symmetric_foil(0.12, 60)),
            OutlineSample::new("naca0024", 0.24, symmetric_foil(0.24, 60)),
        ],
        chord_point_count: 120,
        pre_rotation: 0.0,
        span_count: 50,
    };

    let blade = Blade::build(config).expect("Failed building blade");
    let sections = blade.evaluate_sections(None);
    let values = blade.planform_at(&blade_geom::blade::linspace(0.0, 1.0, blade.span_count()));

    let mesh = SectionMesh::assemble(&sections, &values);
    let path = Path::new("blade_sections.json");
    mesh.write(path).expect("Failed writing section mesh");
    println!(
        "Wrote {} x {} section grid to {}",
        mesh.span_count,
        mesh.chord_point_count,
        path.display()
    );
}
