use crate::blade::Section;
use crate::errors::BladeError;
use crate::planform::PlanformValues;
use crate::serialize::Point3f64;
use crate::Result;
use log::debug;
use ncollide2d::na::Point3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// The eight per-span planform channels the mesh file carries, broadcast
/// across each chordwise row of points.
pub const PLANFORM_CHANNELS: [&str; 8] = [
    "rel_span",
    "z",
    "chord",
    "thickness",
    "absolute_thickness",
    "twist",
    "dx",
    "dy",
];

/// The persisted form of a batch of blade sections: a span-major point grid
/// with per-span scalar channels and the two dimension counts. This is the
/// sole wire contract other tooling depends on.
#[derive(Debug, Clone)]
pub struct SectionMesh {
    pub span_count: usize,
    pub chord_point_count: usize,
    /// `span_count * chord_point_count` points, span-major / chord-minor.
    pub points: Vec<Point3<f64>>,
    /// One value per span row for each channel.
    pub channels: BTreeMap<String, Vec<f64>>,
}

/// On-disk document layout. The header counts are optional at the serde level
/// so a foreign or truncated file surfaces as `MissingMetadata` instead of a
/// generic parse error.
#[derive(Debug, Serialize, Deserialize)]
struct MeshDocument {
    #[serde(default)]
    span_count: Option<usize>,
    #[serde(default)]
    chord_point_count: Option<usize>,
    points: Vec<Point3f64>,
    /// One polyline per span row, connecting its points in chordwise order.
    lines: Vec<Vec<usize>>,
    point_data: BTreeMap<String, Vec<f64>>,
}

impl SectionMesh {
    /// Assembles the persisted form from evaluated sections and their
    /// generating planform values.
    pub fn assemble(sections: &[Section], values: &PlanformValues) -> SectionMesh {
        let span_count = sections.len();
        let chord_point_count = sections.first().map_or(0, |s| s.points.len());

        let points = sections
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .collect();

        let mut channels = BTreeMap::new();
        channels.insert(
            "rel_span".to_string(),
            sections.iter().map(|s| s.rel_span).collect(),
        );
        channels.insert("z".to_string(), values.z.clone());
        channels.insert("chord".to_string(), values.chord.clone());
        channels.insert("thickness".to_string(), values.thickness.clone());
        channels.insert(
            "absolute_thickness".to_string(),
            values.absolute_thickness.clone(),
        );
        channels.insert("twist".to_string(), values.twist.clone());
        channels.insert("dx".to_string(), values.dx.clone());
        channels.insert("dy".to_string(), values.dy.clone());

        SectionMesh {
            span_count,
            chord_point_count,
            points,
            channels,
        }
    }

    fn to_document(&self) -> MeshDocument {
        let ns = self.span_count;
        let nc = self.chord_point_count;

        let mut point_data = BTreeMap::new();
        for (name, per_span) in self.channels.iter() {
            let expanded = per_span
                .iter()
                .flat_map(|v| std::iter::repeat(*v).take(nc))
                .collect();
            point_data.insert(name.clone(), expanded);
        }

        // Normalized chordwise parameter and owning span index, per point
        let t_row: Vec<f64> = (0..nc).map(|j| j as f64 / (nc - 1) as f64).collect();
        point_data.insert(
            "t".to_string(),
            (0..ns).flat_map(|_| t_row.iter().copied()).collect(),
        );
        point_data.insert(
            "section_id".to_string(),
            (0..ns).flat_map(|i| std::iter::repeat(i as f64).take(nc)).collect(),
        );

        MeshDocument {
            span_count: Some(ns),
            chord_point_count: Some(nc),
            points: self.points.iter().map(Point3f64::from).collect(),
            lines: (0..ns).map(|i| (i * nc..(i + 1) * nc).collect()).collect(),
            point_data,
        }
    }

    /// Writes the mesh to a single self-describing file. A partially written
    /// file is removed on any mid-write failure rather than left behind
    /// looking valid.
    pub fn write(&self, path: &Path) -> Result<()> {
        let doc = self.to_document();
        if let Err(e) = write_document(&doc, path) {
            std::fs::remove_file(path).ok();
            return Err(e);
        }

        debug!(
            "wrote section mesh ({} x {} points) to {:?}",
            self.span_count, self.chord_point_count, path
        );
        Ok(())
    }

    /// Reads a mesh back, validating structural consistency before returning
    /// anything. Per-span channels are reconstructed by averaging each row,
    /// tolerating accumulated floating error in the stored copies.
    pub fn read(path: &Path) -> Result<SectionMesh> {
        let reader = BufReader::new(File::open(path)?);
        let doc: MeshDocument = serde_json::from_reader(reader)?;

        let (Some(ns), Some(nc)) = (doc.span_count, doc.chord_point_count) else {
            return Err(BladeError::MissingMetadata);
        };

        if doc.points.len() != ns * nc {
            return Err(BladeError::SizeMismatch(format!(
                "{} points, expected {} x {}",
                doc.points.len(),
                ns,
                nc
            )));
        }
        if doc.lines.len() != ns {
            return Err(BladeError::SizeMismatch(format!(
                "{} polylines, expected {}",
                doc.lines.len(),
                ns
            )));
        }
        if let Some(bad) = doc.lines.iter().find(|l| l.len() != nc) {
            return Err(BladeError::SizeMismatch(format!(
                "polyline with {} points, expected {}",
                bad.len(),
                nc
            )));
        }

        let mut channels = BTreeMap::new();
        for name in PLANFORM_CHANNELS {
            let Some(data) = doc.point_data.get(name) else {
                continue;
            };
            if data.len() != ns * nc {
                return Err(BladeError::SizeMismatch(format!(
                    "channel {:?} has {} values, expected {}",
                    name,
                    data.len(),
                    ns * nc
                )));
            }
            let per_span = data
                .chunks(nc)
                .map(|row| row.iter().sum::<f64>() / nc as f64)
                .collect();
            channels.insert(name.to_string(), per_span);
        }

        debug!("read section mesh ({} x {} points) from {:?}", ns, nc, path);
        Ok(SectionMesh {
            span_count: ns,
            chord_point_count: nc,
            points: doc.points.into_iter().map(Point3::from).collect(),
            channels,
        })
    }
}

fn write_document(doc: &MeshDocument, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, doc)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::Value;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("blade_geom_mesh_{}", name))
    }

    fn sample_mesh(ns: usize, nc: usize) -> SectionMesh {
        let points = (0..ns)
            .flat_map(|i| {
                (0..nc).map(move |j| {
                    Point3::new(j as f64 * 0.1, (i * j) as f64 * 0.01, -(i as f64) * 10.0)
                })
            })
            .collect();

        let mut channels = BTreeMap::new();
        for (k, name) in PLANFORM_CHANNELS.iter().enumerate() {
            let values = (0..ns).map(|i| i as f64 + k as f64 * 0.5).collect();
            channels.insert(name.to_string(), values);
        }

        SectionMesh {
            span_count: ns,
            chord_point_count: nc,
            points,
            channels,
        }
    }

    #[test]
    fn test_round_trip() {
        let path = temp_path("round_trip.json");
        let mesh = sample_mesh(5, 8);
        mesh.write(&path).unwrap();

        let loaded = SectionMesh::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(5, loaded.span_count);
        assert_eq!(8, loaded.chord_point_count);
        assert_eq!(mesh.points.len(), loaded.points.len());
        for (a, b) in mesh.points.iter().zip(loaded.points.iter()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
            assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
        }
        for name in PLANFORM_CHANNELS {
            let original = &mesh.channels[name];
            let restored = &loaded.channels[name];
            for (a, b) in original.iter().zip(restored.iter()) {
                assert_relative_eq!(*a, *b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_tampered_header_fails() {
        let path = temp_path("tampered.json");
        sample_mesh(10, 10).write(&path).unwrap();

        let mut doc: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        doc["span_count"] = Value::from(11);
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let result = SectionMesh::read(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(BladeError::SizeMismatch(_))));
    }

    #[test]
    fn test_missing_metadata_fails() {
        let path = temp_path("missing_meta.json");
        sample_mesh(3, 4).write(&path).unwrap();

        let mut doc: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        doc.as_object_mut().unwrap().remove("chord_point_count");
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let result = SectionMesh::read(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(BladeError::MissingMetadata)));
    }

    #[test]
    fn test_wrong_line_count_fails() {
        let path = temp_path("bad_lines.json");
        sample_mesh(3, 4).write(&path).unwrap();

        let mut doc: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        doc["lines"].as_array_mut().unwrap().pop();
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let result = SectionMesh::read(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(BladeError::SizeMismatch(_))));
    }

    #[test]
    fn test_unwritable_path_fails() {
        let path = temp_path("no_such_dir").join("mesh.json");
        let result = sample_mesh(2, 2).write(&path);
        assert!(matches!(result, Err(BladeError::Io(_))));
    }

    #[test]
    fn test_point_data_has_t_and_section_id() {
        let mesh = sample_mesh(2, 3);
        let doc = mesh.to_document();

        assert_eq!(
            &vec![0.0, 0.5, 1.0, 0.0, 0.5, 1.0],
            doc.point_data.get("t").unwrap()
        );
        assert_eq!(
            &vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            doc.point_data.get("section_id").unwrap()
        );
    }
}
