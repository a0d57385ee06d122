use ncollide2d::na::Point3;
use serde::{Deserialize, Serialize};

/// Plain serializable mirror of `Point3<f64>`, used as the on-disk point
/// representation by the section mesh codec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3f64 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<&Point3<f64>> for Point3f64 {
    fn from(p: &Point3<f64>) -> Self {
        Point3f64 {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Point3f64> for Point3<f64> {
    fn from(p: Point3f64) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}
