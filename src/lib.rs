//! Parametric 3D blade geometry. A sparse spanwise planform schedule and a
//! small library of 2D airfoil outlines tagged by relative thickness are
//! compiled into an immutable [`blade::Blade`], which produces dense oriented
//! cross-sections on demand and persists them through the
//! [`mesh::SectionMesh`] codec.

pub mod algorithms;
pub mod blade;
pub mod blend;
pub mod errors;
pub mod interpolate;
pub mod mesh;
pub mod outline;
pub mod planform;
pub mod serialize;

pub use errors::BladeError;

pub type Result<T> = std::result::Result<T, BladeError>;
