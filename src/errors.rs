use thiserror::Error;

/// Failure taxonomy for blade construction and mesh file handling. All variants
/// are raised immediately at the point of detection; nothing in this crate
/// retries or silently defaults.
#[derive(Debug, Error)]
pub enum BladeError {
    #[error("{mode} interpolation requires at least {needed} control points, got {got}")]
    InsufficientControlPoints {
        mode: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("duplicate schedule parameter {0}")]
    DuplicateParameter(f64),

    #[error("outline has fewer than 2 distinct points after removing coincident ones")]
    DegenerateOutline,

    #[error("blade requires at least one airfoil")]
    NoAirfoils,

    #[error("duplicate airfoil thickness {0}")]
    DuplicateThickness(f64),

    #[error("mesh file is missing span/chord count metadata")]
    MissingMetadata,

    #[error("mesh size mismatch: {0}")]
    SizeMismatch(String),

    #[error("invalid outline data: {0}")]
    OutlineParse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
