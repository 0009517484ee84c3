use crate::model::{CoreError, PixelType};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MovementError>;

#[derive(Debug, Error)]
pub enum MovementError {
    #[error("image acquisition failed: {0}")]
    Acquisition(String),

    #[error("stage movement failed: {0}")]
    Motion(String),

    #[error("alignment failed: {0}")]
    Alignment(String),

    #[error("viewer failed: {0}")]
    Viewer(String),

    #[error("beam images must share a shape: electron {electron:?}, ion {ion:?}")]
    ShapeMismatch {
        electron: (usize, usize),
        ion: (usize, usize),
    },

    #[error("beam images must share a pixel type: electron {electron:?}, ion {ion:?}")]
    PixelTypeMismatch { electron: PixelType, ion: PixelType },

    #[error("image carries no usable pixel size")]
    MissingPixelSize,

    #[error("tilt movement is not enabled for this dialog")]
    TiltDisabled,

    #[error("unknown {kind} `{name}`")]
    UnknownName { kind: &'static str, name: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("array shape failure: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("image data failure: {0}")]
    Core(#[from] CoreError),
}
