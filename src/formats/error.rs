use crate::model::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported image layout for this format: {0}")]
    UnsupportedLayout(String),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF decode/encode failure: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("metadata serialization failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("array shape failure: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("image metadata failure: {0}")]
    Core(#[from] CoreError),
}
