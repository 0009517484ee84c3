use std::path::Path;

use crate::model::FibsemImage;

use super::tiff::{read_tiff, write_tiff};
use super::util::extension;
use super::{IoError, Result};

pub fn load_image(path: impl AsRef<Path>) -> Result<FibsemImage> {
    let path = path.as_ref();
    let extension = extension(path)?;
    match extension.as_str() {
        "tif" | "tiff" => read_tiff(path),
        other => Err(IoError::UnsupportedFormat(other.to_string())),
    }
}

pub fn save_image(path: impl AsRef<Path>, image: &FibsemImage) -> Result<()> {
    let path = path.as_ref();
    let extension = extension(path)?;
    match extension.as_str() {
        "tif" | "tiff" => write_tiff(path, image),
        other => Err(IoError::UnsupportedFormat(other.to_string())),
    }
}

pub fn supported_formats() -> &'static [&'static str] {
    &["tif", "tiff"]
}

impl FibsemImage {
    /// Writes the image, embedding metadata in the TIFF description tag.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_image(path, self)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_image(path)
    }
}
