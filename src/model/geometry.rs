use serde::{Deserialize, Serialize};

use super::mapping::{MappingRecord, ensure_finite};
use super::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl MappingRecord for Point {
    const RECORD: &'static str = "Point";
    const REQUIRED: &'static [&'static str] = &["x", "y"];

    fn validate(&self) -> Result<()> {
        ensure_finite(Self::RECORD, "x", self.x)?;
        ensure_finite(Self::RECORD, "y", self.y)
    }
}

/// Reduced area of interest in image-fraction coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibsemRectangle {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for FibsemRectangle {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

impl MappingRecord for FibsemRectangle {
    const RECORD: &'static str = "FibsemRectangle";
    const REQUIRED: &'static [&'static str] = &["left", "top", "width", "height"];

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("left", self.left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CoreError::invalid(
                    Self::RECORD,
                    key,
                    format!("{value} is outside the image fraction range [0, 1]"),
                ));
            }
        }
        Ok(())
    }
}
