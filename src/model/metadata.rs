use serde::{Deserialize, Serialize};

use super::mapping::{Mapping, MappingRecord, check_nested, require_keys};
use super::{ImageSettings, MicroscopeState, Point, Result};

/// Metadata schema version written into every persisted image.
pub const METADATA_VERSION: &str = "v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibsemImageMetadata {
    #[serde(rename = "image")]
    pub image_settings: ImageSettings,
    pub version: String,
    pub pixel_size: Point,
    pub microscope_state: MicroscopeState,
}

impl FibsemImageMetadata {
    pub fn new(
        image_settings: ImageSettings,
        pixel_size: Point,
        microscope_state: MicroscopeState,
    ) -> Self {
        Self {
            image_settings,
            version: METADATA_VERSION.to_string(),
            pixel_size,
            microscope_state,
        }
    }

    pub fn is_current_version(&self) -> bool {
        self.version == METADATA_VERSION
    }
}

impl MappingRecord for FibsemImageMetadata {
    const RECORD: &'static str = "FibsemImageMetadata";
    const REQUIRED: &'static [&'static str] =
        &["image", "version", "pixel_size", "microscope_state"];

    fn check_keys(mapping: &Mapping) -> Result<()> {
        require_keys(mapping, Self::RECORD, Self::REQUIRED)?;
        check_nested::<ImageSettings>(mapping, "image")?;
        check_nested::<Point>(mapping, "pixel_size")?;
        check_nested::<MicroscopeState>(mapping, "microscope_state")
    }

    fn validate(&self) -> Result<()> {
        self.image_settings.validate()?;
        self.pixel_size.validate()?;
        self.microscope_state.validate()
    }
}
