use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{ImageSettings, MappingRecord};
use crate::movement::MovementLimits;

use super::{ConfigError, Result};

/// Acquisition settings and dialog limits for one movement session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionConfig {
    pub image: ImageSettings,
    pub movement: MovementLimits,
}

/// On-disk layout. The image section goes through the settings codec rather
/// than serde so both share one schema.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct RawSessionConfig {
    #[serde(default)]
    pub image: Option<Value>,
    #[serde(default)]
    pub movement: MovementLimits,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        self.movement
            .validate()
            .map_err(|error| ConfigError::Invalid(error.to_string()))?;
        self.image.resolution_dimensions()?;
        if !(self.image.hfw > 0.0 && self.image.dwell_time > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hfw {} and dwell_time {} must be positive",
                self.image.hfw, self.image.dwell_time
            )));
        }
        Ok(())
    }

    pub(super) fn from_raw(raw: RawSessionConfig) -> Result<Self> {
        let image = match raw.image {
            Some(value) => ImageSettings::from_value(&value)?,
            None => ImageSettings::default(),
        };
        let config = Self {
            image,
            movement: raw.movement,
        };
        config.validate()?;
        Ok(config)
    }

    pub(super) fn to_raw(&self) -> Result<RawSessionConfig> {
        Ok(RawSessionConfig {
            image: Some(self.image.to_value()?),
            movement: self.movement,
        })
    }
}
