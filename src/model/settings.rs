use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::beam::check_beam_type;
use super::mapping::{Mapping, MappingRecord, check_nested, ensure_finite, require_keys};
use super::{BeamType, CoreError, FibsemRectangle, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GammaSettings {
    pub enabled: bool,
    pub min_gamma: f64,
    pub max_gamma: f64,
    pub scale_factor: f64,
    pub threshold: i64,
}

impl Default for GammaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_gamma: 0.15,
            max_gamma: 1.8,
            scale_factor: 0.01,
            threshold: 46,
        }
    }
}

impl MappingRecord for GammaSettings {
    const RECORD: &'static str = "GammaSettings";
    const REQUIRED: &'static [&'static str] =
        &["enabled", "min_gamma", "max_gamma", "scale_factor", "threshold"];

    fn validate(&self) -> Result<()> {
        let record = Self::RECORD;
        ensure_finite(record, "min_gamma", self.min_gamma)?;
        ensure_finite(record, "max_gamma", self.max_gamma)?;
        ensure_finite(record, "scale_factor", self.scale_factor)?;
        if self.min_gamma > self.max_gamma {
            return Err(CoreError::invalid(
                record,
                "min_gamma",
                format!(
                    "min_gamma {} exceeds max_gamma {}",
                    self.min_gamma, self.max_gamma
                ),
            ));
        }
        Ok(())
    }
}

/// Everything one acquisition call needs. Keys other than the required ones
/// fall back to [`ImageSettings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub resolution: String,
    pub dwell_time: f64,
    pub hfw: f64,
    pub autocontrast: bool,
    pub beam_type: BeamType,
    pub gamma: GammaSettings,
    pub save: bool,
    pub save_path: Option<PathBuf>,
    pub label: String,
    pub reduced_area: Option<FibsemRectangle>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            resolution: "1536x1024".to_string(),
            dwell_time: 1.0e-6,
            hfw: 150.0e-6,
            autocontrast: true,
            beam_type: BeamType::Electron,
            gamma: GammaSettings::default(),
            save: false,
            save_path: None,
            label: String::new(),
            reduced_area: None,
        }
    }
}

impl ImageSettings {
    /// Parses the `"WxH"` resolution string into `(width, height)`.
    pub fn resolution_dimensions(&self) -> Result<(usize, usize)> {
        let invalid = || {
            CoreError::invalid(
                Self::RECORD,
                "resolution",
                format!("expected `WIDTHxHEIGHT`, found `{}`", self.resolution),
            )
        };
        let (width, height) = self.resolution.split_once('x').ok_or_else(invalid)?;
        let width = width.trim().parse::<usize>().map_err(|_| invalid())?;
        let height = height.trim().parse::<usize>().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok((width, height))
    }
}

impl MappingRecord for ImageSettings {
    const RECORD: &'static str = "ImageSettings";
    const REQUIRED: &'static [&'static str] = &["resolution", "dwell_time", "hfw", "beam_type"];

    fn check_keys(mapping: &Mapping) -> Result<()> {
        require_keys(mapping, Self::RECORD, Self::REQUIRED)?;
        check_beam_type(mapping)?;
        check_nested::<GammaSettings>(mapping, "gamma")?;
        check_nested::<FibsemRectangle>(mapping, "reduced_area")
    }

    fn validate(&self) -> Result<()> {
        ensure_finite(Self::RECORD, "dwell_time", self.dwell_time)?;
        ensure_finite(Self::RECORD, "hfw", self.hfw)?;
        self.gamma.validate()?;
        self.reduced_area
            .as_ref()
            .map_or(Ok(()), FibsemRectangle::validate)
    }
}

/// Milling pattern parameters. `rotation` is held in radians and travels in
/// degrees inside mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MillingSettings {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    #[serde(with = "degrees")]
    pub rotation: f64,
    pub centre_x: f64,
    pub centre_y: f64,
    pub milling_current: f64,
    pub scan_direction: String,
    pub cleaning_cross_section: bool,
}

impl Default for MillingSettings {
    fn default() -> Self {
        Self {
            width: 10.0e-6,
            height: 10.0e-6,
            depth: 10.0e-6,
            rotation: 0.0,
            centre_x: 0.0,
            centre_y: 0.0,
            milling_current: 2.0e-9,
            scan_direction: "TopToBottom".to_string(),
            cleaning_cross_section: false,
        }
    }
}

impl MappingRecord for MillingSettings {
    const RECORD: &'static str = "MillingSettings";
    const REQUIRED: &'static [&'static str] = &[
        "width",
        "height",
        "depth",
        "rotation",
        "centre_x",
        "centre_y",
        "milling_current",
        "scan_direction",
        "cleaning_cross_section",
    ];

    fn validate(&self) -> Result<()> {
        let record = Self::RECORD;
        for (key, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
            ("rotation", self.rotation),
            ("centre_x", self.centre_x),
            ("centre_y", self.centre_y),
            ("milling_current", self.milling_current),
        ] {
            ensure_finite(record, key, value)?;
        }
        Ok(())
    }
}

/// Radians in memory, degrees in the mapping.
mod degrees {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(radians: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(radians.to_degrees())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(f64::deserialize(deserializer)?.to_radians())
    }
}
