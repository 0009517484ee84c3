use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::mapping::{
    Mapping, MappingRecord, check_nested, ensure_finite, ensure_finite_opt, require_keys,
};
use super::{BeamSettings, BeamType, Result};

pub const DEFAULT_COORDINATE_SYSTEM: &str = "Raw";

/// Five-axis stage pose. An unset axis is left untouched by absolute moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagePosition {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub r: Option<f64>,
    pub t: Option<f64>,
    pub coordinate_system: String,
}

impl Default for StagePosition {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            z: None,
            r: None,
            t: None,
            coordinate_system: DEFAULT_COORDINATE_SYSTEM.to_string(),
        }
    }
}

impl StagePosition {
    pub fn tilt(t: f64) -> Self {
        Self {
            t: Some(t),
            ..Self::default()
        }
    }

    pub fn origin() -> Self {
        Self {
            x: Some(0.0),
            y: Some(0.0),
            z: Some(0.0),
            r: Some(0.0),
            t: Some(0.0),
            ..Self::default()
        }
    }

    /// Copies every set axis of `target` onto `self`.
    pub fn apply(&mut self, target: &StagePosition) {
        let axes = [
            (&mut self.x, target.x),
            (&mut self.y, target.y),
            (&mut self.z, target.z),
            (&mut self.r, target.r),
            (&mut self.t, target.t),
        ];
        for (axis, value) in axes {
            if value.is_some() {
                *axis = value;
            }
        }
    }
}

impl MappingRecord for StagePosition {
    const RECORD: &'static str = "StagePosition";
    const REQUIRED: &'static [&'static str] = &[];

    fn validate(&self) -> Result<()> {
        let record = Self::RECORD;
        ensure_finite_opt(record, "x", self.x)?;
        ensure_finite_opt(record, "y", self.y)?;
        ensure_finite_opt(record, "z", self.z)?;
        ensure_finite_opt(record, "r", self.r)?;
        ensure_finite_opt(record, "t", self.t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveSettings {
    pub rotate_compucentric: bool,
    pub tilt_compucentric: bool,
}

impl MoveSettings {
    pub const fn compucentric() -> Self {
        Self {
            rotate_compucentric: true,
            tilt_compucentric: true,
        }
    }
}

/// Snapshot of instrument state at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroscopeState {
    pub timestamp: f64,
    pub absolute_position: StagePosition,
    pub eb_settings: BeamSettings,
    pub ib_settings: BeamSettings,
}

impl Default for MicroscopeState {
    fn default() -> Self {
        Self::capture(
            StagePosition::default(),
            BeamSettings::new(BeamType::Electron),
            BeamSettings::new(BeamType::Ion),
        )
    }
}

impl MicroscopeState {
    /// Builds a snapshot stamped with the current time.
    pub fn capture(
        absolute_position: StagePosition,
        eb_settings: BeamSettings,
        ib_settings: BeamSettings,
    ) -> Self {
        Self {
            timestamp: unix_timestamp(),
            absolute_position,
            eb_settings,
            ib_settings,
        }
    }
}

impl MappingRecord for MicroscopeState {
    const RECORD: &'static str = "MicroscopeState";
    const REQUIRED: &'static [&'static str] =
        &["timestamp", "absolute_position", "eb_settings", "ib_settings"];

    fn check_keys(mapping: &Mapping) -> Result<()> {
        require_keys(mapping, Self::RECORD, Self::REQUIRED)?;
        check_nested::<StagePosition>(mapping, "absolute_position")?;
        check_nested::<BeamSettings>(mapping, "eb_settings")?;
        check_nested::<BeamSettings>(mapping, "ib_settings")
    }

    fn validate(&self) -> Result<()> {
        ensure_finite(Self::RECORD, "timestamp", self.timestamp)?;
        self.absolute_position.validate()?;
        self.eb_settings.validate()?;
        self.ib_settings.validate()
    }
}

pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}
