use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::mapping::{Mapping, MappingRecord, ensure_finite_opt, require_keys};
use super::{CoreError, Result};

/// Which imaging beam produced an image or should execute a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BeamType {
    Electron,
    Ion,
}

impl BeamType {
    pub const ALL: [BeamType; 2] = [BeamType::Electron, BeamType::Ion];

    pub fn name(self) -> &'static str {
        match self {
            BeamType::Electron => "ELECTRON",
            BeamType::Ion => "ION",
        }
    }
}

impl FromStr for BeamType {
    type Err = CoreError;

    fn from_str(name: &str) -> Result<Self> {
        BeamType::ALL
            .into_iter()
            .find(|beam| beam.name() == name)
            .ok_or_else(|| CoreError::UnknownBeamType(name.to_string()))
    }
}

impl TryFrom<String> for BeamType {
    type Error = CoreError;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

impl From<BeamType> for String {
    fn from(beam: BeamType) -> Self {
        beam.name().to_string()
    }
}

impl fmt::Display for BeamType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Surfaces an unknown `beam_type` as a lookup error rather than a generic
/// decode failure.
pub(crate) fn check_beam_type(mapping: &Mapping) -> Result<()> {
    if let Some(name) = mapping.get("beam_type").and_then(Value::as_str) {
        name.parse::<BeamType>()?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSettings {
    pub beam_type: BeamType,
    #[serde(default)]
    pub working_distance: Option<f64>,
    #[serde(default)]
    pub beam_current: Option<f64>,
    #[serde(default)]
    pub hfw: Option<f64>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub dwell_time: Option<f64>,
    #[serde(default)]
    pub stigmation: Option<f64>,
}

impl BeamSettings {
    pub fn new(beam_type: BeamType) -> Self {
        Self {
            beam_type,
            working_distance: None,
            beam_current: None,
            hfw: None,
            resolution: None,
            dwell_time: None,
            stigmation: None,
        }
    }
}

impl MappingRecord for BeamSettings {
    const RECORD: &'static str = "BeamSettings";
    const REQUIRED: &'static [&'static str] = &["beam_type"];

    fn check_keys(mapping: &Mapping) -> Result<()> {
        require_keys(mapping, Self::RECORD, Self::REQUIRED)?;
        check_beam_type(mapping)
    }

    fn validate(&self) -> Result<()> {
        let record = Self::RECORD;
        ensure_finite_opt(record, "working_distance", self.working_distance)?;
        ensure_finite_opt(record, "beam_current", self.beam_current)?;
        ensure_finite_opt(record, "hfw", self.hfw)?;
        ensure_finite_opt(record, "dwell_time", self.dwell_time)?;
        ensure_finite_opt(record, "stigmation", self.stigmation)
    }
}
