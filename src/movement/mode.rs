use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{MovementError, Result};

pub const MICRON_TO_METRE: f64 = 1.0e-6;
pub const METRE_TO_MICRON: f64 = 1.0e6;

pub const EUCENTRIC_MODE_INSTRUCTION: &str =
    "Centre a feature in the Electron Beam, then double click the same feature in the Ion Beam.";
pub const OUTSIDE_IMAGE_NOTICE: &str =
    "Clicked outside image dimensions. Please click inside the image to move.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementMode {
    #[default]
    Stable,
    Eucentric,
    Needle,
}

impl MovementMode {
    pub const ALL: [MovementMode; 3] = [
        MovementMode::Stable,
        MovementMode::Eucentric,
        MovementMode::Needle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MovementMode::Stable => "Stable",
            MovementMode::Eucentric => "Eucentric",
            MovementMode::Needle => "Needle",
        }
    }
}

impl FromStr for MovementMode {
    type Err = MovementError;

    fn from_str(name: &str) -> Result<Self> {
        MovementMode::ALL
            .into_iter()
            .find(|mode| mode.name() == name)
            .ok_or_else(|| MovementError::UnknownName {
                kind: "movement mode",
                name: name.to_string(),
            })
    }
}

impl fmt::Display for MovementMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Why the dialog was opened; selects the default instruction and whether
/// the tilt controls are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Eucentric,
    Alignment,
}

impl MessageKind {
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Eucentric => "eucentric",
            MessageKind::Alignment => "alignment",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            MessageKind::Eucentric => {
                "Please centre a feature in both Beam views (Double click to move). "
            }
            MessageKind::Alignment => {
                "Please centre the lamella in the Ion Beam, and tilt so the lamella face is perpendicular to the Ion Beam."
            }
        }
    }

    pub fn enables_tilt(self) -> bool {
        matches!(self, MessageKind::Alignment)
    }
}

impl FromStr for MessageKind {
    type Err = MovementError;

    fn from_str(name: &str) -> Result<Self> {
        [MessageKind::Eucentric, MessageKind::Alignment]
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| MovementError::UnknownName {
                kind: "message type",
                name: name.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NeedleCoordinate {
    #[default]
    Source,
    Destination,
}

impl NeedleCoordinate {
    pub fn name(self) -> &'static str {
        match self {
            NeedleCoordinate::Source => "Source",
            NeedleCoordinate::Destination => "Destination",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            NeedleCoordinate::Source => 0,
            NeedleCoordinate::Destination => 1,
        }
    }
}

impl fmt::Display for NeedleCoordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Bounds applied to operator inputs before they reach the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementLimits {
    pub hfw_min_um: f64,
    pub hfw_max_um: f64,
    pub tilt_max_deg: f64,
}

impl Default for MovementLimits {
    fn default() -> Self {
        Self {
            hfw_min_um: 30.0,
            hfw_max_um: 900.0,
            tilt_max_deg: 25.0,
        }
    }
}

impl MovementLimits {
    pub fn validate(&self) -> Result<()> {
        if !(self.hfw_min_um > 0.0 && self.hfw_min_um <= self.hfw_max_um) {
            return Err(MovementError::InvalidInput(format!(
                "hfw range [{}, {}] um must be positive and ordered",
                self.hfw_min_um, self.hfw_max_um
            )));
        }
        if !(0.0..=90.0).contains(&self.tilt_max_deg) {
            return Err(MovementError::InvalidInput(format!(
                "tilt limit {} deg must lie within [0, 90]",
                self.tilt_max_deg
            )));
        }
        Ok(())
    }

    pub fn clamp_hfw_um(&self, microns: f64) -> f64 {
        microns.clamp(self.hfw_min_um, self.hfw_max_um)
    }

    pub fn clamp_tilt_deg(&self, degrees: f64) -> f64 {
        degrees.clamp(0.0, self.tilt_max_deg)
    }
}
