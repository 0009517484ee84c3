use log::{debug, info};
use ndarray::Array2;
use serde::Serialize;

use crate::model::{
    BeamSettings, BeamType, FibsemImage, FibsemImageMetadata, ImageSettings,
    MicroscopeState, MoveSettings, Point, StagePosition,
};
use crate::movement::{Acquisition, Alignment, Motion, Result};

/// One instruction received by the simulated stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageMove {
    Eucentric { dy: f64 },
    Relative { dx: f64, dy: f64, beam_type: BeamType },
    Absolute { position: StagePosition, settings: MoveSettings },
    AutoEucentric,
}

/// Stage and beams held in memory. Images are a diagonal gradient that
/// scrolls with the stage, so successive acquisitions differ after a move.
#[derive(Debug, Clone)]
pub struct SimulatedMicroscope {
    position: StagePosition,
    eb_settings: BeamSettings,
    ib_settings: BeamSettings,
    moves: Vec<StageMove>,
    acquisitions: usize,
}

impl Default for SimulatedMicroscope {
    fn default() -> Self {
        Self::new(StagePosition::origin())
    }
}

impl SimulatedMicroscope {
    pub fn new(position: StagePosition) -> Self {
        Self {
            position,
            eb_settings: BeamSettings::new(BeamType::Electron),
            ib_settings: BeamSettings::new(BeamType::Ion),
            moves: Vec::new(),
            acquisitions: 0,
        }
    }

    pub fn position(&self) -> &StagePosition {
        &self.position
    }

    pub fn moves(&self) -> &[StageMove] {
        &self.moves
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions
    }

    fn beam_settings_mut(&mut self, beam_type: BeamType) -> &mut BeamSettings {
        match beam_type {
            BeamType::Electron => &mut self.eb_settings,
            BeamType::Ion => &mut self.ib_settings,
        }
    }

    fn acquire(&mut self, settings: &ImageSettings, beam_type: BeamType) -> Result<FibsemImage> {
        let (width, height) = settings.resolution_dimensions()?;
        let pixel_size = settings.hfw / width as f64;

        let beam = self.beam_settings_mut(beam_type);
        beam.hfw = Some(settings.hfw);
        beam.resolution = Some(settings.resolution.clone());
        beam.dwell_time = Some(settings.dwell_time);

        let shift_x = (self.position.x.unwrap_or_default() / pixel_size).round() as i64;
        let shift_y = (self.position.y.unwrap_or_default() / pixel_size).round() as i64;
        let data = Array2::from_shape_fn((height, width), |(row, col)| {
            let value = (row as i64 - shift_y) + (col as i64 + shift_x);
            value.rem_euclid(256) as u8
        });

        let state = MicroscopeState::capture(
            self.position.clone(),
            self.eb_settings.clone(),
            self.ib_settings.clone(),
        );
        let image_settings = ImageSettings {
            beam_type,
            ..settings.clone()
        };
        let metadata =
            FibsemImageMetadata::new(image_settings, Point::new(pixel_size, pixel_size), state);
        Ok(FibsemImage::from_pixels(data, Some(metadata)))
    }
}

impl Acquisition for SimulatedMicroscope {
    fn take_reference_images(
        &mut self,
        settings: &ImageSettings,
    ) -> Result<(FibsemImage, FibsemImage)> {
        let electron = self.acquire(settings, BeamType::Electron)?;
        let ion = self.acquire(settings, BeamType::Ion)?;
        self.acquisitions += 1;
        debug!(
            "acquired reference images {} at hfw {:.2e}",
            settings.resolution, settings.hfw
        );
        Ok((electron, ion))
    }
}

impl Motion for SimulatedMicroscope {
    fn move_stage_eucentric_correction(&mut self, dy: f64) -> Result<()> {
        let z = self.position.z.unwrap_or_default() + dy;
        self.position.z = Some(z);
        info!("simulated eucentric correction dy={dy:.2e}, z={z:.2e}");
        self.moves.push(StageMove::Eucentric { dy });
        Ok(())
    }

    fn move_stage_relative_with_corrected_movement(
        &mut self,
        dx: f64,
        dy: f64,
        beam_type: BeamType,
    ) -> Result<()> {
        self.position.x = Some(self.position.x.unwrap_or_default() + dx);
        self.position.y = Some(self.position.y.unwrap_or_default() + dy);
        info!("simulated {beam_type} relative move dx={dx:.2e}, dy={dy:.2e}");
        self.moves.push(StageMove::Relative { dx, dy, beam_type });
        Ok(())
    }

    fn absolute_move(&mut self, position: &StagePosition, settings: &MoveSettings) -> Result<()> {
        self.position.apply(position);
        info!("simulated absolute move to {:?}", self.position);
        self.moves.push(StageMove::Absolute {
            position: position.clone(),
            settings: *settings,
        });
        Ok(())
    }
}

impl Alignment for SimulatedMicroscope {
    fn auto_eucentric_correction(&mut self, settings: &ImageSettings) -> Result<()> {
        info!("simulated auto eucentric correction at hfw {:.2e}", settings.hfw);
        self.moves.push(StageMove::AutoEucentric);
        Ok(())
    }
}
