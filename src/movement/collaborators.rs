//! Seams between the movement dialog and the outside world.
//!
//! A vendor session implements [`Acquisition`], [`Motion`] and [`Alignment`];
//! a GUI toolkit implements [`Viewer`]. All calls are synchronous and the
//! controller holds each collaborator exclusively.

use crate::model::{
    BeamType, FibsemImage, ImageSettings, MoveSettings, Point, StagePosition,
};

use super::conversions;
use super::{CompositeImage, DialogView, PixelCoordinate, Result};

pub trait Acquisition {
    /// Acquires one electron and one ion image with the same settings.
    fn take_reference_images(
        &mut self,
        settings: &ImageSettings,
    ) -> Result<(FibsemImage, FibsemImage)>;

    fn pixel_to_realspace(&self, coord: PixelCoordinate, image: &FibsemImage) -> Result<Point> {
        conversions::pixel_to_realspace(coord, image)
    }
}

pub trait Motion {
    /// Vertical move that keeps a feature centred in the ion view.
    fn move_stage_eucentric_correction(&mut self, dy: f64) -> Result<()>;

    /// Relative move corrected for the imaging geometry of `beam_type`.
    fn move_stage_relative_with_corrected_movement(
        &mut self,
        dx: f64,
        dy: f64,
        beam_type: BeamType,
    ) -> Result<()>;

    fn absolute_move(&mut self, position: &StagePosition, settings: &MoveSettings) -> Result<()>;
}

pub trait Alignment {
    fn auto_eucentric_correction(&mut self, settings: &ImageSettings) -> Result<()>;
}

/// A full instrument session.
pub trait Microscope: Acquisition + Motion + Alignment {}

impl<T: Acquisition + Motion + Alignment> Microscope for T {}

pub trait Viewer {
    /// Replaces whatever is displayed with `composite`.
    fn show(&mut self, composite: &CompositeImage) -> Result<()>;

    /// Non-fatal message to the operator.
    fn notify(&mut self, message: &str);

    fn update_controls(&mut self, _view: &DialogView) {}
}
