mod collaborators;
mod composite;
mod controller;
mod conversions;
mod error;
mod mode;

#[cfg(test)]
mod tests;

pub use collaborators::{Acquisition, Alignment, Microscope, Motion, Viewer};
pub use composite::{ClickTarget, CompositeImage, PixelCoordinate};
pub use controller::{
    BeamImages, DialogOptions, DialogView, MoveAction, MovementController, MovementEvent, Outcome,
};
pub use conversions::{pixel_to_realspace, pixel_size_x};
pub use error::{MovementError, Result};
pub use mode::{
    EUCENTRIC_MODE_INSTRUCTION, METRE_TO_MICRON, MICRON_TO_METRE, MessageKind, MovementLimits,
    MovementMode, NeedleCoordinate, OUTSIDE_IMAGE_NOTICE,
};
