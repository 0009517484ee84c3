use log::{debug, info, warn};

use crate::model::{BeamType, FibsemImage, ImageSettings, MoveSettings, StagePosition};

use super::mode::{EUCENTRIC_MODE_INSTRUCTION, METRE_TO_MICRON, MICRON_TO_METRE, OUTSIDE_IMAGE_NOTICE};
use super::{
    ClickTarget, CompositeImage, MessageKind, Microscope, MovementError, MovementLimits,
    MovementMode, NeedleCoordinate, PixelCoordinate, Result, Viewer,
};

/// Discrete operator input driving the dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementEvent {
    ModeSelected(MovementMode),
    NeedleCoordinateSelected(NeedleCoordinate),
    HfwChanged { microns: f64 },
    TakeImage,
    DoubleClick(PixelCoordinate),
    SingleClick(PixelCoordinate),
    Tilt { degrees: f64 },
    AutoEucentric,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveAction {
    Eucentric { dy: f64 },
    Stable { dx: f64, dy: f64, beam_type: BeamType },
    Tilt { radians: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Ignored,
    ControlsUpdated,
    ModeChanged(MovementMode),
    Refreshed { displayed: bool },
    /// The click landed outside both beam images; nothing moved.
    NoBeam,
    Moved { action: MoveAction, displayed: bool },
    Aligned { displayed: bool },
    NeedlePicked {
        role: NeedleCoordinate,
        target: Option<ClickTarget>,
    },
    Closed,
}

/// What the rendering layer should currently show besides the images.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogView {
    pub instruction: String,
    pub needle_selector_visible: bool,
    pub tilt_controls_visible: bool,
    pub hfw_um: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DialogOptions {
    pub message_kind: Option<MessageKind>,
    pub message: Option<String>,
    pub limits: MovementLimits,
}

/// The last acquired beam pair and the composite built from it.
#[derive(Debug, Clone)]
pub struct BeamImages {
    pub electron: FibsemImage,
    pub ion: FibsemImage,
    pub composite: CompositeImage,
}

impl BeamImages {
    pub fn image(&self, beam_type: BeamType) -> &FibsemImage {
        match beam_type {
            BeamType::Electron => &self.electron,
            BeamType::Ion => &self.ion,
        }
    }
}

pub struct MovementController<M, V> {
    microscope: M,
    viewer: V,
    image_settings: ImageSettings,
    limits: MovementLimits,
    message_kind: Option<MessageKind>,
    message: Option<String>,
    mode: MovementMode,
    tilt_enabled: bool,
    needle_coordinate: NeedleCoordinate,
    needle_picks: [Option<ClickTarget>; 2],
    view: DialogView,
    images: Option<BeamImages>,
    open: bool,
}

impl<M, V> std::fmt::Debug for MovementController<M, V> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("MovementController")
            .field("mode", &self.mode)
            .field("tilt_enabled", &self.tilt_enabled)
            .field("view", &self.view)
            .field("has_images", &self.images.is_some())
            .field("open", &self.open)
            .finish()
    }
}

impl<M: Microscope, V: Viewer> MovementController<M, V> {
    /// Opens the dialog and performs the initial acquisition. A failed first
    /// acquisition is reported through the viewer, not returned.
    pub fn new(microscope: M, viewer: V, image_settings: ImageSettings, options: DialogOptions) -> Self {
        let DialogOptions {
            message_kind,
            message,
            limits,
        } = options;
        let tilt_enabled = message_kind.is_some_and(MessageKind::enables_tilt);
        let hfw_um = limits.clamp_hfw_um(image_settings.hfw * METRE_TO_MICRON);

        let mut controller = Self {
            microscope,
            viewer,
            image_settings,
            limits,
            message_kind,
            message,
            mode: MovementMode::default(),
            tilt_enabled,
            needle_coordinate: NeedleCoordinate::default(),
            needle_picks: [None, None],
            view: DialogView {
                instruction: String::new(),
                needle_selector_visible: false,
                tilt_controls_visible: tilt_enabled,
                hfw_um,
            },
            images: None,
            open: true,
        };
        controller.update_instruction();
        controller.viewer.update_controls(&controller.view);
        controller.refresh();
        controller
    }

    pub fn dispatch(&mut self, event: MovementEvent) -> Result<Outcome> {
        if !self.open {
            debug!("dialog closed, ignoring {event:?}");
            return Ok(Outcome::Ignored);
        }
        match event {
            MovementEvent::ModeSelected(mode) => Ok(self.select_mode(mode)),
            MovementEvent::NeedleCoordinateSelected(role) => {
                self.needle_coordinate = role;
                Ok(Outcome::ControlsUpdated)
            }
            MovementEvent::HfwChanged { microns } => self.set_hfw(microns),
            MovementEvent::TakeImage => Ok(Outcome::Refreshed {
                displayed: self.refresh(),
            }),
            MovementEvent::DoubleClick(coord) => self.double_click(coord),
            MovementEvent::SingleClick(coord) => Ok(self.single_click(coord)),
            MovementEvent::Tilt { degrees } => self.tilt(degrees),
            MovementEvent::AutoEucentric => {
                self.microscope
                    .auto_eucentric_correction(&self.image_settings)?;
                Ok(Outcome::Aligned {
                    displayed: self.refresh(),
                })
            }
            MovementEvent::Continue => {
                info!("continue button pressed");
                self.open = false;
                Ok(Outcome::Closed)
            }
        }
    }

    fn select_mode(&mut self, mode: MovementMode) -> Outcome {
        self.mode = mode;
        info!("changed mode to: {mode}");
        self.update_instruction();
        self.view.needle_selector_visible = mode == MovementMode::Needle;
        self.viewer.update_controls(&self.view);
        Outcome::ModeChanged(mode)
    }

    fn update_instruction(&mut self) {
        match self.mode {
            MovementMode::Eucentric => {
                self.view.instruction = EUCENTRIC_MODE_INSTRUCTION.to_string();
            }
            MovementMode::Stable => {
                self.view.instruction = self
                    .message
                    .clone()
                    .or_else(|| {
                        self.message_kind
                            .map(|kind| kind.default_message().to_string())
                    })
                    .unwrap_or_default();
            }
            MovementMode::Needle => {}
        }
    }

    fn set_hfw(&mut self, microns: f64) -> Result<Outcome> {
        if !microns.is_finite() {
            return Err(MovementError::InvalidInput(format!(
                "field width {microns} um is not a finite number"
            )));
        }
        self.view.hfw_um = self.limits.clamp_hfw_um(microns);
        self.viewer.update_controls(&self.view);
        Ok(Outcome::ControlsUpdated)
    }

    /// Re-acquires both beams and replaces the display. Failures are reported
    /// to the operator and leave the previous images in place.
    fn refresh(&mut self) -> bool {
        match self.try_refresh() {
            Ok(()) => true,
            Err(error) => {
                warn!("unable to update movement image: {error}");
                self.viewer
                    .notify(&format!("Unable to update movement image: {error}"));
                false
            }
        }
    }

    fn try_refresh(&mut self) -> Result<()> {
        self.image_settings.hfw = self.view.hfw_um * MICRON_TO_METRE;
        let (electron, ion) = self
            .microscope
            .take_reference_images(&self.image_settings)?;
        let composite = CompositeImage::from_pair(&electron, &ion)?;
        self.viewer.show(&composite)?;
        self.images = Some(BeamImages {
            electron,
            ion,
            composite,
        });
        Ok(())
    }

    fn resolve(&self, coord: PixelCoordinate) -> Option<ClickTarget> {
        self.images
            .as_ref()
            .and_then(|images| images.composite.resolve(coord))
    }

    fn double_click(&mut self, coord: PixelCoordinate) -> Result<Outcome> {
        let (target, shift) = match &self.images {
            Some(images) => match images.composite.resolve(coord) {
                Some(target) => {
                    let image = images.image(target.beam_type);
                    let shift = self.microscope.pixel_to_realspace(target.coord, image)?;
                    (target, shift)
                }
                None => return Ok(self.outside_image()),
            },
            None => return Ok(self.outside_image()),
        };

        info!("coords: {:?}, beam_type: {}", target.coord, target.beam_type);
        info!("movement: x={:.2e}, y={:.2e}", shift.x, shift.y);

        // eucentric correction only exists for the ion beam
        let action = if target.beam_type == BeamType::Ion && self.mode == MovementMode::Eucentric {
            info!("moving eucentricly in {}", target.beam_type);
            let dy = -shift.y;
            self.microscope.move_stage_eucentric_correction(dy)?;
            MoveAction::Eucentric { dy }
        } else {
            info!("moving stably in {}", target.beam_type);
            self.microscope.move_stage_relative_with_corrected_movement(
                shift.x,
                shift.y,
                target.beam_type,
            )?;
            MoveAction::Stable {
                dx: shift.x,
                dy: shift.y,
                beam_type: target.beam_type,
            }
        };

        Ok(Outcome::Moved {
            action,
            displayed: self.refresh(),
        })
    }

    fn outside_image(&mut self) -> Outcome {
        self.viewer.notify(OUTSIDE_IMAGE_NOTICE);
        Outcome::NoBeam
    }

    fn single_click(&mut self, coord: PixelCoordinate) -> Outcome {
        if self.mode != MovementMode::Needle {
            return Outcome::Ignored;
        }
        let role = self.needle_coordinate;
        let target = self.resolve(coord);
        info!("coords: {coord:?}, type: {role}");
        match target {
            Some(target) => {
                info!("beam_type: {}", target.beam_type);
                self.needle_picks[role.index()] = Some(target);
            }
            None => info!("beam_type: none"),
        }
        Outcome::NeedlePicked { role, target }
    }

    fn tilt(&mut self, degrees: f64) -> Result<Outcome> {
        if !self.tilt_enabled {
            return Err(MovementError::TiltDisabled);
        }
        if !degrees.is_finite() {
            return Err(MovementError::InvalidInput(format!(
                "tilt {degrees} deg is not a finite number"
            )));
        }
        let radians = self.limits.clamp_tilt_deg(degrees).to_radians();
        info!("tilting stage to {radians:.4} rad");
        self.microscope
            .absolute_move(&StagePosition::tilt(radians), &MoveSettings::compucentric())?;
        Ok(Outcome::Moved {
            action: MoveAction::Tilt { radians },
            displayed: self.refresh(),
        })
    }
}

impl<M, V> MovementController<M, V> {
    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn tilt_enabled(&self) -> bool {
        self.tilt_enabled
    }

    pub fn view(&self) -> &DialogView {
        &self.view
    }

    pub fn images(&self) -> Option<&BeamImages> {
        self.images.as_ref()
    }

    pub fn image_settings(&self) -> &ImageSettings {
        &self.image_settings
    }

    pub fn needle_coordinate(&self) -> NeedleCoordinate {
        self.needle_coordinate
    }

    pub fn needle_pick(&self, role: NeedleCoordinate) -> Option<ClickTarget> {
        self.needle_picks[role.index()]
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn microscope(&self) -> &M {
        &self.microscope
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn into_parts(self) -> (M, V) {
        (self.microscope, self.viewer)
    }
}
