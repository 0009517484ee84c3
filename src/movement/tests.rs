use approx::assert_relative_eq;
use ndarray::Array2;

use crate::model::{
    BeamType, FibsemImage, FibsemImageMetadata, ImageSettings, MicroscopeState, MoveSettings,
    PixelType, Point, StagePosition,
};

use super::{
    Acquisition, Alignment, CompositeImage, DialogOptions, DialogView, EUCENTRIC_MODE_INSTRUCTION,
    MessageKind, MoveAction, Motion, MovementController, MovementError, MovementEvent,
    MovementLimits, MovementMode, NeedleCoordinate, OUTSIDE_IMAGE_NOTICE, Outcome,
    PixelCoordinate, Result, Viewer, pixel_to_realspace,
};

const PIXEL_SIZE: f64 = 1.0e-6;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Acquire { hfw: f64 },
    Eucentric { dy: f64 },
    Stable { dx: f64, dy: f64, beam_type: BeamType },
    Absolute { position: StagePosition, settings: MoveSettings },
    AutoEucentric,
}

/// Serves 64 row by 32 column beam images, so the composite is 64x64.
#[derive(Debug, Default)]
struct FakeMicroscope {
    calls: Vec<Call>,
    fail_acquisition: bool,
    fail_motion: bool,
}

impl FakeMicroscope {
    fn moves(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| !matches!(call, Call::Acquire { .. }))
            .collect()
    }

    fn acquisitions(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Acquire { .. }))
            .count()
    }
}

fn beam_image(beam_type: BeamType, settings: &ImageSettings) -> FibsemImage {
    let image_settings = ImageSettings {
        beam_type,
        ..settings.clone()
    };
    let metadata = FibsemImageMetadata::new(
        image_settings,
        Point::new(PIXEL_SIZE, PIXEL_SIZE),
        MicroscopeState::default(),
    );
    FibsemImage::from_pixels(Array2::<u8>::zeros((64, 32)), Some(metadata))
}

impl Acquisition for FakeMicroscope {
    fn take_reference_images(
        &mut self,
        settings: &ImageSettings,
    ) -> Result<(FibsemImage, FibsemImage)> {
        self.calls.push(Call::Acquire { hfw: settings.hfw });
        if self.fail_acquisition {
            return Err(MovementError::Acquisition("beam blanked".into()));
        }
        Ok((
            beam_image(BeamType::Electron, settings),
            beam_image(BeamType::Ion, settings),
        ))
    }
}

impl Motion for FakeMicroscope {
    fn move_stage_eucentric_correction(&mut self, dy: f64) -> Result<()> {
        if self.fail_motion {
            return Err(MovementError::Motion("stage locked".into()));
        }
        self.calls.push(Call::Eucentric { dy });
        Ok(())
    }

    fn move_stage_relative_with_corrected_movement(
        &mut self,
        dx: f64,
        dy: f64,
        beam_type: BeamType,
    ) -> Result<()> {
        if self.fail_motion {
            return Err(MovementError::Motion("stage locked".into()));
        }
        self.calls.push(Call::Stable { dx, dy, beam_type });
        Ok(())
    }

    fn absolute_move(&mut self, position: &StagePosition, settings: &MoveSettings) -> Result<()> {
        self.calls.push(Call::Absolute {
            position: position.clone(),
            settings: *settings,
        });
        Ok(())
    }
}

impl Alignment for FakeMicroscope {
    fn auto_eucentric_correction(&mut self, _settings: &ImageSettings) -> Result<()> {
        self.calls.push(Call::AutoEucentric);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RecordingViewer {
    shown: Vec<(usize, usize)>,
    notices: Vec<String>,
    views: Vec<DialogView>,
}

impl Viewer for RecordingViewer {
    fn show(&mut self, composite: &CompositeImage) -> Result<()> {
        self.shown.push((composite.height(), composite.width()));
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn update_controls(&mut self, view: &DialogView) {
        self.views.push(view.clone());
    }
}

type Controller = MovementController<FakeMicroscope, RecordingViewer>;

fn open(options: DialogOptions) -> Controller {
    MovementController::new(
        FakeMicroscope::default(),
        RecordingViewer::default(),
        ImageSettings::default(),
        options,
    )
}

fn open_with_kind(kind: MessageKind) -> Controller {
    open(DialogOptions {
        message_kind: Some(kind),
        ..DialogOptions::default()
    })
}

fn pair(rows: usize, cols: usize) -> (FibsemImage, FibsemImage) {
    let settings = ImageSettings::default();
    let mut electron = beam_image(BeamType::Electron, &settings);
    let mut ion = beam_image(BeamType::Ion, &settings);
    electron.data = Array2::<u8>::zeros((rows, cols)).into();
    ion.data = Array2::<u8>::zeros((rows, cols)).into();
    (electron, ion)
}

#[test]
fn composite_places_electron_left_and_ion_right() {
    let electron = FibsemImage::from_pixels(Array2::<u16>::from_elem((4, 3), 1), None);
    let ion = FibsemImage::from_pixels(Array2::<u16>::from_elem((4, 3), 2), None);
    let composite = CompositeImage::from_pair(&electron, &ion).expect("composite");
    assert_eq!((composite.height(), composite.width()), (4, 6));
    assert_eq!(composite.half_width(), 3);
    match composite.data() {
        crate::model::PixelData::U16(data) => {
            assert_eq!(data[(0, 0)], 1);
            assert_eq!(data[(3, 5)], 2);
        }
        other => panic!("unexpected pixel data {:?}", other.pixel_type()),
    }
}

#[test]
fn composite_rejects_mismatched_pairs() {
    let (electron, _) = pair(64, 32);
    let (_, ion) = pair(60, 32);
    assert!(matches!(
        CompositeImage::from_pair(&electron, &ion),
        Err(MovementError::ShapeMismatch { .. })
    ));

    let float_ion = FibsemImage::from_pixels(Array2::<f32>::zeros((64, 32)), None);
    assert!(matches!(
        CompositeImage::from_pair(&electron, &float_ion),
        Err(MovementError::PixelTypeMismatch {
            electron: PixelType::U8,
            ion: PixelType::F32
        })
    ));
}

#[test]
fn clicks_resolve_to_the_beam_half_they_land_in() {
    let (electron, ion) = pair(64, 32);
    let composite = CompositeImage::from_pair(&electron, &ion).expect("composite");

    let target = composite
        .resolve(PixelCoordinate::new(10.0, 50.0))
        .expect("ion half");
    assert_eq!(target.beam_type, BeamType::Ion);
    assert_eq!(target.coord, PixelCoordinate::new(10.0, 18.0));

    let target = composite
        .resolve(PixelCoordinate::new(10.0, 10.0))
        .expect("electron half");
    assert_eq!(target.beam_type, BeamType::Electron);
    assert_eq!(target.coord, PixelCoordinate::new(10.0, 10.0));

    assert!(composite.resolve(PixelCoordinate::new(70.0, 10.0)).is_none());
    assert!(composite.resolve(PixelCoordinate::new(10.0, 64.0)).is_none());
}

#[test]
fn clicks_on_the_seam_or_border_resolve_to_no_beam() {
    let (electron, ion) = pair(64, 32);
    let composite = CompositeImage::from_pair(&electron, &ion).expect("composite");
    for coord in [
        PixelCoordinate::new(10.0, 32.0),
        PixelCoordinate::new(0.0, 10.0),
        PixelCoordinate::new(10.0, 0.0),
        PixelCoordinate::new(64.0, 40.0),
        PixelCoordinate::new(-1.0, 40.0),
    ] {
        assert!(composite.resolve(coord).is_none(), "{coord:?}");
    }
}

#[test]
fn realspace_offset_is_measured_from_the_centre_with_y_flipped() {
    let (electron, _) = pair(64, 32);
    let shift = pixel_to_realspace(PixelCoordinate::new(10.7, 18.2), &electron).expect("shift");
    assert_relative_eq!(shift.x, 2.0 * PIXEL_SIZE);
    assert_relative_eq!(shift.y, 22.0 * PIXEL_SIZE);

    let centre = pixel_to_realspace(PixelCoordinate::new(32.0, 16.0), &electron).expect("shift");
    assert_relative_eq!(centre.x, 0.0);
    assert_relative_eq!(centre.y, 0.0);
}

#[test]
fn realspace_falls_back_to_field_width_over_image_width() {
    let (mut electron, _) = pair(64, 32);
    if let Some(metadata) = electron.metadata.as_mut() {
        metadata.pixel_size = Point::new(0.0, 0.0);
        metadata.image_settings.hfw = 64.0e-6;
    }
    let shift = pixel_to_realspace(PixelCoordinate::new(32.0, 17.0), &electron).expect("shift");
    assert_relative_eq!(shift.x, 2.0e-6, max_relative = 1e-9);

    electron.metadata = None;
    assert!(matches!(
        pixel_to_realspace(PixelCoordinate::new(1.0, 1.0), &electron),
        Err(MovementError::MissingPixelSize)
    ));
}

#[test]
fn opening_the_dialog_acquires_and_displays_once() {
    let controller = open(DialogOptions::default());
    assert!(controller.is_open());
    assert_eq!(controller.mode(), MovementMode::Stable);
    assert_eq!(controller.microscope().acquisitions(), 1);
    assert_eq!(controller.viewer().shown, vec![(64, 64)]);
    assert_eq!(controller.view().instruction, "");
    assert!(!controller.view().tilt_controls_visible);
    assert!(!controller.view().needle_selector_visible);
    assert_relative_eq!(controller.view().hfw_um, 150.0, max_relative = 1e-9);
}

#[test]
fn stable_mode_shows_the_default_message_for_the_hint() {
    let controller = open_with_kind(MessageKind::Eucentric);
    assert_eq!(
        controller.view().instruction,
        MessageKind::Eucentric.default_message()
    );
    assert!(!controller.tilt_enabled());

    let controller = open(DialogOptions {
        message_kind: Some(MessageKind::Eucentric),
        message: Some("custom".into()),
        ..DialogOptions::default()
    });
    assert_eq!(controller.view().instruction, "custom");
}

#[test]
fn alignment_hint_enables_tilt_controls() {
    let controller = open_with_kind(MessageKind::Alignment);
    assert!(controller.tilt_enabled());
    assert!(controller.view().tilt_controls_visible);
}

#[test]
fn mode_changes_update_instruction_and_needle_selector() {
    let mut controller = open_with_kind(MessageKind::Eucentric);

    let outcome = controller
        .dispatch(MovementEvent::ModeSelected(MovementMode::Eucentric))
        .expect("dispatch");
    assert_eq!(outcome, Outcome::ModeChanged(MovementMode::Eucentric));
    assert_eq!(controller.view().instruction, EUCENTRIC_MODE_INSTRUCTION);
    assert!(!controller.view().needle_selector_visible);

    controller
        .dispatch(MovementEvent::ModeSelected(MovementMode::Needle))
        .expect("dispatch");
    assert!(controller.view().needle_selector_visible);
    assert_eq!(controller.view().instruction, EUCENTRIC_MODE_INSTRUCTION);

    controller
        .dispatch(MovementEvent::ModeSelected(MovementMode::Stable))
        .expect("dispatch");
    assert!(!controller.view().needle_selector_visible);
    assert_eq!(
        controller.view().instruction,
        MessageKind::Eucentric.default_message()
    );
    assert_eq!(controller.viewer().views.len(), 4);
}

#[test]
fn double_click_in_ion_half_with_eucentric_mode_corrects_height() {
    let mut controller = open(DialogOptions::default());
    controller
        .dispatch(MovementEvent::ModeSelected(MovementMode::Eucentric))
        .expect("dispatch");

    let outcome = controller
        .dispatch(MovementEvent::DoubleClick(PixelCoordinate::new(10.0, 50.0)))
        .expect("dispatch");

    let expected_dy = -(22.0 * PIXEL_SIZE);
    match outcome {
        Outcome::Moved {
            action: MoveAction::Eucentric { dy },
            displayed,
        } => {
            assert_relative_eq!(dy, expected_dy);
            assert!(displayed);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(controller.microscope().moves().len(), 1);
    assert_eq!(controller.microscope().acquisitions(), 2);
}

#[test]
fn double_click_in_electron_half_with_eucentric_mode_moves_stably() {
    let mut controller = open(DialogOptions::default());
    controller
        .dispatch(MovementEvent::ModeSelected(MovementMode::Eucentric))
        .expect("dispatch");

    controller
        .dispatch(MovementEvent::DoubleClick(PixelCoordinate::new(10.0, 10.0)))
        .expect("dispatch");

    match controller.microscope().moves().as_slice() {
        [Call::Stable { dx, dy, beam_type }] => {
            assert_eq!(*beam_type, BeamType::Electron);
            assert_relative_eq!(*dx, -6.0 * PIXEL_SIZE);
            assert_relative_eq!(*dy, 22.0 * PIXEL_SIZE);
        }
        other => panic!("unexpected moves {other:?}"),
    }
}

#[test]
fn double_click_in_stable_mode_uses_corrected_movement_for_ion() {
    let mut controller = open(DialogOptions::default());
    controller
        .dispatch(MovementEvent::DoubleClick(PixelCoordinate::new(10.0, 50.0)))
        .expect("dispatch");
    match controller.microscope().moves().as_slice() {
        [Call::Stable { dx, beam_type, .. }] => {
            assert_eq!(*beam_type, BeamType::Ion);
            assert_relative_eq!(*dx, 2.0 * PIXEL_SIZE);
        }
        other => panic!("unexpected moves {other:?}"),
    }
}

#[test]
fn double_click_outside_the_image_notifies_without_moving() {
    let mut controller = open(DialogOptions::default());
    let outcome = controller
        .dispatch(MovementEvent::DoubleClick(PixelCoordinate::new(70.0, 10.0)))
        .expect("dispatch");
    assert_eq!(outcome, Outcome::NoBeam);
    assert!(controller.microscope().moves().is_empty());
    assert_eq!(controller.microscope().acquisitions(), 1);
    assert_eq!(controller.viewer().notices, vec![OUTSIDE_IMAGE_NOTICE]);
}

#[test]
fn motion_failure_is_returned_to_the_caller() {
    let microscope = FakeMicroscope {
        fail_motion: true,
        ..FakeMicroscope::default()
    };
    let mut controller = MovementController::new(
        microscope,
        RecordingViewer::default(),
        ImageSettings::default(),
        DialogOptions::default(),
    );
    let result = controller.dispatch(MovementEvent::DoubleClick(PixelCoordinate::new(10.0, 10.0)));
    assert!(matches!(result, Err(MovementError::Motion(_))));
}

#[test]
fn refresh_failure_is_reported_and_keeps_previous_images() {
    let microscope = FakeMicroscope {
        fail_acquisition: true,
        ..FakeMicroscope::default()
    };
    let mut controller = MovementController::new(
        microscope,
        RecordingViewer::default(),
        ImageSettings::default(),
        DialogOptions::default(),
    );
    assert!(controller.images().is_none());
    assert_eq!(controller.viewer().notices.len(), 1);
    assert!(controller.viewer().notices[0].starts_with("Unable to update movement image"));

    let outcome = controller
        .dispatch(MovementEvent::DoubleClick(PixelCoordinate::new(10.0, 10.0)))
        .expect("dispatch");
    assert_eq!(outcome, Outcome::NoBeam);
}

#[test]
fn field_width_is_clamped_and_used_on_next_acquisition() {
    let mut controller = open(DialogOptions::default());
    controller
        .dispatch(MovementEvent::HfwChanged { microns: 5000.0 })
        .expect("dispatch");
    assert_relative_eq!(controller.view().hfw_um, 900.0, max_relative = 1e-9);

    controller
        .dispatch(MovementEvent::HfwChanged { microns: 80.0 })
        .expect("dispatch");
    let outcome = controller
        .dispatch(MovementEvent::TakeImage)
        .expect("dispatch");
    assert_eq!(outcome, Outcome::Refreshed { displayed: true });
    match controller.microscope().calls.last() {
        Some(Call::Acquire { hfw }) => {
            assert_relative_eq!(*hfw, 80.0e-6, max_relative = 1e-9);
        }
        other => panic!("unexpected call {other:?}"),
    }
    assert!(matches!(
        controller.dispatch(MovementEvent::HfwChanged { microns: f64::NAN }),
        Err(MovementError::InvalidInput(_))
    ));
}

#[test]
fn tilt_requires_the_alignment_hint() {
    let mut controller = open_with_kind(MessageKind::Eucentric);
    assert!(matches!(
        controller.dispatch(MovementEvent::Tilt { degrees: 10.0 }),
        Err(MovementError::TiltDisabled)
    ));
    assert!(controller.microscope().moves().is_empty());
}

#[test]
fn tilt_moves_compucentrically_in_radians_and_clamps() {
    let mut controller = open_with_kind(MessageKind::Alignment);
    let outcome = controller
        .dispatch(MovementEvent::Tilt { degrees: 40.0 })
        .expect("dispatch");
    let expected = 25.0_f64.to_radians();
    match outcome {
        Outcome::Moved {
            action: MoveAction::Tilt { radians },
            ..
        } => assert_relative_eq!(radians, expected),
        other => panic!("unexpected outcome {other:?}"),
    }
    match controller.microscope().moves().as_slice() {
        [Call::Absolute { position, settings }] => {
            assert_relative_eq!(position.t.unwrap_or_default(), expected);
            assert!(position.x.is_none());
            assert_eq!(*settings, MoveSettings::compucentric());
        }
        other => panic!("unexpected moves {other:?}"),
    }
}

#[test]
fn auto_eucentric_runs_alignment_then_refreshes() {
    let mut controller = open(DialogOptions::default());
    let outcome = controller
        .dispatch(MovementEvent::AutoEucentric)
        .expect("dispatch");
    assert_eq!(outcome, Outcome::Aligned { displayed: true });
    assert_eq!(controller.microscope().moves(), vec![&Call::AutoEucentric]);
    assert_eq!(controller.microscope().acquisitions(), 2);
}

#[test]
fn needle_single_clicks_record_a_pick_per_role() {
    let mut controller = open(DialogOptions::default());
    let ignored = controller
        .dispatch(MovementEvent::SingleClick(PixelCoordinate::new(10.0, 10.0)))
        .expect("dispatch");
    assert_eq!(ignored, Outcome::Ignored);

    controller
        .dispatch(MovementEvent::ModeSelected(MovementMode::Needle))
        .expect("dispatch");
    controller
        .dispatch(MovementEvent::SingleClick(PixelCoordinate::new(10.0, 10.0)))
        .expect("dispatch");
    controller
        .dispatch(MovementEvent::NeedleCoordinateSelected(
            NeedleCoordinate::Destination,
        ))
        .expect("dispatch");
    let outcome = controller
        .dispatch(MovementEvent::SingleClick(PixelCoordinate::new(20.0, 40.0)))
        .expect("dispatch");

    match outcome {
        Outcome::NeedlePicked {
            role: NeedleCoordinate::Destination,
            target: Some(target),
        } => {
            assert_eq!(target.beam_type, BeamType::Ion);
            assert_eq!(target.coord, PixelCoordinate::new(20.0, 8.0));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    let source = controller
        .needle_pick(NeedleCoordinate::Source)
        .expect("source pick");
    assert_eq!(source.beam_type, BeamType::Electron);
    assert!(controller.microscope().moves().is_empty());
}

#[test]
fn continue_closes_the_dialog_and_later_events_are_ignored() {
    let mut controller = open(DialogOptions::default());
    assert_eq!(
        controller.dispatch(MovementEvent::Continue).expect("dispatch"),
        Outcome::Closed
    );
    assert!(!controller.is_open());
    assert_eq!(
        controller
            .dispatch(MovementEvent::DoubleClick(PixelCoordinate::new(10.0, 10.0)))
            .expect("dispatch"),
        Outcome::Ignored
    );
    assert!(controller.microscope().moves().is_empty());
}

#[test]
fn limits_validate_and_parse_names() {
    assert!(MovementLimits::default().validate().is_ok());
    let inverted = MovementLimits {
        hfw_min_um: 900.0,
        hfw_max_um: 30.0,
        ..MovementLimits::default()
    };
    assert!(inverted.validate().is_err());
    assert_eq!("Needle".parse::<MovementMode>().ok(), Some(MovementMode::Needle));
    assert_eq!(
        "alignment".parse::<MessageKind>().ok(),
        Some(MessageKind::Alignment)
    );
    assert!(matches!(
        "sideways".parse::<MovementMode>(),
        Err(MovementError::UnknownName { .. })
    ));
}
