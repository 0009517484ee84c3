use std::fs;
use std::path::Path;

use clap::Parser;
use serde_json::{Value, json};

use crate::config::{SessionConfig, load_config};
use crate::formats::{load_image, save_image};
use crate::model::{FibsemImageMetadata, ImageSettings, MappingRecord};
use crate::movement::{
    DialogOptions, MessageKind, MovementController, MovementEvent, MovementMode, PixelCoordinate,
};
use crate::sim::{LogViewer, SimulatedMicroscope};

use super::types::{Cli, Commands, ImageInfo, SimulationReport};

pub fn run_cli() -> Result<(), String> {
    run(Cli::parse())
}

pub(super) fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Info { input } => {
            let image = load_image(&input).map_err(|error| error.to_string())?;
            let (height, width) = image.shape();
            let metadata = image.metadata.as_ref();
            let info = ImageInfo {
                shape: [height, width],
                pixel_type: format!("{:?}", image.pixel_type()),
                has_metadata: metadata.is_some(),
                version: metadata.map(|metadata| metadata.version.clone()),
                current_version: metadata.is_some_and(FibsemImageMetadata::is_current_version),
                beam_type: metadata
                    .map(|metadata| metadata.image_settings.beam_type.name().to_string()),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&info).map_err(|error| error.to_string())?
            );
        }
        Commands::Metadata { input } => {
            let image = load_image(&input).map_err(|error| error.to_string())?;
            let metadata = image
                .metadata
                .ok_or_else(|| format!("{} carries no metadata", input.display()))?;
            println!(
                "{}",
                serde_json::to_string_pretty(
                    &metadata.to_value().map_err(|error| error.to_string())?
                )
                .map_err(|error| error.to_string())?
            );
        }
        Commands::Tag {
            input,
            metadata,
            output,
        } => {
            let mut image = load_image(&input).map_err(|error| error.to_string())?;
            let value = read_mapping_file(&metadata)?;
            image.metadata = Some(
                FibsemImageMetadata::from_value(&value).map_err(|error| error.to_string())?,
            );
            save_image(&output, &image).map_err(|error| error.to_string())?;
            println!("{}", json!({"status": "ok", "output": output}));
        }
        Commands::Simulate {
            config,
            mode,
            hint,
            message,
            hfw,
            row,
            col,
            tilt,
        } => {
            let config = match config {
                Some(path) => load_config(path).map_err(|error| error.to_string())?,
                None => SessionConfig::default(),
            };
            let mode = mode.parse::<MovementMode>().map_err(|error| error.to_string())?;
            let message_kind = hint
                .as_deref()
                .map(str::parse::<MessageKind>)
                .transpose()
                .map_err(|error| error.to_string())?;
            let options = DialogOptions {
                message_kind,
                message,
                limits: config.movement,
            };
            let report = simulate(
                config.image,
                options,
                mode,
                hfw,
                PixelCoordinate::new(row, col),
                tilt,
            )?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).map_err(|error| error.to_string())?
            );
        }
    }

    Ok(())
}

fn read_mapping_file(path: &Path) -> Result<Value, String> {
    let raw = fs::read_to_string(path).map_err(|error| error.to_string())?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if matches!(extension.as_str(), "yaml" | "yml") {
        serde_yaml::from_str(&raw).map_err(|error| error.to_string())
    } else {
        serde_json::from_str(&raw).map_err(|error| error.to_string())
    }
}

pub(super) fn simulate(
    image_settings: ImageSettings,
    options: DialogOptions,
    mode: MovementMode,
    hfw: Option<f64>,
    click: PixelCoordinate,
    tilt: Option<f64>,
) -> Result<SimulationReport, String> {
    let mut controller = MovementController::new(
        SimulatedMicroscope::default(),
        LogViewer::default(),
        image_settings,
        options,
    );

    let mut events = vec![MovementEvent::ModeSelected(mode)];
    if let Some(microns) = hfw {
        events.push(MovementEvent::HfwChanged { microns });
        events.push(MovementEvent::TakeImage);
    }
    events.push(MovementEvent::DoubleClick(click));
    if let Some(degrees) = tilt {
        events.push(MovementEvent::Tilt { degrees });
    }
    events.push(MovementEvent::Continue);

    let mut outcomes = Vec::with_capacity(events.len());
    for event in events {
        let outcome = controller
            .dispatch(event)
            .map_err(|error| error.to_string())?;
        outcomes.push(format!("{outcome:?}"));
    }

    let instruction = controller.view().instruction.clone();
    let (microscope, viewer) = controller.into_parts();
    Ok(SimulationReport {
        mode: mode.to_string(),
        outcomes,
        instruction,
        acquisitions: microscope.acquisitions(),
        position: microscope.position().clone(),
        moves: microscope.moves().to_vec(),
        notices: viewer.notices().to_vec(),
    })
}
