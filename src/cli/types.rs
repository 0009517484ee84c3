use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::model::StagePosition;
use crate::sim::StageMove;

#[derive(Debug, Parser)]
#[command(
    name = "fibsem",
    version,
    about = "FIB-SEM image metadata and stage movement tools"
)]
pub(super) struct Cli {
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Prints shape, pixel type and metadata version of a TIFF image.
    Info { input: PathBuf },
    /// Prints the metadata mapping embedded in a TIFF image.
    Metadata { input: PathBuf },
    /// Embeds a JSON or YAML metadata mapping into a copy of an image.
    Tag {
        input: PathBuf,
        metadata: PathBuf,
        output: PathBuf,
    },
    /// Runs one double click (and optionally a tilt) against the simulated
    /// microscope and prints the resulting stage state.
    Simulate {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "Stable")]
        mode: String,
        /// `eucentric` or `alignment`
        #[arg(long)]
        hint: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        hfw: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        row: f64,
        #[arg(long, allow_negative_numbers = true)]
        col: f64,
        #[arg(long)]
        tilt: Option<f64>,
    },
}

#[derive(Debug, Serialize)]
pub(super) struct ImageInfo {
    pub(super) shape: [usize; 2],
    pub(super) pixel_type: String,
    pub(super) has_metadata: bool,
    pub(super) version: Option<String>,
    pub(super) current_version: bool,
    pub(super) beam_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SimulationReport {
    pub(super) mode: String,
    pub(super) outcomes: Vec<String>,
    pub(super) instruction: String,
    pub(super) acquisitions: usize,
    pub(super) position: StagePosition,
    pub(super) moves: Vec<StageMove>,
    pub(super) notices: Vec<String>,
}
