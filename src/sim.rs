//! In-process instrument used by the `simulate` command and by tests that
//! need a complete microscope rather than a call recorder.

mod microscope;
mod viewer;


pub use microscope::{SimulatedMicroscope, StageMove};
pub use viewer::LogViewer;
