use log::{info, warn};

use crate::movement::{CompositeImage, DialogView, Result, Viewer};

/// Headless viewer that logs what a GUI would display.
#[derive(Debug, Default)]
pub struct LogViewer {
    frames: usize,
    notices: Vec<String>,
    instruction: String,
}

impl LogViewer {
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

impl Viewer for LogViewer {
    fn show(&mut self, composite: &CompositeImage) -> Result<()> {
        self.frames += 1;
        info!(
            "displaying {}x{} {:?} composite",
            composite.width(),
            composite.height(),
            composite.data().pixel_type()
        );
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        warn!("{message}");
        self.notices.push(message.to_string());
    }

    fn update_controls(&mut self, view: &DialogView) {
        self.instruction.clone_from(&view.instruction);
    }
}
