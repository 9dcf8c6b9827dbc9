use indicatif::{ProgressBar, ProgressStyle};

use fieldrot_core::pipeline::{PipelineStage, ProgressReporter};

/// Progress reporter that drives a single terminal progress bar.
pub struct BarReporter {
    pb: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{msg:22} [{bar:40}] {pos}/{len}")
        {
            pb.set_style(style.progress_chars("=> "));
        }
        Self { pb }
    }

    pub fn finish(&self) {
        self.pb.finish_with_message("Done");
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.pb.set_message(stage.to_string());
        self.pb.set_length(total_items.unwrap_or(1) as u64);
        self.pb.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.pb.length() {
            self.pb.set_position(len);
        }
    }
}
