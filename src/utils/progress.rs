use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::time::Duration;

const STAGE_TEMPLATE: &str = "{spinner} {prefix:.bold} {wide_msg}";
const DONE_TEMPLATE: &str = "{prefix:.bold} {wide_msg}";

/// One spinner line per associate.
pub struct AssociateProgress {
    pb: ProgressBar,
}

impl AssociateProgress {
    pub fn new(multi_progress: &MultiProgress, position: usize, total: usize, name: &str) -> Self {
        let pb = multi_progress.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::with_template(STAGE_TEMPLATE) {
            pb.set_style(style);
        }
        pb.set_prefix(format!("[{position}/{total}] {name}"));
        pb.set_message("Waiting");
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub fn stage(&self, message: impl Into<String>) {
        self.pb.set_message(message.into());
    }

    pub fn finish_ok(&self, message: impl Display) {
        self.finish(format!("✅ {message}"));
    }

    pub fn finish_failed(&self, message: impl Display) {
        self.finish(format!("⚠️  {message}"));
    }

    fn finish(&self, message: String) {
        if let Ok(style) = ProgressStyle::with_template(DONE_TEMPLATE) {
            self.pb.set_style(style);
        }
        self.pb.finish_with_message(message);
    }
}
