//! Progress bar display for vendoring

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for framework copies
pub struct CopyProgress {
    file_pb: ProgressBar,
}

impl CopyProgress {
    /// Create a progress bar for copying `total_files` files
    pub fn new(total_files: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("  [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let file_pb = ProgressBar::new(total_files);
        file_pb.set_style(style);
        Self { file_pb }
    }

    /// A no-op progress display, for tests and quiet contexts
    pub fn hidden() -> Self {
        Self {
            file_pb: ProgressBar::hidden(),
        }
    }

    /// Record one copied file
    pub fn tick(&self, file_path: &str) {
        // Truncate long paths for display, keeping the trailing components
        let display_path = match file_path.char_indices().nth_back(46) {
            Some((idx, _)) if idx > 0 => format!("...{}", &file_path[idx..]),
            _ => file_path.to_string(),
        };
        self.file_pb.set_message(display_path);
        self.file_pb.inc(1);
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        self.file_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.file_pb.abandon();
    }
}
