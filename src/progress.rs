//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for a diff run
#[derive(Debug)]
pub struct ProgressReporter {
    pub index_pb: Option<ProgressBar>,
    pub scan_pb: Option<ProgressBar>,
    show_progress: bool,
    start_time: std::time::Instant,
}

impl ProgressReporter {
    /// Create progress reporter for diff operations
    pub fn new_for_diff() -> Self {
        Self {
            index_pb: Some(create_spinner("Indexing table 2...")),
            scan_pb: None,
            show_progress: true,
            start_time: std::time::Instant::now(),
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            index_pb: None,
            scan_pb: None,
            show_progress: false,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.show_progress
    }

    /// Lazily create the table 1 spinner when scanning starts
    fn ensure_scan_pb(&mut self) {
        if self.show_progress && self.scan_pb.is_none() {
            self.scan_pb = Some(create_spinner("Comparing table 1..."));
        }
    }

    /// Update the number of table 2 rows indexed
    pub fn update_index(&mut self, indexed: u64) {
        if let Some(pb) = &self.index_pb {
            pb.set_message(format!("Indexing table 2... {} rows", indexed));
        }
    }

    pub fn finish_index(&mut self, message: &str) {
        if let Some(pb) = self.index_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        self.ensure_scan_pb();
    }

    /// Update the number of table 1 rows compared
    pub fn update_scan(&mut self, compared: u64) {
        self.ensure_scan_pb();
        if let Some(pb) = &self.scan_pb {
            pb.set_message(format!("Comparing table 1... {} rows", compared));
        }
    }

    pub fn finish_scan(&mut self, message: &str) {
        if let Some(pb) = self.scan_pb.take() {
            pb.finish_with_message(format!(
                "{} in {:.2?}",
                message,
                self.start_time.elapsed()
            ));
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Ensure all progress bars are cleaned up silently
        if let Some(pb) = self.index_pb.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = self.scan_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
