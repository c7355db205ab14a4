//! Progress tracking for export operations
//!
//! Shows how many categories have been rendered so far. The bar is optional
//! and hidden by default, so library callers and tests stay silent.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress tracker for export operations
pub struct ProgressTracker {
    /// Categories processed so far
    processed: u64,
    /// Records (products or rows) emitted so far
    records: u64,
    /// Start time of the operation
    start_time: Instant,
    /// Progress bar (optional, can be disabled)
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    /// Create a new progress tracker
    ///
    /// # Arguments
    /// * `total` - Number of categories if known
    /// * `enable_bar` - Whether to display a progress bar
    pub fn new(total: Option<u64>, enable_bar: bool) -> Self {
        let bar = if enable_bar {
            let pb = match total {
                Some(n) => {
                    let bar = ProgressBar::new(n);
                    bar.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} categories {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("#>-"),
                    );
                    bar
                }
                None => {
                    let bar = ProgressBar::new_spinner();
                    bar.set_style(
                        ProgressStyle::default_spinner()
                            .template("{spinner:.green} {pos} categories {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                    );
                    bar
                }
            };
            Some(pb)
        } else {
            None
        };

        Self {
            processed: 0,
            records: 0,
            start_time: Instant::now(),
            bar,
        }
    }

    /// Record one more category and the records it produced
    pub fn advance(&mut self, records: usize) {
        self.processed += 1;
        self.records += records as u64;

        if let Some(ref bar) = self.bar {
            bar.set_position(self.processed);
            bar.set_message(format!("({} records)", self.records));
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    /// Milliseconds since the tracker was created
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_tracker_counts() {
        let mut tracker = ProgressTracker::new(Some(3), false);
        tracker.advance(2);
        tracker.advance(0);
        assert_eq!(tracker.processed(), 2);
        assert_eq!(tracker.records(), 2);
        tracker.finish();
    }

    #[test]
    fn test_progress_tracker_spinner() {
        let mut tracker = ProgressTracker::new(None, true);
        tracker.advance(5);
        tracker.finish();
        assert_eq!(tracker.records(), 5);
    }
}
