use std::fmt;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::genomics::{io, AlignmentIoError};

/// Tracks how far through the input stream a run is.
///
/// Every record read counts, whether or not it is aggregated. The bar is only
/// touched when the whole-percent value changes.
pub struct ProgressMeter {
    total: u64,
    processed: u64,
    last_percent: Option<u64>,
    bar: ProgressBar,
}

impl ProgressMeter {
    /// Meter rendering to stderr for a stream of `total` records.
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("[{bar:70}] {pos} %") {
            bar.set_style(style.progress_chars("=> "));
        }
        Self::with_bar(total, bar)
    }

    /// Meter sized from the index next to `path`; a missing index is an error.
    pub fn from_index(path: impl AsRef<Path>) -> Result<Self, AlignmentIoError> {
        let total = io::index_total(path)?;
        info!("Reading {} read(s).", total);
        Ok(Self::new(total))
    }

    /// Meter that never renders.
    pub fn hidden(total: u64) -> Self {
        Self::with_bar(total, ProgressBar::hidden())
    }

    fn with_bar(total: u64, bar: ProgressBar) -> Self {
        Self {
            total,
            processed: 0,
            last_percent: Some(0),
            bar,
        }
    }

    /// Expected number of records.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Records read so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Count one record; returns the new percentage when it changed.
    ///
    /// The bar starts at 0 %, so the first report is 1 % or more.
    pub fn tick(&mut self) -> Option<u64> {
        self.processed += 1;
        if self.total == 0 {
            return None;
        }
        let percent = self.processed.saturating_mul(100) / self.total;
        if self.last_percent == Some(percent) {
            return None;
        }
        self.last_percent = Some(percent);
        self.bar.set_position(percent.min(100));
        Some(percent)
    }

    /// Clear the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl fmt::Debug for ProgressMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressMeter")
            .field("total", &self.total)
            .field("processed", &self.processed)
            .field("last_percent", &self.last_percent)
            .finish()
    }
}
