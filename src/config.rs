//! Run configuration for fragment aggregation.
//!
//! Built once before the stream is opened and only read afterwards.

use crate::genomics::{BinSize, FilterCriteria, Flusher};

/// Immutable settings of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregationConfig {
    /// Record inclusion rules.
    pub filter: FilterCriteria,
    /// Width of the position bins.
    pub bin_size: BinSize,
    /// Bins with fewer fragments are not written.
    pub reads_min: u64,
    /// Write zero rows for unobserved bins (CSV only).
    pub fill_in: bool,
}

impl AggregationConfig {
    /// Keep vendor-failed and duplicate records.
    pub fn with_include_all(mut self, include_all: bool) -> Self {
        self.filter.include_all = include_all;
        self
    }

    /// Set the minimum mapping quality.
    pub fn with_mapq_min(mut self, mapq_min: u8) -> Self {
        self.filter.mapq_min = mapq_min;
        self
    }

    /// Set the absolute template length bounds.
    pub fn with_length_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.filter.length_min = min;
        self.filter.length_max = max;
        self
    }

    /// Allow mates on other references.
    pub fn with_mate_mismatch_allowed(mut self, allowed: bool) -> Self {
        self.filter.allow_mate_mismatch = allowed;
        self
    }

    /// Set the bin width; zero disables binning.
    pub fn with_bin_size(mut self, width: u64) -> Self {
        self.bin_size = BinSize::new(width);
        self
    }

    /// Set the reads minimum per written bin.
    pub fn with_reads_min(mut self, reads_min: u64) -> Self {
        self.reads_min = reads_min;
        self
    }

    /// Enable gap filling.
    pub fn with_fill_in(mut self, fill_in: bool) -> Self {
        self.fill_in = fill_in;
        self
    }

    /// Flusher matching these settings.
    pub fn flusher(&self) -> Flusher {
        Flusher::new(self.reads_min, self.fill_in, self.bin_size.fill_stride())
    }
}
