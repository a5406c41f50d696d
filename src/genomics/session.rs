use std::borrow::Cow;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::config::AggregationConfig;
use crate::genomics::{
    classify, fragment_midpoint, AlignmentIoError, AlignmentRecord, BinSink, ChromosomeAggregate,
    FilterDecision, FlushSummary, Flusher, ProgressMeter, SinkError, SkipReason,
};

/// Errors that end an aggregation run.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The input could not be opened or failed mid-read.
    #[error(transparent)]
    Input(#[from] AlignmentIoError),
    /// Rows could not be written.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunStats {
    /// Records read from the stream.
    pub total: u64,
    /// Records aggregated into bins.
    pub processed: u64,
    /// Vendor QC failures and duplicates.
    pub skipped_quality: u64,
    /// Records without a coordinate or template length.
    pub skipped_missing_position: u64,
    /// Records under the mapping quality minimum.
    pub skipped_mapq: u64,
    /// Records outside the length bounds.
    pub skipped_length: u64,
    /// Records whose mate is on another reference.
    pub skipped_mate_mismatch: u64,
    /// Trailing mates, left out because the leading mate carries the fragment.
    pub trailing_mates: u64,
    /// Chromosomes flushed.
    pub chromosomes: u64,
    /// Totals across all flushes.
    pub output: FlushSummary,
}

impl RunStats {
    fn record_skip(&mut self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::QualityOrDuplicate => &mut self.skipped_quality,
            SkipReason::MissingPosition => &mut self.skipped_missing_position,
            SkipReason::LowMapq => &mut self.skipped_mapq,
            SkipReason::LengthOutOfRange => &mut self.skipped_length,
            SkipReason::MateMismatch => &mut self.skipped_mate_mismatch,
            SkipReason::TrailingMate => &mut self.trailing_mates,
        };
        *counter += 1;
    }

    /// Records rejected by a filter check (trailing mates excluded).
    pub fn skipped(&self) -> u64 {
        self.skipped_quality
            + self.skipped_missing_position
            + self.skipped_mapq
            + self.skipped_length
            + self.skipped_mate_mismatch
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct SessionOutcome<S> {
    /// Final counters.
    pub stats: RunStats,
    /// The sink, flushed.
    pub sink: S,
}

/// Streams records into per-chromosome bins and flushes each chromosome as
/// soon as the next one starts.
///
/// Input must be grouped by reference and position-ascending within each
/// reference; this is assumed, not checked.
#[derive(Debug)]
pub struct AggregationSession<'a, S: BinSink> {
    config: &'a AggregationConfig,
    flusher: Flusher,
    references: Vec<Arc<str>>,
    sink: S,
    current: Option<ChromosomeAggregate>,
    stats: RunStats,
    progress: Option<ProgressMeter>,
    started: bool,
}

impl<'a, S: BinSink> AggregationSession<'a, S> {
    /// Create a session; `references` maps reference ids to names.
    pub fn new(config: &'a AggregationConfig, references: Vec<Arc<str>>, sink: S) -> Self {
        Self {
            config,
            flusher: config.flusher(),
            references,
            sink,
            current: None,
            stats: RunStats::default(),
            progress: None,
            started: false,
        }
    }

    /// Attach a progress meter ticked once per record read.
    pub fn with_progress(mut self, meter: ProgressMeter) -> Self {
        self.progress = Some(meter);
        self
    }

    /// Counters so far.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Reference id of the chromosome being accumulated.
    pub fn current_tid(&self) -> Option<i32> {
        self.current.as_ref().map(ChromosomeAggregate::tid)
    }

    /// Drain `records` and flush the last chromosome.
    pub fn run<I>(mut self, records: I) -> Result<SessionOutcome<S>, SessionError>
    where
        I: IntoIterator<Item = Result<AlignmentRecord, AlignmentIoError>>,
    {
        for record in records {
            self.process(&record?)?;
        }
        Ok(self.finish()?)
    }

    /// Feed one record.
    pub fn process(&mut self, record: &AlignmentRecord) -> Result<FilterDecision, SinkError> {
        self.ensure_started()?;
        self.stats.total += 1;
        if let Some(meter) = self.progress.as_mut() {
            meter.tick();
        }

        let decision = classify(record, &self.config.filter);
        match decision {
            FilterDecision::Skip(reason) => self.stats.record_skip(reason),
            FilterDecision::Keep => {
                if self.current_tid().is_some_and(|tid| tid != record.tid) {
                    self.flush_current()?;
                }
                let key = self
                    .config
                    .bin_size
                    .key_for(fragment_midpoint(record));
                self.current
                    .get_or_insert_with(|| ChromosomeAggregate::new(record.tid))
                    .observe(key, record.fragment_length());
                self.stats.processed += 1;
            }
        }
        Ok(decision)
    }

    /// Flush whatever chromosome is still open and close the sink.
    pub fn finish(mut self) -> Result<SessionOutcome<S>, SinkError> {
        self.ensure_started()?;
        self.flush_current()?;
        self.sink.finish()?;
        if let Some(meter) = self.progress.as_ref() {
            meter.finish();
        }
        Ok(SessionOutcome {
            stats: self.stats,
            sink: self.sink,
        })
    }

    fn ensure_started(&mut self) -> Result<(), SinkError> {
        if !self.started {
            self.sink.write_header()?;
            self.started = true;
        }
        Ok(())
    }

    fn flush_current(&mut self) -> Result<(), SinkError> {
        let Some(aggregate) = self.current.take() else {
            return Ok(());
        };
        let name = reference_name(&self.references, aggregate.tid()).into_owned();
        let summary = self.flusher.flush(aggregate, &name, &mut self.sink)?;
        debug!(
            chromosome = %name,
            bins = summary.emitted_bins,
            reads = summary.emitted_reads,
            gaps = summary.gap_rows,
            dropped = summary.dropped_bins,
            "flushed chromosome"
        );
        self.stats.chromosomes += 1;
        self.stats.output.absorb(summary);
        Ok(())
    }
}

fn reference_name(references: &[Arc<str>], tid: i32) -> Cow<'_, str> {
    usize::try_from(tid)
        .ok()
        .and_then(|idx| references.get(idx))
        .map(|name| Cow::Borrowed(name.as_ref()))
        .unwrap_or_else(|| Cow::Owned(tid.to_string()))
}
