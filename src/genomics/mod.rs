//! Streaming fragment aggregation over paired-end alignments.
//!
//! Records flow through [`classify`], are keyed by [`BinSize::key_for`],
//! collected in a [`ChromosomeAggregate`] and handed to a [`Flusher`] whenever
//! the reference changes or the stream ends.

mod aggregate;
mod binning;
mod filter;
pub mod io;
mod progress;
pub mod proper_pair;
mod session;
mod sink;
mod types;

pub use aggregate::{median, ChromosomeAggregate, FragmentBin};
pub use binning::{fragment_midpoint, round_position, BinSize, DEFAULT_FILL_STRIDE};
pub use filter::{classify, FilterCriteria, FilterDecision, SkipReason};
pub use io::{AlignmentIoError, AlignmentReader};
pub use progress::ProgressMeter;
pub use proper_pair::{needs_proper_pair_flag, repair_proper_pairs, RepairStats};
pub use session::{AggregationSession, RunStats, SessionError, SessionOutcome};
pub use sink::{
    display_name, BinRow, BinSink, ConsoleSink, CsvSink, FlushSummary, Flusher, SinkError,
    CSV_HEADER,
};
pub use types::{flags, AlignmentRecord, UNMAPPED_POSITION};
