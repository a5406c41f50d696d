//! # Fragment density and size summaries for paired-end alignments
//!
//! Streams a coordinate-sorted SAM/BAM/CRAM file once and reports, per
//! genomic bin, how many fragments have their midpoint there and the median
//! fragment length.
//!
//! ## Pipeline
//!
//! 1. **Filter**: QC/duplicate flags, missing position, MAPQ, length bounds,
//!    mate reference, leading mate only
//! 2. **Bin**: fragment midpoint rounded to the nearest bin (ties round up)
//! 3. **Aggregate**: one chromosome at a time, keys in first-seen order
//! 4. **Flush**: on reference change and at end of stream, to console or CSV
//!
//! ## Usage Example
//!
//! ```ignore
//! use dnafrags::{summarize, AggregationConfig};
//! use dnafrags::genomics::CsvSink;
//!
//! let config = AggregationConfig::default().with_reads_min(5).with_fill_in(true);
//! let outcome = summarize("sample.bam", &config, CsvSink::new(std::io::stdout()), false)?;
//! println!("{} fragments binned", outcome.stats.processed);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod genomics;

pub use config::AggregationConfig;
pub use genomics::{AggregationSession, RunStats, SessionError, SessionOutcome};

use std::path::Path;

use genomics::{AlignmentIoError, AlignmentReader, BinSink, ProgressMeter};

/// Summarize the alignment file at `input` into `sink`.
///
/// With `progress` set, the record total is read from the file's index and a
/// missing index is an error.
pub fn summarize<S: BinSink>(
    input: impl AsRef<Path>,
    config: &AggregationConfig,
    sink: S,
    progress: bool,
) -> Result<SessionOutcome<S>, SessionError> {
    summarize_with(input, config, progress, || Ok(sink))
}

/// Like [`summarize`], but the sink is only built once the input has been
/// opened and, with `progress` set, its index loaded.
///
/// A failed open never reaches `make_sink`, so no output file is left behind.
pub fn summarize_with<S, F>(
    input: impl AsRef<Path>,
    config: &AggregationConfig,
    progress: bool,
    make_sink: F,
) -> Result<SessionOutcome<S>, SessionError>
where
    S: BinSink,
    F: FnOnce() -> Result<S, AlignmentIoError>,
{
    let input = input.as_ref();
    let mut reader = AlignmentReader::from_path(input)?;
    let meter = if progress {
        Some(ProgressMeter::from_index(input)?)
    } else {
        None
    };
    let sink = make_sink()?;

    let mut session = AggregationSession::new(config, reader.references().to_vec(), sink);
    if let Some(meter) = meter {
        session = session.with_progress(meter);
    }
    session.run(reader.records())
}
