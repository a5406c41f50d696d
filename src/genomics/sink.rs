//! Output side of the aggregation: row sinks and the per-chromosome flush.

use std::io::{self, Write};

use thiserror::Error;

use crate::genomics::ChromosomeAggregate;

/// Column names of the CSV output.
pub const CSV_HEADER: [&str; 4] = ["Midpoint", "Reads", "Median length", "Chromosome"];

/// Errors raised while emitting rows.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Underlying writer failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    /// CSV encoder failed.
    #[error("failed to write CSV row: {0}")]
    Csv(#[from] csv::Error),
}

/// One emitted bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinRow<'a> {
    /// Bin key, reported as the midpoint.
    pub key: u64,
    /// Fragments in the bin.
    pub reads: u64,
    /// Median fragment length.
    pub median: f64,
    /// Chromosome display name.
    pub chrom: &'a str,
}

/// Destination for flushed bins.
pub trait BinSink {
    /// Write anything that precedes the first row.
    fn write_header(&mut self) -> Result<(), SinkError>;

    /// Write one observed bin.
    fn write_bin(&mut self, row: &BinRow<'_>) -> Result<(), SinkError>;

    /// Write a zero row for an unobserved key.
    fn write_gap(&mut self, key: u64) -> Result<(), SinkError>;

    /// Whether this sink takes gap rows at all.
    fn fills_gaps(&self) -> bool;

    /// Flush buffered output.
    fn finish(&mut self) -> Result<(), SinkError>;
}

impl<S: BinSink + ?Sized> BinSink for Box<S> {
    fn write_header(&mut self) -> Result<(), SinkError> {
        (**self).write_header()
    }

    fn write_bin(&mut self, row: &BinRow<'_>) -> Result<(), SinkError> {
        (**self).write_bin(row)
    }

    fn write_gap(&mut self, key: u64) -> Result<(), SinkError> {
        (**self).write_gap(key)
    }

    fn fills_gaps(&self) -> bool {
        (**self).fills_gaps()
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

/// Human-readable sentences, one per bin.
#[derive(Debug)]
pub struct ConsoleSink<W: Write> {
    writer: W,
    banner: bool,
}

impl<W: Write> ConsoleSink<W> {
    /// Wrap a writer; `banner` prints a `Results:` line before the rows.
    pub fn new(writer: W, banner: bool) -> Self {
        Self { writer, banner }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl ConsoleSink<io::Stdout> {
    /// Console sink on standard output.
    pub fn stdout(banner: bool) -> Self {
        Self::new(io::stdout(), banner)
    }
}

impl<W: Write> BinSink for ConsoleSink<W> {
    fn write_header(&mut self) -> Result<(), SinkError> {
        if self.banner {
            writeln!(self.writer, "Results:")?;
        }
        Ok(())
    }

    fn write_bin(&mut self, row: &BinRow<'_>) -> Result<(), SinkError> {
        writeln!(
            self.writer,
            "{} in chromosome {} had {} segment(s), with a median length of {:.1}.",
            row.key, row.chrom, row.reads, row.median
        )?;
        Ok(())
    }

    fn write_gap(&mut self, _key: u64) -> Result<(), SinkError> {
        Ok(())
    }

    fn fills_gaps(&self) -> bool {
        false
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// `Midpoint,Reads,Median length,Chromosome` rows; gap rows carry three fields.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        Self { writer }
    }

    /// Flush and recover the writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|err| SinkError::Io(err.into_error()))
    }
}

impl<W: Write> std::fmt::Debug for CsvSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink").finish_non_exhaustive()
    }
}

impl<W: Write> BinSink for CsvSink<W> {
    fn write_header(&mut self) -> Result<(), SinkError> {
        self.writer.write_record(CSV_HEADER)?;
        Ok(())
    }

    fn write_bin(&mut self, row: &BinRow<'_>) -> Result<(), SinkError> {
        self.writer.write_record([
            row.key.to_string(),
            row.reads.to_string(),
            format!("{:.1}", row.median),
            row.chrom.to_string(),
        ])?;
        Ok(())
    }

    fn write_gap(&mut self, key: u64) -> Result<(), SinkError> {
        self.writer.write_record([key.to_string().as_str(), "0", "0"])?;
        Ok(())
    }

    fn fills_gaps(&self) -> bool {
        true
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Name printed for a reference: a leading `chr` is dropped.
pub fn display_name(reference: &str) -> &str {
    reference.strip_prefix("chr").unwrap_or(reference)
}

/// Counts describing one chromosome flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlushSummary {
    /// Bins written as data rows.
    pub emitted_bins: u64,
    /// Fragments across the written bins.
    pub emitted_reads: u64,
    /// Zero rows synthesized by gap filling.
    pub gap_rows: u64,
    /// Bins dropped by the reads minimum.
    pub dropped_bins: u64,
}

impl FlushSummary {
    /// Add another flush's counts.
    pub fn absorb(&mut self, other: FlushSummary) {
        self.emitted_bins += other.emitted_bins;
        self.emitted_reads += other.emitted_reads;
        self.gap_rows += other.gap_rows;
        self.dropped_bins += other.dropped_bins;
    }
}

/// Turns a finished [`ChromosomeAggregate`] into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flusher {
    reads_min: u64,
    fill_in: bool,
    stride: u64,
}

impl Flusher {
    /// Create a flusher. `stride` is the step between gap rows.
    pub fn new(reads_min: u64, fill_in: bool, stride: u64) -> Self {
        Self {
            reads_min,
            fill_in,
            stride: stride.max(1),
        }
    }

    /// Emit every bin of `aggregate` in first-seen order.
    ///
    /// Bins under the reads minimum are dropped before gap filling, so the
    /// zero rows run from the previous emitted key.
    pub fn flush<S: BinSink + ?Sized>(
        &self,
        aggregate: ChromosomeAggregate,
        reference: &str,
        sink: &mut S,
    ) -> Result<FlushSummary, SinkError> {
        let chrom = display_name(reference);
        let fill = self.fill_in && sink.fills_gaps();
        let mut previous: Option<u64> = None;
        let mut summary = FlushSummary::default();

        for (key, bin) in aggregate.into_bins() {
            let reads = bin.read_count();
            if reads < self.reads_min {
                summary.dropped_bins += 1;
                continue;
            }

            if fill {
                let mut gap = previous.map_or(0, |prev| prev + self.stride);
                while gap < key {
                    sink.write_gap(gap)?;
                    summary.gap_rows += 1;
                    gap += self.stride;
                }
            }

            sink.write_bin(&BinRow {
                key,
                reads,
                median: bin.median_length(),
                chrom,
            })?;
            summary.emitted_bins += 1;
            summary.emitted_reads += reads;
            previous = Some(key);
        }

        Ok(summary)
    }
}
