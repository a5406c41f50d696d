//! Repair of the proper-pair flag from mate orientation.
//!
//! Some aligners leave 0x2 unset on pairs that are plainly proper. A pair is
//! treated as proper when both mates are mapped primary alignments on the same
//! reference and the strand matches the sign of the template length.

use std::path::Path;

use tracing::debug;

use crate::genomics::io::{create_bam_writer_like, AlignmentReader};
use crate::genomics::{flags, AlignmentIoError, AlignmentRecord, ProgressMeter};

/// Whether `record` should gain the proper-pair flag.
///
/// `max_tlen` caps the absolute template length when set.
pub fn needs_proper_pair_flag(record: &AlignmentRecord, max_tlen: Option<u64>) -> bool {
    let within_length = max_tlen.map_or(true, |max| record.fragment_length() <= max);
    let oriented = (record.tlen < 0 && record.is_reverse())
        || (record.tlen > 0 && record.is_mate_reverse());

    within_length
        && record.mtid == record.tid
        && record.is_paired()
        && !record.is_unmapped()
        && !record.is_mate_unmapped()
        && !record.is_supplementary()
        && !record.is_secondary()
        && !record.is_proper_pair()
        && oriented
}

/// Counters from a repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RepairStats {
    /// Records copied to the output.
    pub total: u64,
    /// Records that gained the flag.
    pub edited: u64,
}

/// Copy `input` to a BAM at `output`, setting the proper-pair flag where
/// [`needs_proper_pair_flag`] holds.
///
/// The input and, with `progress` set, its index are opened before `output` is
/// created.
pub fn repair_proper_pairs(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    max_tlen: Option<u64>,
    progress: bool,
) -> Result<RepairStats, AlignmentIoError> {
    let input = input.as_ref();
    let mut reader = AlignmentReader::from_path(input)?;
    let mut progress = if progress {
        Some(ProgressMeter::from_index(input)?)
    } else {
        None
    };
    let mut writer = create_bam_writer_like(output, &reader)?;
    let mut stats = RepairStats::default();

    for result in reader.raw_records() {
        let mut record = result?;
        stats.total += 1;
        if needs_proper_pair_flag(&AlignmentRecord::from(&record), max_tlen) {
            record.set_flags(record.flags() | flags::PROPER_PAIR);
            stats.edited += 1;
        }
        writer
            .write(&record)
            .map_err(|err| AlignmentIoError::Write(err.to_string()))?;
        if let Some(meter) = progress.as_mut() {
            meter.tick();
        }
    }

    if let Some(meter) = progress.as_ref() {
        meter.finish();
    }
    debug!(total = stats.total, edited = stats.edited, "proper-pair repair done");
    Ok(stats)
}
