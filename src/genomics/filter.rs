use std::fmt;

use crate::genomics::AlignmentRecord;

/// Inclusion rules applied to every record before aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilterCriteria {
    /// Keep records that failed vendor QC or are duplicates.
    pub include_all: bool,
    /// Minimum mapping quality (inclusive).
    pub mapq_min: u8,
    /// Minimum absolute template length, unbounded when `None`.
    pub length_min: Option<u64>,
    /// Maximum absolute template length, unbounded when `None`.
    pub length_max: Option<u64>,
    /// Keep records whose mate maps to another reference.
    pub allow_mate_mismatch: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            include_all: false,
            mapq_min: 50,
            length_min: None,
            length_max: None,
            allow_mate_mismatch: false,
        }
    }
}

/// Why a record was left out of aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Vendor QC failure or duplicate.
    QualityOrDuplicate,
    /// No coordinate or zero template length.
    MissingPosition,
    /// Mapping quality below the minimum.
    LowMapq,
    /// Absolute template length outside the configured bounds.
    LengthOutOfRange,
    /// Mate aligned to a different reference.
    MateMismatch,
    /// Negative template length; the leading mate carries the fragment.
    TrailingMate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::QualityOrDuplicate => "quality/duplicate",
            SkipReason::MissingPosition => "missing-position",
            SkipReason::LowMapq => "low-mapq",
            SkipReason::LengthOutOfRange => "length-range",
            SkipReason::MateMismatch => "mate-mismatch",
            SkipReason::TrailingMate => "trailing-mate",
        };
        f.write_str(label)
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Aggregate the record.
    Keep,
    /// Count the record under the given reason and move on.
    Skip(SkipReason),
}

/// Decide whether a record contributes a fragment.
///
/// Checks run in a fixed order and the first failing check names the reason.
pub fn classify(record: &AlignmentRecord, criteria: &FilterCriteria) -> FilterDecision {
    use FilterDecision::{Keep, Skip};

    if !criteria.include_all && (record.is_quality_check_failed() || record.is_duplicate()) {
        return Skip(SkipReason::QualityOrDuplicate);
    }
    if !record.has_position() || record.tlen == 0 {
        return Skip(SkipReason::MissingPosition);
    }
    if record.mapq < criteria.mapq_min {
        return Skip(SkipReason::LowMapq);
    }

    let length = record.fragment_length();
    if criteria.length_min.is_some_and(|min| length < min)
        || criteria.length_max.is_some_and(|max| length > max)
    {
        return Skip(SkipReason::LengthOutOfRange);
    }

    if !criteria.allow_mate_mismatch && record.mtid != record.tid {
        return Skip(SkipReason::MateMismatch);
    }
    if record.tlen < 0 {
        return Skip(SkipReason::TrailingMate);
    }

    Keep
}
