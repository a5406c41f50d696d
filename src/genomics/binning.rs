use crate::genomics::AlignmentRecord;

/// Stride used for gap rows when binning is disabled.
pub const DEFAULT_FILL_STRIDE: u64 = 50;

/// Width of the position bins fragments are grouped into.
///
/// A width of zero disables binning and keys fragments by their raw midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BinSize(u64);

impl BinSize {
    /// Bin width used when none is configured.
    pub const DEFAULT: BinSize = BinSize(50);

    /// Wrap a width in bases.
    pub fn new(width: u64) -> Self {
        Self(width)
    }

    /// Width in bases.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Whether binning is active.
    pub fn is_enabled(self) -> bool {
        self.0 != 0
    }

    /// Bin key for a midpoint.
    pub fn key_for(self, midpoint: u64) -> u64 {
        if self.is_enabled() {
            round_position(midpoint, self.0)
        } else {
            midpoint
        }
    }

    /// Step between consecutive gap rows.
    pub fn fill_stride(self) -> u64 {
        if self.is_enabled() {
            self.0
        } else {
            DEFAULT_FILL_STRIDE
        }
    }
}

impl Default for BinSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Round `value` to the nearest multiple of `bin_size`, ties rounding up.
///
/// `bin_size` must be non-zero.
pub fn round_position(value: u64, bin_size: u64) -> u64 {
    debug_assert!(bin_size > 0);
    let half = bin_size / 2;
    let rem = value % bin_size;
    if rem == 0 {
        value
    } else if rem < half {
        value - rem
    } else {
        value + (bin_size - rem)
    }
}

/// Genomic midpoint of an accepted (leading, positioned) record.
pub fn fragment_midpoint(record: &AlignmentRecord) -> u64 {
    record.pos.unsigned_abs() + record.fragment_length() / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_bin() {
        assert_eq!(round_position(124, 50), 100);
        assert_eq!(round_position(125, 50), 150);
        assert_eq!(round_position(126, 50), 150);
        assert_eq!(round_position(100, 50), 100);
        assert_eq!(round_position(0, 50), 0);
    }

    #[test]
    fn odd_bin_sizes_round_up_from_floor_half() {
        // half = 3 for a width of 7
        assert_eq!(round_position(9, 7), 7);
        assert_eq!(round_position(10, 7), 14);
    }

    #[test]
    fn midpoint_uses_half_the_fragment() {
        let record = AlignmentRecord::new(0, 1_000, 151);
        assert_eq!(fragment_midpoint(&record), 1_075);
    }

    #[test]
    fn disabled_bins_keep_raw_midpoints() {
        let bins = BinSize::new(0);
        assert!(!bins.is_enabled());
        assert_eq!(bins.key_for(1_075), 1_075);
        assert_eq!(bins.fill_stride(), DEFAULT_FILL_STRIDE);
        assert_eq!(BinSize::new(20).fill_stride(), 20);
        assert_eq!(BinSize::default().key_for(1_075), 1_100);
    }
}
