/// SAM flag bits consulted by the aggregation filter and the proper-pair repair.
pub mod flags {
    /// Template has multiple segments in sequencing.
    pub const PAIRED: u16 = 0x1;
    /// Each segment is properly aligned according to the aligner.
    pub const PROPER_PAIR: u16 = 0x2;
    /// Segment unmapped.
    pub const UNMAPPED: u16 = 0x4;
    /// Next segment in the template unmapped.
    pub const MATE_UNMAPPED: u16 = 0x8;
    /// Sequence is reverse complemented.
    pub const REVERSE: u16 = 0x10;
    /// Sequence of the next segment is reverse complemented.
    pub const MATE_REVERSE: u16 = 0x20;
    /// Secondary alignment.
    pub const SECONDARY: u16 = 0x100;
    /// Not passing vendor quality controls.
    pub const QC_FAIL: u16 = 0x200;
    /// PCR or optical duplicate.
    pub const DUPLICATE: u16 = 0x400;
    /// Supplementary alignment.
    pub const SUPPLEMENTARY: u16 = 0x800;
}

/// Position value htslib reports for records without a coordinate.
pub const UNMAPPED_POSITION: i64 = -1;

/// Alignment record reduced to the fields fragment aggregation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// Reference id of the segment (`-1` when unplaced).
    pub tid: i32,
    /// Reference id of the mate (`-1` when unplaced).
    pub mtid: i32,
    /// 0-based leftmost coordinate, [`UNMAPPED_POSITION`] when absent.
    pub pos: i64,
    /// Signed observed template length.
    pub tlen: i64,
    /// Mapping quality (Phred-scaled).
    pub mapq: u8,
    /// Raw SAM flag bits.
    pub flags: u16,
}

impl AlignmentRecord {
    /// Construct a paired, mapped record whose mate sits on the same reference.
    pub fn new(tid: i32, pos: i64, tlen: i64) -> Self {
        Self {
            tid,
            mtid: tid,
            pos,
            tlen,
            mapq: 60,
            flags: flags::PAIRED,
        }
    }

    /// Replace the mapping quality.
    pub fn with_mapq(mut self, mapq: u8) -> Self {
        self.mapq = mapq;
        self
    }

    /// Replace the flag bits.
    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    /// Replace the mate reference id.
    pub fn with_mate_tid(mut self, mtid: i32) -> Self {
        self.mtid = mtid;
        self
    }

    fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    /// Whether the record failed vendor quality checks.
    pub fn is_quality_check_failed(&self) -> bool {
        self.has_flag(flags::QC_FAIL)
    }

    /// Whether the record is marked as a PCR or optical duplicate.
    pub fn is_duplicate(&self) -> bool {
        self.has_flag(flags::DUPLICATE)
    }

    /// Whether the record is part of a paired template.
    pub fn is_paired(&self) -> bool {
        self.has_flag(flags::PAIRED)
    }

    /// Whether the record is already flagged as a proper pair.
    pub fn is_proper_pair(&self) -> bool {
        self.has_flag(flags::PROPER_PAIR)
    }

    /// Whether the segment itself is unmapped.
    pub fn is_unmapped(&self) -> bool {
        self.has_flag(flags::UNMAPPED)
    }

    /// Whether the mate is unmapped.
    pub fn is_mate_unmapped(&self) -> bool {
        self.has_flag(flags::MATE_UNMAPPED)
    }

    /// Whether the segment maps to the reverse strand.
    pub fn is_reverse(&self) -> bool {
        self.has_flag(flags::REVERSE)
    }

    /// Whether the mate maps to the reverse strand.
    pub fn is_mate_reverse(&self) -> bool {
        self.has_flag(flags::MATE_REVERSE)
    }

    /// Whether this is a secondary alignment.
    pub fn is_secondary(&self) -> bool {
        self.has_flag(flags::SECONDARY)
    }

    /// Whether this is a supplementary alignment.
    pub fn is_supplementary(&self) -> bool {
        self.has_flag(flags::SUPPLEMENTARY)
    }

    /// Whether the record carries a coordinate.
    pub fn has_position(&self) -> bool {
        self.pos != UNMAPPED_POSITION
    }

    /// Absolute template length.
    pub fn fragment_length(&self) -> u64 {
        self.tlen.unsigned_abs()
    }
}
