use dnafrags::genomics::{classify, flags, AlignmentRecord, FilterCriteria, FilterDecision, SkipReason};
use test_case::test_case;

fn strict() -> FilterCriteria {
    FilterCriteria {
        length_min: Some(100),
        length_max: Some(500),
        ..FilterCriteria::default()
    }
}

#[test_case(AlignmentRecord::new(0, 100, 200) => FilterDecision::Keep ; "leading mate is kept")]
#[test_case(AlignmentRecord::new(0, 100, 200).with_flags(flags::QC_FAIL) => FilterDecision::Skip(SkipReason::QualityOrDuplicate) ; "qc failure")]
#[test_case(AlignmentRecord::new(0, 100, 200).with_flags(flags::DUPLICATE) => FilterDecision::Skip(SkipReason::QualityOrDuplicate) ; "duplicate")]
#[test_case(AlignmentRecord::new(0, -1, 200) => FilterDecision::Skip(SkipReason::MissingPosition) ; "unplaced record")]
#[test_case(AlignmentRecord::new(0, 100, 0).with_mapq(0).with_mate_tid(2) => FilterDecision::Skip(SkipReason::MissingPosition) ; "zero template length beats later checks")]
#[test_case(AlignmentRecord::new(0, 100, 200).with_mapq(49) => FilterDecision::Skip(SkipReason::LowMapq) ; "mapq one below minimum")]
#[test_case(AlignmentRecord::new(0, 100, 200).with_mapq(50) => FilterDecision::Keep ; "mapq at minimum")]
#[test_case(AlignmentRecord::new(0, 100, 99) => FilterDecision::Skip(SkipReason::LengthOutOfRange) ; "shorter than minimum")]
#[test_case(AlignmentRecord::new(0, 100, 501) => FilterDecision::Skip(SkipReason::LengthOutOfRange) ; "longer than maximum")]
#[test_case(AlignmentRecord::new(0, 100, 500) => FilterDecision::Keep ; "length bounds are inclusive")]
#[test_case(AlignmentRecord::new(0, 100, 200).with_mate_tid(3) => FilterDecision::Skip(SkipReason::MateMismatch) ; "mate on another reference")]
#[test_case(AlignmentRecord::new(0, 100, -200) => FilterDecision::Skip(SkipReason::TrailingMate) ; "trailing mate")]
fn strict_criteria(record: AlignmentRecord) -> FilterDecision {
    classify(&record, &strict())
}

#[test_case(flags::QC_FAIL ; "qc failure")]
#[test_case(flags::DUPLICATE ; "duplicate")]
#[test_case(flags::QC_FAIL | flags::DUPLICATE ; "both")]
fn include_all_ignores_quality_flags(extra: u16) {
    let criteria = FilterCriteria {
        include_all: true,
        ..FilterCriteria::default()
    };
    let record = AlignmentRecord::new(0, 100, 200).with_flags(flags::PAIRED | extra);
    assert_eq!(classify(&record, &criteria), FilterDecision::Keep);
}

#[test]
fn mate_mismatch_allowed_when_configured() {
    let criteria = FilterCriteria {
        allow_mate_mismatch: true,
        ..FilterCriteria::default()
    };
    let record = AlignmentRecord::new(0, 100, 200).with_mate_tid(3);
    assert_eq!(classify(&record, &criteria), FilterDecision::Keep);
}
