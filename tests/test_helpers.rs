//! Shared fixtures: a two-chromosome stream with known bins

#![allow(dead_code)]
use std::sync::Arc;

use dnafrags::genomics::{flags, AggregationSession, AlignmentRecord, ConsoleSink, CsvSink};
use dnafrags::{AggregationConfig, RunStats};

/// Reference names of the fixture header.
pub fn references() -> Vec<Arc<str>> {
    vec![Arc::from("chr1"), Arc::from("chr2")]
}

/// Five leading mates per reference plus one record per skip reason.
///
/// With default settings chr1 yields bins 1100 (3 reads, median 150) and
/// 1300 (2 reads, median 160); chr2 yields 550 (2, 80), 800 (2, 145) and
/// 1000 (1, 210).
pub fn two_chromosome_fixture() -> Vec<AlignmentRecord> {
    vec![
        AlignmentRecord::new(0, 1_000, 150),
        AlignmentRecord::new(0, 1_000, 150).with_flags(flags::PAIRED | flags::DUPLICATE),
        AlignmentRecord::new(0, 1_010, 160),
        AlignmentRecord::new(0, 1_040, 120),
        AlignmentRecord::new(0, 1_100, -150),
        AlignmentRecord::new(0, 1_150, 130).with_mapq(20),
        AlignmentRecord::new(0, 1_200, 180),
        AlignmentRecord::new(0, 1_230, 140),
        AlignmentRecord::new(0, 1_250, 0),
        AlignmentRecord::new(1, 500, 100),
        AlignmentRecord::new(1, 520, 60),
        AlignmentRecord::new(1, 600, 150).with_mate_tid(0),
        AlignmentRecord::new(1, 700, 200),
        AlignmentRecord::new(1, 760, 90),
        AlignmentRecord::new(1, 900, 210),
        AlignmentRecord::new(-1, -1, 0)
            .with_mate_tid(-1)
            .with_flags(flags::PAIRED | flags::UNMAPPED | flags::MATE_UNMAPPED),
    ]
}

/// Run `records` through a CSV session and return the text and counters.
pub fn run_csv(config: &AggregationConfig, records: Vec<AlignmentRecord>) -> (String, RunStats) {
    let session = AggregationSession::new(config, references(), CsvSink::new(Vec::new()));
    let outcome = session
        .run(records.into_iter().map(Ok))
        .expect("aggregation succeeds");
    let bytes = outcome.sink.into_inner().expect("csv flush succeeds");
    (String::from_utf8(bytes).expect("utf-8 output"), outcome.stats)
}

/// Run `records` through a console session without the banner.
pub fn run_console(config: &AggregationConfig, records: Vec<AlignmentRecord>) -> (String, RunStats) {
    let session = AggregationSession::new(config, references(), ConsoleSink::new(Vec::new(), false));
    let outcome = session
        .run(records.into_iter().map(Ok))
        .expect("aggregation succeeds");
    (
        String::from_utf8(outcome.sink.into_inner()).expect("utf-8 output"),
        outcome.stats,
    )
}

/// Data rows (header and gap rows excluded) whose chromosome column is `chrom`.
pub fn rows_for<'a>(csv: &'a str, chrom: &str) -> Vec<&'a str> {
    csv.lines()
        .skip(1)
        .filter(|line| line.split(',').nth(3) == Some(chrom))
        .collect()
}
