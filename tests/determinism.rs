use std::collections::HashSet;

use blake3::hash;
use dnafrags::AggregationConfig;

mod test_helpers;
use test_helpers::{run_csv, two_chromosome_fixture};

#[test]
fn csv_output_is_deterministic() {
    let config = AggregationConfig::default()
        .with_fill_in(true)
        .with_reads_min(1);

    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let (csv, _) = run_csv(&config, two_chromosome_fixture());
        fingerprints.insert(hash(csv.as_bytes()));
    }

    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}
