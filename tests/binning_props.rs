use dnafrags::genomics::{median, round_position};
use proptest::prelude::*;

proptest! {
    #[test]
    fn rounding_is_idempotent(value in 0u64..10_000_000, bin_size in 1u64..5_000) {
        let once = round_position(value, bin_size);
        prop_assert_eq!(round_position(once, bin_size), once);
        prop_assert_eq!(once % bin_size, 0, "rounded value must sit on a bin boundary");
    }

    #[test]
    fn rounding_moves_at_most_half_a_bin(value in 0u64..10_000_000, bin_size in 1u64..5_000) {
        let rounded = round_position(value, bin_size);
        prop_assert!(rounded.abs_diff(value) <= bin_size.div_ceil(2));
    }

    #[test]
    fn median_ignores_input_order(mut values in proptest::collection::vec(0u64..2_000, 1..64)) {
        let before = median(&values);
        values.reverse();
        prop_assert_eq!(median(&values), before);
        values.sort_unstable();
        prop_assert_eq!(median(&values), before);
    }

    #[test]
    fn median_lies_within_range(values in proptest::collection::vec(0u64..2_000, 1..64)) {
        let m = median(&values);
        let min = *values.iter().min().unwrap() as f64;
        let max = *values.iter().max().unwrap() as f64;
        prop_assert!(min <= m && m <= max);
    }
}

#[test]
fn documented_rounding_points() {
    assert_eq!(round_position(124, 50), 100);
    assert_eq!(round_position(125, 50), 150);
    assert_eq!(round_position(126, 50), 150);
    assert_eq!(round_position(100, 50), 100);
}

#[test]
fn documented_medians() {
    assert_eq!(median(&[]), 0.0);
    assert_eq!(median(&[7]), 7.0);
    assert_eq!(median(&[2, 8, 4, 6]), 5.0);
}
