//! Golden CSV snapshots under `tests/snapshots`.
//!
//! Set `DNAFRAGS_UPDATE_SNAPSHOTS=1` to rewrite them from the current output.

use std::fs;
use std::path::{Path, PathBuf};

use dnafrags::genomics::CSV_HEADER;

const UPDATE_VAR: &str = "DNAFRAGS_UPDATE_SNAPSHOTS";

fn snapshot_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
        .join(name)
}

/// Rows of a bin CSV with line endings and trailing blank lines removed.
fn csv_lines(input: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = input.lines().map(|line| line.trim_end_matches('\r')).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Chromosome a row belongs to; gap rows inherit the next data row's.
fn row_chromosomes<'a>(rows: &[&'a str]) -> Vec<&'a str> {
    let mut chroms = vec![""; rows.len()];
    let mut next = "";
    for (idx, row) in rows.iter().enumerate().rev() {
        if let Some(chrom) = row.split(',').nth(3) {
            next = chrom;
        }
        chroms[idx] = next;
    }
    chroms
}

fn check_shape(name: &str, lines: &[&str]) {
    assert_eq!(
        lines.first().copied(),
        Some(CSV_HEADER.join(",").as_str()),
        "{name}: header row"
    );
    for (idx, row) in lines.iter().enumerate().skip(1) {
        let fields: Vec<&str> = row.split(',').collect();
        match fields.as_slice() {
            [_, "0", "0"] => {}
            [_, _, _, _] => {}
            _ => panic!("{name}: line {} is neither a bin nor a gap row: {row:?}", idx + 1),
        }
    }
}

/// Compare bin CSV output with the stored snapshot `name`.
///
/// Mismatches are reported at the first differing line together with the
/// chromosome block it falls in.
pub fn assert_csv_snapshot(name: &str, actual: &str) {
    let actual_lines = csv_lines(actual);
    check_shape(name, &actual_lines);

    let path = snapshot_path(name);
    if std::env::var(UPDATE_VAR).is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let stored =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    let expected_lines = csv_lines(&stored);
    if expected_lines == actual_lines {
        return;
    }

    let rows = expected_lines.get(1..).unwrap_or(&[]);
    let chroms = row_chromosomes(rows);
    let first_diff = expected_lines
        .iter()
        .zip(&actual_lines)
        .position(|(expected, actual)| expected != actual)
        .unwrap_or_else(|| expected_lines.len().min(actual_lines.len()));
    let chrom = first_diff
        .checked_sub(1)
        .and_then(|row| chroms.get(row))
        .copied()
        .unwrap_or("-");

    panic!(
        "Snapshot mismatch for {:?} at line {} (chromosome {}): expected {:?}, got {:?}. \
         Set {}=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
        path,
        first_diff + 1,
        chrom,
        expected_lines.get(first_diff),
        actual_lines.get(first_diff),
        UPDATE_VAR,
        stored,
        actual
    );
}
