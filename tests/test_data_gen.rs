//! Test data generation utilities for the tabula test suite

#![allow(dead_code)]

use tabula::prelude::*;

/// `{a: [1, 2, 3], b: ["one", "two", "three"]}`
pub fn sample_table() -> Table {
    Table::from_columns(vec![
        ("a", Column::from(vec![1i64, 2, 3])),
        ("b", Column::from(vec!["one", "two", "three"])),
    ])
    .unwrap()
}

/// `rows` rows with an Int64 `id`, a string `group` cycling through
/// `num_groups` keys, and a Float64 `value` of `id * 0.5`.
pub fn generate_table(rows: usize, num_groups: usize) -> Table {
    let ids: Vec<i64> = (0..rows as i64).collect();
    let groups: Vec<String> = (0..rows).map(|i| format!("g{}", i % num_groups)).collect();
    let values: Vec<f64> = (0..rows).map(|i| i as f64 * 0.5).collect();
    Table::from_columns(vec![
        ("id", Column::from(ids)),
        ("group", Column::from(groups)),
        ("value", Column::from(values)),
    ])
    .unwrap()
}

/// A left table keyed `0..left_rows` and a right table keyed by every other
/// left key, each right key appearing once.
pub fn generate_join_tables(left_rows: usize) -> (Table, Table) {
    let left = Table::from_columns(vec![
        ("k", Column::from((0..left_rows as i64).collect::<Vec<i64>>())),
        (
            "l",
            Column::from((0..left_rows).map(|i| format!("l{i}")).collect::<Vec<String>>()),
        ),
    ])
    .unwrap();
    let right_keys: Vec<i64> = (0..left_rows as i64).step_by(2).collect();
    let right = Table::from_columns(vec![
        (
            "r",
            Column::from(right_keys.iter().map(|k| format!("r{k}")).collect::<Vec<String>>()),
        ),
        ("k", Column::from(right_keys)),
    ])
    .unwrap();
    (left, right)
}

/// A fresh, unique directory for files written by a test.
pub fn create_temp_dir() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let dir = std::env::temp_dir().join(format!("tabula-test-{}-{}", std::process::id(), nanos));
    std::fs::create_dir_all(&dir).unwrap();
    dir.to_string_lossy().into_owned()
}
