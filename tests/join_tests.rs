//! Inner and left hash joins

mod test_data_gen;

use tabula::prelude::*;
use test_data_gen::{generate_join_tables, sample_table};

fn right_table() -> Table {
    table! { "a" => [1, 1, 2], "c" => ["c1", "c2", "c3"] }.unwrap()
}

#[test]
fn test_inner_join() {
    let joined = sample_table().inner_join(&right_table(), "a").unwrap();
    let expected = table! {
        "a" => [1, 1, 2],
        "b" => ["one", "one", "two"],
        "c" => ["c1", "c2", "c3"],
    }
    .unwrap();
    assert_eq!(joined, expected);
    assert_eq!(joined.types()["a"], ElementType::Int64);
}

#[test]
fn test_join_on_shared_names() {
    let joined = sample_table()
        .join(&right_table(), JoinType::Inner, JoinOn::default())
        .unwrap();
    assert_eq!(joined, sample_table().inner_join(&right_table(), "a").unwrap());
}

#[test]
fn test_join_on_pairs() {
    let right = table! { "a2" => [1, 1, 2], "c" => ["c1", "c2", "c3"] }.unwrap();
    let joined = sample_table().inner_join(&right, vec![("a", "a2")]).unwrap();
    assert_eq!(joined.names(), vec!["a", "b", "a2", "c"]);
    assert_eq!(joined["a"], col![1, 1, 2]);
    assert_eq!(joined["a2"], col![1, 1, 2]);
    assert_eq!(joined["c"], col!["c1", "c2", "c3"]);
}

#[test]
fn test_empty_result_keeps_columns() {
    let right = table! { "a" => [4], "c" => ["x"] }.unwrap();
    let joined = sample_table().inner_join(&right, "a").unwrap();
    assert_eq!(joined.size(), 0);
    assert_eq!(joined.names(), vec!["a", "b", "c"]);
}

#[test]
fn test_null_keys_match() {
    let left = Table::from_columns(vec![
        ("k", Column::from_values(vec![Scalar::from("one"), Scalar::Null])),
        ("v", Column::from(vec![1i64, 2])),
    ])
    .unwrap();
    let right = Table::from_columns(vec![
        ("k", Column::from_values(vec![Scalar::Null, Scalar::from("one")])),
        ("w", Column::from(vec!["x", "y"])),
    ])
    .unwrap();
    let joined = left.inner_join(&right, "k").unwrap();
    assert_eq!(
        joined["k"],
        Column::from_values(vec![Scalar::from("one"), Scalar::Null])
    );
    assert_eq!(joined["v"], col![1, 2]);
    assert_eq!(joined["w"], col!["y", "x"]);
}

#[test]
fn test_int_and_float_keys_are_distinct() {
    let left = table! { "k" => [1] }.unwrap();
    let right = table! { "k" => [1.0], "r" => ["x"] }.unwrap();
    assert_eq!(left.inner_join(&right, "k").unwrap().size(), 0);
}

#[test]
fn test_right_value_overrides_unless_null() {
    let left = table! { "a" => [1, 2], "x" => ["l1", "l2"] }.unwrap();
    let right = Table::from_columns(vec![
        ("a", Column::from(vec![1i64, 2])),
        ("x", Column::from_values(vec![Scalar::Null, Scalar::from("r2")])),
    ])
    .unwrap();
    let joined = left.inner_join(&right, "a").unwrap();
    assert_eq!(joined["x"], col!["l1", "r2"]);
}

#[test]
fn test_missing_keys() {
    let err = sample_table().inner_join(&right_table(), "bad").unwrap_err();
    assert_eq!(err.to_string(), "schema error: missing keys: bad");
    assert_eq!(err.suggestions().len(), 2);
}

#[test]
fn test_no_keys() {
    let right = table! { "z" => [1] }.unwrap();
    let err = sample_table()
        .join(&right, JoinType::Inner, JoinOn::Shared)
        .unwrap_err();
    assert_eq!(err.to_string(), "schema error: no keys");
}

#[test]
fn test_left_join() {
    let joined = sample_table().left_join(&right_table(), "a").unwrap();
    assert_eq!(joined["a"], col![1, 1, 2, 3]);
    assert_eq!(joined["b"], col!["one", "one", "two", "three"]);
    assert_eq!(
        joined["c"],
        Column::from_values(vec![
            Scalar::from("c1"),
            Scalar::from("c2"),
            Scalar::from("c3"),
            Scalar::Null,
        ])
    );
}

#[test]
fn test_left_join_numeric_gaps_become_nan() {
    let right = table! { "a" => [1], "d" => [10] }.unwrap();
    let joined = sample_table().left_join(&right, "a").unwrap();
    assert_eq!(joined["d"].dtype(), ElementType::Float64);
    assert_eq!(joined["d"], col![10.0, f64::NAN, f64::NAN]);
}

#[test]
fn test_join_type_parse() {
    assert_eq!(JoinType::parse("INNER").unwrap(), JoinType::Inner);
    assert_eq!(JoinType::parse("left").unwrap(), JoinType::Left);
    assert!(matches!(JoinType::parse("outer"), Err(OpError::Plan(_))));
}

#[test]
fn test_generated_join() {
    let (left, right) = generate_join_tables(10);
    let inner = left.inner_join(&right, "k").unwrap();
    assert_eq!(inner.size(), 5);
    assert_eq!(inner["k"], col![0, 2, 4, 6, 8]);
    assert_eq!(inner["r"], col!["r0", "r2", "r4", "r6", "r8"]);

    let left_joined = left.left_join(&right, "k").unwrap();
    assert_eq!(left_joined.size(), 10);
    assert_eq!(left_joined.names(), vec!["k", "l", "r"]);
    let nulls = left_joined["r"].iter().filter(Scalar::is_null).count();
    assert_eq!(nulls, 5);
}
