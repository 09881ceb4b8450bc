//! Grouping and per-group aggregates

mod test_data_gen;

use tabula::prelude::*;
use test_data_gen::generate_table;

fn grouped_table() -> Table {
    table! { "a" => [1, 2, 3, 5], "b" => ["one", "two", "one", "two"] }.unwrap()
}

#[test]
fn test_count() {
    let t = table! { "a" => [1, 2, 3], "b" => ["one", "two", "one"] }.unwrap();
    let counts = t.group(["b"]).unwrap().count().unwrap();
    assert_eq!(counts.names(), vec!["b", "count"]);
    assert_eq!(counts["b"], col!["one", "two"]);
    assert_eq!(counts["count"], col![2, 1]);
}

#[test]
fn test_null_key_forms_its_own_group() {
    let t = Table::from_columns(vec![
        (
            "b",
            Column::from_values(vec![Scalar::from("one"), Scalar::Null, Scalar::from("one")]),
        ),
        ("a", Column::from(vec![1i64, 2, 3])),
    ])
    .unwrap();
    let counts = t.group(["b"]).unwrap().count().unwrap();
    assert_eq!(
        counts["b"],
        Column::from_values(vec![Scalar::from("one"), Scalar::Null])
    );
    assert_eq!(counts["count"], col![2, 1]);
}

#[test]
fn test_multiple_keys() {
    let t = table! { "a" => [1, 1, 2, 1], "b" => ["x", "y", "x", "x"] }.unwrap();
    let expected = table! {
        "a" => [1, 1, 2],
        "b" => ["x", "y", "x"],
        "count" => [2, 1, 1],
    }
    .unwrap();
    assert_eq!(t.group(["a", "b"]).unwrap().count().unwrap(), expected);

    let chained = t.group(["a"]).unwrap().group(["b"]).unwrap();
    assert_eq!(chained.columns(), ["a".to_string(), "b".to_string()]);
    assert_eq!(chained.count().unwrap(), expected);
}

#[test]
fn test_key_types_preserved() {
    let mut types = TypeOverrides::new();
    types.insert("a".to_string(), ElementType::Int16);
    let t = Table::with_types(vec![("a", col![1, 1, 2])], &types).unwrap();
    let counts = t.group(["a"]).unwrap().count().unwrap();
    assert_eq!(counts["a"].dtype(), ElementType::Int16);
}

#[test]
fn test_no_columns_given() {
    let t = grouped_table();
    let err = t.group(Vec::<String>::new()).err().unwrap();
    assert_eq!(err.to_string(), "schema error: no columns given");
}

#[test]
fn test_missing_keys() {
    let t = grouped_table();
    let err = t.group(["c"]).err().unwrap();
    assert_eq!(err.to_string(), "schema error: missing keys: c");
    assert!(!err.suggestions().is_empty());
}

#[test]
fn test_max_min_sum() {
    let g = grouped_table();
    let g = g.group(["b"]).unwrap();

    let max = g.max("a").unwrap();
    assert_eq!(max.names(), vec!["b", "max_a"]);
    assert_eq!(max["max_a"], col![3, 5]);

    assert_eq!(g.min("a").unwrap()["min_a"], col![1, 2]);
    assert_eq!(g.sum("a").unwrap()["sum_a"], col![4, 7]);
}

#[test]
fn test_mean_median_var_std() {
    let t = grouped_table();
    let g = t.group(["b"]).unwrap();

    assert_eq!(g.mean("a").unwrap()["mean_a"], col![2.0, 3.5]);
    assert_eq!(g.median("a").unwrap()["median_a"], col![2.0, 3.5]);
    assert_eq!(g.var("a").unwrap()["var_a"], col![2.0, 4.5]);

    let std = g.std("a").unwrap();
    let values = std["std_a"].to_vec();
    assert!((values[0].as_f64().unwrap() - 2f64.sqrt()).abs() < 1e-9);
    assert!((values[1].as_f64().unwrap() - 4.5f64.sqrt()).abs() < 1e-9);
}

#[test]
fn test_missing_value_column() {
    let t = grouped_table();
    let err = t.group(["b"]).unwrap().max("zzz").unwrap_err();
    assert!(matches!(err, OpError::Core(Error::MissingColumn { .. })));
}

#[test]
fn test_partition_is_computed_once() {
    let t = grouped_table();
    let g = t.group(["b"]).unwrap();
    assert!(!g.is_partitioned());
    g.count().unwrap();
    assert!(g.is_partitioned());
    assert_eq!(g.num_groups().unwrap(), 2);
    assert_eq!(g.sum("a").unwrap()["sum_a"], col![4, 7]);
}

#[test]
fn test_empty_table() {
    let t = Table::from_columns(vec![("a", Column::from(Vec::<i64>::new()))]).unwrap();
    let counts = t.group(["a"]).unwrap().count().unwrap();
    assert_eq!(counts.names(), vec!["a", "count"]);
    assert_eq!(counts.size(), 0);
}

#[test]
fn test_generated_groups() {
    let t = generate_table(30, 3);
    let g = t.group(["group"]).unwrap();
    assert_eq!(g.count().unwrap()["count"], col![10, 10, 10]);

    let sums = g.sum("value").unwrap();
    assert_eq!(sums["group"], col!["g0", "g1", "g2"]);
    let total: f64 = sums["sum_value"]
        .to_vec()
        .iter()
        .filter_map(Scalar::as_f64)
        .sum();
    assert!((total - 217.5).abs() < 1e-9);
}

#[test]
fn test_agg_parse() {
    assert_eq!(AggFunc::parse("count").unwrap(), AggFunc::Count);
    assert_eq!(
        AggFunc::parse("sum:sales").unwrap(),
        AggFunc::Sum {
            column: "sales".into()
        }
    );
    assert_eq!(
        AggFunc::parse("percentile:price:90").unwrap(),
        AggFunc::Percentile {
            column: "price".into(),
            q: 90.0
        }
    );
    assert_eq!(AggFunc::parse("mean:a").unwrap().output_name(), "mean_a");

    let err = AggFunc::parse("bogus").unwrap_err();
    assert!(matches!(err, OpError::Plan(_)));
    assert!(!err.suggestions().is_empty());
    assert!(matches!(AggFunc::parse("avg:x"), Err(OpError::Plan(_))));
    assert!(matches!(AggFunc::parse("percentile:x"), Err(OpError::Plan(_))));
}

#[test]
fn test_aggregate_with_parsed_spec() {
    let t = grouped_table();
    let out = t
        .group(["b"])
        .unwrap()
        .aggregate(&AggFunc::parse("sum:a").unwrap())
        .unwrap();
    assert_eq!(out.names(), vec!["b", "sum_a"]);
    assert_eq!(out["sum_a"], col![4, 7]);
}
