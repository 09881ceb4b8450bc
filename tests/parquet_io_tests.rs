//! Parquet reading and writing (requires `--features parquet`)

#![cfg(feature = "parquet")]

mod test_data_gen;

use std::sync::Arc;

use arrow_array::{ArrayRef, Decimal128Array, Int64Array, RecordBatch};
use parquet::arrow::ArrowWriter;
use tabula::prelude::*;
use tabula::tabula_io::Error as IoError;
use test_data_gen::{create_temp_dir, generate_table};

/// Parquet bytes for a single-column batch, written directly with arrow.
fn fixture(name: &str, array: ArrayRef) -> Vec<u8> {
    let batch = RecordBatch::try_from_iter(vec![(name, array)]).unwrap();
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    buf
}

fn float_override(name: &str) -> TypeOverrides {
    let mut types = TypeOverrides::new();
    types.insert(name.to_string(), ElementType::Float64);
    types
}

#[test]
fn test_round_trip_keeps_types() {
    let mut types = TypeOverrides::new();
    types.insert("small".to_string(), ElementType::Int8);
    let t = Table::with_types(
        vec![
            ("id", ColumnInput::from(vec![1i64, 2, 3])),
            ("small", ColumnInput::from(vec![4i64, 5, 6])),
            ("flag", ColumnInput::from(vec![true, false, true])),
            ("score", ColumnInput::from(vec![0.5f64, f64::NAN, 2.5])),
            ("name", ColumnInput::from(vec!["one", "two", "three"])),
        ],
        &types,
    )
    .unwrap();

    let bytes = to_parquet(&t).unwrap();
    let back = parse_parquet(bytes, &TypeOverrides::new()).unwrap();
    assert_eq!(back, t);
    assert_eq!(back.types(), t.types());
}

#[test]
fn test_file_round_trip() {
    let t = generate_table(50, 4);
    let dir = create_temp_dir();
    let path = format!("{dir}/data.parquet");
    write_parquet(&t, &path).unwrap();
    let back = read_parquet(&path, &TypeOverrides::new()).unwrap();
    assert_eq!(back, t);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_empty_table_round_trip() {
    let t = Table::from_columns(vec![("a", Column::empty(ElementType::Int64))]).unwrap();
    let back = parse_parquet(to_parquet(&t).unwrap(), &TypeOverrides::new()).unwrap();
    assert_eq!(back.size(), 0);
    assert_eq!(back.types()["a"], ElementType::Int64);
}

#[test]
fn test_object_column_must_hold_strings() {
    let t = Table::from_columns(vec![(
        "a",
        Column::from_values(vec![Scalar::from("x"), Scalar::Int(1)]),
    )])
    .unwrap();
    let err = to_parquet(&t).unwrap_err();
    assert!(matches!(err, IoError::Schema(_)));
    assert!(err.to_string().contains("cannot write object column a"));
}

#[test]
fn test_nulls_in_int_column() {
    let bytes = fixture("a", Arc::new(Int64Array::from(vec![Some(1), None])));

    let err = parse_parquet(bytes.clone(), &TypeOverrides::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "schema error: nulls not supported for Int64 column: a"
    );

    let t = parse_parquet(bytes, &float_override("a")).unwrap();
    assert_eq!(t.types()["a"], ElementType::Float64);
    assert_eq!(t["a"], col![1.0, f64::NAN]);
}

#[test]
fn test_decimal_needs_override() {
    let decimals = Decimal128Array::from(vec![12345i128, 500])
        .with_precision_and_scale(10, 2)
        .unwrap();
    let bytes = fixture("price", Arc::new(decimals));

    let err = parse_parquet(bytes.clone(), &TypeOverrides::new()).unwrap_err();
    assert!(matches!(err, IoError::Schema(_)));
    assert!(err.to_string().contains("unknown type"));

    let t = parse_parquet(bytes, &float_override("price")).unwrap();
    assert_eq!(t["price"], col![123.45, 5.0]);
}
