//! Error messages, context chains, and suggestions across the crates

use std::error::Error as _;

use tabula::prelude::*;
use tabula::tabula_io::Error as IoError;

#[test]
fn test_core_error_context() {
    let err = Error::Schema("different sizes: [3, 2]".into()).with_context("building table");
    assert_eq!(
        err.to_string(),
        "error in building table: schema error: different sizes: [3, 2]"
    );
    assert!(err.source().is_some());
    assert!(err.suggestions().is_empty());
}

#[test]
fn test_missing_column_message() {
    let err = Error::missing_column("amout", ["amount", "b"]);
    assert_eq!(err.to_string(), "missing column: amout (did you mean? \"amount\")");
    assert_eq!(err.suggestions(), vec!["Did you mean \"amount\"?".to_string()]);

    let err = Error::missing_column("zzz", ["amount"]);
    assert_eq!(err.to_string(), "missing column: zzz");
}

#[test]
fn test_nan_cast_suggestions() {
    let err = col![1.0, f64::NAN].cast(ElementType::Int64).unwrap_err();
    assert!(matches!(err, Error::Range(_)));
    assert_eq!(err.suggestions().len(), 2);
}

#[test]
fn test_invalid_type_suggestions() {
    let err = ElementType::parse("decimal").unwrap_err();
    assert_eq!(err.to_string(), "invalid configuration: invalid type: decimal");
    assert!(err.suggestions()[0].starts_with("Valid types:"));
    assert_eq!(ElementType::parse("int").unwrap(), ElementType::Int64);
}

#[test]
fn test_op_error_context() {
    let err = OpError::Schema("missing keys: c".into()).with_context("grouping");
    assert_eq!(err.to_string(), "schema error: grouping: missing keys: c");

    let err = OpError::Plan("invalid agg spec: x".into()).with_context("parsing");
    assert_eq!(err.to_string(), "planning error: parsing: invalid agg spec: x");

    let err = OpError::Core(Error::Type("boom".into())).with_context("aggregating");
    assert!(matches!(err, OpError::Core(Error::Context { .. })));
    assert_eq!(err.to_string(), "error in aggregating: type error: boom");
}

#[test]
fn test_op_error_forwards_core_suggestions() {
    let t = table! { "b" => ["x", "y"], "amount" => [1, 2] }.unwrap();
    let err = t.group(["b"]).unwrap().max("amout").unwrap_err();
    assert_eq!(err.suggestions(), vec!["Did you mean \"amount\"?".to_string()]);
}

#[test]
fn test_io_error_wraps_core() {
    let mut types = TypeOverrides::new();
    types.insert("a".to_string(), ElementType::Int64);
    let opts = CsvOptions::default().with_types(types);
    let err = parse_csv("a\n1.5\ninf\n", &opts).unwrap_err();
    match err {
        IoError::Core(core) => assert!(matches!(core, Error::Range(_))),
        other => panic!("expected a core error, got {other:?}"),
    }
}
