//! Column construction, typing, operators, and reductions

use tabula::prelude::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_infer_types() {
    assert_eq!(col![1, 2, 3].dtype(), ElementType::Int64);
    assert_eq!(col![1.5, 2.0].dtype(), ElementType::Float64);
    assert_eq!(col![1, 2.5].dtype(), ElementType::Float64);
    assert_eq!(col![true, false].dtype(), ElementType::Bool);
    assert_eq!(col!["a", "b"].dtype(), ElementType::Object);
    assert_eq!(col![1, "a"].dtype(), ElementType::Object);
    assert_eq!(col![true, 1].dtype(), ElementType::Object);
}

#[test]
fn test_null_in_numeric_becomes_nan() {
    let c = Column::from_values(vec![Scalar::Int(1), Scalar::Null]);
    assert_eq!(c.dtype(), ElementType::Float64);
    assert!(c.get(1).unwrap().is_missing());
    assert_eq!(c.missing(), col![false, true]);
}

#[test]
fn test_type_names() {
    assert_eq!(ElementType::parse("int").unwrap(), ElementType::Int64);
    assert_eq!(ElementType::parse("float32").unwrap(), ElementType::Float32);
    assert_eq!(ElementType::Int64.name(), "int");
    assert_eq!(ElementType::Float64.name(), "float");
    assert!(matches!(ElementType::parse("decimal"), Err(Error::Config(_))));

    let c = col![1, 2].to("uint8").unwrap();
    assert_eq!(c.dtype(), ElementType::UInt8);
    assert_eq!(c, col![1, 2]);
}

#[test]
fn test_cast_nan_to_int_fails() {
    let c = col![1.0, f64::NAN];
    for ty in ["int8", "int16", "int32", "int", "uint8", "uint16", "uint32", "uint"] {
        let err = c.to(ty).unwrap_err();
        assert!(matches!(err, Error::Range(_)), "{ty}: {err}");
    }
    let f = c.cast(ElementType::Float32).unwrap();
    assert_eq!(f.missing(), col![false, true]);
    assert_eq!(c.cast(ElementType::Float64).unwrap().missing(), col![false, true]);
}

#[test]
fn test_cast_strings() {
    let c = col!["1", "2"].cast(ElementType::Int64).unwrap();
    assert_eq!(c, col![1, 2]);

    let err = col!["x"].cast(ElementType::Int64).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
}

#[test]
fn test_cast_wraps_out_of_range_ints() {
    let c = Column::from(vec![9_223_372_036_854_775_808u64]);
    let out = c.cast(ElementType::Int32).unwrap();
    assert_eq!(out.dtype(), ElementType::Int32);
    assert_eq!(out, col![0]);
}

#[test]
fn test_cast_to_bool_uses_truthiness() {
    assert_eq!(col![0, 2].cast(ElementType::Bool).unwrap(), col![false, true]);
    assert_eq!(
        col!["", "x"].cast(ElementType::Bool).unwrap(),
        col![false, true]
    );
}

#[test]
fn test_promote() {
    use ElementType::*;
    assert_eq!(Int8.promote(Int16), Int16);
    assert_eq!(UInt8.promote(Int8), Int16);
    assert_eq!(UInt32.promote(Int8), Int64);
    assert_eq!(UInt64.promote(Int8), Float64);
    assert_eq!(Int16.promote(Float32), Float32);
    assert_eq!(Int32.promote(Float32), Float64);
    assert_eq!(Bool.promote(Bool), Int64);
    assert_eq!(Bool.promote(UInt8), UInt8);
    assert_eq!(Object.promote(Int8), Object);
    assert_eq!(Bool.promote_bitwise(Bool), Bool);
}

#[test]
fn test_integer_division_truncates() {
    let out = col![1, 3, 5].div(&col![2, 2, 2]).unwrap();
    assert_eq!(out.dtype(), ElementType::Int64);
    assert_eq!(out, col![0, 1, 2]);
}

#[test]
fn test_float_division() {
    let out = col![1, 3, 5].div(&col![2.0, 2.0, 2.0]).unwrap();
    assert_eq!(out.dtype(), ElementType::Float64);
    assert_eq!(out, col![0.5, 1.5, 2.5]);

    let out = col![1, 3, 5].div(2.0).unwrap();
    assert_eq!(out, col![0.5, 1.5, 2.5]);
}

#[test]
fn test_integer_division_by_zero() {
    let err = col![1, 2].div(0).unwrap_err();
    assert!(matches!(err, Error::Range(_)));
}

#[test]
fn test_floored_modulo() {
    assert_eq!(col![-7, 7].rem(3).unwrap(), col![2, 1]);
    assert_eq!(col![7].rem(-3).unwrap(), col![-2]);
}

#[test]
fn test_arithmetic_with_scalar_keeps_type() {
    let c = col![1, 2, 3].to("int16").unwrap();
    let out = c.add(1).unwrap();
    assert_eq!(out.dtype(), ElementType::Int16);
    assert_eq!(out, col![2, 3, 4]);

    assert_eq!(col![2, 3].pow(2).unwrap(), col![4, 9]);
    assert_eq!(col![1, -2].neg().unwrap(), col![-1, 2]);
    assert_eq!(col![-1.5, 2.0].abs().unwrap(), col![1.5, 2.0]);
}

#[test]
fn test_mixed_width_promotion() {
    let a = col![1, 2].to("int8").unwrap();
    let b = col![1, 2].to("int16").unwrap();
    assert_eq!(a.add(&b).unwrap().dtype(), ElementType::Int16);

    let sum = col![true, false].add(&col![true, true]).unwrap();
    assert_eq!(sum.dtype(), ElementType::Int64);
    assert_eq!(sum, col![2, 1]);
}

#[test]
fn test_size_mismatch() {
    let err = col![1, 2, 3].add(&col![1, 2]).unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
    assert!(err.to_string().contains("size mismatch"));

    let err = col![1, 2, 3]
        .add(vec![Scalar::Int(1)])
        .unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
}

#[test]
fn test_value_sequence_operand() {
    let out = col![1, 2, 3]
        .mul(vec![Scalar::Int(2), Scalar::Int(3), Scalar::Int(4)])
        .unwrap();
    assert_eq!(out, col![2, 6, 12]);
}

#[test]
fn test_object_arithmetic() {
    let out = col!["a", "b"].add("c").unwrap();
    assert_eq!(out, col!["ac", "bc"]);

    let out = col!["ab"].mul(2).unwrap();
    assert_eq!(out, col!["abab"]);

    let err = col!["a"].sub(1).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
}

#[test]
fn test_string_repeat_bounds() {
    assert!(matches!(col!["ab"].mul(u64::MAX), Err(Error::Range(_))));
    assert!(matches!(col!["ab"].mul(-1), Err(Error::Range(_))));
    assert_eq!(col!["ab"].mul(0u64).unwrap(), col![""]);
}

#[test]
fn test_comparisons() {
    assert_eq!(col![1, 2, 3].gt(1).unwrap(), col![false, true, true]);
    assert_eq!(col![1, 2, 3].le(2).unwrap(), col![true, true, false]);
    assert_eq!(col![1, 2].equal(1.0).unwrap(), col![true, false]);
    assert_eq!(col![1, 2].not_equal(&col![1, 3]).unwrap(), col![false, true]);
    assert_eq!(col!["a", "b"].lt("b").unwrap(), col![true, false]);
    assert_eq!(col!["a", "b"].equal("b").unwrap(), col![false, true]);
    assert_eq!(col![true, false].equal(true).unwrap(), col![true, false]);
}

#[test]
fn test_incomparable_objects() {
    let err = col!["a"].gt(1).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
}

#[test]
fn test_logical_and_bitwise() {
    assert_eq!(col![true, false].not().unwrap(), col![false, true]);
    assert!(matches!(col![1].not(), Err(Error::Type(_))));

    assert_eq!(col![true, false].bitand(true).unwrap(), col![true, false]);
    assert_eq!(col![true, false].bitor(&col![false, false]).unwrap(), col![true, false]);
    assert_eq!(col![6, 5].bitand(3).unwrap(), col![2, 1]);
    assert_eq!(col![6].bitxor(3).unwrap(), col![5]);
    assert!(matches!(col![1.5].bitor(1), Err(Error::Type(_))));
}

#[test]
fn test_reductions() {
    let c = col![1, 5, 3];
    assert_eq!(c.max().unwrap(), Scalar::Int(5));
    assert_eq!(c.min().unwrap(), Scalar::Int(1));
    assert_eq!(c.sum().unwrap(), Scalar::Int(9));
    assert!(approx(c.mean().unwrap(), 3.0));
    assert!(approx(c.median().unwrap(), 3.0));

    assert_eq!(col![0.5, 1.5].sum().unwrap(), Scalar::Float(2.0));
    assert_eq!(col![true, true, false].sum().unwrap(), Scalar::Int(2));
    assert_eq!(col!["b", "c", "a"].max().unwrap(), Scalar::from("c"));
    assert_eq!(Column::empty(ElementType::Int64).max().unwrap(), Scalar::Null);
}

#[test]
fn test_max_propagates_nan() {
    let max = col![1.0, f64::NAN, 3.0].max().unwrap();
    assert!(matches!(max, Scalar::Float(x) if x.is_nan()));
}

#[test]
fn test_object_extremes_skip_nulls() {
    let c = Column::from_values(vec![Scalar::from("a"), Scalar::Null, Scalar::from("c")]);
    assert_eq!(c.dtype(), ElementType::Object);
    assert_eq!(c.max().unwrap(), Scalar::from("c"));
    assert_eq!(c.min().unwrap(), Scalar::from("a"));

    let nulls = Column::from_values_typed(vec![Scalar::Null, Scalar::Null], ElementType::Object)
        .unwrap();
    assert_eq!(nulls.max().unwrap(), Scalar::Null);
}

#[test]
fn test_percentile() {
    let c = col![1, 2, 3, 4, 5];
    assert!(approx(c.percentile(25.0).unwrap(), 2.0));
    assert!(approx(c.percentile(0.0).unwrap(), 1.0));
    assert!(approx(c.percentile(100.0).unwrap(), 5.0));
    assert!(approx(col![1, 2, 3, 4].median().unwrap(), 2.5));
    assert!(matches!(c.percentile(150.0), Err(Error::Range(_))));
    assert!(col![1.0, f64::NAN].median().unwrap().is_nan());
}

#[test]
fn test_sample_variance() {
    assert!(approx(col![1, 2, 3, 4].var().unwrap(), 5.0 / 3.0));
    let std = col![2, 4, 4, 4, 5, 5, 7, 9].std().unwrap();
    assert!(approx(std, (32.0f64 / 7.0).sqrt()));
    assert!(col![1].var().unwrap().is_nan());
}

#[test]
fn test_statistics_on_strings_fail() {
    assert!(matches!(col!["a"].mean(), Err(Error::Context { .. })));
}

#[test]
fn test_uniq_tally_diff() {
    assert_eq!(col![1, 2, 1, 3, 2].uniq(), col![1, 2, 3]);
    assert_eq!(
        col!["a", "b", "a"].tally(),
        vec![(Scalar::from("a"), 2), (Scalar::from("b"), 1)]
    );
    assert_eq!(
        col![1, 4, 9].diff().unwrap(),
        Column::from(vec![f64::NAN, 3.0, 5.0])
    );
}

#[test]
fn test_sort() {
    assert_eq!(col![3, 1, 2].sort(), col![1, 2, 3]);
    assert_eq!(col![3, 1, 2].argsort(), vec![1, 2, 0]);
    assert_eq!(
        col![2.0, f64::NAN, 1.0].sort(),
        col![1.0, 2.0, f64::NAN]
    );
    assert_eq!(col!["b", "a"].sort(), col!["a", "b"]);
}

#[test]
fn test_selection() {
    let c = col![1, 2, 3];
    assert_eq!(c.slice(1..10), col![2, 3]);
    assert_eq!(c.filter(&col![true, false, true]).unwrap(), col![1, 3]);
    assert!(matches!(c.filter(&col![1, 0, 1]), Err(Error::Type(_))));
    assert!(matches!(c.filter(&col![true]), Err(Error::Schema(_))));
    assert_eq!(c.first(5), c);
    assert_eq!(c.last(2), col![2, 3]);
    assert_eq!(c.head(-1), col![1, 2]);
    assert_eq!(c.tail(-1), col![2, 3]);
    assert_eq!(c.take(2).unwrap(), col![1, 2]);
    assert!(matches!(c.take(-1), Err(Error::Range(_))));
    assert_eq!(c.take_indices(&[2, 0, 0]).unwrap(), col![3, 1, 1]);
    assert!(matches!(c.take_indices(&[3]), Err(Error::Schema(_))));
}

#[test]
fn test_element_writes() {
    let mut c = col![1, 2, 3];
    c.set(0, 10).unwrap();
    assert_eq!(c, col![10, 2, 3]);
    assert!(matches!(c.set(0, "x"), Err(Error::Type(_))));
    assert!(matches!(c.set(5, 1), Err(Error::Schema(_))));

    let mask = c.gt(2).unwrap();
    c.set_where(&mask, 0).unwrap();
    assert_eq!(c, col![0, 2, 0]);

    let mut d = col![1, 2, 3, 4];
    d.set_range(1..3, 0).unwrap();
    assert_eq!(d, col![1, 0, 0, 4]);
    assert_eq!(d.dtype(), ElementType::Int64);
}

#[test]
fn test_copy_on_write() {
    let a = col![1, 2, 3];
    let mut b = a.clone();
    assert!(a.shares_storage(&b));
    b.set(0, 9).unwrap();
    assert!(!a.shares_storage(&b));
    assert_eq!(a, col![1, 2, 3]);
    assert_eq!(b, col![9, 2, 3]);
    assert!(!a.shares_storage(&a.deep_copy()));
}

#[test]
fn test_clamp_map_is_in() {
    let c = col![1, 5, 10].clamp(2, 8).unwrap();
    assert_eq!(c.dtype(), ElementType::Int64);
    assert_eq!(c, col![2, 5, 8]);
    assert!(matches!(col!["a"].clamp(1, 2), Err(Error::Type(_))));

    let halves = col![1, 2, 3].map(|v| Scalar::Float(v.as_f64().unwrap() * 0.5));
    assert_eq!(halves.dtype(), ElementType::Float64);
    assert_eq!(halves, col![0.5, 1.0, 1.5]);

    let mut m = col![1, 2];
    m.map_in_place(|v| Scalar::Str(v.to_string()));
    assert_eq!(m, col!["1", "2"]);

    assert_eq!(
        col![1, 2, 3].is_in(&[Scalar::Int(2), Scalar::Int(3)]),
        col![false, true, true]
    );
}

#[test]
fn test_math_functions() {
    assert_eq!(col![4.0, 9.0].sqrt().unwrap(), col![2.0, 3.0]);
    let s = col![1, 4].sqrt().unwrap();
    assert_eq!(s.dtype(), ElementType::Float64);
    assert_eq!(s, col![1.0, 2.0]);
    assert_eq!(Column::from(vec![4.0f32]).sqrt().unwrap().dtype(), ElementType::Float32);

    assert_eq!(col![1.4, 2.5, -2.5].round(0).unwrap(), col![1.0, 3.0, -3.0]);
    assert_eq!(col![123.0].round(-1).unwrap(), col![120.0]);
    assert_eq!(col![1.2].ceil(0).unwrap(), col![2.0]);
    assert_eq!(col![1.8].floor(0).unwrap(), col![1.0]);
    assert_eq!(col![3.0].hypot(4.0).unwrap(), col![5.0]);
    assert_eq!(col![8.0].log2().unwrap(), col![3.0]);

    let (mantissa, exponent) = col![8.0].frexp().unwrap();
    assert_eq!(mantissa, col![0.5]);
    assert_eq!(exponent.dtype(), ElementType::Int32);
    assert_eq!(exponent, col![4]);
    assert_eq!(col![0.5].ldexp(4).unwrap(), col![8.0]);

    assert!(matches!(col!["a"].ln(), Err(Error::Type(_))));
}

#[test]
fn test_display() {
    assert_eq!(col![1, 2, 3, 4, 5, 6].to_string(), "[1, 2, 3, 4, 5, ...]");
    assert_eq!(col!["a"].to_string(), "[\"a\"]");
    assert_eq!(format!("{:?}", col![1]), "Column<int> [1]");
}

#[test]
fn test_one_hot() {
    let c = col!["a", "b", "a"];
    let t = c.one_hot(false, "x_").unwrap();
    assert_eq!(t.names(), vec!["x_a", "x_b"]);
    assert_eq!(t["x_a"], col![1, 0, 1]);
    assert_eq!(t["x_b"], col![0, 1, 0]);
    let sums = t["x_a"].add(&t["x_b"]).unwrap();
    assert_eq!(sums, col![1, 1, 1]);

    let dropped = c.one_hot(true, "x_").unwrap();
    assert_eq!(dropped.names(), vec!["x_b"]);

    assert!(matches!(col![1, 2].one_hot(false, ""), Err(Error::Type(_))));
}

#[test]
fn test_crosstab() {
    let t = col!["x", "y", "x"].crosstab(&col![1, 2, 1]).unwrap();
    assert_eq!(t.names(), vec!["_", "1", "2"]);
    assert_eq!(t["_"], col!["x", "y"]);
    assert_eq!(t["1"], col![2, 0]);
    assert_eq!(t["2"], col![0, 1]);
}
