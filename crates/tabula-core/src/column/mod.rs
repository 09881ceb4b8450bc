//! Homogeneously typed, fixed-length columns.
//!
//! Storage is one `Vec` per `ElementType` variant behind an `Arc`, so cloning
//! a column is cheap and in-place writes detach the buffer (copy-on-write).
//! Operations are split by concern:
//! - `ops`: elementwise arithmetic, comparison, and logical operators
//! - `math`: rounding and transcendental functions
//! - `reduce`: reductions, ordering, and set-like helpers
//! - `select`: slicing, masking, gathering, and element writes
//! - `derive`: one-hot expansion and contingency tables

mod derive;
mod math;
mod ops;
mod reduce;
mod select;

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{ElementType, Scalar};

pub use ops::{BinaryOp, Operand};
pub(crate) use select::mask_positions;

/// Typed storage for a column.
#[derive(Debug, Clone)]
pub enum ColumnData {
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Object(Vec<Scalar>),
}

/// Match on `ColumnData`, binding the typed vector. The numeric body is
/// expanded once per numeric variant, so it may be generic over the element.
macro_rules! with_data {
    ($data:expr, |$v:ident| $numeric:expr, bool |$b:ident| $on_bool:expr, object |$o:ident| $on_object:expr $(,)?) => {
        match $data {
            ColumnData::Int8($v) => $numeric,
            ColumnData::Int16($v) => $numeric,
            ColumnData::Int32($v) => $numeric,
            ColumnData::Int64($v) => $numeric,
            ColumnData::UInt8($v) => $numeric,
            ColumnData::UInt16($v) => $numeric,
            ColumnData::UInt32($v) => $numeric,
            ColumnData::UInt64($v) => $numeric,
            ColumnData::Float32($v) => $numeric,
            ColumnData::Float64($v) => $numeric,
            ColumnData::Bool($b) => $on_bool,
            ColumnData::Object($o) => $on_object,
        }
    };
}

/// Bind a type alias `$T` to the native type of a numeric `ElementType`.
macro_rules! with_native {
    ($ty:expr, |$T:ident| $body:expr, else $fallback:expr $(,)?) => {
        match $ty {
            ElementType::Int8 => { type $T = i8; $body }
            ElementType::Int16 => { type $T = i16; $body }
            ElementType::Int32 => { type $T = i32; $body }
            ElementType::Int64 => { type $T = i64; $body }
            ElementType::UInt8 => { type $T = u8; $body }
            ElementType::UInt16 => { type $T = u16; $body }
            ElementType::UInt32 => { type $T = u32; $body }
            ElementType::UInt64 => { type $T = u64; $body }
            ElementType::Float32 => { type $T = f32; $body }
            ElementType::Float64 => { type $T = f64; $body }
            ElementType::Bool | ElementType::Object => $fallback,
        }
    };
}

pub(crate) use {with_data, with_native};

/// Native numeric element stored in a column buffer.
pub trait Element: Copy + PartialOrd + Default + fmt::Debug + Send + Sync + 'static {
    const TYPE: ElementType;
    const IS_FLOAT: bool;

    fn to_f64(self) -> f64;
    /// Integer value; floats are truncated toward zero (callers check finiteness).
    fn to_i128(self) -> i128;
    /// Two's-complement wraparound into the target width.
    fn from_i128(v: i128) -> Self;
    /// Truncate then wrap for integers; plain conversion for floats.
    fn from_f64(v: f64) -> Self;
    fn to_scalar(self) -> Scalar;
    fn into_data(v: Vec<Self>) -> ColumnData;
    fn slice_of(data: &ColumnData) -> Option<&[Self]>;

    fn is_nan(self) -> bool;
    fn is_finite(self) -> bool;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn div(self, rhs: Self) -> Result<Self>;
    /// Floored modulo: the result takes the sign of the divisor.
    fn rem(self, rhs: Self) -> Result<Self>;
    fn pow(self, rhs: Self) -> Self;
    fn bitand(self, rhs: Self) -> Result<Self>;
    fn bitor(self, rhs: Self) -> Result<Self>;
    fn bitxor(self, rhs: Self) -> Result<Self>;
    fn abs(self) -> Self;
}

macro_rules! impl_int_element {
    ($($t:ty => $variant:ident, $scalar:ident as $st:ty);* $(;)?) => {
        $(
            impl Element for $t {
                const TYPE: ElementType = ElementType::$variant;
                const IS_FLOAT: bool = false;

                fn to_f64(self) -> f64 { self as f64 }
                fn to_i128(self) -> i128 { self as i128 }
                fn from_i128(v: i128) -> Self { v as $t }
                fn from_f64(v: f64) -> Self { (v.trunc() as i128) as $t }
                fn to_scalar(self) -> Scalar { Scalar::$scalar(self as $st) }
                fn into_data(v: Vec<Self>) -> ColumnData { ColumnData::$variant(v) }
                fn slice_of(data: &ColumnData) -> Option<&[Self]> {
                    match data {
                        ColumnData::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn is_nan(self) -> bool { false }
                fn is_finite(self) -> bool { true }

                fn add(self, rhs: Self) -> Self { self.wrapping_add(rhs) }
                fn sub(self, rhs: Self) -> Self { self.wrapping_sub(rhs) }
                fn mul(self, rhs: Self) -> Self { self.wrapping_mul(rhs) }
                fn div(self, rhs: Self) -> Result<Self> {
                    if rhs == 0 {
                        return Err(Error::Range("divided by 0".into()));
                    }
                    Ok(self.wrapping_div(rhs))
                }
                fn rem(self, rhs: Self) -> Result<Self> {
                    if rhs == 0 {
                        return Err(Error::Range("divided by 0".into()));
                    }
                    let r = self.wrapping_rem(rhs);
                    #[allow(unused_comparisons)]
                    let adjust = r != 0 && ((r < 0) != (rhs < 0));
                    Ok(if adjust { r.wrapping_add(rhs) } else { r })
                }
                fn pow(self, rhs: Self) -> Self {
                    let exp = rhs as i128;
                    if exp < 0 {
                        // 1/x^n truncated: only |x| == 1 survives.
                        return match self as i128 {
                            1 => 1 as $t,
                            -1 => if exp % 2 == 0 { 1 as $t } else { self },
                            _ => 0 as $t,
                        };
                    }
                    self.wrapping_pow(u32::try_from(exp).unwrap_or(u32::MAX))
                }
                fn bitand(self, rhs: Self) -> Result<Self> { Ok(self & rhs) }
                fn bitor(self, rhs: Self) -> Result<Self> { Ok(self | rhs) }
                fn bitxor(self, rhs: Self) -> Result<Self> { Ok(self ^ rhs) }
                fn abs(self) -> Self {
                    #[allow(unused_comparisons)]
                    let negative = self < 0;
                    if negative { (0 as $t).wrapping_sub(self) } else { self }
                }
            }
        )*
    };
}

impl_int_element!(
    i8 => Int8, Int as i64;
    i16 => Int16, Int as i64;
    i32 => Int32, Int as i64;
    i64 => Int64, Int as i64;
    u8 => UInt8, UInt as u64;
    u16 => UInt16, UInt as u64;
    u32 => UInt32, UInt as u64;
    u64 => UInt64, UInt as u64;
);

macro_rules! impl_float_element {
    ($($t:ty => $variant:ident);* $(;)?) => {
        $(
            impl Element for $t {
                const TYPE: ElementType = ElementType::$variant;
                const IS_FLOAT: bool = true;

                fn to_f64(self) -> f64 { self as f64 }
                fn to_i128(self) -> i128 { self.trunc() as i128 }
                fn from_i128(v: i128) -> Self { v as $t }
                fn from_f64(v: f64) -> Self { v as $t }
                fn to_scalar(self) -> Scalar { Scalar::Float(self as f64) }
                fn into_data(v: Vec<Self>) -> ColumnData { ColumnData::$variant(v) }
                fn slice_of(data: &ColumnData) -> Option<&[Self]> {
                    match data {
                        ColumnData::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn is_nan(self) -> bool { <$t>::is_nan(self) }
                fn is_finite(self) -> bool { <$t>::is_finite(self) }

                fn add(self, rhs: Self) -> Self { self + rhs }
                fn sub(self, rhs: Self) -> Self { self - rhs }
                fn mul(self, rhs: Self) -> Self { self * rhs }
                fn div(self, rhs: Self) -> Result<Self> { Ok(self / rhs) }
                fn rem(self, rhs: Self) -> Result<Self> {
                    let r = self % rhs;
                    Ok(if r != 0.0 && ((r < 0.0) != (rhs < 0.0)) { r + rhs } else { r })
                }
                fn pow(self, rhs: Self) -> Self { self.powf(rhs) }
                fn bitand(self, _rhs: Self) -> Result<Self> { Err(float_bitwise()) }
                fn bitor(self, _rhs: Self) -> Result<Self> { Err(float_bitwise()) }
                fn bitxor(self, _rhs: Self) -> Result<Self> { Err(float_bitwise()) }
                fn abs(self) -> Self { <$t>::abs(self) }
            }
        )*
    };
}

impl_float_element!(
    f32 => Float32;
    f64 => Float64;
);

fn float_bitwise() -> Error {
    Error::Type("bitwise operations are not defined for float columns".into())
}

fn non_finite(target: ElementType) -> Error {
    Error::Range(format!(
        "cannot convert missing or infinite values to {}",
        target.name()
    ))
}

/// Convert a native slice into another native type.
fn convert<S: Element, T: Element>(src: &[S]) -> Vec<T> {
    if S::IS_FLOAT {
        src.iter().map(|v| T::from_f64(v.to_f64())).collect()
    } else {
        src.iter().map(|v| T::from_i128(v.to_i128())).collect()
    }
}

/// Convert one boxed value into a native element.
fn scalar_to_native<T: Element>(value: &Scalar) -> Result<T> {
    match value {
        Scalar::Null if T::IS_FLOAT => Ok(T::from_f64(f64::NAN)),
        Scalar::Null => Err(non_finite(T::TYPE)),
        Scalar::Bool(b) => Ok(T::from_i128(*b as i128)),
        Scalar::Int(i) => Ok(T::from_i128(*i as i128)),
        Scalar::UInt(u) => Ok(T::from_i128(*u as i128)),
        Scalar::Float(f) => {
            if !T::IS_FLOAT && !f.is_finite() {
                return Err(non_finite(T::TYPE));
            }
            Ok(T::from_f64(*f))
        }
        Scalar::Str(s) => {
            let trimmed = s.trim();
            if !T::IS_FLOAT {
                if let Ok(i) = trimmed.parse::<i128>() {
                    return Ok(T::from_i128(i));
                }
            }
            match trimmed.parse::<f64>() {
                Ok(f) if T::IS_FLOAT || f.is_finite() => Ok(T::from_f64(f)),
                Ok(_) => Err(non_finite(T::TYPE)),
                Err(_) => Err(Error::Type(format!(
                    "cannot convert {s:?} to {}",
                    T::TYPE.name()
                ))),
            }
        }
    }
}

impl ColumnData {
    pub fn len(&self) -> usize {
        with_data!(self, |v| v.len(), bool |b| b.len(), object |o| o.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> ElementType {
        match self {
            ColumnData::Bool(_) => ElementType::Bool,
            ColumnData::Int8(_) => ElementType::Int8,
            ColumnData::Int16(_) => ElementType::Int16,
            ColumnData::Int32(_) => ElementType::Int32,
            ColumnData::Int64(_) => ElementType::Int64,
            ColumnData::UInt8(_) => ElementType::UInt8,
            ColumnData::UInt16(_) => ElementType::UInt16,
            ColumnData::UInt32(_) => ElementType::UInt32,
            ColumnData::UInt64(_) => ElementType::UInt64,
            ColumnData::Float32(_) => ElementType::Float32,
            ColumnData::Float64(_) => ElementType::Float64,
            ColumnData::Object(_) => ElementType::Object,
        }
    }

    /// Element at `idx`; panics when out of bounds (internal use).
    fn scalar_at(&self, idx: usize) -> Scalar {
        with_data!(
            self,
            |v| v[idx].to_scalar(),
            bool |b| Scalar::Bool(b[idx]),
            object |o| o[idx].clone(),
        )
    }

    /// An empty buffer of the given type.
    fn empty(ty: ElementType) -> ColumnData {
        with_native!(
            ty,
            |T| T::into_data(Vec::new()),
            else if ty == ElementType::Bool {
                ColumnData::Bool(Vec::new())
            } else {
                ColumnData::Object(Vec::new())
            },
        )
    }

    /// Cast to `target` following the coercion rules in `ElementType`.
    fn cast(&self, target: ElementType) -> Result<ColumnData> {
        if self.dtype() == target {
            return Ok(self.clone());
        }
        match target {
            ElementType::Object => Ok(ColumnData::Object(
                (0..self.len()).map(|i| self.scalar_at(i)).collect(),
            )),
            ElementType::Bool => Ok(ColumnData::Bool(with_data!(
                self,
                |v| v.iter().map(|x| x.to_f64() != 0.0).collect(),
                bool |b| b.clone(),
                object |o| o.iter().map(Scalar::truthy).collect(),
            ))),
            _ => with_native!(
                target,
                |T| {
                    let out: Vec<T> = with_data!(
                        self,
                        |v| {
                            if !T::IS_FLOAT && v.iter().any(|x| !x.is_finite()) {
                                return Err(non_finite(target));
                            }
                            convert(v)
                        },
                        bool |b| b.iter().map(|x| T::from_i128(*x as i128)).collect(),
                        object |o| o.iter().map(scalar_to_native::<T>).collect::<Result<_>>()?,
                    );
                    Ok(T::into_data(out))
                },
                else unreachable!("bool and object targets are handled above"),
            ),
        }
    }
}

/// A homogeneously typed, fixed-length sequence of values.
#[derive(Clone)]
pub struct Column {
    data: Arc<ColumnData>,
}

impl Column {
    pub fn new(data: ColumnData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    /// Build a column from untyped values, inferring the element type.
    pub fn from_values(values: Vec<Scalar>) -> Self {
        let ty = ElementType::infer(&values);
        let object = ColumnData::Object(values);
        match object.cast(ty) {
            Ok(data) => Self::new(data),
            // Inference only picks types every value converts to.
            Err(_) => Self::new(object),
        }
    }

    /// Build a column of an explicit type from untyped values.
    pub fn from_values_typed(values: Vec<Scalar>, ty: ElementType) -> Result<Self> {
        Ok(Self::new(ColumnData::Object(values).cast(ty)?))
    }

    /// `len` copies of `value`, typed as the value would infer.
    pub fn filled(value: Scalar, len: usize) -> Self {
        Self::from_values(vec![value; len])
    }

    pub fn empty(ty: ElementType) -> Self {
        Self::new(ColumnData::empty(ty))
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Mutable access to the buffer; detaches it if shared.
    pub fn data_mut(&mut self) -> &mut ColumnData {
        Arc::make_mut(&mut self.data)
    }

    pub fn into_data(self) -> ColumnData {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Whether two handles share one buffer.
    pub fn shares_storage(&self, other: &Column) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// A copy that never shares storage with `self`.
    pub fn deep_copy(&self) -> Column {
        Self::new((*self.data).clone())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> ElementType {
        self.data.dtype()
    }

    /// Numeric in the user-facing sense: neither `Bool` nor `Object`.
    pub fn is_numeric(&self) -> bool {
        self.dtype().is_numeric()
    }

    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice_of(&self.data)
    }

    pub fn as_bools(&self) -> Option<&[bool]> {
        match &*self.data {
            ColumnData::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_objects(&self) -> Option<&[Scalar]> {
        match &*self.data {
            ColumnData::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn get(&self, idx: usize) -> Option<Scalar> {
        (idx < self.len()).then(|| self.data.scalar_at(idx))
    }

    pub(crate) fn scalar_at(&self, idx: usize) -> Scalar {
        self.data.scalar_at(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.len()).map(move |i| self.data.scalar_at(i))
    }

    pub fn to_vec(&self) -> Vec<Scalar> {
        self.iter().collect()
    }

    /// Cast to another element type.
    pub fn cast(&self, target: ElementType) -> Result<Column> {
        if self.dtype() == target {
            return Ok(self.clone());
        }
        Ok(Self::new(self.data.cast(target)?))
    }

    /// Cast by type name (`"int"`, `"float32"`, ...).
    pub fn to(&self, type_name: &str) -> Result<Column> {
        self.cast(ElementType::parse(type_name)?)
    }

    /// Pairs of elements from two columns, truncated to the shorter.
    pub fn zip<'a>(&'a self, other: &'a Column) -> impl Iterator<Item = (Scalar, Scalar)> + 'a {
        self.iter().zip(other.iter())
    }
}

impl PartialEq for Column {
    /// Elementwise value equality; the element types need not match and NaN
    /// equals NaN.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.loose_eq(&b))
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column<{}> {}", self.dtype(), self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SHOWN: usize = 5;
        let mut parts: Vec<String> = self.iter().take(SHOWN).map(|v| v.inspect()).collect();
        if self.len() > SHOWN {
            parts.push("...".into());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

impl<T: Element> From<Vec<T>> for Column {
    fn from(v: Vec<T>) -> Self {
        Column::new(T::into_data(v))
    }
}

impl From<Vec<bool>> for Column {
    fn from(v: Vec<bool>) -> Self {
        Column::new(ColumnData::Bool(v))
    }
}

impl From<Vec<Scalar>> for Column {
    fn from(v: Vec<Scalar>) -> Self {
        Column::from_values(v)
    }
}

impl From<Vec<String>> for Column {
    fn from(v: Vec<String>) -> Self {
        Column::new(ColumnData::Object(v.into_iter().map(Scalar::Str).collect()))
    }
}

impl From<Vec<&str>> for Column {
    fn from(v: Vec<&str>) -> Self {
        Column::new(ColumnData::Object(v.into_iter().map(Scalar::from).collect()))
    }
}

impl From<ColumnData> for Column {
    fn from(data: ColumnData) -> Self {
        Column::new(data)
    }
}

impl FromIterator<Scalar> for Column {
    fn from_iter<I: IntoIterator<Item = Scalar>>(iter: I) -> Self {
        Column::from_values(iter.into_iter().collect())
    }
}

/// Build a column from literal values, inferring the element type.
///
/// ```
/// use tabula_core::col;
/// let c = col![1, 2, 3];
/// assert_eq!(c.dtype(), tabula_core::types::ElementType::Int64);
/// ```
#[macro_export]
macro_rules! col {
    () => {
        $crate::column::Column::from_values(::std::vec::Vec::new())
    };
    ($($v:expr),+ $(,)?) => {
        $crate::column::Column::from_values(::std::vec![$($crate::types::Scalar::from($v)),+])
    };
}
