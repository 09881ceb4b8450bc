//! Element types, boxed scalar values, and the coercion rules between them.
//!
//! `ElementType::promote` is the single promotion table used by every
//! operator; `ElementType::parse` owns the type-name mapping.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Object,
}

/// Type names accepted by `ElementType::parse`. Aliases map to the same type;
/// the first name for a type is the one reported by `ElementType::name`.
const TYPE_NAMES: &[(&str, ElementType)] = &[
    ("bool", ElementType::Bool),
    ("int8", ElementType::Int8),
    ("int16", ElementType::Int16),
    ("int32", ElementType::Int32),
    ("int", ElementType::Int64),
    ("int64", ElementType::Int64),
    ("uint8", ElementType::UInt8),
    ("uint16", ElementType::UInt16),
    ("uint32", ElementType::UInt32),
    ("uint", ElementType::UInt64),
    ("uint64", ElementType::UInt64),
    ("float32", ElementType::Float32),
    ("float", ElementType::Float64),
    ("float64", ElementType::Float64),
    ("object", ElementType::Object),
];

impl ElementType {
    /// Parse a type name such as `"int"`, `"uint16"` or `"float32"`.
    pub fn parse(name: &str) -> Result<Self> {
        TYPE_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, t)| *t)
            .ok_or_else(|| Error::Config(format!("invalid type: {name}")))
    }

    pub fn name(self) -> &'static str {
        TYPE_NAMES
            .iter()
            .find(|(_, t)| *t == self)
            .map(|(n, _)| *n)
            .unwrap_or("object")
    }

    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            ElementType::Int8 | ElementType::Int16 | ElementType::Int32 | ElementType::Int64
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            ElementType::UInt8 | ElementType::UInt16 | ElementType::UInt32 | ElementType::UInt64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, ElementType::Float32 | ElementType::Float64)
    }

    /// Numeric in the user-facing sense: excludes `Bool` and `Object`.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Storage width in bits for fixed-width types.
    fn bits(self) -> u32 {
        match self {
            ElementType::Bool => 1,
            ElementType::Int8 | ElementType::UInt8 => 8,
            ElementType::Int16 | ElementType::UInt16 => 16,
            ElementType::Int32 | ElementType::UInt32 | ElementType::Float32 => 32,
            ElementType::Int64 | ElementType::UInt64 | ElementType::Float64 => 64,
            ElementType::Object => 0,
        }
    }

    fn signed_with_bits(bits: u32) -> Self {
        match bits {
            0..=8 => ElementType::Int8,
            9..=16 => ElementType::Int16,
            17..=32 => ElementType::Int32,
            _ => ElementType::Int64,
        }
    }

    /// The result type of an arithmetic operation between `self` and `other`.
    ///
    /// - `Object` on either side → `Object`
    /// - `Bool` with a numeric type → that type; `Bool` with `Bool` → `Int64`
    /// - integers of the same signedness → the wider
    /// - signed with unsigned → narrowest signed type holding both
    ///   (`Float64` once `UInt64` is involved)
    /// - floats → `Float32` only when both sides fit in 16 bits or are `Float32`
    pub fn promote(self, other: ElementType) -> ElementType {
        use ElementType::*;
        match (self, other) {
            (Object, _) | (_, Object) => Object,
            (Bool, Bool) => Int64,
            (Bool, t) | (t, Bool) => t,
            (a, b) if a.is_float() || b.is_float() => {
                let fits_f32 = |t: ElementType| t == Float32 || (t.is_integer() && t.bits() <= 16);
                if fits_f32(a) && fits_f32(b) {
                    Float32
                } else {
                    Float64
                }
            }
            (a, b) if a.is_signed() == b.is_signed() => {
                if a.bits() >= b.bits() {
                    a
                } else {
                    b
                }
            }
            (a, b) => {
                let (signed, unsigned) = if a.is_signed() { (a, b) } else { (b, a) };
                if unsigned == UInt64 {
                    Float64
                } else {
                    Self::signed_with_bits(signed.bits().max(unsigned.bits() * 2))
                }
            }
        }
    }

    /// The result type of a logical/bitwise operation (`& | ^`).
    pub fn promote_bitwise(self, other: ElementType) -> ElementType {
        match (self, other) {
            (ElementType::Bool, ElementType::Bool) => ElementType::Bool,
            (a, b) => a.promote(b),
        }
    }

    /// Type a scalar operand takes when broadcast against a column of `self`.
    pub fn adapt_scalar(self, scalar: &Scalar) -> ElementType {
        match scalar {
            Scalar::Int(_) | Scalar::UInt(_) if self.is_numeric() => self,
            Scalar::Int(_) => ElementType::Int64,
            Scalar::UInt(_) => ElementType::UInt64,
            Scalar::Float(_) if self.is_float() => self,
            Scalar::Float(_) => ElementType::Float64,
            Scalar::Bool(_) => ElementType::Bool,
            Scalar::Null | Scalar::Str(_) => ElementType::Object,
        }
    }

    /// Infer the narrowest default type for a sequence of untyped values.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Scalar>) -> ElementType {
        let mut all_int = true;
        let mut needs_u64 = false;
        let mut any_negative = false;
        let mut all_numeric = true;
        let mut all_bool = true;
        let mut any = false;
        for v in values {
            any = true;
            match v {
                Scalar::Int(i) => {
                    all_bool = false;
                    any_negative |= *i < 0;
                }
                Scalar::UInt(u) => {
                    all_bool = false;
                    if *u > i64::MAX as u64 {
                        needs_u64 = true;
                    }
                }
                Scalar::Float(_) | Scalar::Null => {
                    all_int = false;
                    all_bool = false;
                }
                Scalar::Bool(_) => {
                    all_int = false;
                    all_numeric = false;
                }
                Scalar::Str(_) => return ElementType::Object,
            }
            if !all_numeric && !all_bool {
                return ElementType::Object;
            }
        }
        if !any || all_int {
            if needs_u64 && any_negative {
                ElementType::Float64
            } else if needs_u64 {
                ElementType::UInt64
            } else {
                ElementType::Int64
            }
        } else if all_numeric {
            ElementType::Float64
        } else if all_bool {
            ElementType::Bool
        } else {
            ElementType::Object
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single boxed element. `Object` columns store these directly; every other
/// column type converts to and from them at the element boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Null, or a float NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Scalar::Int(i) => Some(*i as f64),
            Scalar::UInt(u) => Some(*u as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Null | Scalar::Str(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Truthiness used when casting to `Bool`: null, false, zero and the empty
    /// string are false.
    pub fn truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Bool(b) => *b,
            Scalar::Int(i) => *i != 0,
            Scalar::UInt(u) => *u != 0,
            Scalar::Float(f) => *f != 0.0,
            Scalar::Str(s) => !s.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) | Scalar::UInt(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Str(_) => "string",
        }
    }

    /// Numeric equality across integer/float variants; NaN equals NaN.
    pub fn loose_eq(&self, other: &Scalar) -> bool {
        use Scalar::*;
        match (self, other) {
            (Null, Null) => true,
            (Null, _) | (_, Null) => false,
            (Bool(a), Bool(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (UInt(a), UInt(b)) => a == b,
            (Int(a), UInt(b)) | (UInt(b), Int(a)) => u64::try_from(*a).map_or(false, |a| a == *b),
            (Float(a), Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Float(f), Int(i)) | (Int(i), Float(f)) => *f == *i as f64,
            (Float(f), UInt(u)) | (UInt(u), Float(f)) => *f == *u as f64,
            _ => false,
        }
    }

    /// Natural ordering between comparable values; `None` for mixed kinds
    /// (string vs number, anything vs null) and for NaN.
    pub fn partial_cmp_value(&self, other: &Scalar) -> Option<Ordering> {
        use Scalar::*;
        match (self, other) {
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Str(a), Str(b)) => Some(a.cmp(b)),
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (UInt(a), UInt(b)) => Some(a.cmp(b)),
            (Int(a), UInt(b)) => Some(if *a < 0 { Ordering::Less } else { (*a as u64).cmp(b) }),
            (UInt(a), Int(b)) => Some(if *b < 0 { Ordering::Greater } else { a.cmp(&(*b as u64)) }),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) if !matches!(a, Bool(_)) && !matches!(b, Bool(_)) => {
                    x.partial_cmp(&y)
                }
                _ => None,
            },
        }
    }

    /// Total order used for sorting mixed `Object` columns:
    /// null < bool < numbers (NaN last among numbers) < strings.
    pub fn total_cmp(&self, other: &Scalar) -> Ordering {
        use Scalar::*;
        match (self, other) {
            (Float(a), Float(b)) => a.is_nan().cmp(&b.is_nan()).then(a.total_cmp(b)),
            (Float(a), Int(_) | UInt(_)) if a.is_nan() => Ordering::Greater,
            (Int(_) | UInt(_), Float(b)) if b.is_nan() => Ordering::Less,
            _ => match self.partial_cmp_value(other) {
                Some(ord) => ord,
                None => scalar_type_order(self).cmp(&scalar_type_order(other)),
            },
        }
    }

    /// Hashable key with the same equality as grouping and join matching.
    pub fn key(&self) -> ScalarKey {
        ScalarKey::from(self)
    }
}

/// Get type order for scalar (for mixed-type comparisons).
fn scalar_type_order(s: &Scalar) -> u8 {
    match s {
        Scalar::Null => 0,
        Scalar::Bool(_) => 1,
        Scalar::Int(_) | Scalar::UInt(_) | Scalar::Float(_) => 2,
        Scalar::Str(_) => 3,
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.loose_eq(other)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::UInt(u) => write!(f, "{u}"),
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl Scalar {
    /// Literal-style rendering: strings quoted, null spelled out.
    pub fn inspect(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Str(s) => format!("{s:?}"),
            other => other.to_string(),
        }
    }
}

macro_rules! scalar_from {
    ($($t:ty => $variant:ident as $as:ty),* $(,)?) => {
        $(
            impl From<$t> for Scalar {
                fn from(v: $t) -> Self {
                    Scalar::$variant(v as $as)
                }
            }
        )*
    };
}

scalar_from!(
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    f32 => Float as f64,
    f64 => Float as f64,
);

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Null, Into::into)
    }
}

/// Hashable projection of a `Scalar`.
///
/// Unsigned values that fit in `i64` hash as signed; all NaNs are one key and
/// `-0.0` equals `0.0`. Integers and floats stay distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    Str(String),
}

impl From<&Scalar> for ScalarKey {
    fn from(s: &Scalar) -> Self {
        match s {
            Scalar::Null => ScalarKey::Null,
            Scalar::Bool(b) => ScalarKey::Bool(*b),
            Scalar::Int(i) => ScalarKey::Int(*i),
            Scalar::UInt(u) => match i64::try_from(*u) {
                Ok(i) => ScalarKey::Int(i),
                Err(_) => ScalarKey::UInt(*u),
            },
            Scalar::Float(f) => {
                let bits = if f.is_nan() {
                    f64::NAN.to_bits()
                } else if *f == 0.0 {
                    0.0f64.to_bits()
                } else {
                    f.to_bits()
                };
                ScalarKey::Float(bits)
            }
            Scalar::Str(s) => ScalarKey::Str(s.clone()),
        }
    }
}

impl From<ScalarKey> for Scalar {
    fn from(k: ScalarKey) -> Self {
        match k {
            ScalarKey::Null => Scalar::Null,
            ScalarKey::Bool(b) => Scalar::Bool(b),
            ScalarKey::Int(i) => Scalar::Int(i),
            ScalarKey::UInt(u) => Scalar::UInt(u),
            ScalarKey::Float(bits) => Scalar::Float(f64::from_bits(bits)),
            ScalarKey::Str(s) => Scalar::Str(s),
        }
    }
}
