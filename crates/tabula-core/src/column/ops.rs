//! Elementwise operators with broadcasting.
//!
//! Both sides are brought to the promoted type, then a native kernel runs over
//! the aligned buffers. `Object` operands fall back to per-element dynamic
//! dispatch on the boxed values.

use std::cmp::Ordering;

use super::{with_native, Column, Element};
use crate::error::{Error, Result};
use crate::types::{ElementType, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
        }
    }

    fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
        }
    }

    fn test<T: PartialOrd>(self, a: &T, b: &T) -> bool {
        match self {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
        }
    }

    fn accepts(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord == Ordering::Equal,
            CmpOp::Ne => ord != Ordering::Equal,
            CmpOp::Gt => ord == Ordering::Greater,
            CmpOp::Ge => ord != Ordering::Less,
            CmpOp::Lt => ord == Ordering::Less,
            CmpOp::Le => ord != Ordering::Greater,
        }
    }
}

/// Right-hand side of an elementwise operation.
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// Broadcast to every element.
    Scalar(Scalar),
    Column(&'a Column),
    /// A plain sequence; must match the column length.
    Values(Vec<Scalar>),
}

impl<'a> From<&'a Column> for Operand<'a> {
    fn from(c: &'a Column) -> Self {
        Operand::Column(c)
    }
}

impl From<Vec<Scalar>> for Operand<'_> {
    fn from(v: Vec<Scalar>) -> Self {
        Operand::Values(v)
    }
}

macro_rules! operand_from_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Operand<'_> {
                fn from(v: $t) -> Self {
                    Operand::Scalar(Scalar::from(v))
                }
            }
        )*
    };
}

operand_from_scalar!(Scalar, bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String);

impl Column {
    /// Materialize an operand as a column aligned with `self`.
    pub(crate) fn align(&self, rhs: Operand<'_>) -> Result<Column> {
        match rhs {
            Operand::Scalar(s) => {
                let ty = self.dtype().adapt_scalar(&s);
                Column::from_values_typed(vec![s; self.len()], ty)
            }
            Operand::Column(c) => {
                if c.len() != self.len() {
                    return Err(Error::size_mismatch(self.len(), c.len()));
                }
                Ok(c.clone())
            }
            Operand::Values(v) => {
                if v.len() != self.len() {
                    return Err(Error::size_mismatch(self.len(), v.len()));
                }
                Ok(Column::from_values(v))
            }
        }
    }

    /// Apply an arithmetic or bitwise operator elementwise.
    pub fn binary<'a>(&self, op: BinaryOp, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        let rhs = self.align(rhs.into())?;
        let target = if op.is_bitwise() {
            self.dtype().promote_bitwise(rhs.dtype())
        } else {
            self.dtype().promote(rhs.dtype())
        };
        match target {
            ElementType::Object => object_arith(self, &rhs, op),
            ElementType::Bool => {
                let (a, b) = (self.cast(target)?, rhs.cast(target)?);
                let (Some(x), Some(y)) = (a.as_bools(), b.as_bools()) else {
                    return Err(Error::Invariant("bool operands lost their type".into()));
                };
                let out = x
                    .iter()
                    .zip(y)
                    .map(|(&p, &q)| match op {
                        BinaryOp::BitAnd => p & q,
                        BinaryOp::BitOr => p | q,
                        _ => p ^ q,
                    })
                    .collect::<Vec<bool>>();
                Ok(Column::from(out))
            }
            _ => {
                let (a, b) = (self.cast(target)?, rhs.cast(target)?);
                with_native!(
                    target,
                    |T| {
                        let (Some(x), Some(y)) = (a.as_slice::<T>(), b.as_slice::<T>()) else {
                            return Err(Error::Invariant(format!(
                                "operands were not cast to {target}"
                            )));
                        };
                        Ok(Column::from(native_arith(x, y, op)?))
                    },
                    else unreachable!("bool and object are dispatched above"),
                )
            }
        }
    }

    pub fn add<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.binary(BinaryOp::Add, rhs)
    }

    pub fn sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.binary(BinaryOp::Sub, rhs)
    }

    pub fn mul<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.binary(BinaryOp::Mul, rhs)
    }

    /// Truncating division for integers, IEEE division for floats.
    pub fn div<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.binary(BinaryOp::Div, rhs)
    }

    /// Floored modulo.
    pub fn rem<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.binary(BinaryOp::Rem, rhs)
    }

    pub fn pow<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.binary(BinaryOp::Pow, rhs)
    }

    pub fn bitand<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.binary(BinaryOp::BitAnd, rhs)
    }

    pub fn bitor<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.binary(BinaryOp::BitOr, rhs)
    }

    pub fn bitxor<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.binary(BinaryOp::BitXor, rhs)
    }

    fn compare<'a>(&self, op: CmpOp, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        let rhs = self.align(rhs.into())?;
        let (lt, rt) = (self.dtype(), rhs.dtype());
        let target = if lt == ElementType::Bool && rt == ElementType::Bool {
            ElementType::Bool
        } else {
            lt.promote(rt)
        };
        let out: Vec<bool> = match target {
            ElementType::Object => self
                .iter()
                .zip(rhs.iter())
                .map(|(a, b)| match op {
                    CmpOp::Eq => Ok(a.loose_eq(&b)),
                    CmpOp::Ne => Ok(!a.loose_eq(&b)),
                    _ => a.partial_cmp_value(&b).map(|ord| op.accepts(ord)).ok_or_else(|| {
                        Error::Type(format!(
                            "comparison of {} {} {} failed",
                            a.type_name(),
                            op.symbol(),
                            b.type_name()
                        ))
                    }),
                })
                .collect::<Result<_>>()?,
            ElementType::Bool => match (self.as_bools(), rhs.as_bools()) {
                (Some(x), Some(y)) => x.iter().zip(y).map(|(a, b)| op.test(a, b)).collect(),
                _ => return Err(Error::Invariant("bool operands lost their type".into())),
            },
            _ => {
                let (a, b) = (self.cast(target)?, rhs.cast(target)?);
                with_native!(
                    target,
                    |T| match (a.as_slice::<T>(), b.as_slice::<T>()) {
                        (Some(x), Some(y)) => x.iter().zip(y).map(|(p, q)| op.test(p, q)).collect(),
                        _ => {
                            return Err(Error::Invariant(format!(
                                "operands were not cast to {target}"
                            )))
                        }
                    },
                    else unreachable!("bool and object are dispatched above"),
                )
            }
        };
        Ok(Column::from(out))
    }

    /// Elementwise `==`; always a `Bool` column.
    pub fn equal<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.compare(CmpOp::Eq, rhs)
    }

    pub fn not_equal<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.compare(CmpOp::Ne, rhs)
    }

    pub fn gt<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.compare(CmpOp::Gt, rhs)
    }

    pub fn ge<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.compare(CmpOp::Ge, rhs)
    }

    pub fn lt<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.compare(CmpOp::Lt, rhs)
    }

    pub fn le<'a>(&self, rhs: impl Into<Operand<'a>>) -> Result<Column> {
        self.compare(CmpOp::Le, rhs)
    }

    /// `self * -1`.
    pub fn neg(&self) -> Result<Column> {
        self.mul(-1i64)
    }

    /// Logical not; only defined for `Bool` columns.
    pub fn not(&self) -> Result<Column> {
        match self.as_bools() {
            Some(b) => Ok(Column::from(b.iter().map(|x| !x).collect::<Vec<bool>>())),
            None => Err(Error::Type(format!("no operation ! for {}", self.dtype()))),
        }
    }

    pub fn abs(&self) -> Result<Column> {
        let ty = self.dtype();
        with_native!(
            ty,
            |T| {
                let x = self.as_slice::<T>().unwrap_or_default();
                Ok(Column::from(x.iter().map(|v| v.abs()).collect::<Vec<T>>()))
            },
            else Err(Error::Type(format!("no operation abs for {ty}"))),
        )
    }
}

fn native_arith<T: Element>(x: &[T], y: &[T], op: BinaryOp) -> Result<Vec<T>> {
    x.iter()
        .zip(y)
        .map(|(&a, &b)| match op {
            BinaryOp::Add => Ok(a.add(b)),
            BinaryOp::Sub => Ok(a.sub(b)),
            BinaryOp::Mul => Ok(a.mul(b)),
            BinaryOp::Div => a.div(b),
            BinaryOp::Rem => a.rem(b),
            BinaryOp::Pow => Ok(a.pow(b)),
            BinaryOp::BitAnd => a.bitand(b),
            BinaryOp::BitOr => a.bitor(b),
            BinaryOp::BitXor => a.bitxor(b),
        })
        .collect()
}

fn object_arith(lhs: &Column, rhs: &Column, op: BinaryOp) -> Result<Column> {
    let out = lhs
        .iter()
        .zip(rhs.iter())
        .map(|(a, b)| scalar_binary(&a, &b, op))
        .collect::<Result<Vec<Scalar>>>()?;
    // Results are re-inferred: `["a"] * 2` stays object, `[1] + 1` becomes int.
    Ok(Column::from_values(out))
}

fn undefined(op: BinaryOp, a: &Scalar, b: &Scalar) -> Error {
    Error::Type(format!(
        "undefined operation {} for {} and {}",
        op.symbol(),
        a.type_name(),
        b.type_name()
    ))
}

fn apply<T: Element>(a: T, b: T, op: BinaryOp) -> Result<T> {
    Ok(native_arith(&[a], &[b], op)?[0])
}

fn repeat_too_long(n: impl std::fmt::Display) -> Error {
    Error::Range(format!("string repeated {n} times is too long"))
}

/// `s` repeated `n` times; the result must fit in a `String`.
fn repeat(s: &str, n: usize) -> Result<Scalar> {
    match s.len().checked_mul(n) {
        Some(len) if isize::try_from(len).is_ok() => Ok(Scalar::Str(s.repeat(n))),
        _ => Err(repeat_too_long(n)),
    }
}

/// Dynamic dispatch on two boxed values.
pub(super) fn scalar_binary(a: &Scalar, b: &Scalar, op: BinaryOp) -> Result<Scalar> {
    use Scalar::*;
    match (a, b) {
        (Str(x), Str(y)) if op == BinaryOp::Add => Ok(Str(format!("{x}{y}"))),
        (Str(x), Int(n)) if op == BinaryOp::Mul => {
            let n = usize::try_from(*n).map_err(|_| Error::Range("negative argument".into()))?;
            repeat(x, n)
        }
        (Str(x), UInt(n)) if op == BinaryOp::Mul => {
            let n = usize::try_from(*n).map_err(|_| repeat_too_long(*n))?;
            repeat(x, n)
        }
        (Bool(x), Bool(y)) if op.is_bitwise() => Ok(Bool(match op {
            BinaryOp::BitAnd => x & y,
            BinaryOp::BitOr => x | y,
            _ => x ^ y,
        })),
        (Int(x), Int(y)) => Ok(Int(apply(*x, *y, op)?)),
        (UInt(x), UInt(y)) => Ok(UInt(apply(*x, *y, op)?)),
        (Int(_) | UInt(_), Int(_) | UInt(_)) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => Ok(Int(apply(x, y, op)?)),
            _ => Ok(Float(apply(a.as_f64().unwrap_or(f64::NAN), b.as_f64().unwrap_or(f64::NAN), op)?)),
        },
        (Float(_), Int(_) | UInt(_) | Float(_)) | (Int(_) | UInt(_), Float(_)) => {
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => Ok(Float(apply(x, y, op)?)),
                _ => Err(undefined(op, a, b)),
            }
        }
        _ => Err(undefined(op, a, b)),
    }
}
