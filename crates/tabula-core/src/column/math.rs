//! Rounding and transcendental functions. `Float32` columns stay `Float32`;
//! every other numeric or bool column is computed in `Float64`.

use super::{Column, ColumnData, Operand};
use crate::error::{Error, Result};
use crate::types::ElementType;

macro_rules! unary_math {
    ($($(#[$doc:meta])* $name:ident => $f64fn:expr, $f32fn:expr;)*) => {
        impl Column {
            $(
                $(#[$doc])*
                pub fn $name(&self) -> Result<Column> {
                    self.float_map(stringify!($name), $f64fn, $f32fn)
                }
            )*
        }
    };
}

unary_math! {
    sqrt => f64::sqrt, f32::sqrt;
    cbrt => libm::cbrt, libm::cbrtf;
    sin => f64::sin, f32::sin;
    cos => f64::cos, f32::cos;
    tan => f64::tan, f32::tan;
    asin => f64::asin, f32::asin;
    acos => f64::acos, f32::acos;
    atan => f64::atan, f32::atan;
    sinh => f64::sinh, f32::sinh;
    cosh => f64::cosh, f32::cosh;
    tanh => f64::tanh, f32::tanh;
    asinh => f64::asinh, f32::asinh;
    acosh => f64::acosh, f32::acosh;
    atanh => f64::atanh, f32::atanh;
    /// Natural logarithm.
    ln => f64::ln, f32::ln;
    log10 => f64::log10, f32::log10;
    log2 => f64::log2, f32::log2;
    exp => f64::exp, f32::exp;
    exp2 => f64::exp2, f32::exp2;
    erf => libm::erf, libm::erff;
    erfc => libm::erfc, libm::erfcf;
}

fn round_with(x: f64, digits: i32, f: fn(f64) -> f64) -> f64 {
    match digits {
        0 => f(x),
        d if d > 0 => {
            let p = 10f64.powi(d);
            f(x * p) / p
        }
        d => {
            let p = 10f64.powi(-d);
            f(x / p) * p
        }
    }
}

impl Column {
    fn float_map(
        &self,
        name: &str,
        f: impl Fn(f64) -> f64,
        g: impl Fn(f32) -> f32,
    ) -> Result<Column> {
        match self.data() {
            ColumnData::Float32(v) => Ok(Column::from(v.iter().map(|x| g(*x)).collect::<Vec<f32>>())),
            ColumnData::Object(_) => Err(Error::Type(format!("no operation {name} for object"))),
            _ => {
                let c = self.cast(ElementType::Float64)?;
                let v = c.as_slice::<f64>().unwrap_or_default();
                Ok(Column::from(v.iter().map(|x| f(*x)).collect::<Vec<f64>>()))
            }
        }
    }

    /// Float type for a two-argument function of `self` and `other`.
    fn float_pair(&self, other: &Column) -> ElementType {
        if self.dtype() == ElementType::Float32 && other.dtype() == ElementType::Float32 {
            ElementType::Float32
        } else {
            ElementType::Float64
        }
    }

    fn float_zip<'a>(
        &self,
        name: &str,
        other: impl Into<Operand<'a>>,
        f: impl Fn(f64, f64) -> f64,
        g: impl Fn(f32, f32) -> f32,
    ) -> Result<Column> {
        let other = self.align(other.into())?;
        if self.dtype() == ElementType::Object || other.dtype() == ElementType::Object {
            return Err(Error::Type(format!("no operation {name} for object")));
        }
        let a = self.cast(self.float_pair(&other))?;
        let b = other.cast(self.float_pair(&other))?;
        if let (Some(x), Some(y)) = (a.as_slice::<f32>(), b.as_slice::<f32>()) {
            return Ok(Column::from(x.iter().zip(y).map(|(p, q)| g(*p, *q)).collect::<Vec<f32>>()));
        }
        match (a.as_slice::<f64>(), b.as_slice::<f64>()) {
            (Some(x), Some(y)) => Ok(Column::from(
                x.iter().zip(y).map(|(p, q)| f(*p, *q)).collect::<Vec<f64>>(),
            )),
            _ => Err(Error::Invariant(format!("{name} operands were not cast to float"))),
        }
    }

    /// Round half away from zero to `digits` decimals; negative digits round
    /// to a power of ten.
    pub fn round(&self, digits: i32) -> Result<Column> {
        self.float_map(
            "round",
            |x| round_with(x, digits, f64::round),
            |x| round_with(x as f64, digits, f64::round) as f32,
        )
    }

    pub fn ceil(&self, digits: i32) -> Result<Column> {
        self.float_map(
            "ceil",
            |x| round_with(x, digits, f64::ceil),
            |x| round_with(x as f64, digits, f64::ceil) as f32,
        )
    }

    pub fn floor(&self, digits: i32) -> Result<Column> {
        self.float_map(
            "floor",
            |x| round_with(x, digits, f64::floor),
            |x| round_with(x as f64, digits, f64::floor) as f32,
        )
    }

    /// Logarithm in an arbitrary base.
    pub fn log(&self, base: f64) -> Result<Column> {
        let ln_base = base.ln();
        self.float_map("log", |x| x.ln() / ln_base, |x| ((x as f64).ln() / ln_base) as f32)
    }

    pub fn hypot<'a>(&self, other: impl Into<Operand<'a>>) -> Result<Column> {
        self.float_zip("hypot", other, f64::hypot, f32::hypot)
    }

    /// Split into mantissa (in `[0.5, 1)`) and `Int32` binary exponent.
    pub fn frexp(&self) -> Result<(Column, Column)> {
        match self.data() {
            ColumnData::Float32(v) => {
                let (m, e): (Vec<f32>, Vec<i32>) = v.iter().map(|x| libm::frexpf(*x)).unzip();
                Ok((Column::from(m), Column::from(e)))
            }
            ColumnData::Object(_) => Err(Error::Type("no operation frexp for object".into())),
            _ => {
                let c = self.cast(ElementType::Float64)?;
                let v = c.as_slice::<f64>().unwrap_or_default();
                let (m, e): (Vec<f64>, Vec<i32>) = v.iter().map(|x| libm::frexp(*x)).unzip();
                Ok((Column::from(m), Column::from(e)))
            }
        }
    }

    /// `self * 2^exponent`, elementwise.
    pub fn ldexp<'a>(&self, exponent: impl Into<Operand<'a>>) -> Result<Column> {
        let exponent = self.align(exponent.into())?.cast(ElementType::Int32)?;
        let e = exponent.as_slice::<i32>().unwrap_or_default();
        match self.data() {
            ColumnData::Float32(v) => Ok(Column::from(
                v.iter().zip(e).map(|(x, n)| libm::ldexpf(*x, *n)).collect::<Vec<f32>>(),
            )),
            ColumnData::Object(_) => Err(Error::Type("no operation ldexp for object".into())),
            _ => {
                let c = self.cast(ElementType::Float64)?;
                let v = c.as_slice::<f64>().unwrap_or_default();
                Ok(Column::from(
                    v.iter().zip(e).map(|(x, n)| libm::ldexp(*x, *n)).collect::<Vec<f64>>(),
                ))
            }
        }
    }
}
