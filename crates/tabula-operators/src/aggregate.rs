//! Aggregate specifications applied per group.

use tabula_core::column::Column;
use tabula_core::types::Scalar;

use crate::traits::OpError;

/// Aggregation function specification.
#[derive(Debug, Clone, PartialEq)]
pub enum AggFunc {
    Count,
    Max { column: String },
    Min { column: String },
    Mean { column: String },
    Median { column: String },
    Percentile { column: String, q: f64 },
    Sum { column: String },
    Std { column: String },
    Var { column: String },
}

impl AggFunc {
    /// Parse from string like "count", "sum:sales", "percentile:price:90".
    pub fn parse(s: &str) -> Result<Self, OpError> {
        if s == "count" {
            return Ok(AggFunc::Count);
        }
        let Some((func, rest)) = s.split_once(':') else {
            return Err(OpError::Plan(format!("invalid agg spec: {}", s)));
        };
        let column = rest.to_string();
        match func {
            "max" => Ok(AggFunc::Max { column }),
            "min" => Ok(AggFunc::Min { column }),
            "mean" => Ok(AggFunc::Mean { column }),
            "median" => Ok(AggFunc::Median { column }),
            "sum" => Ok(AggFunc::Sum { column }),
            "std" => Ok(AggFunc::Std { column }),
            "var" => Ok(AggFunc::Var { column }),
            "percentile" => {
                let (column, q) = rest
                    .rsplit_once(':')
                    .ok_or_else(|| OpError::Plan(format!("percentile needs a value: {}", s)))?;
                let q = q
                    .parse::<f64>()
                    .map_err(|_| OpError::Plan(format!("invalid percentile in agg spec: {}", s)))?;
                Ok(AggFunc::Percentile {
                    column: column.to_string(),
                    q,
                })
            }
            _ => Err(OpError::Plan(format!("unknown agg function: {}", func))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AggFunc::Count => "count",
            AggFunc::Max { .. } => "max",
            AggFunc::Min { .. } => "min",
            AggFunc::Mean { .. } => "mean",
            AggFunc::Median { .. } => "median",
            AggFunc::Percentile { .. } => "percentile",
            AggFunc::Sum { .. } => "sum",
            AggFunc::Std { .. } => "std",
            AggFunc::Var { .. } => "var",
        }
    }

    /// Input column, if the aggregate reads one.
    pub fn column(&self) -> Option<&str> {
        match self {
            AggFunc::Count => None,
            AggFunc::Max { column }
            | AggFunc::Min { column }
            | AggFunc::Mean { column }
            | AggFunc::Median { column }
            | AggFunc::Percentile { column, .. }
            | AggFunc::Sum { column }
            | AggFunc::Std { column }
            | AggFunc::Var { column } => Some(column),
        }
    }

    /// Output column name: `count`, or `<agg>_<column>`.
    pub fn output_name(&self) -> String {
        match self.column() {
            Some(column) => format!("{}_{}", self.name(), column),
            None => self.name().to_string(),
        }
    }

    /// Reduce one group's slice of the input column.
    pub(crate) fn reduce(&self, rows: usize, values: Option<&Column>) -> Result<Scalar, OpError> {
        let Some(values) = values else {
            return Ok(Scalar::Int(rows as i64));
        };
        let value = match self {
            AggFunc::Count => Scalar::Int(rows as i64),
            AggFunc::Max { .. } => values.max()?,
            AggFunc::Min { .. } => values.min()?,
            AggFunc::Sum { .. } => values.sum()?,
            AggFunc::Mean { .. } => Scalar::Float(values.mean()?),
            AggFunc::Median { .. } => Scalar::Float(values.median()?),
            AggFunc::Percentile { q, .. } => Scalar::Float(values.percentile(*q)?),
            AggFunc::Std { .. } => Scalar::Float(values.std()?),
            AggFunc::Var { .. } => Scalar::Float(values.var()?),
        };
        Ok(value)
    }
}
