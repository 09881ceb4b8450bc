//! Common imports: `use tabula_core::prelude::*;`

pub use crate::column::{BinaryOp, Column, ColumnData, Operand};
pub use crate::config::DisplayConfig;
pub use crate::error::{Error, Result};
pub use crate::table::{ColumnInput, Row, Selector, SortKey, Table, TypeOverrides};
pub use crate::types::{ElementType, Scalar, ScalarKey};
pub use crate::{col, table};
