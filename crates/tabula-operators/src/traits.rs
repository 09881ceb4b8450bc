//! Operator errors and the `TableExt` entry points.
//!
//! Grouping and joins are exposed as an extension trait on
//! `tabula_core::table::Table`, so `use tabula_operators::TableExt;` is enough
//! to write `table.group(["b"])?.count()?` or `left.inner_join(&right, "a")?`.

use tabula_core::error::Error as CoreError;
use tabula_core::table::Table;

use thiserror::Error;

use crate::group::Group;
use crate::join::hash::{HashJoin, JoinOn, JoinType};

#[derive(Debug, Error)]
pub enum OpError {
    /// An aggregate or join specification could not be understood.
    #[error("planning error: {0}")]
    Plan(String),

    /// Key columns are absent or no keys were given.
    #[error("schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl OpError {
    /// Add context to an error, creating an error chain.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        match self {
            OpError::Plan(msg) => OpError::Plan(format!("{}: {}", ctx, msg)),
            OpError::Schema(msg) => OpError::Schema(format!("{}: {}", ctx, msg)),
            OpError::Core(e) => OpError::Core(e.with_context(ctx)),
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            OpError::Schema(msg) => {
                if msg.contains("missing keys") {
                    vec![
                        "Check that the key columns are spelled correctly".into(),
                        "Verify the key columns exist on both tables".into(),
                    ]
                } else if msg.contains("no keys") {
                    vec!["Pass the join columns explicitly when the tables share no names".into()]
                } else {
                    vec![]
                }
            }
            OpError::Plan(msg) if msg.contains("agg") => {
                vec!["Use count, or <agg>:<column> with max, min, mean, median, sum, std, var, or percentile:<column>:<q>".into()]
            }
            OpError::Core(e) => e.suggestions(),
            _ => vec![],
        }
    }
}

/// Grouping and join operations on tables.
pub trait TableExt {
    /// Start a grouping on one or more key columns.
    fn group<I, S>(&self, columns: I) -> Result<Group<'_>, OpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    fn join(&self, other: &Table, how: JoinType, on: impl Into<JoinOn>) -> Result<Table, OpError>;

    /// Rows with a match on both sides.
    fn inner_join(&self, other: &Table, on: impl Into<JoinOn>) -> Result<Table, OpError> {
        self.join(other, JoinType::Inner, on)
    }

    /// Every left row; unmatched rows get null right-only columns.
    fn left_join(&self, other: &Table, on: impl Into<JoinOn>) -> Result<Table, OpError> {
        self.join(other, JoinType::Left, on)
    }
}

impl TableExt for Table {
    fn group<I, S>(&self, columns: I) -> Result<Group<'_>, OpError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Group::new(self, columns)
    }

    fn join(&self, other: &Table, how: JoinType, on: impl Into<JoinOn>) -> Result<Table, OpError> {
        HashJoin {
            on: on.into(),
            join_type: how,
        }
        .execute(self, other)
    }
}
