//! Rendering configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Controls how tables render as text and how previews are cut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Column blocks wrap once a line would exceed this many characters.
    pub max_width: usize,
    /// Tables with at least this many rows print only their edges.
    pub summary_threshold: usize,
    /// Rows shown at each edge of a summarized table.
    pub edge_rows: usize,
    pub min_column_width: usize,
    /// Spaces between adjacent columns.
    pub spacing: usize,
    /// Rows kept at each edge by `Table::preview`.
    pub preview_edge_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_width: 120,
            summary_threshold: 30,
            edge_rows: 5,
            min_column_width: 3,
            spacing: 2,
            preview_edge_rows: 4,
        }
    }
}

impl DisplayConfig {
    /// Parse overrides from JSON; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: DisplayConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 {
            return Err(Error::Config("max_width must be positive".into()));
        }
        if self.summary_threshold <= self.edge_rows * 2 {
            return Err(Error::Config(format!(
                "summary_threshold ({}) must exceed twice edge_rows ({})",
                self.summary_threshold, self.edge_rows
            )));
        }
        Ok(())
    }
}
