//! Text rendering and bounded previews of tables.

use std::fmt;

use crate::config::DisplayConfig;
use crate::table::Table;
use crate::types::Scalar;

impl Table {
    /// Render as right-aligned text columns.
    ///
    /// Columns are laid out left to right and wrap into a new block (separated
    /// by a blank line) once a line would pass `max_width`. Tables with at
    /// least `summary_threshold` rows show only `edge_rows` rows at each end
    /// around a `...` row.
    pub fn render(&self, cfg: &DisplayConfig) -> String {
        if self.shape().1 == 0 {
            return "Table (empty)".to_string();
        }
        let size = self.size();
        let summarize = size >= cfg.summary_threshold;
        let gap = " ".repeat(cfg.spacing);

        let mut lines: Vec<Vec<String>> = Vec::new();
        let mut block_start = 0;
        let mut block_width = 0;
        for (name, column) in self.columns() {
            let cells: Vec<String> = if summarize {
                let mut cells: Vec<String> =
                    column.first(cfg.edge_rows).iter().map(|v| cell(&v)).collect();
                cells.push("...".to_string());
                cells.extend(column.last(cfg.edge_rows).iter().map(|v| cell(&v)));
                cells
            } else {
                column.iter().map(|v| cell(&v)).collect()
            };
            let width = cells
                .iter()
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
                .max(cfg.min_column_width);

            if lines.is_empty() || block_width + width > cfg.max_width {
                block_start = lines.len();
                block_width = 0;
                // header, one line per cell, blank separator
                lines.resize(lines.len() + cells.len() + 2, Vec::new());
            }
            lines[block_start].push(format!("{name:>width$}"));
            for (i, c) in cells.iter().enumerate() {
                lines[block_start + 1 + i].push(format!("{c:>width$}"));
            }
            block_width += width + cfg.spacing;
        }
        lines.pop();
        lines
            .iter()
            .map(|l| l.join(&gap))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The first and last `preview_edge_rows` rows when the table is longer
    /// than that allows; otherwise the whole table.
    pub fn preview(&self, cfg: &DisplayConfig) -> Table {
        let size = self.size();
        let edge = cfg.preview_edge_rows;
        if size < edge * 2 {
            return self.clone();
        }
        let idx: Vec<usize> = (0..edge).chain(size - edge..size).collect();
        self.gather_rows(&idx)
    }
}

fn cell(value: &Scalar) -> String {
    value.to_string()
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&DisplayConfig::default()))
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table {:?}", self.shape())?;
        f.write_str(&self.render(&DisplayConfig::default()))
    }
}
