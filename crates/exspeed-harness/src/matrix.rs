//! The depth × error-percent verdict grid.

use crate::classify::Verdict;
use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};

/// Accumulates verdict rows in sweep order.
#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    depths: Vec<u32>,
    error_percents: Vec<u32>,
    rows: Vec<Vec<Verdict>>,
}

impl MatrixBuilder {
    pub fn new(depths: Vec<u32>, error_percents: Vec<u32>) -> Self {
        let capacity = depths.len();
        Self {
            depths,
            error_percents,
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append the verdicts for the next depth, one per error percent.
    pub fn push_row(&mut self, row: Vec<Verdict>) -> Result<()> {
        if self.rows.len() == self.depths.len() {
            return Err(HarnessError::MatrixShape(format!(
                "all {} rows already recorded",
                self.depths.len()
            )));
        }
        if row.len() != self.error_percents.len() {
            return Err(HarnessError::MatrixShape(format!(
                "row for depth {} has {} verdicts, expected {}",
                self.depths[self.rows.len()],
                row.len(),
                self.error_percents.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Depth whose row is expected next.
    pub fn next_depth(&self) -> Option<u32> {
        self.depths.get(self.rows.len()).copied()
    }

    /// Freeze the matrix. Fails unless every row has been recorded.
    pub fn finish(self) -> Result<ResultMatrix> {
        if self.rows.len() != self.depths.len() {
            return Err(HarnessError::MatrixShape(format!(
                "{} of {} rows recorded",
                self.rows.len(),
                self.depths.len()
            )));
        }
        Ok(ResultMatrix {
            depths: self.depths,
            error_percents: self.error_percents,
            rows: self.rows,
        })
    }
}

/// Complete, immutable sweep result: one row per depth, one column per
/// error percent, both in sweep order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMatrix {
    depths: Vec<u32>,
    error_percents: Vec<u32>,
    rows: Vec<Vec<Verdict>>,
}

impl ResultMatrix {
    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    pub fn error_percents(&self) -> &[u32] {
        &self.error_percents
    }

    pub fn rows(&self) -> &[Vec<Verdict>] {
        &self.rows
    }

    pub fn get(&self, depth: u32, error_percent: u32) -> Option<Verdict> {
        let row = self.depths.iter().position(|d| *d == depth)?;
        let column = self.error_percents.iter().position(|p| *p == error_percent)?;
        Some(self.rows[row][column])
    }

    /// One string of verdict codes per depth.
    pub fn code_rows(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|v| v.code()).collect())
            .collect()
    }

    /// The compact grid: one line per depth, one character per error percent.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.code_rows() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// The grid with the error percents as a header and depths down the side.
    pub fn render_labeled(&self) -> String {
        let label_width = self
            .depths
            .iter()
            .map(|d| d.to_string().len())
            .max()
            .unwrap_or(1)
            .max("depth".len());
        let column_width = self
            .error_percents
            .iter()
            .map(|p| format!("{}%", p).len())
            .max()
            .unwrap_or(1);

        let mut out = format!("{:>label_width$}", "depth");
        for percent in &self.error_percents {
            out.push_str(&format!(" {:>column_width$}", format!("{}%", percent)));
        }
        out.push('\n');
        for (depth, row) in self.depths.iter().zip(&self.rows) {
            out.push_str(&format!("{:>label_width$}", depth));
            for verdict in row {
                out.push_str(&format!(" {:>column_width$}", verdict.code()));
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for ResultMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
