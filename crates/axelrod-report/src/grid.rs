//! Lattice Matrix Exports
//!
//! Row-major square matrices of per-agent values from lattice networks,
//! rendered as plain whitespace-separated text for external renderers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ReportError;

/// Square row-major matrix of per-agent cell values.
///
/// Cell `(row, col)` holds the value of agent `col + row * side`. Boolean
/// matrices (vaccination state) use 0/1 cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    /// Side length of the square lattice
    side: usize,
    /// Cell values in row-major order
    values: Vec<u32>,
}

impl GridSnapshot {
    /// Creates a snapshot from row-major values; `values` must hold
    /// `side * side` entries.
    pub fn new(side: usize, values: Vec<u32>) -> Self {
        debug_assert_eq!(
            values.len(),
            side * side,
            "values length must be side * side"
        );
        Self { side, values }
    }

    /// Side length of the square lattice.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Value at the given row and column.
    pub fn value_at(&self, row: usize, col: usize) -> u32 {
        self.values[col + row * self.side]
    }

    /// All cell values in row-major order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Renders the matrix as whitespace-separated rows, one row per line.
    ///
    /// The output loads cleanly with common numeric text readers.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for row in 0..self.side {
            let cells: Vec<String> = (0..self.side)
                .map(|col| self.value_at(row, col).to_string())
                .collect();
            text.push_str(&cells.join(" "));
            text.push('\n');
        }
        text
    }

    /// Writes the rendered matrix to a file at `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.to_text().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
