//! Fragment-Size Records
//!
//! Append-only delimited records of per-run fragment censuses.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ReportError;

/// One run's fragment-size census, ready for the results file.
///
/// Rendered as a single delimited line `F, Q, size_1, size_2, ...` so that
/// many runs can accumulate in the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRecord {
    /// Number of cultural features per agent
    pub f: usize,
    /// Number of trait values per feature
    pub q: u32,
    /// Fragment sizes in stable label order
    pub sizes: Vec<usize>,
}

impl FragmentRecord {
    /// Creates a new record from run parameters and fragment sizes.
    pub fn new(f: usize, q: u32, sizes: Vec<usize>) -> Self {
        Self { f, q, sizes }
    }

    /// Total number of agents covered by this record.
    pub fn total_agents(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Renders the record as one delimited line: `F, Q, size_1, size_2, ...`.
    pub fn to_delimited_line(&self) -> String {
        let mut line = format!("{}, {}", self.f, self.q);
        for size in &self.sizes {
            line.push_str(&format!(", {}", size));
        }
        line
    }

    /// Appends this record as one line to the results file at `path`.
    ///
    /// The file is created if it does not exist; existing lines are kept.
    pub fn append_to(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", self.to_delimited_line())?;
        Ok(())
    }
}

/// Writer that appends many runs' records to the same results file.
///
/// Keeps the file handle open across runs of a parameter sweep, buffering
/// writes and flushing on drop.
#[derive(Debug)]
pub struct RecordWriter {
    writer: Option<BufWriter<File>>,
    record_count: u64,
}

impl RecordWriter {
    /// Opens a writer appending to the results file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            record_count: 0,
        })
    }

    /// Creates a writer that discards records (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            record_count: 0,
        }
    }

    /// Appends one record as one line.
    pub fn write(&mut self, record: &FragmentRecord) -> Result<(), ReportError> {
        self.record_count += 1;
        if let Some(ref mut writer) = self.writer {
            writeln!(writer, "{}", record.to_delimited_line())?;
        }
        Ok(())
    }

    /// Number of records written so far.
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Flushes buffered records to disk.
    pub fn flush(&mut self) -> Result<(), ReportError> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for RecordWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Warning: Failed to flush record writer: {}", e);
        }
    }
}
