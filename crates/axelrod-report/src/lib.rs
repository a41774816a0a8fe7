//! Result records and exports for the Axelrod simulation.
//!
//! This crate contains pure data structures and file writers with no
//! simulation logic. It is a dependency for the engine crate, which fills
//! these types from its own state.

pub mod error;
pub mod grid;
pub mod record;
pub mod summary;

// Re-export error types
pub use error::ReportError;

// Re-export record types
pub use record::{FragmentRecord, RecordWriter};

// Re-export grid types
pub use grid::GridSnapshot;

// Re-export summary types
pub use summary::{generate_run_id, RunParameters, RunSummary};
