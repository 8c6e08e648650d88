//! Recoverable conditions raised while cleaning a table.
//!
//! None of these halt a run. The pipeline logs them and carries on with the
//! original or partially cleaned data; only I/O failures (reported through
//! `anyhow`) are fatal.

use thiserror::Error;

use crate::literal::LiteralError;

#[derive(Debug, Error, PartialEq)]
pub enum CleanError {
    /// One or more columns a stage depends on are absent from the table.
    #[error("{stage}: column(s) not found: {}", .columns.join(", "))]
    MissingColumn {
        stage: &'static str,
        columns: Vec<String>,
    },

    /// A description cell that does not hold a list literal.
    #[error("Row {row}: malformed description {value:?}: {source}")]
    MalformedDescription {
        row: usize,
        value: String,
        #[source]
        source: LiteralError,
    },
}

impl CleanError {
    pub fn missing_column(stage: &'static str, column: impl Into<String>) -> Self {
        CleanError::MissingColumn {
            stage,
            columns: vec![column.into()],
        }
    }
}
