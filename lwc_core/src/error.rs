//! Errors raised while reading the collection table.

use std::{io, path::PathBuf};

/// The input cannot be read at all.
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("input file {} not found: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to read the header row: {0}")]
    Header(#[from] csv::Error),
    #[error("missing column {column:?}, available keys: {found:?}")]
    MissingColumn {
        column: &'static str,
        found: Vec<String>,
    },
}

/// A single row could not be turned into a collection record.
#[derive(thiserror::Error, Debug)]
pub enum RowError {
    #[error("row {row}: no commune")]
    MissingCommune { row: u64 },
    #[error("row {row}: invalid date {value:?}: {source}")]
    InvalidDate {
        row: u64,
        value: String,
        source: chrono::ParseError,
    },
    #[error("row {row}: malformed row: {source}")]
    Malformed { row: u64, source: csv::Error },
    #[error("the input stream failed: {0}")]
    Io(csv::Error),
}

impl RowError {
    /// Whether the rest of the input is unreadable, as opposed to this row only.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// The data row, counted from 1 after the header.
    pub fn row(&self) -> Option<u64> {
        match self {
            Self::MissingCommune { row }
            | Self::InvalidDate { row, .. }
            | Self::Malformed { row, .. } => Some(*row),
            Self::Io(_) => None,
        }
    }
}

impl From<csv::Error> for RowError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return Self::Io(error);
        }
        let row = error.position().map_or(0, csv::Position::record);
        Self::Malformed {
            row,
            source: error,
        }
    }
}
