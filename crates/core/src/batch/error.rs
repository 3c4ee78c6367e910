//! Error types for the batch module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading the input table.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file could not be opened.
    #[error("Failed to open input {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid CSV.
    #[error("Malformed input table: {0}")]
    Csv(#[from] csv::Error),

    /// A row has fewer than the three expected fields.
    #[error("Input line {line} is missing the {field} field")]
    MissingField { line: u64, field: &'static str },
}

/// Errors writing the ledgers.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A ledger file could not be opened.
    #[error("Failed to open ledger {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to a ledger failed.
    #[error("Failed to write ledger {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
