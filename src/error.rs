//! Failure taxonomy for the grading pipeline.
//!
//! Every stage returns [`PipelineError`]; the binary wraps it in `anyhow` at
//! the boundary. Unmatched names and empty pitch logs are not errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("CSV error in {source_name}: {source}")]
    Parse {
        source_name: String,
        source: csv::Error,
    },

    #[error("failed to decompress {source_name}: {source}")]
    Decompress {
        source_name: String,
        source: std::io::Error,
    },

    #[error("no columns to parse in {0}")]
    EmptyInput(String),

    #[error("{source_name} line {line}: expected {expected} fields, saw {found}")]
    RaggedRow {
        source_name: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{source_name} line {line}: column {column} has non-numeric value '{value}'")]
    InvalidNumber {
        source_name: String,
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("required column '{column}' missing from {source_name}")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
