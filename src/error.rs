//! Error handling for pipeline runs.
//!
//! Only structural failures surface as errors: an input that cannot be
//! loaded, a required column that is absent, or a product master that maps
//! one raw code two different ways. Data-level anomalies are absorbed by the
//! stages as nulls, dropped rows or diagnostic counts.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input file not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Malformed table '{table}': {reason}")]
    MalformedTable { table: String, reason: String },

    #[error("Required column '{column}' missing from table '{table}'")]
    MissingColumn { table: String, column: String },

    #[error(
        "Product master maps raw code '{code}' to conflicting entries: {first} and {second}"
    )]
    DuplicateProductCode {
        code: String,
        first: String,
        second: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Pipeline task failed: {reason}")]
    TaskFailed { reason: String },
}

impl PipelineError {
    /// Create a missing column error
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
