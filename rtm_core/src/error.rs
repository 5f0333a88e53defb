//! Error types for the reporting pipeline.

use std::path::PathBuf;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// A column the canonical schema requires is absent from a source file.
    /// Fatal at load time, before any pipeline stage runs.
    #[error("missing required column '{column}' in {file}")]
    MissingColumn { column: &'static str, file: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("no CSV files found in {0}")]
    NoInputFiles(PathBuf),

    #[error("invalid band configuration: {0}")]
    Config(String),
}
