use std::path::PathBuf;
use thiserror::Error;

use crate::check::CheckReport;

/// The main error type for widerface operations.
#[derive(Debug, Error)]
pub enum WiderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read annotation file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed WIDER FACE record: {message}")]
    MalformedRecord { message: String },

    #[error("Invalid annotation entry in {path} at line {line}: {message}")]
    InvalidEntry {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Image name \"{image}\" not found in \"{path}\"")]
    ImageNotFound { image: String, path: PathBuf },

    #[error("Input path {path} is neither a file nor a directory")]
    InputNotFound { path: PathBuf },

    #[error("Failed to walk directory {path}: {message}")]
    WalkDir { path: PathBuf, message: String },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to write JSON output: {0}")]
    JsonWrite(#[source] serde_json::Error),

    #[error("Failed to write CSV output: {0}")]
    CsvWrite(#[source] csv::Error),

    #[error("Check failed with {error_count} error(s) and {warning_count} warning(s)")]
    CheckFailed {
        error_count: usize,
        warning_count: usize,
        report: CheckReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl WiderError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        WiderError::MalformedRecord {
            message: message.into(),
        }
    }
}
