//! Error types for the Play Store report pipeline.
//!
//! One error type per stage, all converging on [`PipelineError`]:
//!
//! - [`DataLoadError`] - input file missing, unreadable or not tabular
//! - [`ParseError`] - a cell does not match its expected format during cleaning
//! - [`ChartError`] - a chart could not be drawn
//! - [`ExportError`] - the report document could not be written
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across stage boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Loading Errors
// =============================================================================

/// Errors while reading the raw dataset.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// Failed to read file.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid delimited data.
    #[error("Invalid tabular data: {0}")]
    Malformed(String),

    /// Empty file.
    #[error("Input file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No header row found")]
    NoHeaders,

    /// A data row carries more fields than the header.
    #[error("Line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Header lacks columns the cleaner relies on.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

impl From<csv::Error> for DataLoadError {
    fn from(err: csv::Error) -> Self {
        DataLoadError::Malformed(err.to_string())
    }
}

// =============================================================================
// Cleaning Errors
// =============================================================================

/// A cell failed its expected format during cleaning.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Line {line}, column '{column}' (value '{value}'): {message}")]
pub struct ParseError {
    /// 1-based line in the input file (the header is line 1).
    pub line: usize,
    pub column: String,
    pub value: String,
    pub message: String,
}

impl ParseError {
    pub fn new(
        line: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line,
            column: column.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Chart Errors
// =============================================================================

/// Errors while drawing a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The drawing backend rejected an operation.
    #[error("Failed to draw chart: {0}")]
    Render(String),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for ChartError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ChartError::Render(err.to_string())
    }
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing the report document.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Destination cannot be created or written.
    #[error("Cannot write '{}': {source}", path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF serializer failed mid-write.
    #[error("Failed to serialize document to '{}': {message}", path.display())]
    Serialize { path: PathBuf, message: String },

    /// Nothing to export.
    #[error("No charts to export")]
    NoPages,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading error.
    #[error("Load error: {0}")]
    Load(#[from] DataLoadError),

    /// Cleaning error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Chart error.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Console output could not be written.
    #[error("Console write failed: {0}")]
    Console(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, DataLoadError>;

/// Result type for cleaning operations.
pub type CleanResult<T> = Result<T, ParseError>;

/// Result type for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
