//! # Playstore - Google Play Store dataset analysis report
//!
//! Loads the Play Store app listing export, cleans it, prints summary
//! tables and writes nine exploratory charts into one multi-page PDF.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Cleaner   │──┬─▶│ Stats/Report│──▶ stdout
//! │  (any enc.) │     │  (auto-enc) │     │ (filter+typ)│  │  └─────────────┘
//! └─────────────┘     └─────────────┘     └─────────────┘  │  ┌─────────────┐     ┌─────────────┐
//!                                                          └─▶│   Charts    │────▶│  PDF Export │
//!                                                             │ (plotters)  │     │   (lopdf)   │
//!                                                             └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use playstore::{pipeline, ReportConfig};
//!
//! let summary = pipeline::run(&ReportConfig::default(), &mut std::io::stdout())?;
//! println!("Kept {} of {} rows", summary.cleaned_rows, summary.input_rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Run settings
//! - [`logs`] - Status logging over `tracing`
//! - [`models`] - Raw and cleaned tables
//! - [`parser`] - CSV loading with encoding/delimiter detection
//! - [`cleaner`] - Row filters and column normalization
//! - [`stats`] - Descriptive statistics and rankings
//! - [`report`] - Console tables
//! - [`charts`] - Chart rendering
//! - [`export`] - Multi-page PDF writer
//! - [`pipeline`] - End-to-end run

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Loading and cleaning
pub mod cleaner;
pub mod parser;

// Analysis
pub mod report;
pub mod stats;

// Output
pub mod charts;
pub mod export;

// Orchestration
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ChartError, DataLoadError, ExportError, ParseError, PipelineError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{AppRecord, CleanedTable, RawRow, RawTable};

// =============================================================================
// Re-exports - Stages
// =============================================================================

pub use charts::{generate as generate_charts, Chart, ChartKind};
pub use cleaner::{clean, CleanOutcome};
pub use config::ReportConfig;
pub use export::{ExportSummary, PdfExporter};
pub use parser::{load_table, parse_bytes, parse_str};
pub use pipeline::{run, RunSummary};
pub use stats::{describe, ColumnSummary};
