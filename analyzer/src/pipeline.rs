//! End-to-end report run: load, clean, summarise, chart, export.
//!
//! # Example
//!
//! ```rust,ignore
//! use playstore::{pipeline, ReportConfig};
//!
//! let summary = pipeline::run(&ReportConfig::default(), &mut std::io::stdout())?;
//! println!("{} apps, {} pages", summary.cleaned_rows, summary.export.pages);
//! ```

use serde::Serialize;
use std::io::Write;

use crate::charts;
use crate::cleaner::clean;
use crate::config::ReportConfig;
use crate::error::PipelineResult;
use crate::export::{ExportSummary, PdfExporter};
use crate::logs::{log_info, log_success};
use crate::parser::load_table;
use crate::report::{render_summary, render_top_expensive, render_top_installed};
use crate::stats::{describe, top_expensive, top_installed};

/// Counts from one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Data rows read from the input file
    pub input_rows: usize,
    /// Rows left after cleaning
    pub cleaned_rows: usize,
    pub dropped_invalid_rating: usize,
    pub dropped_incomplete: usize,
    pub charts: usize,
    pub export: ExportSummary,
}

/// Run the whole report.
///
/// The three console blocks and the confirmation line go to `out`; progress
/// goes to the log. Any stage failure stops the run, and nothing is written
/// to the output path unless every chart was rendered.
pub fn run<W: Write>(config: &ReportConfig, out: &mut W) -> PipelineResult<RunSummary> {
    log_info("=== Step 1: Load dataset ===");
    let raw = load_table(&config.input)?;

    log_info("=== Step 2: Clean ===");
    let outcome = clean(&raw)?;
    let table = &outcome.table;

    log_info("=== Step 3: Summary ===");
    let summary = describe(table);
    let expensive = top_expensive(table, config.top_expensive);
    let installed = top_installed(table, config.top_installed);

    writeln!(out, "\n Summary Statistics:")?;
    write!(out, "{}", render_summary(&summary))?;
    writeln!(out, "\n Top {} Most Expensive Apps:", config.top_expensive)?;
    write!(out, "{}", render_top_expensive(&expensive))?;
    writeln!(out, "\n Top {} Most Installed Apps:", config.top_installed)?;
    write!(out, "{}", render_top_installed(&installed))?;

    log_info("=== Step 4: Charts ===");
    let charts = charts::generate(table, config)?;

    log_info("=== Step 5: Export ===");
    let export = PdfExporter::new().export(&charts, &config.output)?;
    writeln!(out, "\n Report saved successfully as: {}", config.output.display())?;
    out.flush()?;

    log_success(format!(
        "Report complete: {} apps, {} pages",
        table.len(),
        export.pages
    ));

    Ok(RunSummary {
        input_rows: outcome.input_rows,
        cleaned_rows: table.len(),
        dropped_invalid_rating: outcome.dropped_invalid_rating,
        dropped_incomplete: outcome.dropped_incomplete,
        charts: charts.len(),
        export,
    })
}
