//! Fixed run settings for the report.
//!
//! The report has no external configuration surface: the binary always runs
//! with [`ReportConfig::default`]. The struct exists so the pipeline can be
//! pointed at other paths from tests.

use serde::Serialize;
use std::path::PathBuf;

/// Dataset read by the report.
pub const DEFAULT_INPUT: &str = "google playstore data.csv";

/// Document written by the report.
pub const DEFAULT_OUTPUT: &str = "Google_Play_Analysis_Report.pdf";

/// Settings for one report run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportConfig {
    /// CSV dataset to load
    pub input: PathBuf,

    /// PDF document to write
    pub output: PathBuf,

    /// Number of bins in the rating histogram
    pub histogram_bins: usize,

    /// Rows in the most-expensive-apps table
    pub top_expensive: usize,

    /// Rows in the most-installed-apps table
    pub top_installed: usize,

    /// Categories in the total-installs chart
    pub top_category_installs: usize,

    /// Categories in the average-rating chart
    pub top_category_ratings: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            histogram_bins: 20,
            top_expensive: 5,
            top_installed: 5,
            top_category_installs: 15,
            top_category_ratings: 10,
        }
    }
}

impl ReportConfig {
    /// Same settings with different input and output paths.
    pub fn with_paths(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Self::default()
        }
    }
}
