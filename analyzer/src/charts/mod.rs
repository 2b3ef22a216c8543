//! Chart Generator: the nine report charts, in a fixed order.
//!
//! Each chart is drawn with `plotters` onto a [`PdfBackend`], which records
//! the drawing as a PDF content stream. The generator hands the finished
//! charts back as an explicit list; nothing is kept in global state.

pub mod backend;
mod views;

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Serialize;

use crate::config::ReportConfig;
use crate::error::ChartResult;
use crate::logs::{log_detail, log_info, log_success};
use crate::models::CleanedTable;

pub use backend::{escape_pdf_text, PdfBackend, FONT_RESOURCE};

/// Drawing surface every chart view renders onto
pub(crate) type Area<'a> = DrawingArea<PdfBackend<'a>, Shift>;

/// The nine report charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    RatingHistogram,
    FreeVsPaid,
    CategoryCounts,
    ReviewsVsRating,
    InstallsByType,
    TopCategoryInstalls,
    PriceVsRating,
    ContentRatings,
    TopCategoryRatings,
}

impl ChartKind {
    /// Report order.
    pub const ALL: [ChartKind; 9] = [
        ChartKind::RatingHistogram,
        ChartKind::FreeVsPaid,
        ChartKind::CategoryCounts,
        ChartKind::ReviewsVsRating,
        ChartKind::InstallsByType,
        ChartKind::TopCategoryInstalls,
        ChartKind::PriceVsRating,
        ChartKind::ContentRatings,
        ChartKind::TopCategoryRatings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::RatingHistogram => "Distribution of App Ratings",
            ChartKind::FreeVsPaid => "Free vs Paid Apps",
            ChartKind::CategoryCounts => "Number of Apps per Category",
            ChartKind::ReviewsVsRating => "Reviews vs Ratings",
            ChartKind::InstallsByType => "Install Distribution by App Type",
            ChartKind::TopCategoryInstalls => "Top 15 Categories by Total Installs",
            ChartKind::PriceVsRating => "Price vs Rating (Paid Apps)",
            ChartKind::ContentRatings => "Content Rating Distribution",
            ChartKind::TopCategoryRatings => "Top 10 Categories by Average Rating",
        }
    }

    /// Page size in points (figure inches x 72).
    pub fn page_size(self) -> (u32, u32) {
        match self {
            ChartKind::FreeVsPaid => (432, 432),
            ChartKind::CategoryCounts
            | ChartKind::TopCategoryInstalls
            | ChartKind::TopCategoryRatings => (864, 432),
            _ => (576, 360),
        }
    }
}

/// One rendered chart, ready to become a PDF page
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    /// Page width in points
    pub width: u32,
    /// Page height in points
    pub height: u32,
    /// PDF content stream drawing the chart
    pub content: Vec<u8>,
}

/// Render every chart for the cleaned table, in report order.
pub fn generate(table: &CleanedTable, config: &ReportConfig) -> ChartResult<Vec<Chart>> {
    log_info(format!("Generating {} charts from {} apps...", ChartKind::ALL.len(), table.len()));

    let charts = ChartKind::ALL
        .iter()
        .map(|&kind| render(kind, table, config))
        .collect::<ChartResult<Vec<_>>>()?;

    log_success(format!("Generated {} charts", charts.len()));
    Ok(charts)
}

/// Render a single chart.
pub fn render(kind: ChartKind, table: &CleanedTable, config: &ReportConfig) -> ChartResult<Chart> {
    let (width, height) = kind.page_size();
    let title = kind.title();
    let mut ops = String::new();
    {
        let area = PdfBackend::new(&mut ops, (width, height)).into_drawing_area();
        area.fill(&WHITE)?;

        match kind {
            ChartKind::RatingHistogram => {
                views::rating_histogram(&area, title, table, config.histogram_bins)?
            }
            ChartKind::FreeVsPaid => views::free_vs_paid(&area, title, table)?,
            ChartKind::CategoryCounts => views::category_counts(&area, title, table)?,
            ChartKind::ReviewsVsRating => views::reviews_vs_rating(&area, title, table)?,
            ChartKind::InstallsByType => views::installs_by_type(&area, title, table)?,
            ChartKind::TopCategoryInstalls => {
                views::top_category_installs(&area, title, table, config.top_category_installs)?
            }
            ChartKind::PriceVsRating => views::price_vs_rating(&area, title, table)?,
            ChartKind::ContentRatings => views::content_ratings(&area, title, table)?,
            ChartKind::TopCategoryRatings => {
                views::top_category_ratings(&area, title, table, config.top_category_ratings)?
            }
        }
        area.present()?;
    }

    log_detail(format!("{} ({} bytes)", title, ops.len()));
    Ok(Chart {
        kind,
        title: title.to_string(),
        width,
        height,
        content: ops.into_bytes(),
    })
}
