//! Descriptive statistics and rankings over the cleaned table.
//!
//! Everything here is a pure function of a borrowed [`CleanedTable`].

pub mod ranking;

use serde::Serialize;

use crate::models::{CleanedTable, COL_INSTALLS, COL_PRICE, COL_RATING, COL_REVIEWS};

pub use ranking::{
    category_counts, category_installs, category_ratings, content_rating_counts,
    installs_by_type, top_expensive, top_installed, type_counts, CategoryTotal, RankedApp,
};

/// Summary of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    /// Summarise a column of values.
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std_dev = match (count, mean) {
            (n, Some(m)) if n > 1 => {
                let variance = sorted.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
                Some(variance.sqrt())
            }
            _ => None,
        };

        Self {
            name: name.into(),
            count,
            mean,
            std_dev,
            min: sorted.first().copied(),
            q25: percentile(&sorted, 0.25),
            q50: percentile(&sorted, 0.50),
            q75: percentile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Numeric columns, in the order the cleaned table's header lists them.
fn numeric_columns(table: &CleanedTable) -> Vec<(&'static str, Vec<f64>)> {
    let mut columns: Vec<(usize, &'static str, Vec<f64>)> = [
        (COL_RATING, table.iter().map(|r| r.rating).collect::<Vec<_>>()),
        (COL_REVIEWS, table.iter().map(|r| r.reviews as f64).collect()),
        (COL_INSTALLS, table.iter().map(|r| r.installs as f64).collect()),
        (COL_PRICE, table.iter().map(|r| r.price).collect()),
    ]
    .into_iter()
    .map(|(name, values)| {
        let position = table.headers.iter().position(|h| h == name).unwrap_or(usize::MAX);
        (position, name, values)
    })
    .collect();

    columns.sort_by_key(|(position, _, _)| *position);
    columns.into_iter().map(|(_, name, values)| (name, values)).collect()
}

/// Count, mean, sample standard deviation, min, quartiles and max for every
/// numeric column.
pub fn describe(table: &CleanedTable) -> Vec<ColumnSummary> {
    numeric_columns(table)
        .into_iter()
        .map(|(name, values)| ColumnSummary::from_values(name, &values))
        .collect()
}

/// Linear interpolation between closest ranks of an ascending slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let frac = idx - lo as f64;
        Some(sorted[lo] * (1.0 - frac) + sorted[hi] * frac)
    }
}

/// Box plot geometry for one group of values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest value within 1.5 IQR below q1
    pub lower_whisker: f64,
    /// Highest value within 1.5 IQR above q3
    pub upper_whisker: f64,
    /// Values beyond the whiskers
    pub outliers: Vec<f64>,
}

/// Quartiles and Tukey whiskers; `None` for an empty group.
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = percentile(&sorted, 0.25)?;
    let median = percentile(&sorted, 0.5)?;
    let q3 = percentile(&sorted, 0.75)?;
    let reach = 1.5 * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(Quartiles {
        q1,
        median,
        q3,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    })
}
