//! Domain models for the report pipeline.
//!
//! - [`RawTable`] - the input file as text cells, exactly as loaded
//! - [`AppRecord`] - one cleaned, typed row
//! - [`CleanedTable`] - the row set left after cleaning, read-only afterwards

use serde::Serialize;

// =============================================================================
// Column names
// =============================================================================

pub const COL_APP: &str = "App";
pub const COL_CATEGORY: &str = "Category";
pub const COL_RATING: &str = "Rating";
pub const COL_REVIEWS: &str = "Reviews";
pub const COL_INSTALLS: &str = "Installs";
pub const COL_TYPE: &str = "Type";
pub const COL_PRICE: &str = "Price";
pub const COL_CONTENT_RATING: &str = "Content Rating";

/// Columns the cleaner needs; the loader rejects files lacking any of them.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_APP,
    COL_CATEGORY,
    COL_RATING,
    COL_REVIEWS,
    COL_INSTALLS,
    COL_TYPE,
    COL_PRICE,
    COL_CONTENT_RATING,
];

fn is_required(name: &str) -> bool {
    REQUIRED_COLUMNS.contains(&name)
}

// =============================================================================
// Raw table
// =============================================================================

/// One data row of the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 0-based position among the data rows of the input file.
    pub index: usize,
    /// 1-based line in the input file (the header is line 1).
    pub line: usize,
    /// One cell per header column; `None` when the row was too short.
    pub cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(index: usize, line: usize, cells: Vec<Option<String>>) -> Self {
        Self { index, line, cells }
    }

    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).and_then(|c| c.as_deref())
    }
}

/// The input file held as text, with no type coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    /// Position of a column in the header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Required columns absent from the header, in canonical order.
    pub fn missing_required_columns(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Cleaned records
// =============================================================================

/// One app after cleaning. All fields are present and typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppRecord {
    /// 0-based position among the data rows of the input file.
    pub index: usize,
    /// 1-based line in the input file.
    pub line: usize,
    pub name: String,
    pub category: String,
    pub rating: f64,
    pub reviews: u64,
    pub installs: u64,
    pub app_type: String,
    pub price: f64,
    pub content_rating: String,
    /// Values of the non-required columns, aligned with [`CleanedTable::extra_columns`].
    pub extra: Vec<String>,
}

/// Rows left after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedTable {
    /// Full header of the input file, in file order.
    pub headers: Vec<String>,
    /// Header names not covered by the typed fields of [`AppRecord`].
    pub extra_columns: Vec<String>,
    pub records: Vec<AppRecord>,
}

impl CleanedTable {
    /// Empty table with the given file header.
    pub fn with_headers(headers: Vec<String>) -> Self {
        let extra_columns = headers
            .iter()
            .filter(|h| !is_required(h))
            .cloned()
            .collect();
        Self {
            headers,
            extra_columns,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AppRecord> {
        self.records.iter()
    }

    /// Render the table back to text cells, in the original header order.
    ///
    /// Numbers are written in their plain form (`1000`, not `1,000+`), so
    /// cleaning the result again yields the same records.
    pub fn to_raw(&self) -> RawTable {
        let rows = self
            .records
            .iter()
            .map(|record| {
                let mut extra = record.extra.iter();
                let cells = self
                    .headers
                    .iter()
                    .map(|header| match header.as_str() {
                        COL_APP => Some(record.name.clone()),
                        COL_CATEGORY => Some(record.category.clone()),
                        COL_RATING => Some(record.rating.to_string()),
                        COL_REVIEWS => Some(record.reviews.to_string()),
                        COL_INSTALLS => Some(record.installs.to_string()),
                        COL_TYPE => Some(record.app_type.clone()),
                        COL_PRICE => Some(record.price.to_string()),
                        COL_CONTENT_RATING => Some(record.content_rating.clone()),
                        _ => extra.next().cloned(),
                    })
                    .collect();
                RawRow::new(record.index, record.line, cells)
            })
            .collect();
        RawTable::new(self.headers.clone(), rows)
    }
}

impl<'a> IntoIterator for &'a CleanedTable {
    type Item = &'a AppRecord;
    type IntoIter = std::slice::Iter<'a, AppRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        [
            "App",
            "Category",
            "Rating",
            "Reviews",
            "Size",
            "Installs",
            "Type",
            "Price",
            "Content Rating",
            "Genres",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_missing_required_columns() {
        let table = RawTable::new(vec!["App".into(), "Rating".into()], vec![]);
        let missing = table.missing_required_columns();
        assert_eq!(
            missing,
            vec!["Category", "Reviews", "Installs", "Type", "Price", "Content Rating"]
        );
    }

    #[test]
    fn test_extra_columns_follow_header_order() {
        let table = CleanedTable::with_headers(headers());
        assert_eq!(table.extra_columns, vec!["Size", "Genres"]);
    }

    #[test]
    fn test_to_raw_restores_column_order() {
        let mut table = CleanedTable::with_headers(headers());
        table.records.push(AppRecord {
            index: 0,
            line: 2,
            name: "Sketch".into(),
            category: "ART_AND_DESIGN".into(),
            rating: 4.5,
            reviews: 215644,
            installs: 50_000_000,
            app_type: "Free".into(),
            price: 0.0,
            content_rating: "Teen".into(),
            extra: vec!["25M".into(), "Art & Design".into()],
        });

        let raw = table.to_raw();
        assert_eq!(raw.headers, headers());
        let row = &raw.rows[0];
        assert_eq!(row.index, 0);
        assert_eq!(row.line, 2);
        assert_eq!(row.cell(0), Some("Sketch"));
        assert_eq!(row.cell(4), Some("25M"));
        assert_eq!(row.cell(5), Some("50000000"));
        assert_eq!(row.cell(7), Some("0"));
        assert_eq!(row.cell(9), Some("Art & Design"));
    }
}
