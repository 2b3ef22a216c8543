//! Raw table -> cleaned table.
//!
//! Cleaning is a pure function applied in a fixed order, each step relying on
//! the postconditions of the previous one:
//!
//! 1. drop rows whose rating is above 5 (missing ratings pass)
//! 2. drop rows with a missing value in any column
//! 3. `Installs`: strip trailing `+` and `,` separators, parse as integer
//! 4. `Price`: strip leading `$`, parse as float
//! 5. `Reviews`: parse as integer
//!
//! Steps 3-5 run column by column over all surviving rows, so the first
//! format error reported is the first bad `Installs` cell, if any.

pub mod operations;

use crate::error::{CleanResult, ParseError};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::{
    AppRecord, CleanedTable, RawRow, RawTable, COL_APP, COL_CATEGORY, COL_CONTENT_RATING,
    COL_INSTALLS, COL_PRICE, COL_RATING, COL_REVIEWS, COL_TYPE, REQUIRED_COLUMNS,
};

pub use operations::{
    is_missing, normalize_installs, normalize_price, normalize_reviews, parse_rating,
};

/// Highest rating kept by the rating filter.
pub const MAX_RATING: f64 = 5.0;

/// Cleaned table plus what was dropped on the way
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub table: CleanedTable,
    /// Rows in the raw table
    pub input_rows: usize,
    /// Rows removed because their rating was above 5
    pub dropped_invalid_rating: usize,
    /// Rows removed because a cell was missing
    pub dropped_incomplete: usize,
}

/// Header positions of the typed columns
struct Columns {
    app: usize,
    category: usize,
    rating: usize,
    reviews: usize,
    installs: usize,
    app_type: usize,
    price: usize,
    content_rating: usize,
    extra: Vec<usize>,
}

impl Columns {
    fn locate(raw: &RawTable) -> CleanResult<Self> {
        let find = |name: &str| {
            raw.column_index(name)
                .ok_or_else(|| ParseError::new(1, name, "", "column not present in header"))
        };

        let extra = raw
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !REQUIRED_COLUMNS.contains(&h.as_str()))
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            app: find(COL_APP)?,
            category: find(COL_CATEGORY)?,
            rating: find(COL_RATING)?,
            reviews: find(COL_REVIEWS)?,
            installs: find(COL_INSTALLS)?,
            app_type: find(COL_TYPE)?,
            price: find(COL_PRICE)?,
            content_rating: find(COL_CONTENT_RATING)?,
            extra,
        })
    }
}

/// Clean a raw table.
///
/// The raw table is left untouched; a new [`CleanedTable`] is returned.
/// Fails with [`ParseError`] on the first cell that does not match its
/// expected format.
pub fn clean(raw: &RawTable) -> CleanResult<CleanOutcome> {
    log_info("🧹 Cleaning dataset...");
    let cols = Columns::locate(raw)?;

    // Step 1: rating filter
    let mut rated = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let cell = row.cell(cols.rating);
        let rating = parse_rating(cell).map_err(|message| {
            ParseError::new(row.line, COL_RATING, cell.unwrap_or_default(), message)
        })?;
        if !matches!(rating, Some(r) if r > MAX_RATING) {
            rated.push(row);
        }
    }
    let dropped_invalid_rating = raw.rows.len() - rated.len();

    // Step 2: whole-row completeness filter
    let complete: Vec<&RawRow> = rated
        .into_iter()
        .filter(|row| {
            (0..raw.headers.len()).all(|col| !is_missing(row.cell(col)))
        })
        .collect();
    let dropped_incomplete = raw.rows.len() - dropped_invalid_rating - complete.len();

    // Steps 3-5: column normalization
    let installs = normalize_column(&complete, cols.installs, COL_INSTALLS, normalize_installs)?;
    let prices = normalize_column(&complete, cols.price, COL_PRICE, normalize_price)?;
    let reviews = normalize_column(&complete, cols.reviews, COL_REVIEWS, normalize_reviews)?;

    let mut table = CleanedTable::with_headers(raw.headers.clone());
    for (i, row) in complete.iter().enumerate() {
        let text = |col: usize| row.cell(col).unwrap_or_default().to_string();
        let rating = parse_rating(row.cell(cols.rating))
            .ok()
            .flatten()
            .unwrap_or_default();

        table.records.push(AppRecord {
            index: row.index,
            line: row.line,
            name: text(cols.app),
            category: text(cols.category),
            rating,
            reviews: reviews[i],
            installs: installs[i],
            app_type: text(cols.app_type),
            price: prices[i],
            content_rating: text(cols.content_rating),
            extra: cols.extra.iter().map(|&col| text(col)).collect(),
        });
    }

    if dropped_invalid_rating > 0 {
        log_warning(format!("Dropped {} rows with rating above 5", dropped_invalid_rating));
    }
    if dropped_incomplete > 0 {
        log_warning(format!("Dropped {} rows with missing values", dropped_incomplete));
    }
    log_success(format!("{} of {} rows kept", table.len(), raw.rows.len()));

    Ok(CleanOutcome {
        table,
        input_rows: raw.rows.len(),
        dropped_invalid_rating,
        dropped_incomplete,
    })
}

/// Apply one normalizer down a column, failing on the first bad cell.
fn normalize_column<T>(
    rows: &[&RawRow],
    col: usize,
    name: &str,
    normalize: fn(&str) -> Result<T, String>,
) -> CleanResult<Vec<T>> {
    rows.iter()
        .map(|row| {
            let value = row.cell(col).unwrap_or_default();
            normalize(value).map_err(|message| ParseError::new(row.line, name, value, message))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use proptest::prelude::*;

    const HEADER: &str =
        "App,Category,Rating,Reviews,Size,Installs,Type,Price,Content Rating,Genres";

    fn table(rows: &[&str]) -> RawTable {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        parse_str(&csv, ',').unwrap()
    }

    #[test]
    fn test_clean_typical_rows() {
        let raw = table(&[
            "Sketch,ART_AND_DESIGN,4.5,215644,25M,\"50,000,000+\",Free,0,Teen,Art & Design",
            "Minecraft,FAMILY,4.5,2376564,Varies with device,\"10,000,000+\",Paid,$6.99,\
             Everyone 10+,Arcade",
        ]);
        let outcome = clean(&raw).unwrap();

        assert_eq!(outcome.table.len(), 2);
        let sketch = &outcome.table.records[0];
        assert_eq!(sketch.name, "Sketch");
        assert_eq!(sketch.installs, 50_000_000);
        assert_eq!(sketch.reviews, 215_644);
        assert_eq!(sketch.price, 0.0);
        assert_eq!(sketch.extra, vec!["25M", "Art & Design"]);

        let minecraft = &outcome.table.records[1];
        assert_eq!(minecraft.price, 6.99);
        assert_eq!(minecraft.app_type, "Paid");
        assert_eq!(minecraft.content_rating, "Everyone 10+");
        assert_eq!(minecraft.index, 1);
        assert_eq!(minecraft.line, 3);
    }

    #[test]
    fn test_rating_above_five_removed() {
        let raw = table(&[
            "Good,GAME,4.0,10,1M,100+,Free,0,Everyone,Arcade",
            "Broken,GAME,5.5,10,1M,100+,Free,0,Everyone,Arcade",
            "Perfect,GAME,5.0,10,1M,100+,Free,0,Everyone,Arcade",
        ]);
        let outcome = clean(&raw).unwrap();

        let names: Vec<&str> = outcome.table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Good", "Perfect"]);
        assert_eq!(outcome.dropped_invalid_rating, 1);
    }

    #[test]
    fn test_shifted_row_dropped_before_parsing() {
        // A row whose columns slid left: its "rating" is 19 and its reviews "3.0M".
        let raw = table(&[
            "Life Made WI-Fi Touchscreen Photo Frame,1.9,19,3.0M,\"1,000+\",Free,0,Everyone,,\
             February 11",
            "Good,GAME,4.0,10,1M,100+,Free,0,Everyone,Arcade",
        ]);
        let outcome = clean(&raw).unwrap();
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.table.records[0].name, "Good");
    }

    #[test]
    fn test_missing_category_removed() {
        let raw = table(&[
            "NoCategory,,4.0,10,1M,100+,Free,0,Everyone,Arcade",
            "Good,GAME,4.0,10,1M,100+,Free,0,Everyone,Arcade",
        ]);
        let outcome = clean(&raw).unwrap();
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.table.records[0].name, "Good");
        assert_eq!(outcome.dropped_incomplete, 1);
    }

    #[test]
    fn test_missing_unused_column_removes_row() {
        let raw = table(&[
            "NoGenre,GAME,4.0,10,1M,100+,Free,0,Everyone,",
            "NaNRating,GAME,NaN,10,1M,100+,Free,0,Everyone,Arcade",
            "Short,GAME,4.0",
        ]);
        let outcome = clean(&raw).unwrap();
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.dropped_invalid_rating, 0);
        assert_eq!(outcome.dropped_incomplete, 3);
    }

    #[test]
    fn test_whitespace_cell_keeps_row() {
        let raw = table(&["Spaced,GAME,4.0,10,1M,100+,Free,0,Everyone,   "]);
        let outcome = clean(&raw).unwrap();
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.dropped_incomplete, 0);
        assert_eq!(outcome.table.records[0].extra, vec!["   ".to_string()]);
    }

    #[test]
    fn test_bad_installs_is_parse_error() {
        let raw = table(&["Odd,GAME,4.0,10,1M,Lots+,Free,0,Everyone,Arcade"]);
        let err = clean(&raw).unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, "Installs");
        assert_eq!(err.value, "Lots+");
    }

    #[test]
    fn test_bad_price_is_parse_error() {
        let raw = table(&["Odd,GAME,4.0,10,1M,100+,Paid,$free,Everyone,Arcade"]);
        let err = clean(&raw).unwrap_err();
        assert_eq!(err.column, "Price");
    }

    #[test]
    fn test_bad_reviews_is_parse_error() {
        let raw = table(&["Odd,GAME,4.0,3.0M,1M,100+,Free,0,Everyone,Arcade"]);
        let err = clean(&raw).unwrap_err();
        assert_eq!(err.column, "Reviews");
        assert_eq!(err.value, "3.0M");
    }

    #[test]
    fn test_non_numeric_rating_is_parse_error() {
        let raw = table(&["Odd,GAME,great,10,1M,100+,Free,0,Everyone,Arcade"]);
        let err = clean(&raw).unwrap_err();
        assert_eq!(err.column, "Rating");
    }

    #[test]
    fn test_negative_rating_kept() {
        let raw = table(&["Odd,GAME,-1,10,1M,100+,Free,0,Everyone,Arcade"]);
        let outcome = clean(&raw).unwrap();
        assert_eq!(outcome.table.records[0].rating, -1.0);
    }

    #[test]
    fn test_raw_table_untouched() {
        let raw = table(&["Sketch,ART_AND_DESIGN,4.5,215644,25M,\"50,000,000+\",Free,0,Teen,Art"]);
        let before = raw.clone();
        clean(&raw).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let raw = table(&[
            "Sketch,ART_AND_DESIGN,4.5,215644,25M,\"50,000,000+\",Free,0,Teen,Art",
            "Broken,GAME,5.5,10,1M,100+,Free,0,Everyone,Arcade",
            "Paid,GAME,3.9,7,1M,\"1,000+\",Paid,$2.99,Everyone,Arcade",
            "Gap,,3.9,7,1M,\"1,000+\",Paid,$2.99,Everyone,Arcade",
        ]);
        let once = clean(&raw).unwrap().table;
        let twice = clean(&once.to_raw()).unwrap();

        assert_eq!(twice.table, once);
        assert_eq!(twice.dropped_invalid_rating, 0);
        assert_eq!(twice.dropped_incomplete, 0);
    }

    fn cell() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("NaN".to_string()),
            "[a-zA-Z ]{1,8}",
        ]
    }

    fn row() -> impl Strategy<Value = Vec<String>> {
        (
            cell(),
            prop_oneof![
                Just(String::new()),
                (0u32..=70).prop_map(|r| format!("{:.1}", r as f64 / 10.0)),
            ],
            prop_oneof![Just(String::new()), (0u64..1_000_000).prop_map(|r| r.to_string())],
            prop_oneof![
                Just(String::new()),
                (0u64..1_000_000_000).prop_map(|n| format!("{}+", n)),
                Just("1,000,000+".to_string()),
            ],
            prop_oneof![
                Just(String::new()),
                Just("0".to_string()),
                (1u32..50_000).prop_map(|c| format!("${}.{:02}", c / 100, c % 100)),
            ],
            cell(),
        )
            .prop_map(|(name, rating, reviews, installs, price, extra)| {
                vec![
                    name,
                    "GAME".to_string(),
                    rating,
                    reviews,
                    "1M".to_string(),
                    installs,
                    "Free".to_string(),
                    price,
                    "Everyone".to_string(),
                    extra,
                ]
            })
    }

    fn raw_from(rows: &[Vec<String>]) -> RawTable {
        let headers = HEADER.split(',').map(str::to_string).collect();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, cells)| RawRow::new(i, i + 2, cells.iter().cloned().map(Some).collect()))
            .collect();
        RawTable::new(headers, rows)
    }

    proptest! {
        #[test]
        fn prop_cleaned_rows_satisfy_invariants(rows in prop::collection::vec(row(), 0..40)) {
            let raw = raw_from(&rows);
            let outcome = clean(&raw).unwrap();

            prop_assert_eq!(
                outcome.input_rows,
                outcome.table.len() + outcome.dropped_invalid_rating + outcome.dropped_incomplete
            );
            for record in &outcome.table {
                prop_assert!(record.rating >= 0.0 && record.rating <= 5.0);
                prop_assert!(record.price >= 0.0);
                prop_assert!(!record.name.is_empty());
                prop_assert!(record.extra.iter().all(|v| !is_missing(Some(v))));
            }

            let again = clean(&outcome.table.to_raw()).unwrap();
            prop_assert_eq!(again.table, outcome.table);
        }
    }
}
