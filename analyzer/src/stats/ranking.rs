//! Top-N rankings and per-group aggregates.
//!
//! All sorts are stable: rows that tie keep their cleaned-table order.
//! Groups are built in category-name order before sorting, so tied groups
//! come out alphabetically.

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::models::CleanedTable;

/// One app in a top-N table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedApp<T> {
    /// Row label (0-based data-row position in the input file)
    pub index: usize,
    pub name: String,
    pub value: T,
}

/// One group (category, type, audience) with its aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal<T> {
    pub category: String,
    pub value: T,
}

/// Paid apps (`price > 0`) by price, most expensive first.
pub fn top_expensive(table: &CleanedTable, n: usize) -> Vec<RankedApp<f64>> {
    let mut paid: Vec<RankedApp<f64>> = table
        .iter()
        .filter(|r| r.price > 0.0)
        .map(|r| RankedApp {
            index: r.index,
            name: r.name.clone(),
            value: r.price,
        })
        .collect();
    paid.sort_by(|a, b| b.value.total_cmp(&a.value));
    paid.truncate(n);
    paid
}

/// All apps by install count, most installed first.
pub fn top_installed(table: &CleanedTable, n: usize) -> Vec<RankedApp<u64>> {
    let mut apps: Vec<RankedApp<u64>> = table
        .iter()
        .map(|r| RankedApp {
            index: r.index,
            name: r.name.clone(),
            value: r.installs,
        })
        .collect();
    apps.sort_by_key(|a| Reverse(a.value));
    apps.truncate(n);
    apps
}

/// Total installs per category, largest first, at most `n` groups.
/// Totals saturate at `u64::MAX`.
pub fn category_installs(table: &CleanedTable, n: usize) -> Vec<CategoryTotal<u64>> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for record in table {
        let total = totals.entry(record.category.as_str()).or_default();
        *total = total.saturating_add(record.installs);
    }

    let mut groups: Vec<CategoryTotal<u64>> = totals
        .into_iter()
        .map(|(category, value)| CategoryTotal {
            category: category.to_string(),
            value,
        })
        .collect();
    groups.sort_by_key(|g| Reverse(g.value));
    groups.truncate(n);
    groups
}

/// Mean rating per category, highest first, at most `n` groups.
pub fn category_ratings(table: &CleanedTable, n: usize) -> Vec<CategoryTotal<f64>> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in table {
        let entry = sums.entry(record.category.as_str()).or_default();
        entry.0 += record.rating;
        entry.1 += 1;
    }

    let mut groups: Vec<CategoryTotal<f64>> = sums
        .into_iter()
        .map(|(category, (sum, count))| CategoryTotal {
            category: category.to_string(),
            value: sum / count as f64,
        })
        .collect();
    groups.sort_by(|a, b| b.value.total_cmp(&a.value));
    groups.truncate(n);
    groups
}

/// Count occurrences, keeping first-appearance order.
fn count_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryTotal<usize>> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryTotal<usize>> = Vec::new();

    for value in values {
        match positions.get(value) {
            Some(&i) => counts[i].value += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push(CategoryTotal {
                    category: value.to_string(),
                    value: 1,
                });
            }
        }
    }
    counts
}

/// Apps per type (`Free`, `Paid`, ...), most common first.
pub fn type_counts(table: &CleanedTable) -> Vec<CategoryTotal<usize>> {
    let mut counts = count_in_order(table.iter().map(|r| r.app_type.as_str()));
    counts.sort_by_key(|c| Reverse(c.value));
    counts
}

/// Apps per category, most common first.
pub fn category_counts(table: &CleanedTable) -> Vec<CategoryTotal<usize>> {
    let mut counts = count_in_order(table.iter().map(|r| r.category.as_str()));
    counts.sort_by_key(|c| Reverse(c.value));
    counts
}

/// Apps per content rating, in order of first appearance.
pub fn content_rating_counts(table: &CleanedTable) -> Vec<CategoryTotal<usize>> {
    count_in_order(table.iter().map(|r| r.content_rating.as_str()))
}

/// Install counts grouped by type, groups in order of first appearance.
pub fn installs_by_type(table: &CleanedTable) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for record in table {
        match groups.iter_mut().find(|(t, _)| *t == record.app_type) {
            Some((_, values)) => values.push(record.installs as f64),
            None => groups.push((record.app_type.clone(), vec![record.installs as f64])),
        }
    }
    groups
}
