//! Console text blocks: summary statistics and the two top-5 tables.

use crate::stats::{ColumnSummary, RankedApp};

const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}", v),
        None => "NaN".to_string(),
    }
}

/// Statistics table: one column per numeric field, one row per statistic.
pub fn render_summary(summary: &[ColumnSummary]) -> String {
    let columns: Vec<(String, Vec<String>)> = summary
        .iter()
        .map(|s| {
            let cells = vec![
                format!("{:.6}", s.count as f64),
                cell(s.mean),
                cell(s.std_dev),
                cell(s.min),
                cell(s.q25),
                cell(s.q50),
                cell(s.q75),
                cell(s.max),
            ];
            (s.name.clone(), cells)
        })
        .collect();

    let label_width = STAT_LABELS.iter().map(|l| l.len()).max().unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .map(|(name, cells)| {
            cells.iter().map(String::len).chain(std::iter::once(name.len())).max().unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(label_width));
    for ((name, _), width) in columns.iter().zip(&widths) {
        out.push_str(&format!("  {:>width$}", name, width = width));
    }
    out.push('\n');

    for (row, label) in STAT_LABELS.iter().enumerate() {
        out.push_str(&format!("{:<width$}", label, width = label_width));
        for ((_, cells), width) in columns.iter().zip(&widths) {
            out.push_str(&format!("  {:>width$}", cells[row], width = width));
        }
        out.push('\n');
    }
    out
}

/// Generic top-N table: row label, app name, value.
fn render_ranked<T>(
    apps: &[RankedApp<T>],
    value_header: &str,
    fmt: impl Fn(&T) -> String,
) -> String {
    let rows: Vec<(String, &str, String)> = apps
        .iter()
        .map(|a| (a.index.to_string(), a.name.as_str(), fmt(&a.value)))
        .collect();

    let index_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    let name_width = rows
        .iter()
        .map(|r| r.1.chars().count())
        .chain(std::iter::once(3))
        .max()
        .unwrap_or(3);
    let value_width = rows
        .iter()
        .map(|r| r.2.len())
        .chain(std::iter::once(value_header.len()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:<iw$}  {:<nw$}  {:>vw$}\n",
        "",
        "App",
        value_header,
        iw = index_width,
        nw = name_width,
        vw = value_width
    );
    if rows.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }
    for (index, name, value) in rows {
        out.push_str(&format!(
            "{:<iw$}  {:<nw$}  {:>vw$}\n",
            index,
            name,
            value,
            iw = index_width,
            nw = name_width,
            vw = value_width
        ));
    }
    out
}

/// Most expensive paid apps.
pub fn render_top_expensive(apps: &[RankedApp<f64>]) -> String {
    render_ranked(apps, "Price", |price| format!("{:.2}", price))
}

/// Most installed apps.
pub fn render_top_installed(apps: &[RankedApp<u64>]) -> String {
    render_ranked(apps, "Installs", |installs| installs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_layout() {
        let summary = vec![
            ColumnSummary::from_values("Rating", &[4.0, 5.0]),
            ColumnSummary::from_values("Price", &[0.0, 2.0]),
        ];
        let text = render_summary(&summary);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("Rating"));
        assert!(lines[0].contains("Price"));
        assert!(lines[1].starts_with("count"));
        assert!(lines[1].contains("2.000000"));
        assert!(lines[2].contains("4.500000"));
        assert!(lines[8].starts_with("max"));
        assert!(lines[8].contains("5.000000"));
    }

    #[test]
    fn test_summary_missing_values() {
        let text = render_summary(&[ColumnSummary::from_values("Rating", &[])]);
        assert!(text.contains("NaN"));
    }

    #[test]
    fn test_top_expensive_table() {
        let apps = vec![
            RankedApp { index: 4367, name: "I'm Rich - Trump Edition".into(), value: 400.0 },
            RankedApp { index: 5351, name: "I am rich".into(), value: 399.99 },
        ];
        let text = render_top_expensive(&apps);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("App"));
        assert!(lines[0].trim_end().ends_with("Price"));
        assert!(lines[1].starts_with("4367"));
        assert!(lines[1].contains("I'm Rich - Trump Edition"));
        assert!(lines[1].ends_with("400.00"));
        assert!(lines[2].ends_with("399.99"));
    }

    #[test]
    fn test_top_installed_table() {
        let apps = vec![RankedApp {
            index: 3,
            name: "Subway Surfers".into(),
            value: 1_000_000_000u64,
        }];
        let text = render_top_installed(&apps);
        assert!(text.contains("Installs"));
        assert!(text.contains("1000000000"));
    }

    #[test]
    fn test_empty_ranking() {
        let text = render_top_expensive(&[]);
        assert!(text.contains("(no rows)"));
    }
}
