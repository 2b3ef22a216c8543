//! Drawing code for each chart.

use std::f64::consts::PI;
use std::ops::Range;

use plotters::prelude::*;
use plotters_backend::text_anchor::{HPos, Pos, VPos};
use plotters_backend::FontTransform;

use super::Area;
use crate::error::ChartResult;
use crate::models::CleanedTable;
use crate::stats;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const SLATE_BLUE: RGBColor = RGBColor(106, 90, 205);
const DARK_RED: RGBColor = RGBColor(139, 0, 0);
const MEDIUM_SEA_GREEN: RGBColor = RGBColor(60, 179, 113);
const DEFAULT_BLUE: RGBColor = RGBColor(31, 119, 180);
const EDGE: RGBColor = RGBColor(64, 64, 64);

const SET2: [RGBColor; 8] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
    RGBColor(229, 196, 148),
    RGBColor(179, 179, 179),
];

const FONT: &str = "sans-serif";
const CAPTION_SIZE: i32 = 16;
const LABEL_SIZE: i32 = 11;
const DESC_SIZE: i32 = 13;

/// Equal-width bins over `[min, max]`; the last bin is closed.
/// Returns the first edge, the bin width and the counts.
pub(crate) fn histogram(values: &[f64], bins: usize) -> (f64, f64, Vec<usize>) {
    let bins = bins.max(1);
    let range = value_range(values.iter().copied(), 0.0);
    let width = (range.end - range.start) / bins as f64;

    let mut counts = vec![0; bins];
    for &v in values {
        let slot = ((v - range.start) / width).floor() as usize;
        counts[slot.min(bins - 1)] += 1;
    }
    (range.start, width, counts)
}

/// Gaussian kernel density with Scott's bandwidth, sampled at `samples`
/// points across `range`. Empty when the data has no spread.
pub(crate) fn gaussian_kde(values: &[f64], range: Range<f64>, samples: usize) -> Vec<(f64, f64)> {
    let n = values.len();
    if n < 2 || samples < 2 {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bandwidth = variance.sqrt() * (n as f64).powf(-0.2);
    if !bandwidth.is_normal() {
        return Vec::new();
    }

    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * PI).sqrt());
    let step = (range.end - range.start) / (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            let x = range.start + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum();
            (x, density * norm)
        })
        .collect()
}

/// Data range widened by `pad` of its span; never empty.
fn value_range(values: impl Iterator<Item = f64>, pad: f64) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi - lo < f64::EPSILON {
        return (lo - 0.5)..(hi + 0.5);
    }
    let margin = (hi - lo) * pad;
    (lo - margin)..(hi + margin)
}

/// Axis from zero to just above the largest value.
fn zero_based(max: f64) -> Range<f64> {
    if max > 0.0 {
        0.0..max * 1.05
    } else {
        0.0..1.0
    }
}

/// Short tick label for large counts: 1.5K, 20M, 1B.
pub(crate) fn compact(value: f64) -> String {
    let magnitude = value.abs();
    let (scaled, suffix) = if magnitude >= 1e9 {
        (value / 1e9, "B")
    } else if magnitude >= 1e6 {
        (value / 1e6, "M")
    } else if magnitude >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    let text = format!("{:.1}", scaled);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{}{}", text, suffix)
}

/// Category name for a tick on a segmented axis.
fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

pub(super) fn rating_histogram(
    area: &Area,
    title: &str,
    table: &CleanedTable,
    bins: usize,
) -> ChartResult<()> {
    let ratings: Vec<f64> = table.iter().map(|r| r.rating).collect();
    let (start, width, counts) = histogram(&ratings, bins);
    let end = start + width * counts.len() as f64;

    // Density scaled to counts so both share the y axis
    let scale = ratings.len() as f64 * width;
    let kde: Vec<(f64, f64)> = gaussian_kde(&ratings, start..end, 200)
        .into_iter()
        .map(|(x, d)| (x, d * scale))
        .collect();

    let top = counts
        .iter()
        .map(|&c| c as f64)
        .chain(kde.iter().map(|p| p.1))
        .fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(start..end, zero_based(top))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Rating")
        .y_desc("Number of Apps")
        .label_style((FONT, LABEL_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    let bars = counts.iter().enumerate().map(|(i, &count)| {
        let x0 = start + width * i as f64;
        [(x0, 0.0), (x0 + width, count as f64)]
    });
    chart.draw_series(bars.clone().map(|corners| Rectangle::new(corners, SKY_BLUE.filled())))?;
    chart.draw_series(bars.map(|corners| Rectangle::new(corners, EDGE.stroke_width(1))))?;
    if !kde.is_empty() {
        chart.draw_series(LineSeries::new(kde, SKY_BLUE.stroke_width(2)))?;
    }
    Ok(())
}

pub(super) fn free_vs_paid(area: &Area, title: &str, table: &CleanedTable) -> ChartResult<()> {
    let area = area.titled(title, (FONT, CAPTION_SIZE))?;
    let (w, h) = area.dim_in_pixel();
    let center = (f64::from(w) / 2.0, f64::from(h) / 2.0);
    let radius = f64::from(w.min(h)) * 0.38;

    let label_style =
        TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    let point = |angle: f64, r: f64| {
        let (x, y) = (center.0 + r * angle.cos(), center.1 - r * angle.sin());
        (x.round() as i32, y.round() as i32)
    };

    let types = stats::type_counts(table);
    let total: usize = types.iter().map(|t| t.value).sum();
    if total == 0 {
        area.draw(&Text::new("No apps", point(0.0, 0.0), label_style))?;
        return Ok(());
    }

    let palette = [LIGHT_GREEN, ORANGE].into_iter().chain(SET2).cycle();
    let mut start = 0.0;
    for (group, color) in types.iter().zip(palette) {
        let share = group.value as f64 / total as f64;
        let sweep = share * 2.0 * PI;
        let steps = (sweep.to_degrees().ceil() as usize).max(2);

        let mut wedge = vec![point(0.0, 0.0)];
        wedge.extend((0..=steps).map(|s| point(start + sweep * s as f64 / steps as f64, radius)));
        area.draw(&Polygon::new(wedge, color.filled()))?;

        let middle = start + sweep / 2.0;
        area.draw(&Text::new(
            group.category.clone(),
            point(middle, radius * 1.12),
            label_style.clone(),
        ))?;
        area.draw(&Text::new(
            format!("{:.1}%", share * 100.0),
            point(middle, radius * 0.6),
            label_style.clone(),
        ))?;
        start += sweep;
    }
    Ok(())
}

/// Horizontal bars, first entry at the top.
fn horizontal_bars(
    area: &Area,
    title: &str,
    bars: &[(String, f64)],
    x_range: Range<f64>,
    color: RGBColor,
    x_desc: &str,
) -> ChartResult<()> {
    let n = bars.len();
    // Segment 0 is at the bottom, so the list is laid out in reverse
    let labels: Vec<String> = bars.iter().rev().map(|(name, _)| name.clone()).collect();
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size((longest as u32 * 6).clamp(60, 220))
        .build_cartesian_2d(x_range, (0..n.max(1) as i32).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n * 2 + 2)
        .y_label_formatter(&|v| segment_label(&labels, v))
        .x_desc(x_desc)
        .y_desc("Category")
        .label_style((FONT, 9))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        let slot = (n - 1 - i) as i32;
        let mut bar = Rectangle::new(
            [(0.0, SegmentValue::Exact(slot)), (*value, SegmentValue::Exact(slot + 1))],
            color.filled(),
        );
        bar.set_margin(2, 2, 0, 0);
        bar
    }))?;
    Ok(())
}

/// Vertical bars with one color per bar (cycling).
fn vertical_bars(
    area: &Area,
    title: &str,
    bars: &[(String, f64)],
    colors: &[RGBColor],
    (x_desc, y_desc): (&str, &str),
) -> ChartResult<()> {
    let n = bars.len();
    let labels: Vec<String> = bars.iter().map(|(name, _)| name.clone()).collect();
    let top = bars.iter().map(|b| b.1).fold(0.0, f64::max);
    let rotated = (FONT, 9).into_font().transform(FontTransform::Rotate90);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(110)
        .y_label_area_size(55)
        .build_cartesian_2d((0..n.max(1) as i32).into_segmented(), zero_based(top))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n * 2 + 2)
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_label_style(rotated)
        .y_label_formatter(&|v| compact(*v))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style((FONT, LABEL_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    let palette = colors.iter().cycle();
    chart.draw_series(bars.iter().zip(palette).enumerate().map(|(i, ((_, value), color))| {
        let slot = i as i32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(slot), 0.0), (SegmentValue::Exact(slot + 1), *value)],
            color.filled(),
        );
        bar.set_margin(0, 0, 4, 4);
        bar
    }))?;
    Ok(())
}

pub(super) fn category_counts(area: &Area, title: &str, table: &CleanedTable) -> ChartResult<()> {
    let bars: Vec<(String, f64)> = stats::category_counts(table)
        .into_iter()
        .map(|c| (c.category, c.value as f64))
        .collect();
    let top = bars.iter().map(|b| b.1).fold(0.0, f64::max);
    horizontal_bars(area, title, &bars, zero_based(top), DEFAULT_BLUE, "Count")
}

/// Scatter plot of `(x, y)` points.
fn scatter(
    area: &Area,
    title: &str,
    points: &[(f64, f64)],
    x_range: Range<f64>,
    style: ShapeStyle,
    (x_desc, y_desc): (&str, &str),
) -> ChartResult<()> {
    let y_range = value_range(points.iter().map(|p| p.1), 0.05);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|v| compact(*v))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style((FONT, LABEL_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, style)))?;
    Ok(())
}

pub(super) fn reviews_vs_rating(area: &Area, title: &str, table: &CleanedTable) -> ChartResult<()> {
    let points: Vec<(f64, f64)> = table.iter().map(|r| (r.reviews as f64, r.rating)).collect();
    let max_reviews = points.iter().map(|p| p.0).fold(0.0, f64::max);
    scatter(
        area,
        title,
        &points,
        zero_based(max_reviews),
        DEFAULT_BLUE.mix(0.3).filled(),
        ("Reviews", "Rating"),
    )
}

pub(super) fn installs_by_type(area: &Area, title: &str, table: &CleanedTable) -> ChartResult<()> {
    let groups = stats::installs_by_type(table);
    let labels: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();
    let n = groups.len().max(1);
    let top = groups.iter().flat_map(|(_, v)| v.iter().copied()).fold(0.0, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(-0.5..n as f64 - 0.5, zero_based(top))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|v| {
            let slot = v.round();
            if (v - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            labels.get(slot as usize).cloned().unwrap_or_default()
        })
        .y_label_formatter(&|v| compact(*v))
        .x_desc("Type")
        .y_desc("Installs")
        .label_style((FONT, LABEL_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    let half = 0.3;
    for (i, ((_, values), color)) in groups.iter().zip(SET2.iter().cycle()).enumerate() {
        let Some(q) = stats::quartiles(values) else {
            continue;
        };
        let x = i as f64;
        let line = EDGE.stroke_width(1);

        let corners = [(x - half, q.q1), (x + half, q.q3)];
        chart.draw_series(std::iter::once(Rectangle::new(corners, color.filled())))?;
        chart.draw_series(std::iter::once(Rectangle::new(corners, line)))?;
        chart.draw_series(
            [
                vec![(x - half, q.median), (x + half, q.median)],
                vec![(x, q.q1), (x, q.lower_whisker)],
                vec![(x, q.q3), (x, q.upper_whisker)],
                vec![(x - half / 2.0, q.lower_whisker), (x + half / 2.0, q.lower_whisker)],
                vec![(x - half / 2.0, q.upper_whisker), (x + half / 2.0, q.upper_whisker)],
            ]
            .into_iter()
            .map(|segment| PathElement::new(segment, line)),
        )?;
        chart.draw_series(q.outliers.iter().map(|&v| Circle::new((x, v), 3, line)))?;
    }
    Ok(())
}

pub(super) fn top_category_installs(
    area: &Area,
    title: &str,
    table: &CleanedTable,
    n: usize,
) -> ChartResult<()> {
    let bars: Vec<(String, f64)> = stats::category_installs(table, n)
        .into_iter()
        .map(|c| (c.category, c.value as f64))
        .collect();
    vertical_bars(area, title, &bars, &[SLATE_BLUE], ("Category", "Total Installs"))
}

pub(super) fn price_vs_rating(area: &Area, title: &str, table: &CleanedTable) -> ChartResult<()> {
    let points: Vec<(f64, f64)> = table
        .iter()
        .filter(|r| r.price > 0.0)
        .map(|r| (r.price, r.rating))
        .collect();
    let max_price = points.iter().map(|p| p.0).fold(0.0, f64::max);
    scatter(
        area,
        title,
        &points,
        zero_based(max_price),
        DARK_RED.filled(),
        ("Price ($)", "Rating"),
    )
}

pub(super) fn content_ratings(area: &Area, title: &str, table: &CleanedTable) -> ChartResult<()> {
    let bars: Vec<(String, f64)> = stats::content_rating_counts(table)
        .into_iter()
        .map(|c| (c.category, c.value as f64))
        .collect();
    vertical_bars(area, title, &bars, &SET2, ("Content Rating", "Number of Apps"))
}

pub(super) fn top_category_ratings(
    area: &Area,
    title: &str,
    table: &CleanedTable,
    n: usize,
) -> ChartResult<()> {
    let bars: Vec<(String, f64)> = stats::category_ratings(table, n)
        .into_iter()
        .map(|c| (c.category, c.value))
        .collect();
    horizontal_bars(area, title, &bars, 0.0..5.0, MEDIUM_SEA_GREEN, "Average Rating")
}
