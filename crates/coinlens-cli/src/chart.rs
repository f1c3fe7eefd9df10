//! Terminal line-chart rendering.
//!
//! Fixed-height ASCII chart with price ticks on the y axis, the date range
//! along the x axis, and a marker legend for overlaid series.

use coinlens_core::Series;

const MARKERS: [char; 4] = ['*', '+', 'o', 'x'];
const LABEL_WIDTH: usize = 12;

/// One labeled series to draw.
pub struct ChartSeries<'a> {
    pub label: &'a str,
    pub series: &'a Series,
}

/// Renders one or more non-empty series onto shared axes.
///
/// Columns sample the nearest point in time, so series with different
/// sampling granularities still line up on the same x axis.
pub fn render(serieses: &[ChartSeries<'_>], width: usize, height: usize) -> String {
    let points = serieses
        .iter()
        .flat_map(|s| s.series.points.iter())
        .collect::<Vec<_>>();
    if points.is_empty() {
        return String::from("(no data)\n");
    }

    let width = width.max(16);
    let height = height.max(4);

    let t_min = points.iter().map(|p| p.timestamp.unix_millis()).min().unwrap_or(0);
    let t_max = points.iter().map(|p| p.timestamp.unix_millis()).max().unwrap_or(0);
    let p_min = points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let p_max = points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);

    let t_span = (t_max - t_min).max(1) as f64;
    let p_span = (p_max - p_min).max(f64::EPSILON);

    let mut grid = vec![vec![' '; width]; height];
    for (row_index, row) in grid.iter_mut().enumerate() {
        if height > 4 && row_index % (height / 4).max(1) == 0 {
            row.fill('·');
        }
    }

    for (series_index, chart_series) in serieses.iter().enumerate() {
        let marker = MARKERS[series_index % MARKERS.len()];
        let samples = &chart_series.series.points;
        if samples.is_empty() {
            continue;
        }

        for col in 0..width {
            let target = t_min + ((t_span * col as f64) / (width - 1).max(1) as f64) as i64;
            let idx = nearest_index(samples, target);
            let price = samples[idx].price;
            let row = ((p_max - price) / p_span * (height - 1) as f64).round() as usize;
            grid[row.min(height - 1)][col] = marker;
        }
    }

    let mut out = String::new();
    out.push_str(&format!("{:>width$}\n", "Price (USD)", width = LABEL_WIDTH));

    let tick_step = (height / 4).max(1);
    for (row_index, row) in grid.iter().enumerate() {
        let line: String = row.iter().collect();
        if row_index % tick_step == 0 || row_index == height - 1 {
            let fraction = row_index as f64 / (height - 1) as f64;
            let price = p_max - fraction * p_span;
            out.push_str(&format!(
                "{:>width$} ┤{}\n",
                format_price(price),
                line,
                width = LABEL_WIDTH
            ));
        } else {
            out.push_str(&format!("{:>width$} │{}\n", "", line, width = LABEL_WIDTH));
        }
    }

    out.push_str(&format!(
        "{:>width$} └{}\n",
        "",
        "─".repeat(width),
        width = LABEL_WIDTH
    ));

    let first_date = serieses
        .iter()
        .filter_map(|s| s.series.first())
        .map(|p| p.timestamp.date().to_string())
        .min()
        .unwrap_or_default();
    let last_date = serieses
        .iter()
        .filter_map(|s| s.series.last())
        .map(|p| p.timestamp.date().to_string())
        .max()
        .unwrap_or_default();
    let gap = width.saturating_sub(first_date.len() + last_date.len());
    out.push_str(&format!(
        "{:>width$} {}{}{}\n",
        "",
        first_date,
        " ".repeat(gap),
        last_date,
        width = LABEL_WIDTH
    ));
    out.push_str(&format!("{:>width$}Date\n", "", width = LABEL_WIDTH + width / 2));

    if serieses.len() > 1 {
        out.push('\n');
        for (series_index, chart_series) in serieses.iter().enumerate() {
            let marker = MARKERS[series_index % MARKERS.len()];
            out.push_str(&format!("  {marker} {}\n", chart_series.label));
        }
    }

    out
}

fn nearest_index(points: &[coinlens_core::PricePoint], target_millis: i64) -> usize {
    let after = points.partition_point(|p| p.timestamp.unix_millis() < target_millis);
    if after == 0 {
        return 0;
    }
    if after >= points.len() {
        return points.len() - 1;
    }
    let before_gap = target_millis - points[after - 1].timestamp.unix_millis();
    let after_gap = points[after].timestamp.unix_millis() - target_millis;
    if before_gap <= after_gap {
        after - 1
    } else {
        after
    }
}

pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 {
        format!("{price:.2}")
    } else {
        format!("{price:.6}")
    }
}

#[cfg(test)]
mod tests {
    use coinlens_core::{PricePoint, Series, UtcDateTime};

    use super::*;

    fn series(samples: &[(i64, f64)]) -> Series {
        Series::new(
            samples
                .iter()
                .map(|&(millis, price)| {
                    PricePoint::new(
                        UtcDateTime::from_unix_millis(millis).expect("valid"),
                        price,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn renders_axis_labels_and_date_range() {
        let s = series(&[
            (1_700_000_000_000, 10.0),
            (1_700_086_400_000, 30.0),
            (1_700_172_800_000, 5.0),
        ]);
        let chart = render(&[ChartSeries { label: "Bitcoin", series: &s }], 40, 8);

        assert!(chart.contains("Price (USD)"));
        assert!(chart.contains("Date"));
        assert!(chart.contains("2023-11-14"));
        assert!(chart.contains("2023-11-16"));
        assert!(chart.contains('*'));
    }

    #[test]
    fn overlay_includes_a_legend_with_both_labels() {
        let a = series(&[(0, 1.0), (86_400_000, 2.0)]);
        let b = series(&[(0, 3.0), (86_400_000, 4.0)]);
        let chart = render(
            &[
                ChartSeries { label: "Bitcoin", series: &a },
                ChartSeries { label: "Ethereum", series: &b },
            ],
            40,
            8,
        );

        assert!(chart.contains("* Bitcoin"));
        assert!(chart.contains("+ Ethereum"));
    }

    #[test]
    fn flat_series_does_not_divide_by_zero() {
        let s = series(&[(0, 7.0), (86_400_000, 7.0)]);
        let chart = render(&[ChartSeries { label: "Flat", series: &s }], 30, 6);
        assert!(chart.contains('*'));
    }

    #[test]
    fn empty_input_renders_placeholder() {
        assert_eq!(render(&[], 40, 8), "(no data)\n");
    }

    #[test]
    fn sub_unit_prices_keep_precision() {
        assert_eq!(format_price(0.000123), "0.000123");
        assert_eq!(format_price(42000.5), "42000.50");
    }
}
