//! Panel 2 — Chart: strategy vs buy-and-hold cumulative equity curves.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(result) = &app.result else {
        f.render_widget(
            Paragraph::new("No backtest yet. Run one from the Settings panel.")
                .style(theme::muted()),
            area,
        );
        return;
    };

    let equity = &result.report.equity;

    let strategy = series_points(&equity.strategy);
    let buy_hold = series_points(&equity.buy_hold);

    let (y_min, y_max) = value_bounds(&equity.strategy, &equity.buy_hold);
    let x_max = equity.len().saturating_sub(1).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("Buy/Hold")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::MUTED))
            .data(&buy_hold),
        Dataset::default()
            .name("Wyckoff")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::ACCENT))
            .data(&strategy),
    ];

    let title = format!(
        "{} {} to {} ({} bars)",
        result.symbol,
        result.start,
        result.end,
        equity.len()
    );

    let x_labels = x_axis_labels(equity);
    let y_labels = vec![
        Span::styled(format!("{y_min:.2}"), theme::muted()),
        Span::styled(format!("{:.2}", (y_min + y_max) / 2.0), theme::muted()),
        Span::styled(format!("{y_max:.2}"), theme::muted()),
    ];

    let chart = Chart::new(datasets)
        .block(
            ratatui::widgets::Block::default()
                .title(Span::styled(title, theme::accent())),
        )
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("cum. return")
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

/// Convert a curve into (index, value) points, skipping NaN entries.
fn series_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

/// Shared y bounds over both curves, with a little headroom.
fn value_bounds(a: &[f64], b: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in a.iter().chain(b).filter(|v| !v.is_nan()) {
        min = min.min(*v);
        max = max.max(*v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(0.01);
    (min - pad, max + pad)
}

fn x_axis_labels(equity: &wyckoff_core::backtest::EquityCurve) -> Vec<Span<'static>> {
    let n = equity.dates.len();
    if n == 0 {
        return Vec::new();
    }
    let mid = n / 2;
    vec![
        Span::styled(equity.dates[0].to_string(), theme::muted()),
        Span::styled(equity.dates[mid].to_string(), theme::muted()),
        Span::styled(equity.dates[n - 1].to_string(), theme::muted()),
    ]
}
