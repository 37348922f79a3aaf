//! Panel 3 — Metrics: total-return table plus pattern counts.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
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

    let report = &result.report;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("{}  {} to {}", result.symbol, result.start, result.end),
        theme::accent(),
    )));
    lines.push(Line::from(""));

    for (label, value) in report.metrics.rows() {
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<28}"), theme::muted()),
            Span::styled(value.clone(), Style::default().fg(theme::pnl_color(pct_sign(value)))),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<28}", "Springs detected"), theme::muted()),
        Span::raw(report.spring_count.to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<28}", "Breakouts detected"), theme::muted()),
        Span::raw(report.breakout_count.to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<28}", "Weakness exits"), theme::muted()),
        Span::raw(report.exit_count.to_string()),
    ]));

    f.render_widget(Paragraph::new(lines), area);
}

/// Sign of a formatted percentage, for coloring. "nan%" counts as negative.
fn pct_sign(value: &str) -> f64 {
    if value.starts_with('-') || value.contains("nan") {
        -1.0
    } else {
        1.0
    }
}
