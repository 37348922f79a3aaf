//! Panel 4 — Help: key bindings and a short method description.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Key bindings", theme::accent())),
        Line::from(""),
        key_line("1-4", "jump to a panel"),
        key_line("Tab / Shift-Tab", "cycle panels"),
        key_line("j / k", "move between settings fields"),
        key_line("h / l", "change the selected ticker"),
        key_line("Enter", "run the backtest (on Add ticker: extend the list)"),
        key_line("q", "quit"),
        Line::from(""),
        Line::from(Span::styled("Method", theme::accent())),
        Line::from(""),
        Line::from(
            "Closes are ranged over a rolling window. A spring is a dip under the",
        ),
        Line::from(
            "prior range low that closes back above it on above-average volume; a",
        ),
        Line::from(
            "breakout is a close above the prior range high on above-average volume.",
        ),
        Line::from(
            "Either enters a long position; a close slipping back under the range",
        ),
        Line::from("high exits. The equity curve accumulates daily close-to-close"),
        Line::from("returns while long, next to a buy-and-hold baseline."),
    ];

    f.render_widget(Paragraph::new(lines), area);
}

fn key_line(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<16}"), theme::accent()),
        Span::styled(action.to_string(), theme::muted()),
    ])
}
