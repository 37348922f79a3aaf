//! Panel 1 — Settings: ticker picker, date range, window, run.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, SettingsField};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let s = &app.settings;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "Backtest Settings",
        theme::accent(),
    )));
    lines.push(Line::from(""));

    // Ticker row: the watchlist laid out horizontally, selection highlighted.
    let mut ticker_spans: Vec<Span> = vec![field_label("Ticker", s.focus == SettingsField::Ticker)];
    for (i, ticker) in s.watchlist.tickers.iter().enumerate() {
        ticker_spans.push(Span::raw(" "));
        if i == s.selected {
            ticker_spans.push(Span::styled(format!(" {ticker} "), theme::selected()));
        } else {
            ticker_spans.push(Span::styled(format!(" {ticker} "), theme::muted()));
        }
    }
    lines.push(Line::from(ticker_spans));
    lines.push(Line::from(""));

    lines.push(input_line(
        "Start date",
        &s.start_input,
        s.focus == SettingsField::Start,
    ));
    lines.push(input_line(
        "End date",
        &s.end_input,
        s.focus == SettingsField::End,
    ));
    lines.push(input_line(
        "Window",
        &s.window_input,
        s.focus == SettingsField::Window,
    ));
    lines.push(input_line(
        "Add ticker",
        &s.add_ticker_input,
        s.focus == SettingsField::AddTicker,
    ));
    lines.push(Line::from(""));

    if s.backtest_in_progress {
        lines.push(Line::from(Span::styled(
            "Running backtest...",
            theme::warning(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Press Enter to run the backtest",
            theme::muted(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "j/k or arrows: move field   h/l: change ticker   Enter on Add ticker: extend the list",
        theme::muted(),
    )));

    f.render_widget(Paragraph::new(lines), area);
}

fn field_label(name: &str, focused: bool) -> Span<'static> {
    let text = format!("{name:<11}");
    if focused {
        Span::styled(text, theme::accent())
    } else {
        Span::styled(text, theme::muted())
    }
}

fn input_line<'a>(name: &str, value: &'a str, focused: bool) -> Line<'a> {
    let value_span = if focused {
        Span::styled(format!("{value}_"), theme::accent())
    } else {
        Span::raw(value.to_string())
    };
    Line::from(vec![field_label(name, focused), value_span])
}
