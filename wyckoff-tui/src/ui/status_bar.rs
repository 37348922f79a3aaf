//! Bottom status line — panel hints on the left, latest message on the right.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Panel, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    for i in 0..4 {
        let panel = Panel::from_index(i).unwrap();
        let label = format!(" {}:{} ", i + 1, panel.label());
        if panel == app.active_panel {
            spans.push(Span::styled(label, theme::selected()));
        } else {
            spans.push(Span::styled(label, theme::muted()));
        }
    }

    if let Some((message, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::muted(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(message.clone(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
