//! Style tokens — neon accents on the terminal's default background.

use ratatui::style::{Color, Modifier, Style};

/// Electric cyan accent (focus, strategy curve).
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
/// Neon green (gains, success).
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
/// Hot pink (losses, failures).
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
/// Neon orange (warnings).
pub const WARNING: Color = Color::Rgb(255, 140, 0);
/// Steel blue (secondary text, buy-and-hold curve).
pub const MUTED: Color = Color::Rgb(100, 149, 237);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn selected() -> Style {
    Style::default().fg(Color::Black).bg(ACCENT)
}

/// Color for a signed return value.
pub fn pnl_color(value: f64) -> Color {
    if value >= 0.0 {
        POSITIVE
    } else {
        NEGATIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pnl_color_sign() {
        assert_eq!(pnl_color(0.1), POSITIVE);
        assert_eq!(pnl_color(0.0), POSITIVE);
        assert_eq!(pnl_color(-0.1), NEGATIVE);
    }
}
