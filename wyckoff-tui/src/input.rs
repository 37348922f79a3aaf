//! Keyboard input dispatch — global keys, then panel-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Panel, SettingsField};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // A focused text field captures printable keys and Backspace before the
    // global bindings, so dates and ticker symbols can contain '1'..'4' or 'q'.
    if app.active_panel == Panel::Settings
        && app.settings.focus.is_text_entry()
        && matches!(key.code, KeyCode::Char(_) | KeyCode::Backspace)
    {
        handle_settings_key(app, key);
        return;
    }

    // Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => {
            app.active_panel = Panel::Settings;
            return;
        }
        KeyCode::Char('2') => {
            app.active_panel = Panel::Chart;
            return;
        }
        KeyCode::Char('3') => {
            app.active_panel = Panel::Metrics;
            return;
        }
        KeyCode::Char('4') => {
            app.active_panel = Panel::Help;
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        _ => {}
    }

    match app.active_panel {
        Panel::Settings => handle_settings_key(app, key),
        Panel::Chart | Panel::Metrics | Panel::Help => {} // display only
    }
}

fn handle_settings_key(app: &mut AppState, key: KeyEvent) {
    let settings = &mut app.settings;
    let text_entry = settings.focus.is_text_entry();

    match key.code {
        KeyCode::Down => settings.focus = settings.focus.next(),
        KeyCode::Up => settings.focus = settings.focus.prev(),
        KeyCode::Char('j') if !text_entry => settings.focus = settings.focus.next(),
        KeyCode::Char('k') if !text_entry => settings.focus = settings.focus.prev(),
        KeyCode::Enter => {
            if settings.focus == SettingsField::AddTicker {
                app.add_ticker();
            } else {
                app.launch_backtest();
            }
        }
        KeyCode::Left | KeyCode::Char('h') if settings.focus == SettingsField::Ticker => {
            if settings.selected > 0 {
                settings.selected -= 1;
            }
        }
        KeyCode::Right | KeyCode::Char('l') if settings.focus == SettingsField::Ticker => {
            if settings.selected + 1 < settings.watchlist.len() {
                settings.selected += 1;
            }
        }
        KeyCode::Backspace => match settings.focus {
            SettingsField::Start => {
                settings.start_input.pop();
            }
            SettingsField::End => {
                settings.end_input.pop();
            }
            SettingsField::Window => {
                settings.window_input.pop();
            }
            SettingsField::AddTicker => {
                settings.add_ticker_input.pop();
            }
            SettingsField::Ticker => {}
        },
        KeyCode::Char(c) => match settings.focus {
            SettingsField::Start => settings.start_input.push(c),
            SettingsField::End => settings.end_input.push(c),
            SettingsField::Window => {
                if c.is_ascii_digit() {
                    settings.window_input.push(c);
                }
            }
            SettingsField::AddTicker => {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    settings.add_ticker_input.push(c.to_ascii_uppercase());
                }
            }
            SettingsField::Ticker => {}
        },
        _ => {}
    }
}
