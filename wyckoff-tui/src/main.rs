//! Wyckoff TUI — four-panel terminal interface for the accumulation backtester.
//!
//! Panels:
//! 1. Settings — ticker, date range, rolling window
//! 2. Chart — strategy vs buy-and-hold equity curves
//! 3. Metrics — total returns and pattern counts
//! 4. Help — keyboard shortcuts and method summary

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::{AppState, ResultState};
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let cache_dir = PathBuf::from("data");

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx);

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, cache_dir);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Drain worker responses (non-blocking).
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // Poll for input events (50ms timeout for ~20 FPS tick).
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::Status(message) => {
            app.set_status(message);
        }
        WorkerResponse::BacktestDone {
            symbol,
            start,
            end,
            report,
        } => {
            app.settings.backtest_in_progress = false;
            let summary = report
                .metrics
                .rows()
                .iter()
                .map(|(label, value)| format!("{label}: {value}"))
                .collect::<Vec<_>>()
                .join("  ");
            app.result = Some(ResultState {
                symbol: symbol.clone(),
                start,
                end,
                report,
            });
            app.active_panel = app::Panel::Chart;
            app.set_status(format!("{symbol} done. {summary}"));
        }
        WorkerResponse::BacktestFailed { symbol, error } => {
            app.settings.backtest_in_progress = false;
            app.set_error(format!("{symbol}: {error}"));
        }
    }
}
