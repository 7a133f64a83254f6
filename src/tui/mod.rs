//! Terminal User Interface (TUI) for the timer.
//!
//! A full-screen countdown built with ratatui and crossterm. The loop polls
//! for keys, applies queued ticks, saves finished phases and redraws.

mod app;
mod event;
mod ui;

pub use app::App;

use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::error::PomoError;
use crate::features::sessions::SessionStore;
use crate::features::timer::TimerRunner;

/// Longest wait for input before the screen is redrawn.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Run the timer TUI until the user quits.
///
/// Returns the number of phases saved.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to, or the
/// tick source cannot be started.
pub fn run(runner: TimerRunner, store: &SessionStore, user: &str) -> Result<usize, PomoError> {
    enable_raw_mode()
        .map_err(|e| PomoError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(PomoError::Terminal(format!("Failed to setup terminal: {e}")));
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            disable_raw_mode().ok();
            execute!(io::stdout(), LeaveAlternateScreen).ok();
            return Err(PomoError::Terminal(format!("Failed to create terminal: {e}")));
        }
    };

    let mut app = App::new(runner, store, user);
    let result = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result.map(|()| app.recorded)
}

/// Run the main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App<'_>) -> Result<(), PomoError> {
    while !app.should_quit {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| PomoError::Terminal(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::next_action(FRAME_INTERVAL)? {
            match action {
                event::Action::Quit => app.quit(),
                event::Action::Toggle => app.toggle()?,
                event::Action::Pause => app.pause(),
                event::Action::Reset => app.reset(),
            }
        }

        app.on_tick();
    }

    Ok(())
}
