//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::core::Phase;
use crate::tui::app::App;

const fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Work => Color::Red,
        Phase::Break => Color::Green,
        Phase::LongBreak => Color::Blue,
    }
}

/// Position in the cycle, 1-based. Breaks belong to the round just finished.
const fn current_round(phase: Phase, rounds_completed: u32, per_cycle: u32) -> u32 {
    let per_cycle = if per_cycle == 0 { 1 } else { per_cycle };
    match phase {
        Phase::Work => rounds_completed % per_cycle + 1,
        Phase::Break | Phase::LongBreak => rounds_completed.saturating_sub(1) % per_cycle + 1,
    }
}

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Countdown
            Constraint::Length(3), // Progress
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_countdown(frame, app, chunks[1]);
    render_progress(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let state = app.state();
    let color = phase_color(state.phase);
    let title = format!(
        " {} · round {} of {} ",
        state.phase.display_name(),
        current_round(state.phase, state.rounds_completed, app.rounds_per_cycle()),
        app.rounds_per_cycle()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    frame.render_widget(header, area);
}

fn render_countdown(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let state = app.state();
    let style = if state.running {
        Style::default()
            .fg(phase_color(state.phase))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(app.remaining(), style)),
        Line::from(""),
    ];
    if let Some(label) = &state.session_start_label {
        lines.push(Line::from(Span::styled(
            format!("started {label}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("{} rounds completed", state.rounds_completed),
        Style::default().fg(Color::DarkGray),
    )));

    let countdown = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(countdown, area);
}

fn render_progress(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(phase_color(app.state().phase)))
        .ratio(app.progress().clamp(0.0, 1.0));

    frame.render_widget(gauge, area);
}

fn render_status_bar(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let status = app.status.as_deref().unwrap_or("");
    let help = "s:start/pause | p:pause | r:reset | q:quit";

    let line = Line::from(vec![
        Span::styled(format!(" {status} "), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{} saved ", app.recorded),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}
