use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};

use crate::core::{format_duration, Phase};
use crate::features::sessions::{SessionPage, SessionRecord};
use crate::features::stats::{
    render_rollup_chart, render_sparkline, Granularity, OverallStats, Rollup, StreakSummary,
};

const RULE_WIDTH: usize = 60;
const CHART_WIDTH: usize = 30;

fn local(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn phase_label(phase: Phase) -> ColoredString {
    match phase {
        Phase::Work => phase.display_name().red(),
        Phase::Break => phase.display_name().green(),
        Phase::LongBreak => phase.display_name().blue(),
    }
}

fn status_icon(record: &SessionRecord) -> ColoredString {
    if record.completed {
        "[x]".green()
    } else if record.end_time.is_some() {
        "[-]".red()
    } else {
        "[ ]".white()
    }
}

fn skipped_note(skipped: usize) -> Option<String> {
    (skipped > 0).then(|| {
        format!("{skipped} malformed session(s) ignored")
            .yellow()
            .to_string()
    })
}

/// Format a single session as pretty output
pub fn format_session_pretty(record: &SessionRecord) -> String {
    let mut output = format!(
        "{} {} {}\n",
        status_icon(record),
        phase_label(record.mode).bold(),
        format_duration(u64::from(record.duration_seconds))
    );
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), record.id));
    output.push_str(&format!("  {}: {}\n", "Started".dimmed(), local(&record.start_time)));
    if let Some(end) = &record.end_time {
        output.push_str(&format!("  {}: {}\n", "Ended".dimmed(), local(end)));
    }
    output.push_str(&format!(
        "  {}: {}\n",
        "Completed".dimmed(),
        if record.completed { "yes" } else { "no" }
    ));
    if record.rounds > 0 {
        output.push_str(&format!("  {}: {}\n", "Rounds".dimmed(), record.rounds));
    }
    if let Some(notes) = &record.notes {
        output.push_str(&format!("  {}: {}\n", "Notes".dimmed(), notes));
    }

    output
}

/// Format a page of sessions as a list
pub fn format_page_pretty(page: &SessionPage) -> String {
    if page.sessions.is_empty() {
        return format!("Sessions ({} total)\n  No sessions", page.total);
    }

    let mut output = format!(
        "Sessions ({} total, page {} of {})\n",
        page.total, page.current_page, page.total_pages
    );
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');

    for record in &page.sessions {
        let mut line = format!(
            "{} {:>5}  {}  {:<10} {:>8}",
            status_icon(record),
            format!("#{}", record.id).dimmed(),
            local(&record.start_time),
            phase_label(record.mode),
            format_duration(u64::from(record.duration_seconds)),
        );
        if let Some(notes) = &record.notes {
            line.push_str(&format!("  {}", notes.dimmed()));
        }
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format streaks
pub fn format_streak_pretty(streak: &StreakSummary) -> String {
    let mut lines = vec![
        "Streak".bold().to_string(),
        "─".repeat(RULE_WIDTH),
        format!(
            "  Current: {} {}",
            streak.current_streak.to_string().green().bold(),
            days(streak.current_streak)
        ),
        format!(
            "  Longest: {} {}",
            streak.longest_streak.to_string().cyan(),
            days(streak.longest_streak)
        ),
    ];
    if let Some(note) = skipped_note(streak.skipped) {
        lines.push(String::new());
        lines.push(note);
    }
    lines.join("\n")
}

const fn days(n: u32) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

/// Format a rollup as a table followed by a work-time chart
pub fn format_rollup_pretty(rollup: &Rollup) -> String {
    let title = match rollup.granularity {
        Granularity::Daily => "Daily",
        Granularity::Weekly => "Weekly",
        Granularity::Monthly => "Monthly",
    };
    let since = rollup
        .window_start
        .with_timezone(&Local)
        .format("%Y-%m-%d");

    let mut lines = vec![
        format!("{} {}", title.bold(), format!("(since {since})").dimmed()),
        "─".repeat(RULE_WIDTH),
    ];

    if rollup.periods.is_empty() {
        lines.push("  No completed sessions".to_string());
    } else {
        lines.push(
            format!(
                "{:<12} {:>6} {:>10} {:>10} {:>6}",
                "Period", "Work", "Work time", "Break", "Total"
            )
            .dimmed()
            .to_string(),
        );
        for p in &rollup.periods {
            lines.push(format!(
                "{:<12} {:>6} {:>10} {:>10} {:>6}",
                p.period,
                p.work_sessions,
                format_duration(p.work_time),
                format_duration(p.break_time),
                p.total_sessions
            ));
        }

        let totals = rollup.totals();
        lines.push("─".repeat(RULE_WIDTH));
        lines.push(
            format!(
                "{:<12} {:>6} {:>10} {:>10} {:>6}",
                "Total",
                totals.work_sessions,
                format_duration(totals.work_time),
                format_duration(totals.break_time),
                totals.total_sessions
            )
            .bold()
            .to_string(),
        );

        lines.push(String::new());
        lines.push(render_rollup_chart(rollup, CHART_WIDTH).red().to_string());

        if rollup.periods.len() > 1 {
            let sessions: Vec<u64> = rollup
                .periods
                .iter()
                .map(|p| u64::from(p.work_sessions))
                .collect();
            lines.push(format!("{} {}", "Trend".dimmed(), render_sparkline(&sessions)));
        }
    }

    if let Some(note) = skipped_note(rollup.skipped) {
        lines.push(String::new());
        lines.push(note);
    }

    lines.join("\n")
}

/// Format lifetime stats
pub fn format_overall_pretty(stats: &OverallStats) -> String {
    let mut lines = vec!["Overall".bold().to_string(), "─".repeat(RULE_WIDTH)];

    lines.push(format!(
        "  {:<20} {}",
        "Work sessions:",
        stats.total_work_sessions.to_string().green()
    ));
    lines.push(format!(
        "  {:<20} {}",
        "Work time:",
        format_duration(stats.total_work_time)
    ));
    lines.push(format!(
        "  {:<20} {}",
        "Break time:",
        format_duration(stats.total_break_time)
    ));
    lines.push(format!(
        "  {:<20} {}",
        "Long break time:",
        format_duration(stats.total_long_break_time)
    ));
    lines.push(format!("  {:<20} {}", "Rounds:", stats.total_rounds));
    lines.push(format!(
        "  {:<20} {}",
        "Average session:",
        format_duration(stats.average_session_length)
    ));
    lines.push(format!(
        "  {:<20} {} {}",
        "Current streak:",
        stats.current_streak.to_string().green().bold(),
        days(stats.current_streak)
    ));
    lines.push(format!(
        "  {:<20} {} {}",
        "Longest streak:",
        stats.longest_streak.to_string().cyan(),
        days(stats.longest_streak)
    ));
    lines.push(format!(
        "  {:<20} {}",
        "Last active:",
        stats
            .last_active
            .as_ref()
            .map_or_else(|| "never".to_string(), local)
    ));

    if let Some(note) = skipped_note(stats.skipped) {
        lines.push(String::new());
        lines.push(note);
    }

    lines.join("\n")
}
