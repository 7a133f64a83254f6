use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::core::Phase;

#[derive(Parser)]
#[command(name = "pomo")]
#[command(about = "A Pomodoro timer with session history, streaks and rollups")]
#[command(long_about = "pomo - a Pomodoro timer for the terminal

Runs Work / Break / Long Break cycles, records every finished phase, and
reports streaks and daily, weekly and monthly totals.

QUICK START:
  pomo timer                      Start a 25/5/15 cycle
  pomo timer --work 50m           Longer work phases
  pomo stats streak               Current and longest streak
  pomo session list               Recent sessions

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

DATA:
  Sessions and settings live in ~/.pomo (override with POMO_HOME).")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` in the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// User whose sessions to read and write
    #[arg(short, long, global = true, env = "POMO_USER")]
    pub user: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    ///
    /// POMO_LOG takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive timer
    ///
    /// Opens a full-screen countdown. Every finished phase is saved as a
    /// completed session.
    ///
    /// # Keys
    ///
    ///   s, space    Start or pause
    ///   p           Pause
    ///   r           Reset to the start of a work phase
    ///   q, Esc      Quit
    ///
    /// # Examples
    ///
    ///   pomo timer
    ///   pomo timer --work 50m --short-break 10m
    ///   pomo timer --rounds 3 --quiet
    #[command(alias = "t")]
    Timer(TimerArgs),

    /// Create, complete, list and delete sessions
    #[command(alias = "s")]
    Session(SessionArgs),

    /// Streaks and session totals
    Stats(StatsArgs),

    /// Generate shell completions
    ///
    /// Writes a completion script to stdout.
    ///
    /// Example: pomo completions zsh > ~/.zsh/completions/_pomo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Show installation instructions instead of the script
        #[arg(long, short = 'i')]
        install: bool,
    },
}

impl Commands {
    /// Whether the command takes over the terminal with a full-screen UI.
    #[must_use]
    pub const fn owns_terminal(&self) -> bool {
        matches!(self, Self::Timer(_))
    }
}

/// Timer options. Unset values come from the config file.
#[derive(Args, Debug, Default)]
pub struct TimerArgs {
    /// Work phase length (e.g., 25m, 1h, 90s, 25)
    #[arg(long, short = 'w')]
    pub work: Option<String>,

    /// Short break length
    #[arg(long, short = 'b')]
    pub short_break: Option<String>,

    /// Long break length
    #[arg(long, short = 'l')]
    pub long_break: Option<String>,

    /// Work rounds before a long break
    #[arg(long, short = 'r')]
    pub rounds: Option<u32>,

    /// Disable the end-of-phase notification
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommands,
}

/// Session subcommands.
#[derive(Subcommand)]
pub enum SessionCommands {
    /// Record a session
    ///
    /// Examples:
    ///   pomo session create --start "2024-03-10 09:00" --duration 25m --mode work
    ///   pomo session create --start now --duration 5m --mode break
    Create {
        /// When the session began (RFC 3339, 'YYYY-MM-DD HH:MM' or 'now')
        #[arg(long)]
        start: String,

        /// Session length (e.g., 25m, 1h, 90s)
        #[arg(long, short = 'd')]
        duration: String,

        /// Phase: work, break or longBreak
        #[arg(long, short = 'm', value_parser = parse_phase, default_value = "work")]
        mode: Phase,

        /// Notes for this session
        #[arg(long, short = 'n')]
        notes: Option<String>,
    },

    /// Finish a session
    Complete {
        /// Session ID
        id: i64,

        /// When the session ended (defaults to now)
        #[arg(long)]
        end: Option<String>,

        /// Record the session as not completed
        #[arg(long)]
        incomplete: bool,

        /// Replace the session notes
        #[arg(long, short = 'n')]
        notes: Option<String>,
    },

    /// List sessions, newest first
    #[command(alias = "ls")]
    List {
        /// Page number, starting at 1
        #[arg(long, short = 'p', default_value = "1")]
        page: u32,

        /// Sessions per page
        #[arg(long, short = 'l', default_value = "10")]
        limit: u32,

        /// Only sessions of this phase
        #[arg(long, short = 'm', value_parser = parse_phase)]
        mode: Option<Phase>,

        /// Only completed (true) or unfinished (false) sessions
        #[arg(long, short = 'c')]
        completed: Option<bool>,
    },

    /// Show one session
    Show {
        /// Session ID
        id: i64,
    },

    /// Delete a session
    #[command(alias = "rm")]
    Delete {
        /// Session ID
        id: i64,
    },
}

#[derive(Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommands,
}

/// Stats subcommands.
#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatsCommands {
    /// Lifetime totals, averages and streaks
    Overall,
    /// Totals per day over the last week
    Daily,
    /// Totals per ISO week over the last four weeks
    Weekly,
    /// Totals per month over the last year
    Monthly,
    /// Current and longest daily streak of completed work
    Streak,
}

fn parse_phase(s: &str) -> Result<Phase, String> {
    Phase::parse(s).map_err(|e| e.to_string())
}
