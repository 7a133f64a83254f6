use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use pomo::cli::args::{Cli, Commands};
use pomo::cli::commands;
use pomo::config::{Config, Paths};
use pomo::features::sessions::SessionStore;
use pomo::logging::{self, LogTarget};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, &log_target(&cli.command));

    let config = Config::load().context("loading configuration")?;
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);
    let user = config.resolve_user(cli.user.as_deref());
    tracing::debug!(%user, ?format, "resolved invocation");

    let output = match cli.command {
        Commands::Timer(args) => commands::timer(&open_store()?, &user, &args, &config)?,
        Commands::Session(args) => commands::session(&open_store()?, &user, args.command, format)?,
        Commands::Stats(args) => {
            commands::stats(&open_store()?, &user, args.command, &config.stats, format)?
        }
        Commands::Completions { shell, install } => commands::completions(shell, install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Logs written to stderr would draw over a full-screen command.
fn log_target(command: &Commands) -> LogTarget {
    if !command.owns_terminal() {
        return LogTarget::Stderr;
    }
    Paths::new().map_or(LogTarget::Discard, |paths| LogTarget::File(paths.log_file))
}

fn open_store() -> Result<SessionStore> {
    SessionStore::new().context("opening session database")
}
