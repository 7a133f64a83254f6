//! Session command implementation.

use chrono::Utc;
use colored::Colorize;

use crate::cli::args::{OutputFormat, SessionCommands};
use crate::core::{parse_duration, parse_timestamp};
use crate::error::PomoError;
use crate::features::sessions::{CompleteSession, NewSession, SessionQuery, SessionStore};
use crate::output::{format_deleted_json, format_page, format_session, format_session_pretty};

/// Execute session subcommands.
///
/// # Errors
///
/// Returns an error for invalid input, a missing session, or a database
/// failure.
pub fn session(
    store: &SessionStore,
    user: &str,
    cmd: SessionCommands,
    format: OutputFormat,
) -> Result<String, PomoError> {
    match cmd {
        SessionCommands::Create {
            start,
            duration,
            mode,
            notes,
        } => {
            let session = NewSession {
                start_time: parse_timestamp(&start)?,
                duration_seconds: duration_seconds(&duration)?,
                mode,
                notes,
            };
            let record = store.create(user, &session)?;
            tracing::info!(user, id = record.id, "session created");

            match format {
                OutputFormat::Json => format_session(&record, format),
                OutputFormat::Pretty => Ok(format!(
                    "{} session #{}\n{}",
                    "Created".green(),
                    record.id,
                    format_session_pretty(&record)
                )),
            }
        }

        SessionCommands::Complete {
            id,
            end,
            incomplete,
            notes,
        } => {
            let end_time = end
                .as_deref()
                .map(parse_timestamp)
                .transpose()?
                .unwrap_or_else(Utc::now);
            let record = store.complete(
                user,
                id,
                &CompleteSession {
                    end_time,
                    completed: !incomplete,
                    notes,
                },
            )?;

            match format {
                OutputFormat::Json => format_session(&record, format),
                OutputFormat::Pretty => {
                    let verb = if record.completed {
                        "Completed".green()
                    } else {
                        "Ended".yellow()
                    };
                    Ok(format!(
                        "{verb} session #{}\n{}",
                        record.id,
                        format_session_pretty(&record)
                    ))
                }
            }
        }

        SessionCommands::List {
            page,
            limit,
            mode,
            completed,
        } => {
            let page = store.list(
                user,
                &SessionQuery {
                    page,
                    limit,
                    mode,
                    completed,
                },
            )?;
            format_page(&page, format)
        }

        SessionCommands::Show { id } => format_session(&store.get(user, id)?, format),

        SessionCommands::Delete { id } => {
            store.delete(user, id)?;
            match format {
                OutputFormat::Json => format_deleted_json(id),
                OutputFormat::Pretty => Ok(format!("{} session #{id}", "Deleted".red())),
            }
        }
    }
}

/// Parse a duration argument into whole seconds.
fn duration_seconds(input: &str) -> Result<u32, PomoError> {
    parse_duration(input)
        .and_then(|d| u32::try_from(d.num_seconds()).ok())
        .ok_or_else(|| {
            PomoError::InvalidInput(format!(
                "Invalid duration '{input}' (expected e.g. 25m, 1h, 90s)"
            ))
        })
}
