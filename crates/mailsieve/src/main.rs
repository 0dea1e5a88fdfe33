//! `mailsieve` - keep mail from senders that matter, delete the rest.
//!
//! Sender verdicts live in a local `SQLite` database. `categorize` fills it
//! from a folder's messages, `mark` edits it by hand and `delete` removes
//! mail whose sender is not marked important.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod commands;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mailsieve_core::Importance;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "mailsieve", version, about)]
struct Cli {
    /// Config file (default: <config dir>/mailsieve/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify every sender in a folder and store the verdicts
    Categorize {
        /// Folder to scan (default from config, else INBOX)
        #[arg(long)]
        folder: Option<String>,
        /// Trusted domain suffix, replaces the configured list (repeatable)
        #[arg(long = "trusted", value_name = "DOMAIN")]
        trusted: Vec<String>,
    },
    /// Delete messages whose sender is not marked important
    ///
    /// Only the most recent messages by Date header are considered, 200 by
    /// default. Earlier releases documented 200 but stopped at 10.
    Delete {
        /// Folder to clean (default from config, else INBOX)
        #[arg(long)]
        folder: Option<String>,
        /// Number of most recent messages to consider (0 deletes nothing)
        #[arg(long, conflicts_with = "all")]
        limit: Option<usize>,
        /// Consider every message in the folder
        #[arg(long)]
        all: bool,
    },
    /// Mark one sender
    Mark {
        /// Sender address, stored exactly as given
        address: String,
        /// important or unimportant
        status: Importance,
    },
    /// Mark several senders at once
    MarkBulk {
        /// important or unimportant
        status: Importance,
        /// Sender addresses
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Remove every unimportant sender from the database
    Purge,
    /// List stored senders
    Senders {
        /// Only important senders
        #[arg(long, conflicts_with = "unimportant")]
        important: bool,
        /// Only unimportant senders
        #[arg(long)]
        unimportant: bool,
    },
    /// Manage the IMAP password in the system keyring
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum PasswordAction {
    /// Read the password from standard input and store it
    Set,
    /// Remove the stored password
    Clear,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "mailsieve=debug,mailsieve_core=debug,mailsieve_imap=debug"
    } else {
        "mailsieve=info,mailsieve_core=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    let ok = match cli.command {
        Command::Categorize { folder, trusted } => {
            commands::categorize(&settings, folder, &trusted).await?
        }
        Command::Delete { folder, limit, all } => {
            commands::delete(&settings, folder, limit, all).await?
        }
        Command::Mark { address, status } => commands::mark(&settings, &address, status).await?,
        Command::MarkBulk { status, addresses } => {
            commands::mark_bulk(&settings, &addresses, status).await?
        }
        Command::Purge => commands::purge(&settings).await?,
        Command::Senders {
            important,
            unimportant,
        } => {
            let filter = match (important, unimportant) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::senders(&settings, filter).await?
        }
        Command::Password { action } => match action {
            PasswordAction::Set => commands::password_set(&settings)?,
            PasswordAction::Clear => commands::password_clear(&settings)?,
        },
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn mark_parses_status() {
        let cli = Cli::try_parse_from(["mailsieve", "mark", "a@b.test", "important"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Mark { ref address, status: Importance::Important } if address == "a@b.test"
        ));
        assert!(Cli::try_parse_from(["mailsieve", "mark", "a@b.test", "meh"]).is_err());
    }

    #[test]
    fn delete_limit_and_all_conflict() {
        assert!(Cli::try_parse_from(["mailsieve", "delete", "--limit", "5", "--all"]).is_err());
        let cli = Cli::try_parse_from(["mailsieve", "delete", "--limit", "5"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { limit: Some(5), all: false, .. }));
    }

    #[test]
    fn mark_bulk_needs_addresses() {
        assert!(Cli::try_parse_from(["mailsieve", "mark-bulk", "unimportant"]).is_err());
        let cli =
            Cli::try_parse_from(["mailsieve", "-v", "mark-bulk", "unimportant", "a@x", "b@y"])
                .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::MarkBulk { ref addresses, .. } if addresses.len() == 2));
    }
}
