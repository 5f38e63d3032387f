//! Person manager command-line entry point.
//!
//! # Responsibility
//! - Parse one operation from the command line.
//! - Run it through `person_api` and print the response envelope as JSON.
//!
//! Exit code is 0 for 2xx responses and 1 otherwise.

use clap::{Parser, Subcommand};
use person_api::{resolve_db_path, PersonApi};
use person_core::{default_log_level, init_logging, LogLevel, LoggingError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "person_cli", version, about = "Manage person records")]
struct Cli {
    /// Database file (defaults to $PERSON_MANAGER_DB_PATH, then the temp dir).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error; only valid together with --log-dir.
    #[arg(long, global = true, requires = "log_dir", value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List persons, optionally filtered by first-name substring.
    List {
        #[arg(long)]
        name: Option<String>,
    },
    /// Show one person.
    Get { id: String },
    /// Create a person from a JSON document.
    Create { json: String },
    /// Replace a person with a JSON document.
    Update { id: String, json: String },
    /// Delete a person.
    Delete { id: String },
}

fn parse_log_level(raw: &str) -> Result<LogLevel, String> {
    raw.parse()
        .map_err(|err: LoggingError| err.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.unwrap_or_else(default_log_level);
        if let Err(err) = init_logging(level.as_str(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = resolve_db_path(cli.db.as_deref());
    let api = match PersonApi::open(&db_path) {
        Ok(api) => api,
        Err(err) => {
            eprintln!(
                "failed to open `{}` ({}): {err}",
                db_path.display(),
                err.code()
            );
            return ExitCode::FAILURE;
        }
    };

    let response = match &cli.command {
        Command::List { name } => api.list(name.as_deref()),
        Command::Get { id } => api.get(id),
        Command::Create { json } => api.create(json),
        Command::Update { id, json } => api.update(id, json),
        Command::Delete { id } => api.delete(id),
    };

    println!("{}", response.to_json());
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use person_core::LogLevel;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "person_cli",
            "list",
            "--name",
            "John",
            "--db",
            "/tmp/persons.db",
        ])
        .unwrap();

        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/persons.db")));
        assert!(matches!(cli.command, Command::List { name: Some(ref name) } if name == "John"));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = Cli::try_parse_from([
            "person_cli",
            "--log-dir",
            "/tmp/person-logs",
            "--log-level",
            "bogus",
            "list",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn log_level_without_log_dir_is_rejected() {
        assert!(Cli::try_parse_from(["person_cli", "--log-level", "info", "list"]).is_err());
    }

    #[test]
    fn log_level_parses_with_log_dir() {
        let cli = Cli::try_parse_from([
            "person_cli",
            "list",
            "--log-dir",
            "/tmp/person-logs",
            "--log-level",
            "WARNING",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Warn));
    }

    #[test]
    fn update_requires_id_and_payload() {
        assert!(Cli::try_parse_from(["person_cli", "update", "only-id"]).is_err());
    }
}
