//! Storage bootstrap for the person store.
//!
//! # Responsibility
//! - Open SQLite connections and bring their schema up to date.
//! - Report which step failed: opening, a numbered migration, or a schema
//!   written by a newer binary.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Person rows are never touched before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage bootstrap failure.
#[derive(Debug)]
pub enum DbError {
    /// Connection-level SQLite failure outside any migration step.
    Sqlite(rusqlite::Error),
    /// Migration `version` failed; earlier versions stay committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a binary with a newer schema.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl DbError {
    /// Stable token for `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "db_sqlite_failed",
            Self::Migration { .. } => "db_migration_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "persons database is at schema version {found}, this build supports up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
