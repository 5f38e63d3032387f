//! Runtime configuration resolution.
//!
//! # Invariants
//! - An explicit path always wins over the environment.
//! - Blank environment values are ignored.

use std::path::{Path, PathBuf};

/// Environment variable naming the database file.
pub const DB_PATH_ENV: &str = "PERSON_MANAGER_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "person_manager.sqlite3";

/// Resolves the database path: explicit, then `PERSON_MANAGER_DB_PATH`,
/// then a file in the system temp directory.
pub fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
    resolve_db_path_from(explicit, std::env::var(DB_PATH_ENV).ok())
}

fn resolve_db_path_from(explicit: Option<&Path>, env_value: Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(raw) = env_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
