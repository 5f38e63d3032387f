//! Schema migrations for the person store.
//!
//! Each step runs in its own transaction and bumps `user_version` inside it,
//! so a failing step leaves the database at the last good version.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

/// One numbered schema step.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Migration {
    pub(crate) version: u32,
    pub(crate) name: &'static str,
    pub(crate) sql: &'static str,
}

const PERSON_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_persons",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    registry_version(PERSON_MIGRATIONS)
}

/// Schema version recorded in the connected database.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings the connected database up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    run_registry(conn, PERSON_MIGRATIONS)
}

fn registry_version(registry: &[Migration]) -> u32 {
    registry.iter().map(|step| step.version).max().unwrap_or(0)
}

pub(crate) fn run_registry(conn: &mut Connection, registry: &[Migration]) -> DbResult<()> {
    let found = current_user_version(conn)?;
    let supported = registry_version(registry);
    if found > supported {
        return Err(DbError::UnsupportedSchemaVersion { found, supported });
    }

    for step in registry.iter().filter(|step| step.version > found) {
        apply_step(conn, step).map_err(|source| {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={}",
                step.version, step.name, source
            );
            DbError::Migration {
                version: step.version,
                source,
            }
        })?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }

    Ok(())
}

fn apply_step(conn: &mut Connection, step: &Migration) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::{current_user_version, run_registry, Migration};
    use crate::db::DbError;
    use rusqlite::Connection;

    const GOOD: Migration = Migration {
        version: 1,
        name: "good",
        sql: "CREATE TABLE first_step (id TEXT PRIMARY KEY);",
    };
    const BROKEN: Migration = Migration {
        version: 2,
        name: "broken",
        sql: "CREATE TABLE second_step (id TEXT); INSERT INTO no_such_table VALUES (1);",
    };

    #[test]
    fn failing_step_is_named_and_earlier_steps_stay_committed() {
        let mut conn = Connection::open_in_memory().unwrap();

        let err = run_registry(&mut conn, &[GOOD, BROKEN]).unwrap_err();
        assert!(matches!(err, DbError::Migration { version: 2, .. }));
        assert_eq!(err.code(), "db_migration_failed");

        assert_eq!(current_user_version(&conn).unwrap(), 1);
        let second_exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'second_step';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(second_exists, 0, "failed step must roll back");
    }

    #[test]
    fn rerun_skips_applied_steps() {
        let mut conn = Connection::open_in_memory().unwrap();

        run_registry(&mut conn, &[GOOD]).unwrap();
        run_registry(&mut conn, &[GOOD]).unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), 1);
    }
}
