use person_core::db::migrations::{current_user_version, latest_version};
use person_core::db::{open_db, open_db_in_memory, DbError};
use person_core::{Person, PersonRepository, RepoError, SqlitePersonRepository};
use rusqlite::Connection;

#[test]
fn fresh_in_memory_database_is_ready_for_the_repository() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count_persons().unwrap(), 0);
}

#[test]
fn reopening_a_file_keeps_persons_and_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persons.db");
    let luke = Person::new("Luke", "Skywalker");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqlitePersonRepository::try_new(&conn).unwrap();
        repo.create_person(&luke).unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();
    assert_eq!(repo.get_person(luke.id).unwrap(), Some(luke));
}

#[test]
fn conflicting_legacy_table_fails_the_first_migration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    {
        let legacy = Connection::open(&path).unwrap();
        legacy
            .execute_batch("CREATE TABLE persons (name TEXT);")
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(
        matches!(err, DbError::Migration { version: 1, .. }),
        "unexpected error: {err}"
    );
    assert!(err.to_string().contains("schema migration 1 failed"));

    let raw = Connection::open(&path).unwrap();
    assert_eq!(current_user_version(&raw).unwrap(), 0);
    assert!(matches!(
        SqlitePersonRepository::try_new(&raw),
        Err(RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        })
    ));
}

#[test]
fn database_from_a_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newer.db");
    {
        let newer = Connection::open(&path).unwrap();
        newer
            .pragma_update(None, "user_version", latest_version() + 1)
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert_eq!(err.code(), "db_schema_too_new");
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { found, supported }
            if found == latest_version() + 1 && supported == latest_version()
    ));
}
