//! Person repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the keyed CRUD primitives over canonical `persons` storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Person::validate()` before SQL mutations.
//! - Adding a record with an existing id fails with `Duplicate`.
//! - Listing preserves insertion order; replacement keeps a row's position.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::person::{Person, PersonId, PersonValidationError};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name
FROM persons";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for person persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PersonValidationError),
    Duplicate(PersonId),
    NotFound(PersonId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate(id) => write!(f, "person already exists: {id}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted person data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}"
            ),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PersonValidationError> for RepoError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed store of person records.
///
/// Implementations own key uniqueness and write serialization; callers never
/// touch storage except through these primitives.
pub trait PersonRepository {
    /// Returns every record in insertion order.
    fn list_persons(&self) -> RepoResult<Vec<Person>>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn person_exists(&self, id: PersonId) -> RepoResult<bool>;
    /// Adds a new record and returns it as committed.
    ///
    /// Fails with `Validation` or `Duplicate` without touching storage.
    fn create_person(&self, person: &Person) -> RepoResult<Person>;
    /// Overwrites all fields of the record stored under `person.id`.
    fn replace_person(&self, person: &Person) -> RepoResult<()>;
    /// Removes a record, returning whether it existed.
    fn delete_person(&self, id: PersonId) -> RepoResult<bool>;
    fn count_persons(&self) -> RepoResult<u64>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Wraps a connection that has all migrations applied.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is behind.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version < expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn list_persons(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();

        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }

        Ok(persons)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn person_exists(&self, id: PersonId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM persons WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn create_person(&self, person: &Person) -> RepoResult<Person> {
        person.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO persons (id, first_name, last_name) VALUES (?1, ?2, ?3);",
            params![
                person.id.to_string(),
                person.first_name.as_str(),
                person.last_name.as_str(),
            ],
        );
        if let Err(err) = inserted {
            if is_primary_key_violation(&err) {
                return Err(RepoError::Duplicate(person.id));
            }
            return Err(err.into());
        }

        self.get_person(person.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted person {} not found on read-back", person.id))
        })
    }

    fn replace_person(&self, person: &Person) -> RepoResult<()> {
        person.validate()?;

        let changed = self.conn.execute(
            "UPDATE persons
             SET
                first_name = ?1,
                last_name = ?2
             WHERE id = ?3;",
            params![
                person.first_name.as_str(),
                person.last_name.as_str(),
                person.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(person.id));
        }

        Ok(())
    }

    fn delete_person(&self, id: PersonId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM persons WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn count_persons(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative person count `{count}`")))
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in persons.id"))
    })?;

    let person = Person {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    };
    person
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("row {id_text}: {err}")))?;
    Ok(person)
}

// `id` carries the only uniqueness constraint on `persons`.
fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                )
        }
        _ => false,
    }
}
