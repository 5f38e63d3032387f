//! Person use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete entry points over a person store.
//! - Enforce identity consistency before the store is touched.
//! - Separate expected per-call rejections from hard failures.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - `update_person` checks id consistency, then existence, then persists.
//! - Required-field violations are hard errors, never `Rejection`s.
//! - The service holds no state besides its repository handle.

use crate::model::person::{Person, PersonId, PersonValidationError};
use crate::repo::person_repo::{PersonRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Expected failure the caller handles per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No record with this id exists.
    NotFound(PersonId),
    /// Path id and payload id differ on update.
    IdMismatch { path: PersonId, payload: PersonId },
    /// Create targeted an id that is already taken.
    Duplicate(PersonId),
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::IdMismatch { path, payload } => {
                write!(f, "payload id {payload} does not match path id {path}")
            }
            Self::Duplicate(id) => write!(f, "person already exists: {id}"),
        }
    }
}

/// Per-call result: `Err` carries an expected rejection.
pub type Outcome<T> = Result<T, Rejection>;

/// Hard failure propagated to the caller.
#[derive(Debug)]
pub enum PersonServiceError {
    /// Required-field enforcement rejected the write.
    Validation(PersonValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for PersonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "person validation failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for PersonServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, PersonServiceError>;

/// Successful create: the committed record and where to find it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub person: Person,
    /// Resource path of the new record, e.g. `/persons/{id}`.
    pub location: String,
}

/// Returns the resource path for one person.
pub fn person_location(id: PersonId) -> String {
    format!("/persons/{id}")
}

/// Person service facade over a repository implementation.
pub struct PersonService<R: PersonRepository> {
    repo: R,
}

impl<R: PersonRepository> PersonService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists persons in store order.
    ///
    /// A non-empty `filter` keeps only records whose first name contains it
    /// (case-sensitive substring). No match yields an empty list.
    pub fn list_persons(&self, filter: Option<&str>) -> ServiceResult<Vec<Person>> {
        let mut persons = self.repo.list_persons()?;
        if let Some(needle) = filter.filter(|value| !value.is_empty()) {
            persons.retain(|person| person.first_name.contains(needle));
        }

        info!(
            "event=person_list module=service status=ok filtered={} count={}",
            filter.is_some_and(|value| !value.is_empty()),
            persons.len()
        );
        Ok(persons)
    }

    /// Gets one person by id.
    pub fn get_person(&self, id: PersonId) -> ServiceResult<Outcome<Person>> {
        match self.repo.get_person(id)? {
            Some(person) => Ok(Ok(person)),
            None => {
                info!("event=person_get module=service status=not_found id={id}");
                Ok(Err(Rejection::NotFound(id)))
            }
        }
    }

    /// Creates one person.
    ///
    /// A caller-supplied id is kept; a nil id is replaced by a generated one.
    ///
    /// # Errors
    /// - `PersonServiceError::Validation` when a required field is missing;
    ///   nothing is persisted.
    pub fn create_person(&self, person: &Person) -> ServiceResult<Outcome<Created>> {
        let mut candidate = person.clone();
        if !candidate.has_id() {
            candidate.id = Uuid::new_v4();
        }

        match self.repo.create_person(&candidate) {
            Ok(committed) => {
                info!(
                    "event=person_create module=service status=ok id={}",
                    committed.id
                );
                let location = person_location(committed.id);
                Ok(Ok(Created {
                    person: committed,
                    location,
                }))
            }
            Err(RepoError::Duplicate(id)) => {
                info!("event=person_create module=service status=duplicate id={id}");
                Ok(Err(Rejection::Duplicate(id)))
            }
            Err(err) => {
                warn!(
                    "event=person_create module=service status=error id={} error={}",
                    candidate.id, err
                );
                Err(err.into())
            }
        }
    }

    /// Replaces every field of the person stored under `id`.
    ///
    /// # Contract
    /// - `person.id != id` -> `Rejection::IdMismatch`, store untouched.
    /// - `id` absent -> `Rejection::NotFound`.
    /// - Missing required field -> `PersonServiceError::Validation`, stored
    ///   record unchanged.
    pub fn update_person(&self, id: PersonId, person: &Person) -> ServiceResult<Outcome<()>> {
        if person.id != id {
            info!(
                "event=person_update module=service status=id_mismatch id={} payload_id={}",
                id, person.id
            );
            return Ok(Err(Rejection::IdMismatch {
                path: id,
                payload: person.id,
            }));
        }

        if !self.repo.person_exists(id)? {
            info!("event=person_update module=service status=not_found id={id}");
            return Ok(Err(Rejection::NotFound(id)));
        }

        match self.repo.replace_person(person) {
            Ok(()) => {
                info!("event=person_update module=service status=ok id={id}");
                Ok(Ok(()))
            }
            // Removed between the existence check and the write.
            Err(RepoError::NotFound(missing)) => Ok(Err(Rejection::NotFound(missing))),
            Err(err) => {
                warn!("event=person_update module=service status=error id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Deletes one person by id.
    pub fn delete_person(&self, id: PersonId) -> ServiceResult<Outcome<()>> {
        if !self.repo.delete_person(id)? {
            info!("event=person_delete module=service status=not_found id={id}");
            return Ok(Err(Rejection::NotFound(id)));
        }

        info!("event=person_delete module=service status=ok id={id}");
        Ok(Ok(()))
    }

    /// Returns the number of stored persons.
    pub fn count_persons(&self) -> ServiceResult<u64> {
        Ok(self.repo.count_persons()?)
    }
}
