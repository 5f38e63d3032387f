//! Status-coded person API.
//!
//! # Responsibility
//! - Decode request inputs (path ids, JSON payloads).
//! - Run one `PersonService` operation per call.
//! - Map outcomes onto `ApiResponse` envelopes.
//!
//! # Invariants
//! - Calls never panic; every failure becomes an envelope.
//! - `Rejection`s map to 4xx; hard service failures map to 500.
//!
//! | Operation | Success | Failure |
//! |---|---|---|
//! | list | 200 | 500 |
//! | get | 200 | 400 bad id, 404 |
//! | create | 201 + location | 400 bad payload, 409, 500 |
//! | update | 204 | 400, 404, 500 |
//! | delete | 204 | 400 bad id, 404 |

use log::{info, warn};
use person_core::db::{open_db, open_db_in_memory, DbResult};
use person_core::{
    Person, PersonService, PersonServiceError, Rejection, ServiceResult, SqlitePersonRepository,
};
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use uuid::Uuid;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_SERVER_ERROR: u16 = 500;

/// Response envelope returned by every API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// JSON body; `None` for 204 and error responses.
    pub body: Option<Value>,
    /// Resource path of a newly created record.
    pub location: Option<String>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

impl ApiResponse {
    fn ok(body: Value, message: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            body: Some(body),
            location: None,
            message: message.into(),
        }
    }

    fn created(body: Value, location: String) -> Self {
        Self {
            status: STATUS_CREATED,
            body: Some(body),
            location: Some(location),
            message: "Person created.".to_string(),
        }
    }

    fn no_content(message: impl Into<String>) -> Self {
        Self::status_only(STATUS_NO_CONTENT, message)
    }

    fn status_only(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: None,
            location: None,
            message: message.into(),
        }
    }

    fn rejected(rejection: Rejection) -> Self {
        let status = match rejection {
            Rejection::NotFound(_) => STATUS_NOT_FOUND,
            Rejection::IdMismatch { .. } => STATUS_BAD_REQUEST,
            Rejection::Duplicate(_) => STATUS_CONFLICT,
        };
        Self::status_only(status, rejection.to_string())
    }

    fn server_error(err: &PersonServiceError) -> Self {
        Self::status_only(STATUS_SERVER_ERROR, err.to_string())
    }

    /// Returns whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Renders the envelope as one JSON document.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "status": self.status,
            "body": self.body,
            "location": self.location,
            "message": self.message,
        })
    }
}

/// Person API bound to one SQLite connection.
pub struct PersonApi {
    conn: Connection,
}

impl PersonApi {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Lists persons, optionally filtered by first-name substring.
    pub fn list(&self, name: Option<&str>) -> ApiResponse {
        let response = match self.with_service(|service| service.list_persons(name)) {
            Ok(persons) => {
                let message = format!("Found {} person(s).", persons.len());
                match serde_json::to_value(&persons) {
                    Ok(body) => ApiResponse::ok(body, message),
                    Err(err) => ApiResponse::status_only(STATUS_SERVER_ERROR, err.to_string()),
                }
            }
            Err(err) => ApiResponse::server_error(&err),
        };
        log_response("list", &response);
        response
    }

    /// Gets one person by path id.
    pub fn get(&self, id: &str) -> ApiResponse {
        let response = match parse_id(id) {
            Ok(id) => match self.with_service(|service| service.get_person(id)) {
                Ok(Ok(person)) => person_body(&person)
                    .map(|body| ApiResponse::ok(body, "Person found."))
                    .unwrap_or_else(|failure| failure),
                Ok(Err(rejection)) => ApiResponse::rejected(rejection),
                Err(err) => ApiResponse::server_error(&err),
            },
            Err(failure) => failure,
        };
        log_response("get", &response);
        response
    }

    /// Creates one person from a JSON payload.
    pub fn create(&self, payload: &str) -> ApiResponse {
        let response = match parse_person(payload) {
            Ok(person) => match self.with_service(|service| service.create_person(&person)) {
                Ok(Ok(created)) => person_body(&created.person)
                    .map(|body| ApiResponse::created(body, created.location))
                    .unwrap_or_else(|failure| failure),
                Ok(Err(rejection)) => ApiResponse::rejected(rejection),
                Err(err) => ApiResponse::server_error(&err),
            },
            Err(failure) => failure,
        };
        log_response("create", &response);
        response
    }

    /// Replaces the person at path id with a JSON payload.
    pub fn update(&self, id: &str, payload: &str) -> ApiResponse {
        let parsed = parse_id(id).and_then(|id| parse_person(payload).map(|person| (id, person)));
        let response = match parsed {
            Ok((id, person)) => {
                match self.with_service(|service| service.update_person(id, &person)) {
                    Ok(Ok(())) => ApiResponse::no_content("Person updated."),
                    Ok(Err(rejection)) => ApiResponse::rejected(rejection),
                    Err(err) => ApiResponse::server_error(&err),
                }
            }
            Err(failure) => failure,
        };
        log_response("update", &response);
        response
    }

    /// Deletes the person at path id.
    pub fn delete(&self, id: &str) -> ApiResponse {
        let response = match parse_id(id) {
            Ok(id) => match self.with_service(|service| service.delete_person(id)) {
                Ok(Ok(())) => ApiResponse::no_content("Person deleted."),
                Ok(Err(rejection)) => ApiResponse::rejected(rejection),
                Err(err) => ApiResponse::server_error(&err),
            },
            Err(failure) => failure,
        };
        log_response("delete", &response);
        response
    }

    fn with_service<T>(
        &self,
        f: impl FnOnce(&PersonService<SqlitePersonRepository<'_>>) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let repo = SqlitePersonRepository::try_new(&self.conn)?;
        f(&PersonService::new(repo))
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ApiResponse> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ApiResponse::status_only(STATUS_BAD_REQUEST, format!("invalid person id `{raw}`"))
    })
}

fn parse_person(payload: &str) -> Result<Person, ApiResponse> {
    serde_json::from_str(payload).map_err(|err| {
        ApiResponse::status_only(STATUS_BAD_REQUEST, format!("invalid person payload: {err}"))
    })
}

fn person_body(person: &Person) -> Result<Value, ApiResponse> {
    serde_json::to_value(person)
        .map_err(|err| ApiResponse::status_only(STATUS_SERVER_ERROR, err.to_string()))
}

fn log_response(operation: &str, response: &ApiResponse) {
    if response.status >= STATUS_SERVER_ERROR {
        warn!(
            "event=api_call module=api op={} status={} error={}",
            operation, response.status, response.message
        );
    } else {
        info!(
            "event=api_call module=api op={} status={}",
            operation, response.status
        );
    }
}
