//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical `Person` record and its wire shape.
//! - Validate required fields before any persistence attempt.
//!
//! # Invariants
//! - `id` is stable and never reassigned once a record is persisted.
//! - Update is whole-record replacement; there is no partial shape.
//! - Missing name fields decode as empty strings and fail `validate()`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a Person record.
pub type PersonId = Uuid;

/// Canonical Person record.
///
/// Serialized as `{ "id", "firstName", "lastName" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Nil when a create payload omits the id; the service assigns one.
    #[serde(default)]
    pub id: PersonId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Required-field violations detected before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonValidationError {
    NilId,
    MissingFirstName,
    MissingLastName,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "person id must not be nil"),
            Self::MissingFirstName => write!(f, "required field `firstName` is missing"),
            Self::MissingLastName => write!(f, "required field `lastName` is missing"),
        }
    }
}

impl Error for PersonValidationError {}

impl Person {
    /// Creates a person with a generated id.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), first_name, last_name)
    }

    /// Creates a person with a caller-provided id.
    ///
    /// Does not validate; persistence paths call [`Person::validate`].
    pub fn with_id(
        id: PersonId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Returns whether a real (non-nil) id is present.
    pub fn has_id(&self) -> bool {
        !self.id.is_nil()
    }

    /// Checks the invariants every persisted record must satisfy.
    ///
    /// # Errors
    /// - `NilId` when no id has been assigned.
    /// - `MissingFirstName` / `MissingLastName` when a name is empty or
    ///   whitespace-only.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if !self.has_id() {
            return Err(PersonValidationError::NilId);
        }
        if is_blank(&self.first_name) {
            return Err(PersonValidationError::MissingFirstName);
        }
        if is_blank(&self.last_name) {
            return Err(PersonValidationError::MissingLastName);
        }
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
