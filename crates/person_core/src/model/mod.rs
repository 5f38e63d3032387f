//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted by the person store.
//! - Own required-field validation shared by every write path.
//!
//! # Invariants
//! - Every persisted Person is identified by a stable, non-nil `PersonId`.
//! - `first_name` and `last_name` are never empty once persisted.

pub mod person;
