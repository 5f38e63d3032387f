//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the keyed person store contract consumed by the service.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Person::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Duplicate`) in
//!   addition to DB transport errors.

pub mod person_repo;
