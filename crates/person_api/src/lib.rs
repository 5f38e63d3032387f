//! Transport-agnostic use-case surface for the person manager.
//!
//! Maps service outcomes onto status-coded response envelopes so any
//! transport (CLI, HTTP, FFI) can render them without touching core types.

pub mod api;
pub mod config;

pub use api::{ApiResponse, PersonApi};
pub use config::{resolve_db_path, DB_PATH_ENV};
