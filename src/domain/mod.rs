//! Domain layer for the Linguo requester client
//!
//! Core models, error types and the port traits adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, FetchError};
