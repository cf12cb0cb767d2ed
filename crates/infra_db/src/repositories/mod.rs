//! Repository implementations for domain entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each domain aggregate. Repositories encapsulate
//! SQL queries and map between database rows and plain row types.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Plain row structs decoded with `sqlx::FromRow`
//! - Transaction support for multi-row writes
//! - Error translation into [`crate::DatabaseError`]

pub mod registration;

pub use registration::RegistrationRepository;
