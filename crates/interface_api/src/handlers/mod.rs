//! Request handlers
//!
//! Thin translation layer: extract the request, call the submission service,
//! map the outcome through [`crate::error::ApiError`]. No domain logic lives
//! here.

pub mod health;
pub mod registration;
