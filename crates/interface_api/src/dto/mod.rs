//! Request/Response data transfer objects
//!
//! Wire shapes for the HTTP boundary. Requests carry only structural
//! constraints (size caps against oversized payloads); the field semantics
//! are owned by the domain validators, which re-check everything.

pub mod registration;
