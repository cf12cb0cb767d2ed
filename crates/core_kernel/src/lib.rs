//! Core Kernel - Foundational types and utilities for the re-registration system
//!
//! This crate provides the fundamental building blocks used across the domain modules:
//! - Strongly-typed identifiers for domain entities
//! - Port abstractions for the hexagonal architecture
//! - Common error types

pub mod identifiers;
pub mod error;
pub mod ports;

pub use identifiers::{RegistrationId, DependentId, NotificationId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    CircuitBreakerConfig, OperationMetadata,
};
