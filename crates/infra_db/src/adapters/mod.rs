//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! Each domain has a corresponding adapter that:
//! - Implements the domain's port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresRegistrationStore;
//! use domain_registration::RegistrationStore;
//!
//! let store = PostgresRegistrationStore::new(pool);
//! let exists = store.cpf_exists("52998224725", None).await?;
//! ```

pub mod registration;

pub use registration::PostgresRegistrationStore;
