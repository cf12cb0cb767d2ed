//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the re-registration system via SQLx: pool
//! management, the registration repository, and the adapter that exposes it
//! through the domain's storage port.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. The repository speaks rows and
//! SQL; the adapter translates between rows and domain models and between
//! [`DatabaseError`] and the port-level error taxonomy. Domain crates only
//! ever see the port.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, PostgresRegistrationStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/recadastro")).await?;
//! let store = PostgresRegistrationStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresRegistrationStore;
pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::registration::RegistrationRepository;
