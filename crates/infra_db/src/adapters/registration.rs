//! PostgreSQL Registration Store Adapter
//!
//! This module implements the registration domain's storage port with the
//! PostgreSQL repository layer.
//!
//! # Architecture
//!
//! The `PostgresRegistrationStore` serves as the bridge between the domain
//! layer's `RegistrationStore` port and the database repository. It:
//!
//! - Translates between domain models and database row types
//! - Maps database errors to port-level errors
//! - Keeps the atomic parent-plus-dependents write behind the port contract
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresRegistrationStore;
//! use domain_registration::RegistrationStore;
//!
//! let store = PostgresRegistrationStore::new(pool);
//! if store.cpf_exists("52998224725", None).await? {
//!     // reject the submission
//! }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, DependentId, DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata,
    PortError, RegistrationId,
};
use domain_registration::{Dependent, Registration, RegistrationStore};

use crate::error::DatabaseError;
use crate::repositories::registration::{
    DependentRow, NewDependent, NewRegistration, RegistrationRepository, RegistrationRow,
};

/// PostgreSQL adapter implementing the registration storage port
///
/// Wraps the [`RegistrationRepository`] and exposes it through the domain's
/// `RegistrationStore` trait. The pool handle is kept alongside the
/// repository for health checks.
#[derive(Debug, Clone)]
pub struct PostgresRegistrationStore {
    repository: RegistrationRepository,
    pool: PgPool,
}

impl PostgresRegistrationStore {
    /// Creates a new adapter with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: RegistrationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    ///
    /// This is useful for operations that aren't exposed through the port
    /// trait, such as direct row access in integration tests.
    pub fn repository(&self) -> &RegistrationRepository {
        &self.repository
    }
}

// Mark as a domain port
impl DomainPort for PostgresRegistrationStore {}

#[async_trait]
impl HealthCheckable for PostgresRegistrationStore {
    /// Checks database connectivity
    ///
    /// Performs a simple SELECT 1 query to verify the connection pool
    /// is operational and the database is responsive.
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-registration-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-registration-store".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl RegistrationStore for PostgresRegistrationStore {
    // The CPF is deliberately kept out of the span fields.
    #[instrument(skip(self, cpf, _metadata))]
    async fn cpf_exists(
        &self,
        cpf: &str,
        _metadata: Option<OperationMetadata>,
    ) -> Result<bool, PortError> {
        debug!("Checking CPF availability");

        self.repository
            .cpf_exists(cpf)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, registration, _metadata), fields(registration_id = %registration.id))]
    async fn insert(
        &self,
        registration: &Registration,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        debug!(
            dependents = registration.dependents.len(),
            "Inserting registration"
        );

        let (row, dependents) = registration_to_rows(registration)?;

        self.repository
            .insert_with_dependents(row, dependents)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, _metadata), fields(registration_id = %id))]
    async fn fetch(
        &self,
        id: RegistrationId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Registration, PortError> {
        debug!("Fetching registration");

        let (row, dependents) = self
            .repository
            .fetch_with_dependents(*id.as_uuid())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    PortError::not_found("Registration", id)
                } else {
                    db_to_port_error(e)
                }
            })?;

        rows_to_registration(row, dependents)
    }
}

/// Maps database errors to port-level errors
///
/// The CPF unique-constraint violation becomes a `Conflict` so the domain
/// can report the duplicate without knowing anything about Postgres error
/// codes. Call sites that know the typed id intercept `NotFound` before
/// reaching this function.
fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound(message) => PortError::not_found("Registration", message),
        DatabaseError::DuplicateEntry(message) => PortError::Conflict { message },
        DatabaseError::ForeignKeyViolation(message)
        | DatabaseError::ConstraintViolation(message) => PortError::Conflict { message },
        DatabaseError::ConnectionFailed(message) => PortError::Connection {
            message,
            source: None,
        },
        DatabaseError::PoolExhausted => PortError::Connection {
            message: "connection pool exhausted".to_string(),
            source: None,
        },
        DatabaseError::SerializationError(message) => PortError::Transformation { message },
        other => PortError::internal(other.to_string()),
    }
}

/// Converts a domain registration to database row types
///
/// Professional and spouse sub-documents are serialized into JSONB values
/// here; a serialization failure surfaces as a `Transformation` error
/// before any row is written.
fn registration_to_rows(
    registration: &Registration,
) -> Result<(NewRegistration, Vec<NewDependent>), PortError> {
    let professional_data = registration
        .professional
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| PortError::transformation(format!("professional data: {}", e)))?;

    let spouse_data = registration
        .spouse
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| PortError::transformation(format!("spouse data: {}", e)))?;

    let row = NewRegistration {
        id: *registration.id.as_uuid(),
        full_name: registration.full_name.clone(),
        cpf: registration.cpf.clone(),
        rg: registration.rg.clone(),
        birth_date: registration.birth_date,
        street: registration.street.clone(),
        neighborhood: registration.neighborhood.clone(),
        city: registration.city.clone(),
        address_note: registration.address_note.clone(),
        whatsapp: registration.whatsapp.clone(),
        email: registration.email.clone(),
        professional_data,
        spouse_data,
        created_at: registration.created_at,
    };

    let dependents = registration
        .dependents
        .iter()
        .map(|d| NewDependent {
            id: *d.id.as_uuid(),
            name: d.name.clone(),
            birth_date: d.birth_date,
            relationship: d.relationship.clone(),
        })
        .collect();

    Ok((row, dependents))
}

/// Converts database rows back to a domain registration
fn rows_to_registration(
    row: RegistrationRow,
    dependents: Vec<DependentRow>,
) -> Result<Registration, PortError> {
    let professional = row
        .professional_data
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| {
            PortError::transformation(format!("professional data for {}: {}", row.id, e))
        })?;

    let spouse = row
        .spouse_data
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| PortError::transformation(format!("spouse data for {}: {}", row.id, e)))?;

    Ok(Registration {
        id: RegistrationId::from_uuid(row.id),
        full_name: row.full_name,
        cpf: row.cpf,
        rg: row.rg,
        birth_date: row.birth_date,
        street: row.street,
        neighborhood: row.neighborhood,
        city: row.city,
        address_note: row.address_note,
        whatsapp: row.whatsapp,
        email: row.email,
        professional,
        spouse,
        dependents: dependents
            .into_iter()
            .map(|d| Dependent {
                id: DependentId::from_uuid(d.id),
                name: d.name,
                birth_date: d.birth_date,
                relationship: d.relationship,
            })
            .collect(),
        created_at: row.created_at,
    })
}
