//! Registration repository implementation
//!
//! This module provides database access for member re-registration records.
//! A registration is written exactly once: the parent row and all dependent
//! rows land in a single transaction, so a partially written registration is
//! never visible to readers.
//!
//! # Storage Layout
//!
//! Professional and spouse details are optional sub-documents that are always
//! read and written whole and never queried by field, so they live in JSONB
//! columns on the parent row. Dependents are a variable-length list and get
//! their own `registration_dependents` table, ordered by an explicit
//! `position` column so summaries list them the way the member entered them.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for registration records and their dependents
///
/// The RegistrationRepository handles all database operations for completed
/// re-registrations. It speaks rows and SQL only; translation to domain
/// models happens in the adapter layer.
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Checks whether a registration with the given CPF already exists
    ///
    /// The `cpf` argument must already be normalized to bare digits; the
    /// column carries the same normalization, enforced by a unique index.
    pub async fn cpf_exists(&self, cpf: &str) -> Result<bool, DatabaseError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM registrations WHERE cpf = $1)")
                .bind(cpf)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Inserts a registration together with its dependents atomically
    ///
    /// All rows are written inside one transaction; a failure on any row
    /// rolls back the whole registration. A unique-constraint hit on the
    /// CPF column surfaces as [`DatabaseError::DuplicateEntry`].
    ///
    /// # Arguments
    ///
    /// * `registration` - The parent registration row data
    /// * `dependents` - Dependent rows in the order the member entered them
    pub async fn insert_with_dependents(
        &self,
        registration: NewRegistration,
        dependents: Vec<NewDependent>,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, full_name, cpf, rg, birth_date,
                street, neighborhood, city, address_note,
                whatsapp, email, professional_data, spouse_data, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(registration.id)
        .bind(&registration.full_name)
        .bind(&registration.cpf)
        .bind(&registration.rg)
        .bind(registration.birth_date)
        .bind(&registration.street)
        .bind(&registration.neighborhood)
        .bind(&registration.city)
        .bind(&registration.address_note)
        .bind(&registration.whatsapp)
        .bind(&registration.email)
        .bind(&registration.professional_data)
        .bind(&registration.spouse_data)
        .bind(registration.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, dependent) in dependents.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO registration_dependents (
                    id, registration_id, position, name, birth_date, relationship
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(dependent.id)
            .bind(registration.id)
            .bind(position as i16)
            .bind(&dependent.name)
            .bind(dependent.birth_date)
            .bind(&dependent.relationship)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Retrieves a registration row by its identifier
    ///
    /// # Arguments
    ///
    /// * `id` - The registration identifier
    ///
    /// # Returns
    ///
    /// The registration row or a NotFound error
    pub async fn get_by_id(&self, id: Uuid) -> Result<RegistrationRow, DatabaseError> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT
                id, full_name, cpf, rg, birth_date,
                street, neighborhood, city, address_note,
                whatsapp, email, professional_data, spouse_data, created_at
            FROM registrations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Registration", id))?;

        Ok(row)
    }

    /// Retrieves the dependents recorded under a registration
    ///
    /// Rows come back in entry order.
    pub async fn get_dependents(
        &self,
        registration_id: Uuid,
    ) -> Result<Vec<DependentRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, DependentRow>(
            r#"
            SELECT id, registration_id, position, name, birth_date, relationship
            FROM registration_dependents
            WHERE registration_id = $1
            ORDER BY position
            "#,
        )
        .bind(registration_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Retrieves a registration row together with all of its dependents
    ///
    /// # Arguments
    ///
    /// * `id` - The registration identifier
    ///
    /// # Returns
    ///
    /// The registration row and its dependent rows, or NotFound if the
    /// parent row does not exist
    pub async fn fetch_with_dependents(
        &self,
        id: Uuid,
    ) -> Result<(RegistrationRow, Vec<DependentRow>), DatabaseError> {
        let registration = self.get_by_id(id).await?;
        let dependents = self.get_dependents(id).await?;

        Ok((registration, dependents))
    }
}

/// Database row for a registration
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegistrationRow {
    pub id: Uuid,
    pub full_name: String,
    pub cpf: String,
    pub rg: String,
    pub birth_date: NaiveDate,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub address_note: Option<String>,
    pub whatsapp: String,
    pub email: String,
    pub professional_data: Option<serde_json::Value>,
    pub spouse_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new registration
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub id: Uuid,
    pub full_name: String,
    pub cpf: String,
    pub rg: String,
    pub birth_date: NaiveDate,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub address_note: Option<String>,
    pub whatsapp: String,
    pub email: String,
    pub professional_data: Option<serde_json::Value>,
    pub spouse_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Database row for a dependent
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DependentRow {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub position: i16,
    pub name: String,
    pub birth_date: NaiveDate,
    pub relationship: String,
}

/// Data for creating a new dependent
#[derive(Debug, Clone)]
pub struct NewDependent {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub relationship: String,
}
