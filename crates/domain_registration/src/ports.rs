//! Registration Domain Ports
//!
//! This module defines the port interfaces the registration domain needs from
//! the outside world, enabling swappable implementations.
//!
//! # Architecture
//!
//! Two ports cover every external effect of the domain:
//!
//! - [`RegistrationStore`] — the persistence boundary: CPF uniqueness lookup,
//!   atomic insert of a registration with its dependents, and retrieval.
//!   Implemented by the PostgreSQL adapter in `infra_db` and by an in-memory
//!   mock here.
//! - [`ConfirmationNotifier`] — the outbound notification boundary.
//!   Implemented by the Resend email adapter in this crate and by a recording
//!   mock here.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_registration::ports::RegistrationStore;
//! use std::sync::Arc;
//!
//! pub struct SubmissionService {
//!     store: Arc<dyn RegistrationStore>,
//! }
//!
//! impl SubmissionService {
//!     pub async fn is_registered(&self, cpf: &str) -> Result<bool, PortError> {
//!         self.store.cpf_exists(cpf, None).await
//!     }
//! }
//! ```
//!
//! # Failure contract
//!
//! `cpf_exists` must never report `false` because the lookup itself failed: a
//! transport problem surfaces as a transient [`PortError`] so callers can
//! block advancement and prompt a retry instead of treating the CPF as
//! available.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, NotificationId, OperationMetadata, PortError,
    RegistrationId,
};

use crate::registration::Registration;

/// The persistence port for registrations
///
/// All methods are async and return `Result<T, PortError>` for consistent
/// error handling across adapters. CPF arguments are expected in
/// digit-normalized form; adapters may assert but not re-normalize.
#[async_trait]
pub trait RegistrationStore: DomainPort + HealthCheckable {
    /// Checks whether a registration with this CPF already exists
    ///
    /// Idempotent: repeated calls with no intervening writes return the same
    /// boolean. A transport failure is an `Err`, never a fabricated `false`.
    async fn cpf_exists(
        &self,
        cpf: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<bool, PortError>;

    /// Persists the registration and all its dependents atomically
    ///
    /// Either the parent row and every dependent row become visible together
    /// or nothing does. A CPF unique-violation maps to `PortError::Conflict`.
    async fn insert(
        &self,
        registration: &Registration,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    /// Retrieves a registration with its dependents
    ///
    /// Returns `PortError::NotFound` for unknown ids.
    async fn fetch(
        &self,
        id: RegistrationId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Registration, PortError>;
}

/// The confirmation message handed to the notifier
///
/// Carries its own id so the detached dispatch can be correlated in logs;
/// the notification outcome is observable nowhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationMessage {
    pub id: NotificationId,
    pub registration_id: RegistrationId,
    /// Recipient email address
    pub to: String,
    pub recipient_name: String,
    pub subject: String,
    /// Plain-text summary of every submitted field group
    pub body: String,
}

/// The outbound notification port
///
/// Dispatch is best-effort by contract: the submission pipeline spawns the
/// call and logs failures; a `PortError` here never reaches the submitter.
#[async_trait]
pub trait ConfirmationNotifier: DomainPort + HealthCheckable {
    /// Sends the confirmation message
    async fn send_confirmation(
        &self,
        message: ConfirmationMessage,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;
}

/// Mock implementations for testing without a database or email provider
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory implementation of [`RegistrationStore`]
    ///
    /// Enforces CPF uniqueness like the real schema does and counts every
    /// port call so tests can assert that validation failures never reach
    /// the boundary. `set_failing(true)` switches every method into
    /// returning a transient transport error, exercising the
    /// never-fabricate-`false` contract.
    #[derive(Debug, Default)]
    pub struct InMemoryRegistrationStore {
        registrations: Arc<RwLock<HashMap<RegistrationId, Registration>>>,
        failing: AtomicBool,
        exists_calls: AtomicU64,
        insert_calls: AtomicU64,
        fetch_calls: AtomicU64,
    }

    impl InMemoryRegistrationStore {
        /// Creates an empty mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store for testing
        pub async fn with_registrations(registrations: Vec<Registration>) -> Self {
            let store = Self::new();
            {
                let mut map = store.registrations.write().await;
                for registration in registrations {
                    map.insert(registration.id, registration);
                }
            }
            store
        }

        /// Switches the transport-failure mode on or off
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Number of `cpf_exists` calls made
        pub fn exists_calls(&self) -> u64 {
            self.exists_calls.load(Ordering::SeqCst)
        }

        /// Number of `insert` calls made
        pub fn insert_calls(&self) -> u64 {
            self.insert_calls.load(Ordering::SeqCst)
        }

        /// Number of `fetch` calls made
        pub fn fetch_calls(&self) -> u64 {
            self.fetch_calls.load(Ordering::SeqCst)
        }

        /// Total number of port calls made
        pub fn call_count(&self) -> u64 {
            self.exists_calls() + self.insert_calls() + self.fetch_calls()
        }

        /// Number of stored registrations
        pub async fn stored_count(&self) -> usize {
            self.registrations.read().await.len()
        }

        fn transport_guard(&self) -> Result<(), PortError> {
            if self.failing.load(Ordering::SeqCst) {
                Err(PortError::connection("simulated transport failure"))
            } else {
                Ok(())
            }
        }
    }

    impl DomainPort for InMemoryRegistrationStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryRegistrationStore {
        async fn health_check(&self) -> HealthCheckResult {
            let healthy = !self.failing.load(Ordering::SeqCst);
            HealthCheckResult {
                adapter_id: "mock-registration-store".to_string(),
                status: if healthy {
                    core_kernel::AdapterHealth::Healthy
                } else {
                    core_kernel::AdapterHealth::Unhealthy
                },
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl RegistrationStore for InMemoryRegistrationStore {
        async fn cpf_exists(
            &self,
            cpf: &str,
            _metadata: Option<OperationMetadata>,
        ) -> Result<bool, PortError> {
            self.exists_calls.fetch_add(1, Ordering::SeqCst);
            self.transport_guard()?;
            Ok(self
                .registrations
                .read()
                .await
                .values()
                .any(|r| r.cpf == cpf))
        }

        async fn insert(
            &self,
            registration: &Registration,
            _metadata: Option<OperationMetadata>,
        ) -> Result<(), PortError> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            self.transport_guard()?;

            let mut map = self.registrations.write().await;
            if map.values().any(|r| r.cpf == registration.cpf) {
                return Err(PortError::conflict(format!(
                    "registration with CPF already exists: {}",
                    registration.cpf
                )));
            }
            map.insert(registration.id, registration.clone());
            Ok(())
        }

        async fn fetch(
            &self,
            id: RegistrationId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Registration, PortError> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            self.transport_guard()?;
            self.registrations
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Registration", id))
        }
    }

    /// Recording implementation of [`ConfirmationNotifier`]
    ///
    /// Keeps every dispatched message for inspection; `set_failing(true)`
    /// makes dispatch fail so tests can prove a notification failure never
    /// fails the submission.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        sent: Arc<RwLock<Vec<ConfirmationMessage>>>,
        failing: AtomicBool,
    }

    impl RecordingNotifier {
        /// Creates a notifier with an empty dispatch log
        pub fn new() -> Self {
            Self::default()
        }

        /// Switches the failure mode on or off
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// The messages dispatched so far
        pub async fn sent(&self) -> Vec<ConfirmationMessage> {
            self.sent.read().await.clone()
        }

        /// Number of messages dispatched so far
        pub async fn sent_count(&self) -> usize {
            self.sent.read().await.len()
        }
    }

    impl DomainPort for RecordingNotifier {}

    #[async_trait]
    impl HealthCheckable for RecordingNotifier {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-confirmation-notifier".to_string(),
                status: core_kernel::AdapterHealth::Healthy,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ConfirmationNotifier for RecordingNotifier {
        async fn send_confirmation(
            &self,
            message: ConfirmationMessage,
            _metadata: Option<OperationMetadata>,
        ) -> Result<(), PortError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::ServiceUnavailable {
                    service: "mock-email".to_string(),
                });
            }
            self.sent.write().await.push(message);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{InMemoryRegistrationStore, RecordingNotifier};
    use super::*;
    use crate::draft::{DraftPatch, DraftRegistration};

    fn test_registration() -> Registration {
        let mut draft = DraftRegistration::new();
        draft.apply(DraftPatch {
            full_name: Some("Maria Oliveira".to_string()),
            cpf: Some("529.982.247-25".to_string()),
            rg: Some("12.345.678-9".to_string()),
            birth_date: Some("1980-05-20".to_string()),
            street: Some("Rua das Flores, 100".to_string()),
            neighborhood: Some("Centro".to_string()),
            city: Some("São Paulo".to_string()),
            whatsapp: Some("(11) 98765-4321".to_string()),
            email: Some("maria@example.com".to_string()),
            profession: Some("Engenheira Civil".to_string()),
            work_address: Some("Av. Paulista, 1000".to_string()),
            work_phone: Some("(11) 3210-4455".to_string()),
            ..Default::default()
        });
        Registration::from_draft(RegistrationId::new_v7(), &draft).unwrap()
    }

    #[tokio::test]
    async fn test_mock_store_insert_and_fetch() {
        let store = InMemoryRegistrationStore::new();
        let registration = test_registration();

        store.insert(&registration, None).await.unwrap();
        let fetched = store.fetch(registration.id, None).await.unwrap();
        assert_eq!(fetched.id, registration.id);
        assert_eq!(fetched.cpf, "52998224725");
    }

    #[tokio::test]
    async fn test_mock_store_exists_is_idempotent() {
        let store =
            InMemoryRegistrationStore::with_registrations(vec![test_registration()]).await;

        let first = store.cpf_exists("52998224725", None).await.unwrap();
        let second = store.cpf_exists("52998224725", None).await.unwrap();
        assert_eq!(first, second);
        assert!(first);
        assert!(!store.cpf_exists("11111111111", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_store_rejects_duplicate_cpf() {
        let store = InMemoryRegistrationStore::new();
        let registration = test_registration();
        store.insert(&registration, None).await.unwrap();

        let mut duplicate = test_registration();
        duplicate.cpf = registration.cpf.clone();
        let err = store.insert(&duplicate, None).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.stored_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_store_failing_mode_is_an_error_not_false() {
        let store =
            InMemoryRegistrationStore::with_registrations(vec![test_registration()]).await;
        store.set_failing(true);

        let err = store.cpf_exists("52998224725", None).await.unwrap_err();
        assert!(err.is_transient());

        store.set_failing(false);
        assert!(store.cpf_exists("52998224725", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_store_counts_calls() {
        let store = InMemoryRegistrationStore::new();
        assert_eq!(store.call_count(), 0);

        let _ = store.cpf_exists("52998224725", None).await;
        let _ = store.fetch(RegistrationId::new_v7(), None).await;
        assert_eq!(store.exists_calls(), 1);
        assert_eq!(store.fetch_calls(), 1);
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_store_fetch_unknown_is_not_found() {
        let store = InMemoryRegistrationStore::new();
        let err = store.fetch(RegistrationId::new_v7(), None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_recording_notifier_logs_messages() {
        let notifier = RecordingNotifier::new();
        let registration = test_registration();
        let message = ConfirmationMessage {
            id: NotificationId::new_v7(),
            registration_id: registration.id,
            to: registration.email.clone(),
            recipient_name: registration.full_name.clone(),
            subject: "Confirmação".to_string(),
            body: "body".to_string(),
        };

        notifier.send_confirmation(message.clone(), None).await.unwrap();
        assert_eq!(notifier.sent_count().await, 1);
        assert_eq!(notifier.sent().await[0], message);
    }

    #[tokio::test]
    async fn test_recording_notifier_failing_mode() {
        let notifier = RecordingNotifier::new();
        notifier.set_failing(true);

        let registration = test_registration();
        let err = notifier
            .send_confirmation(
                ConfirmationMessage {
                    id: NotificationId::new_v7(),
                    registration_id: registration.id,
                    to: registration.email.clone(),
                    recipient_name: registration.full_name.clone(),
                    subject: "Confirmação".to_string(),
                    body: "body".to_string(),
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(notifier.sent_count().await, 0);
    }
}
