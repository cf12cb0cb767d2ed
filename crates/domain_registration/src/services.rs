//! Registration domain services
//!
//! [`SubmissionService`] orchestrates the submission pipeline: local
//! re-validation, the CPF uniqueness gate, atomic persistence through the
//! storage port, the synchronous receipt, and the detached confirmation
//! dispatch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use core_kernel::{HealthCheckResult, NotificationId, OperationMetadata, RegistrationId};

use crate::draft::DraftRegistration;
use crate::error::SubmissionError;
use crate::ports::{ConfirmationMessage, ConfirmationNotifier, RegistrationStore};
use crate::registration::{Registration, RegistrationSummary};
use crate::validation::{Field, FieldError, FieldValidator, ValidationReport};

/// Subject prefix of the confirmation email; the protocol id is appended
pub const CONFIRMATION_SUBJECT: &str = "Confirmação de Recadastramento 2025";

/// The synchronous result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: RegistrationId,
    pub full_name: String,
    pub email: String,
    /// CPF in its display mask
    pub cpf: String,
}

/// A successful submission: the receipt plus the notification task handle
///
/// Success is defined by the receipt alone. The handle exists so callers who
/// care (tests, mainly) can await the confirmation dispatch deterministically;
/// dropping it detaches the task without affecting it.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub receipt: SubmissionReceipt,
    pub notification: JoinHandle<()>,
}

/// Orchestrates the one-shot conversion of a draft into a persisted
/// registration
///
/// Holds the two ports the domain needs: the registration store and the
/// confirmation notifier. The service is stateless; submissions are
/// independent and a failed attempt can simply be retried by the member.
pub struct SubmissionService {
    store: Arc<dyn RegistrationStore>,
    notifier: Arc<dyn ConfirmationNotifier>,
}

impl SubmissionService {
    /// Creates a submission service over the given adapters
    pub fn new(store: Arc<dyn RegistrationStore>, notifier: Arc<dyn ConfirmationNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Submits a draft, creating the persisted registration exactly once
    ///
    /// Pipeline, in order:
    ///
    /// 1. Re-validate the full draft locally; any failure aborts before any
    ///    port call, carrying the field-level report.
    /// 2. Normalize the CPF and consult the uniqueness check. An existing
    ///    registration aborts as a duplicate; a transport failure aborts as a
    ///    retryable storage error and is never treated as "available".
    /// 3. Generate the new registration id, independent of storage.
    /// 4. Persist the parent and its dependents atomically. A unique-violation
    ///    raised by the storage constraint surfaces as the same duplicate
    ///    outcome as step 2.
    /// 5. Return the receipt; success is defined by steps 1-4 alone.
    /// 6. Spawn the confirmation dispatch. Its failure is logged with the
    ///    registration id and never blocks, fails, or reverses anything.
    #[instrument(skip(self, draft, metadata))]
    pub async fn submit(
        &self,
        draft: &DraftRegistration,
        metadata: Option<OperationMetadata>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let report = FieldValidator::validate_draft(draft);
        if !report.is_valid {
            return Err(SubmissionError::Validation(report));
        }

        let cpf = FieldValidator::normalize_digits(&draft.personal.cpf);
        if self.store.cpf_exists(&cpf, metadata.clone()).await? {
            return Err(SubmissionError::DuplicateCpf);
        }

        let id = RegistrationId::new_v7();
        let registration = Registration::from_draft(id, draft).map_err(SubmissionError::Validation)?;
        self.store.insert(&registration, metadata).await?;
        debug!(registration_id = %id, "registration persisted");

        let receipt = SubmissionReceipt {
            id,
            full_name: registration.full_name.clone(),
            email: registration.email.clone(),
            cpf: registration.masked_cpf(),
        };
        let notification = self.dispatch_confirmation(registration);

        Ok(SubmissionOutcome {
            receipt,
            notification,
        })
    }

    /// Whether a registration with this CPF already exists
    ///
    /// The fast-path uniqueness check behind the wizard UI. The raw value is
    /// normalized here; a value that cannot be a CPF is a validation error,
    /// and a transport failure propagates as a retryable storage error rather
    /// than a fabricated `false`.
    #[instrument(skip(self, metadata))]
    pub async fn cpf_exists(
        &self,
        raw_cpf: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<bool, SubmissionError> {
        let cpf = match FieldValidator::cpf(raw_cpf) {
            Ok(digits) => digits,
            Err(failure) => {
                return Err(SubmissionError::Validation(ValidationReport::fail(vec![
                    FieldError::new(Field::Cpf, failure),
                ])));
            }
        };
        Ok(self.store.cpf_exists(&cpf, metadata).await?)
    }

    /// Retrieves a stored registration projected into its display view
    #[instrument(skip(self, metadata))]
    pub async fn fetch_summary(
        &self,
        id: RegistrationId,
        metadata: Option<OperationMetadata>,
    ) -> Result<RegistrationSummary, core_kernel::PortError> {
        let registration = self.store.fetch(id, metadata).await?;
        Ok(RegistrationSummary::project(&registration))
    }

    /// Health of the service's adapters, storage first
    pub async fn adapter_health(&self) -> Vec<HealthCheckResult> {
        vec![
            self.store.health_check().await,
            self.notifier.health_check().await,
        ]
    }

    fn dispatch_confirmation(&self, registration: Registration) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        let message = Self::confirmation_message(&registration);
        let notification_id = message.id;
        let registration_id = registration.id;

        tokio::spawn(async move {
            match notifier.send_confirmation(message, None).await {
                Ok(()) => {
                    debug!(
                        notification_id = %notification_id,
                        registration_id = %registration_id,
                        "confirmation dispatched"
                    );
                }
                Err(error) => {
                    warn!(
                        notification_id = %notification_id,
                        registration_id = %registration_id,
                        error = %error,
                        "confirmation dispatch failed; submission is unaffected"
                    );
                }
            }
        })
    }

    fn confirmation_message(registration: &Registration) -> ConfirmationMessage {
        let summary = RegistrationSummary::project(registration);
        ConfirmationMessage {
            id: NotificationId::new_v7(),
            registration_id: registration.id,
            to: registration.email.clone(),
            recipient_name: registration.full_name.clone(),
            subject: format!("{} - Protocolo {}", CONFIRMATION_SUBJECT, registration.id),
            body: Self::render_body(&summary),
        }
    }

    /// Renders the plain-text summary of every submitted field group
    fn render_body(summary: &RegistrationSummary) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("Olá, {}!", summary.full_name));
        lines.push(String::new());
        lines.push(
            "Recebemos a confirmação do seu recadastramento. Confira abaixo o resumo dos dados enviados."
                .to_string(),
        );
        lines.push(String::new());

        lines.push("Dados pessoais".to_string());
        lines.push(format!("- Nome: {}", summary.full_name));
        lines.push(format!("- CPF: {}", summary.cpf));
        lines.push(format!("- RG: {}", summary.rg));
        lines.push(format!("- Nascimento: {}", summary.birth_date));
        lines.push(String::new());

        lines.push("Endereço".to_string());
        lines.push(format!("- Rua: {}", summary.street));
        lines.push(format!("- Bairro: {}", summary.neighborhood));
        lines.push(format!("- Cidade: {}", summary.city));
        if !summary.address_note.is_empty() {
            lines.push(format!("- Complemento: {}", summary.address_note));
        }
        lines.push(String::new());

        lines.push("Contato".to_string());
        lines.push(format!("- WhatsApp: {}", summary.whatsapp));
        lines.push(format!("- Email: {}", summary.email));
        lines.push(String::new());

        lines.push("Dados profissionais".to_string());
        lines.push(format!("- Profissão: {}", summary.profession));
        if !summary.company.is_empty() {
            lines.push(format!("- Empresa: {}", summary.company));
        }
        lines.push(format!("- Endereço comercial: {}", summary.work_address));
        lines.push(format!("- Telefone comercial: {}", summary.work_phone));
        lines.push(String::new());

        lines.push("Cônjuge".to_string());
        if summary.has_spouse {
            lines.push(format!(
                "- {} ({})",
                summary.spouse_name, summary.spouse_email
            ));
        } else {
            lines.push("- Nenhum".to_string());
        }
        lines.push(String::new());

        lines.push("Dependentes".to_string());
        if summary.dependents.is_empty() {
            lines.push("- Nenhum".to_string());
        } else {
            for dependent in &summary.dependents {
                lines.push(format!("- {}", dependent));
            }
        }

        lines.join("\n")
    }
}
