//! Member Re-Registration Domain
//!
//! This crate holds the whole re-registration flow of the club: the draft a
//! member fills in, the wizard that walks them through it, the field
//! validators, and the submission pipeline that turns an accepted draft into
//! a persisted [`Registration`].
//!
//! # Flow Model
//!
//! A member moves through an explicit sequence of wizard steps:
//!
//! - **Start**: welcome screen, nothing collected yet
//! - **Consent**: the LGPD consent gate; nothing advances without it
//! - **PersonalData**: identity, address, and contact fields
//! - **Professional**: occupation and workplace fields
//! - **Spouse**: optional, but name and email come as a pair
//! - **Dependents**: zero to six dependents, each validated as it is added
//! - **Success**: reached only through a completed submission
//!
//! Every forward move is validation-gated; moving back never loses data.
//! Submission re-validates everything, checks CPF uniqueness, persists the
//! registration with its dependents atomically, and fires the confirmation
//! email without ever letting it affect the outcome.
//!
//! # Examples
//!
//! ```rust
//! use domain_registration::{DraftPatch, Wizard, WizardStep};
//!
//! let mut wizard = Wizard::new();
//! assert_eq!(wizard.step(), WizardStep::Start);
//! wizard.advance().unwrap();
//!
//! // Nothing moves past the consent gate until the member agrees
//! assert!(wizard.advance().is_err());
//! wizard.apply(DraftPatch {
//!     consent: Some(true),
//!     ..Default::default()
//! });
//! wizard.advance().unwrap();
//! assert_eq!(wizard.step(), WizardStep::PersonalData);
//!
//! // Advancing with an empty form fails per field, keeping the step put
//! wizard.advance().unwrap_err();
//! assert_eq!(wizard.step(), WizardStep::PersonalData);
//!
//! wizard.apply(DraftPatch {
//!     full_name: Some("Maria Oliveira".to_string()),
//!     cpf: Some("529.982.247-25".to_string()),
//!     rg: Some("12.345.678-9".to_string()),
//!     birth_date: Some("1980-05-20".to_string()),
//!     street: Some("Rua das Flores, 100".to_string()),
//!     neighborhood: Some("Centro".to_string()),
//!     city: Some("São Paulo".to_string()),
//!     whatsapp: Some("(11) 98765-4321".to_string()),
//!     email: Some("maria@example.com".to_string()),
//!     ..Default::default()
//! });
//! wizard.advance().unwrap();
//! assert_eq!(wizard.step(), WizardStep::Professional);
//! ```

pub mod adapters;
pub mod draft;
pub mod error;
pub mod events;
pub mod ports;
pub mod registration;
pub mod services;
pub mod validation;
pub mod wizard;

pub use adapters::{ResendEmailAdapter, ResendEmailConfig};
pub use draft::{
    DependentEntry, DraftPatch, DraftRegistration, PersonalDraft, ProfessionalDraft, SpouseDraft,
    DEFAULT_RELATIONSHIP, MAX_DEPENDENTS,
};
pub use error::{RegistrationError, SubmissionError, WizardError};
pub use events::RegistrationEvent;
pub use ports::{ConfirmationMessage, ConfirmationNotifier, RegistrationStore};
pub use registration::{
    Dependent, ProfessionalInfo, Registration, RegistrationSummary, SpouseInfo,
    DATE_DISPLAY_FORMAT,
};
pub use services::{
    SubmissionOutcome, SubmissionReceipt, SubmissionService, CONFIRMATION_SUBJECT,
};
pub use validation::{
    Field, FieldError, FieldValidator, ValidationFailure, ValidationReport, DATE_INPUT_FORMAT,
};
pub use wizard::{Wizard, WizardStep};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{InMemoryRegistrationStore, RecordingNotifier};
