//! External Adapters for the Registration Domain
//!
//! Adapter implementations for the outbound side of the domain. The storage
//! port lives in `infra_db`; the email adapter lives here because it speaks a
//! plain REST API and carries no database machinery.
//!
//! # Available Adapters
//!
//! - **ResendEmailAdapter**: delivers confirmation emails through a
//!   Resend-compatible HTTP API
//! - **RecordingNotifier**: in-memory mock for testing (re-exported from the
//!   ports module)
//!
//! # Usage
//!
//! Configure the adapter at application startup:
//!
//! ```rust,ignore
//! use domain_registration::adapters::{ResendEmailAdapter, ResendEmailConfig};
//! use domain_registration::ConfirmationNotifier;
//! use std::sync::Arc;
//!
//! let adapter = ResendEmailAdapter::new(ResendEmailConfig {
//!     api_key: std::env::var("RESEND_API_KEY")?,
//!     from_address: "Clube <recadastro@clube.example>".to_string(),
//!     ..Default::default()
//! });
//!
//! let notifier: Arc<dyn ConfirmationNotifier> = Arc::new(adapter);
//! ```

pub mod email;

pub use email::{ResendEmailAdapter, ResendEmailConfig};
