//! Domain events for the registration wizard
//!
//! Events capture the significant transitions of a re-registration session.
//! The caller drains them with [`crate::wizard::Wizard::take_events`] and uses
//! them for audit logging and presentation side effects (scroll reset, focus)
//! that are outside this crate's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::RegistrationId;

use crate::wizard::WizardStep;

/// Domain events emitted by the registration wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationEvent {
    /// The wizard moved to a new step
    StepEntered {
        from: WizardStep,
        to: WizardStep,
        timestamp: DateTime<Utc>,
    },

    /// A submission attempt started; repeat attempts are now rejected
    SubmissionStarted {
        timestamp: DateTime<Utc>,
    },

    /// The submission persisted successfully; the wizard is at Success
    SubmissionCompleted {
        registration_id: RegistrationId,
        timestamp: DateTime<Utc>,
    },

    /// The submission attempt failed; the wizard is editable again
    SubmissionFailed {
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// The wizard was reset to Start with a cleared draft
    WizardRestarted {
        timestamp: DateTime<Utc>,
    },
}

impl RegistrationEvent {
    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            RegistrationEvent::StepEntered { timestamp, .. } => *timestamp,
            RegistrationEvent::SubmissionStarted { timestamp, .. } => *timestamp,
            RegistrationEvent::SubmissionCompleted { timestamp, .. } => *timestamp,
            RegistrationEvent::SubmissionFailed { timestamp, .. } => *timestamp,
            RegistrationEvent::WizardRestarted { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            RegistrationEvent::StepEntered { .. } => "StepEntered",
            RegistrationEvent::SubmissionStarted { .. } => "SubmissionStarted",
            RegistrationEvent::SubmissionCompleted { .. } => "SubmissionCompleted",
            RegistrationEvent::SubmissionFailed { .. } => "SubmissionFailed",
            RegistrationEvent::WizardRestarted { .. } => "WizardRestarted",
        }
    }
}
