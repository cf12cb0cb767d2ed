//! Wizard state machine for the re-registration flow
//!
//! The wizard owns the accumulating [`DraftRegistration`] and walks it
//! through a fixed sequence of steps:
//!
//! ```text
//! Start -> Consent -> PersonalData -> Professional -> Spouse -> Dependents -> Success
//! ```
//!
//! Advancement is gated on the current step's validators; a failed gate
//! returns the per-field report and leaves both step and draft untouched.
//! Retreating is always permitted (except from Start and Success) and never
//! discards entered data. The only jump transition is `restart`, permitted
//! only at Success, which clears the draft and returns to Start.
//!
//! The terminal step is special: `advance` can never enter Success. The
//! submission pipeline records its outcome through `begin_submission` /
//! `complete_submission` / `fail_submission`, so a wizard can only reach
//! Success on the back of a persisted registration. `begin_submission` also
//! acts as the re-entrancy guard: while a submission is in flight, repeat
//! attempts are rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use chrono::Utc;

use core_kernel::RegistrationId;

use crate::draft::{DependentEntry, DraftPatch, DraftRegistration};
use crate::error::{RegistrationError, WizardError};
use crate::events::RegistrationEvent;
use crate::validation::FieldValidator;

/// The ordered steps of the re-registration wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Welcome screen; nothing collected
    Start,
    /// Consent acknowledgment gate
    Consent,
    /// Identity, address, and contact fields
    PersonalData,
    /// Profession and workplace fields
    Professional,
    /// Optional spouse pair
    Spouse,
    /// Dependent list; the last editable step
    Dependents,
    /// Terminal step, entered only by a completed submission
    Success,
}

impl WizardStep {
    /// The successor in step order, if any
    ///
    /// Note that `Dependents -> Success` exists in the relation but is not
    /// reachable through `advance`; only `complete_submission` takes it.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Start => Some(WizardStep::Consent),
            WizardStep::Consent => Some(WizardStep::PersonalData),
            WizardStep::PersonalData => Some(WizardStep::Professional),
            WizardStep::Professional => Some(WizardStep::Spouse),
            WizardStep::Spouse => Some(WizardStep::Dependents),
            WizardStep::Dependents => Some(WizardStep::Success),
            WizardStep::Success => None,
        }
    }

    /// The predecessor in step order, if retreating is permitted
    ///
    /// Start has nothing before it and Success never retreats.
    pub fn prev(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Start => None,
            WizardStep::Consent => Some(WizardStep::Start),
            WizardStep::PersonalData => Some(WizardStep::Consent),
            WizardStep::Professional => Some(WizardStep::PersonalData),
            WizardStep::Spouse => Some(WizardStep::Professional),
            WizardStep::Dependents => Some(WizardStep::Spouse),
            WizardStep::Success => None,
        }
    }

    /// Whether this is the terminal step
    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardStep::Success)
    }

    /// Stable step name for logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Start => "Start",
            WizardStep::Consent => "Consent",
            WizardStep::PersonalData => "PersonalData",
            WizardStep::Professional => "Professional",
            WizardStep::Spouse => "Spouse",
            WizardStep::Dependents => "Dependents",
            WizardStep::Success => "Success",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The re-registration wizard: current step, owned draft, submission guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wizard {
    step: WizardStep,
    draft: DraftRegistration,
    submission_in_flight: bool,
    #[serde(skip)]
    events: Vec<RegistrationEvent>,
}

impl Wizard {
    /// Creates a wizard at Start with an empty draft
    pub fn new() -> Self {
        Self {
            step: WizardStep::Start,
            draft: DraftRegistration::new(),
            submission_in_flight: false,
            events: Vec::new(),
        }
    }

    /// The current step
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Read access to the accumulated draft
    pub fn draft(&self) -> &DraftRegistration {
        &self.draft
    }

    /// Whether a submission attempt is currently in flight
    pub fn is_submission_in_flight(&self) -> bool {
        self.submission_in_flight
    }

    /// Merges a screen's partial patch into the draft
    pub fn apply(&mut self, patch: DraftPatch) {
        self.draft.apply(patch);
    }

    /// Adds a dependent through the draft's add-time guards
    pub fn add_dependent(&mut self, name: &str, birth_date: &str) -> Result<(), RegistrationError> {
        self.draft.add_dependent(name, birth_date)
    }

    /// Removes the dependent at `index`
    pub fn remove_dependent(&mut self, index: usize) -> Result<DependentEntry, RegistrationError> {
        self.draft.remove_dependent(index)
    }

    /// Moves forward one step if the current step's validators pass
    ///
    /// On a failed gate the per-field report is returned and neither step nor
    /// draft changes. Advancing from Dependents or Success is an invalid
    /// transition: the only way into Success is a completed submission.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = match self.step.next() {
            Some(WizardStep::Success) | None => {
                return Err(WizardError::invalid_transition(self.step, "advance"));
            }
            Some(next) => next,
        };

        let report = FieldValidator::validate_step(&self.draft, self.step);
        if !report.is_valid {
            return Err(WizardError::StepValidationFailed(report));
        }

        self.enter(next);
        Ok(next)
    }

    /// Moves back one step; always succeeds where retreating is permitted
    ///
    /// Never validates and never discards entered data.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        let prev = self
            .step
            .prev()
            .ok_or_else(|| WizardError::invalid_transition(self.step, "retreat"))?;
        self.enter(prev);
        Ok(prev)
    }

    /// Restarts the flow from Success: clears the draft (consent included)
    /// and returns to Start
    ///
    /// This is the only jump transition; from any other step it is invalid.
    pub fn restart(&mut self) -> Result<(), WizardError> {
        if self.step != WizardStep::Success {
            return Err(WizardError::invalid_transition(self.step, "restart"));
        }

        self.draft.clear();
        self.submission_in_flight = false;
        self.step = WizardStep::Start;
        self.events.push(RegistrationEvent::WizardRestarted {
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Marks a submission attempt as in flight
    ///
    /// Fails when one is already in flight (the re-entrancy guard) or when
    /// the wizard is not at the Dependents step.
    pub fn begin_submission(&mut self) -> Result<(), WizardError> {
        if self.submission_in_flight {
            return Err(WizardError::SubmissionInProgress);
        }
        if self.step != WizardStep::Dependents {
            return Err(WizardError::invalid_transition(self.step, "begin_submission"));
        }

        self.submission_in_flight = true;
        self.events.push(RegistrationEvent::SubmissionStarted {
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Records a persisted submission and enters the terminal step
    pub fn complete_submission(
        &mut self,
        registration_id: RegistrationId,
    ) -> Result<(), WizardError> {
        if !self.submission_in_flight {
            return Err(WizardError::SubmissionNotInProgress);
        }

        self.submission_in_flight = false;
        self.events.push(RegistrationEvent::SubmissionCompleted {
            registration_id,
            timestamp: Utc::now(),
        });
        self.enter(WizardStep::Success);
        Ok(())
    }

    /// Records a failed submission attempt, returning the wizard to an
    /// editable state at its current step
    pub fn fail_submission(&mut self, reason: impl Into<String>) -> Result<(), WizardError> {
        if !self.submission_in_flight {
            return Err(WizardError::SubmissionNotInProgress);
        }

        self.submission_in_flight = false;
        self.events.push(RegistrationEvent::SubmissionFailed {
            reason: reason.into(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Drains the accumulated domain events
    pub fn take_events(&mut self) -> Vec<RegistrationEvent> {
        std::mem::take(&mut self.events)
    }

    fn enter(&mut self, to: WizardStep) {
        self.events.push(RegistrationEvent::StepEntered {
            from: self.step,
            to,
            timestamp: Utc::now(),
        });
        self.step = to;
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Field;

    fn wizard_with_filled_draft() -> Wizard {
        let mut wizard = Wizard::new();
        wizard.apply(DraftPatch {
            consent: Some(true),
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
        wizard
    }

    fn walk_to_dependents(wizard: &mut Wizard) {
        assert_eq!(wizard.advance().unwrap(), WizardStep::Consent);
        assert_eq!(wizard.advance().unwrap(), WizardStep::PersonalData);
        assert_eq!(wizard.advance().unwrap(), WizardStep::Professional);
        assert_eq!(wizard.advance().unwrap(), WizardStep::Spouse);
        assert_eq!(wizard.advance().unwrap(), WizardStep::Dependents);
    }

    #[test]
    fn test_new_wizard_starts_at_start() {
        let wizard = Wizard::new();
        assert_eq!(wizard.step(), WizardStep::Start);
        assert!(!wizard.is_submission_in_flight());
    }

    #[test]
    fn test_happy_path_walk_stops_at_dependents() {
        let mut wizard = wizard_with_filled_draft();
        walk_to_dependents(&mut wizard);

        // advance can never enter the terminal step
        let err = wizard.advance().unwrap_err();
        assert!(matches!(err, WizardError::InvalidTransition { .. }));
        assert_eq!(wizard.step(), WizardStep::Dependents);
    }

    #[test]
    fn test_advance_blocked_by_missing_field_without_state_change() {
        let mut wizard = wizard_with_filled_draft();
        wizard.apply(DraftPatch {
            email: Some(String::new()),
            ..Default::default()
        });
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), WizardStep::PersonalData);

        let err = wizard.advance().unwrap_err();
        match err {
            WizardError::StepValidationFailed(report) => {
                assert!(report.has_error_on(Field::Email));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(wizard.step(), WizardStep::PersonalData);

        // the draft survives the failed gate
        assert_eq!(wizard.draft().personal.full_name, "Maria Oliveira");
    }

    #[test]
    fn test_consent_gate() {
        let mut wizard = wizard_with_filled_draft();
        wizard.apply(DraftPatch {
            consent: Some(false),
            ..Default::default()
        });
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), WizardStep::Consent);

        let err = wizard.advance().unwrap_err();
        assert!(matches!(err, WizardError::StepValidationFailed(_)));
        assert_eq!(wizard.step(), WizardStep::Consent);

        wizard.apply(DraftPatch {
            consent: Some(true),
            ..Default::default()
        });
        assert_eq!(wizard.advance().unwrap(), WizardStep::PersonalData);
    }

    #[test]
    fn test_retreat_keeps_draft_and_needs_no_validation() {
        let mut wizard = wizard_with_filled_draft();
        wizard.advance().unwrap();
        wizard.advance().unwrap();

        // blank out a required field, then retreat
        wizard.apply(DraftPatch {
            cpf: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(wizard.retreat().unwrap(), WizardStep::Consent);
        assert_eq!(wizard.draft().personal.full_name, "Maria Oliveira");
    }

    #[test]
    fn test_retreat_from_start_is_invalid() {
        let mut wizard = Wizard::new();
        let err = wizard.retreat().unwrap_err();
        assert!(matches!(err, WizardError::InvalidTransition { .. }));
        assert_eq!(wizard.step(), WizardStep::Start);
    }

    #[test]
    fn test_restart_only_from_success() {
        let mut wizard = wizard_with_filled_draft();
        let err = wizard.restart().unwrap_err();
        assert!(matches!(err, WizardError::InvalidTransition { .. }));

        walk_to_dependents(&mut wizard);
        wizard.begin_submission().unwrap();
        wizard
            .complete_submission(core_kernel::RegistrationId::new())
            .unwrap();
        assert_eq!(wizard.step(), WizardStep::Success);

        // Success accepts neither advance nor retreat
        assert!(wizard.advance().is_err());
        assert!(wizard.retreat().is_err());

        wizard.restart().unwrap();
        assert_eq!(wizard.step(), WizardStep::Start);
        assert!(!wizard.draft().consent);
        assert_eq!(wizard.draft().personal.full_name, "");
        assert!(wizard.draft().dependents().is_empty());
    }

    #[test]
    fn test_begin_submission_requires_dependents_step() {
        let mut wizard = wizard_with_filled_draft();
        let err = wizard.begin_submission().unwrap_err();
        assert!(matches!(err, WizardError::InvalidTransition { .. }));
        assert!(!wizard.is_submission_in_flight());
    }

    #[test]
    fn test_submission_reentrancy_guard() {
        let mut wizard = wizard_with_filled_draft();
        walk_to_dependents(&mut wizard);

        wizard.begin_submission().unwrap();
        assert!(wizard.is_submission_in_flight());

        let err = wizard.begin_submission().unwrap_err();
        assert!(matches!(err, WizardError::SubmissionInProgress));

        // failure settles the guard and keeps the wizard editable
        wizard.fail_submission("storage failure").unwrap();
        assert!(!wizard.is_submission_in_flight());
        assert_eq!(wizard.step(), WizardStep::Dependents);

        // a fresh attempt is permitted again
        wizard.begin_submission().unwrap();
        wizard
            .complete_submission(core_kernel::RegistrationId::new())
            .unwrap();
        assert_eq!(wizard.step(), WizardStep::Success);
    }

    #[test]
    fn test_settling_without_inflight_submission_fails() {
        let mut wizard = wizard_with_filled_draft();
        assert!(matches!(
            wizard.complete_submission(core_kernel::RegistrationId::new()),
            Err(WizardError::SubmissionNotInProgress)
        ));
        assert!(matches!(
            wizard.fail_submission("nothing running"),
            Err(WizardError::SubmissionNotInProgress)
        ));
    }

    #[test]
    fn test_events_accumulate_and_drain() {
        let mut wizard = wizard_with_filled_draft();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.retreat().unwrap();

        let events = wizard.take_events();
        let types: Vec<_> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(types, vec!["StepEntered", "StepEntered", "StepEntered"]);

        match &events[0] {
            RegistrationEvent::StepEntered { from, to, .. } => {
                assert_eq!(*from, WizardStep::Start);
                assert_eq!(*to, WizardStep::Consent);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        // drained
        assert!(wizard.take_events().is_empty());
    }

    #[test]
    fn test_submission_events() {
        let mut wizard = wizard_with_filled_draft();
        walk_to_dependents(&mut wizard);
        wizard.take_events();

        wizard.begin_submission().unwrap();
        let id = core_kernel::RegistrationId::new();
        wizard.complete_submission(id).unwrap();

        let events = wizard.take_events();
        assert_eq!(events[0].event_type(), "SubmissionStarted");
        match &events[1] {
            RegistrationEvent::SubmissionCompleted {
                registration_id, ..
            } => assert_eq!(*registration_id, id),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(events[2].event_type(), "StepEntered");
    }

    #[test]
    fn test_step_successor_relation() {
        assert_eq!(WizardStep::Start.next(), Some(WizardStep::Consent));
        assert_eq!(WizardStep::Dependents.next(), Some(WizardStep::Success));
        assert_eq!(WizardStep::Success.next(), None);
        assert_eq!(WizardStep::Start.prev(), None);
        assert_eq!(WizardStep::Success.prev(), None);
        assert_eq!(WizardStep::Dependents.prev(), Some(WizardStep::Spouse));
        assert!(WizardStep::Success.is_terminal());
        assert!(!WizardStep::Dependents.is_terminal());
    }
}
