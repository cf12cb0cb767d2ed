//! Wizard Flow Tests
//!
//! End-to-end exercises of the re-registration wizard: walking a member from
//! the welcome screen to the success screen, being stopped by validation,
//! moving backwards without losing anything, and starting over.
//!
//! # Test Organization
//!
//! - `navigation` - forward and backward movement through the steps
//! - `submission_guard` - the in-flight flag around the submission window
//! - `restart` - clearing the draft after a completed run

use core_kernel::RegistrationId;
use domain_registration::{
    DraftPatch, RegistrationEvent, ValidationFailure, Wizard, WizardError, WizardStep,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Patch with every personal-data field a member must fill in
fn personal_patch() -> DraftPatch {
    DraftPatch {
        full_name: Some("Maria Oliveira".to_string()),
        cpf: Some("529.982.247-25".to_string()),
        rg: Some("12.345.678-9".to_string()),
        birth_date: Some("1980-05-20".to_string()),
        street: Some("Rua das Flores, 100".to_string()),
        neighborhood: Some("Centro".to_string()),
        city: Some("São Paulo".to_string()),
        whatsapp: Some("(11) 98765-4321".to_string()),
        email: Some("maria@example.com".to_string()),
        ..Default::default()
    }
}

/// Patch with every professional-data field a member must fill in
fn professional_patch() -> DraftPatch {
    DraftPatch {
        profession: Some("Engenheira Civil".to_string()),
        work_address: Some("Av. Paulista, 1000".to_string()),
        work_phone: Some("(11) 3210-4455".to_string()),
        ..Default::default()
    }
}

/// Walks a fresh wizard to the dependents step with a fully valid draft
fn wizard_at_dependents() -> Wizard {
    let mut wizard = Wizard::new();
    wizard.advance().unwrap();
    wizard.apply(DraftPatch {
        consent: Some(true),
        ..Default::default()
    });
    wizard.advance().unwrap();
    wizard.apply(personal_patch());
    wizard.advance().unwrap();
    wizard.apply(professional_patch());
    wizard.advance().unwrap();
    wizard.advance().unwrap(); // spouse left blank is valid
    assert_eq!(wizard.step(), WizardStep::Dependents);
    wizard
}

// ============================================================================
// NAVIGATION
// ============================================================================

mod navigation {
    use super::*;

    /// A member with valid data at every step reaches the dependents screen
    #[test]
    fn test_happy_path_reaches_dependents() {
        let wizard = wizard_at_dependents();
        assert!(!wizard.is_submission_in_flight());
        assert!(!wizard.step().is_terminal());
    }

    /// Advancing never jumps into the success screen, even from dependents
    #[test]
    fn test_advance_cannot_enter_success() {
        let mut wizard = wizard_at_dependents();
        let err = wizard.advance().unwrap_err();
        assert!(matches!(err, WizardError::InvalidTransition { .. }));
        assert_eq!(wizard.step(), WizardStep::Dependents);
    }

    /// A validation failure reports the offending fields and stays put
    #[test]
    fn test_blocked_advance_keeps_step_and_draft() {
        let mut wizard = Wizard::new();
        wizard.advance().unwrap();
        wizard.apply(DraftPatch {
            consent: Some(true),
            ..Default::default()
        });
        wizard.advance().unwrap();

        // Only a name, everything else missing
        wizard.apply(DraftPatch {
            full_name: Some("Maria Oliveira".to_string()),
            ..Default::default()
        });

        let err = wizard.advance().unwrap_err();
        match err {
            WizardError::StepValidationFailed(report) => {
                assert!(!report.is_valid);
                assert!(report.has_error_on(domain_registration::Field::Cpf));
                assert!(report.has_error_on(domain_registration::Field::Email));
            }
            other => panic!("expected step validation failure, got {other:?}"),
        }
        assert_eq!(wizard.step(), WizardStep::PersonalData);
        assert_eq!(wizard.draft().personal.full_name, "Maria Oliveira");
    }

    /// The consent gate blocks with the dedicated failure kind
    #[test]
    fn test_consent_gate_failure_kind() {
        let mut wizard = Wizard::new();
        wizard.advance().unwrap();

        match wizard.advance().unwrap_err() {
            WizardError::StepValidationFailed(report) => {
                assert_eq!(report.errors.len(), 1);
                assert_eq!(report.errors[0].failure, ValidationFailure::ConsentRequired);
            }
            other => panic!("expected step validation failure, got {other:?}"),
        }
    }

    /// Going backwards all the way to the start keeps every entered field
    #[test]
    fn test_retreat_preserves_draft() {
        let mut wizard = wizard_at_dependents();
        wizard.add_dependent("Ana", "2015-04-10").unwrap();

        while wizard.step() != WizardStep::Start {
            wizard.retreat().unwrap();
        }

        assert_eq!(wizard.draft().personal.cpf, "529.982.247-25");
        assert_eq!(wizard.draft().professional.profession, "Engenheira Civil");
        assert_eq!(wizard.draft().dependents().len(), 1);
        assert!(wizard.draft().consent);
    }

    /// There is nothing before the welcome screen
    #[test]
    fn test_retreat_from_start_is_invalid() {
        let mut wizard = Wizard::new();
        assert!(matches!(
            wizard.retreat(),
            Err(WizardError::InvalidTransition { .. })
        ));
    }

    /// Step entry events carry the transition endpoints in order
    #[test]
    fn test_navigation_events() {
        let mut wizard = Wizard::new();
        wizard.advance().unwrap();
        wizard.apply(DraftPatch {
            consent: Some(true),
            ..Default::default()
        });
        wizard.advance().unwrap();
        wizard.retreat().unwrap();

        let events = wizard.take_events();
        let types: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(types, vec!["StepEntered", "StepEntered", "StepEntered"]);
        match &events[2] {
            RegistrationEvent::StepEntered { from, to, .. } => {
                assert_eq!(*from, WizardStep::PersonalData);
                assert_eq!(*to, WizardStep::Consent);
            }
            other => panic!("expected step entry, got {other:?}"),
        }
        assert!(wizard.take_events().is_empty());
    }
}

// ============================================================================
// SUBMISSION GUARD
// ============================================================================

mod submission_guard {
    use super::*;

    /// Submission can only start from the dependents step
    #[test]
    fn test_begin_requires_dependents_step() {
        let mut wizard = Wizard::new();
        wizard.advance().unwrap();
        assert!(matches!(
            wizard.begin_submission(),
            Err(WizardError::InvalidTransition { .. })
        ));
    }

    /// A second submission cannot start while one is in flight
    #[test]
    fn test_double_begin_is_rejected() {
        let mut wizard = wizard_at_dependents();
        wizard.begin_submission().unwrap();
        assert!(matches!(
            wizard.begin_submission(),
            Err(WizardError::SubmissionInProgress)
        ));
    }

    /// A failed submission re-arms the wizard on the same step
    #[test]
    fn test_failure_allows_retry() {
        let mut wizard = wizard_at_dependents();
        wizard.begin_submission().unwrap();
        wizard.fail_submission("storage timeout").unwrap();

        assert_eq!(wizard.step(), WizardStep::Dependents);
        assert!(!wizard.is_submission_in_flight());

        wizard.begin_submission().unwrap();
        wizard.complete_submission(RegistrationId::new_v7()).unwrap();
        assert_eq!(wizard.step(), WizardStep::Success);
    }

    /// Settling a submission that never started is an error
    #[test]
    fn test_settle_without_inflight_is_rejected() {
        let mut wizard = wizard_at_dependents();
        assert!(matches!(
            wizard.complete_submission(RegistrationId::new_v7()),
            Err(WizardError::SubmissionNotInProgress)
        ));
        assert!(matches!(
            wizard.fail_submission("n/a"),
            Err(WizardError::SubmissionNotInProgress)
        ));
    }

    /// Backward navigation stays open while the submission is in flight
    #[test]
    fn test_retreat_permitted_mid_flight() {
        let mut wizard = wizard_at_dependents();
        wizard.begin_submission().unwrap();
        wizard.retreat().unwrap();
        assert_eq!(wizard.step(), WizardStep::Spouse);

        wizard.complete_submission(RegistrationId::new_v7()).unwrap();
        assert_eq!(wizard.step(), WizardStep::Success);
    }

    /// The submission lifecycle leaves a complete event trail
    #[test]
    fn test_submission_event_trail() {
        let mut wizard = wizard_at_dependents();
        wizard.take_events();

        let id = RegistrationId::new_v7();
        wizard.begin_submission().unwrap();
        wizard.complete_submission(id).unwrap();

        let events = wizard.take_events();
        let types: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec!["SubmissionStarted", "SubmissionCompleted", "StepEntered"]
        );
        match &events[1] {
            RegistrationEvent::SubmissionCompleted {
                registration_id, ..
            } => assert_eq!(*registration_id, id),
            other => panic!("expected completion event, got {other:?}"),
        }
    }
}

// ============================================================================
// RESTART
// ============================================================================

mod restart {
    use super::*;

    /// Restart is only offered on the success screen
    #[test]
    fn test_restart_requires_success() {
        let mut wizard = wizard_at_dependents();
        assert!(matches!(
            wizard.restart(),
            Err(WizardError::InvalidTransition { .. })
        ));
    }

    /// After a completed run, restart wipes the draft for the next member
    #[test]
    fn test_restart_clears_everything() {
        let mut wizard = wizard_at_dependents();
        wizard.add_dependent("Ana", "2015-04-10").unwrap();
        wizard.begin_submission().unwrap();
        wizard.complete_submission(RegistrationId::new_v7()).unwrap();
        assert_eq!(wizard.step(), WizardStep::Success);

        wizard.restart().unwrap();

        assert_eq!(wizard.step(), WizardStep::Start);
        assert!(!wizard.draft().consent);
        assert_eq!(wizard.draft().personal.full_name, "");
        assert!(wizard.draft().dependents().is_empty());

        // The same wizard can immediately serve a second member
        wizard.advance().unwrap();
        wizard.apply(DraftPatch {
            consent: Some(true),
            ..Default::default()
        });
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), WizardStep::PersonalData);
    }
}
