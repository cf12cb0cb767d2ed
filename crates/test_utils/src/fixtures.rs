//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the re-registration system.
//! These fixtures are designed to be consistent and predictable for unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{DependentId, NotificationId, RegistrationId};
use domain_registration::{DraftPatch, DraftRegistration, Registration};
use uuid::Uuid;

/// Fixture for draft registrations at various stages of completeness
pub struct DraftFixtures;

impl DraftFixtures {
    /// A fully valid draft for a member with no spouse and no dependents
    pub fn maria() -> DraftRegistration {
        let mut draft = DraftRegistration::new();
        draft.apply(DraftPatch {
            consent: Some(true),
            full_name: Some("Maria Oliveira".to_string()),
            cpf: Some(StringFixtures::cpf_masked().to_string()),
            rg: Some("12.345.678-9".to_string()),
            birth_date: Some("1980-03-15".to_string()),
            street: Some("Rua das Flores, 123".to_string()),
            neighborhood: Some("Centro".to_string()),
            city: Some("Curitiba".to_string()),
            whatsapp: Some(StringFixtures::mobile_phone_masked().to_string()),
            email: Some("maria@example.com".to_string()),
            profession: Some("Engenheira Civil".to_string()),
            company: Some("Construtora Horizonte".to_string()),
            work_address: Some("Av. Sete de Setembro, 1000".to_string()),
            work_phone: Some(StringFixtures::landline_masked().to_string()),
            ..Default::default()
        });
        draft
    }

    /// A fully valid draft with a spouse pair and two dependents
    pub fn joao_with_family() -> DraftRegistration {
        let mut draft = DraftRegistration::new();
        draft.apply(DraftPatch {
            consent: Some(true),
            full_name: Some("João Pereira".to_string()),
            cpf: Some(StringFixtures::cpf_alternate_masked().to_string()),
            rg: Some("98.765.432-1".to_string()),
            birth_date: Some("1975-11-02".to_string()),
            street: Some("Rua XV de Novembro, 456".to_string()),
            neighborhood: Some("Batel".to_string()),
            city: Some("Curitiba".to_string()),
            address_note: Some("Casa dos fundos".to_string()),
            whatsapp: Some("(41) 98822-1133".to_string()),
            email: Some("joao@example.com".to_string()),
            profession: Some("Professor".to_string()),
            work_address: Some("Rua das Acácias, 77".to_string()),
            work_phone: Some("(41) 3030-2020".to_string()),
            spouse_name: Some("Clara Pereira".to_string()),
            spouse_email: Some("clara@example.com".to_string()),
            ..Default::default()
        });
        draft
            .add_dependent("Ana Pereira", "2012-07-01")
            .expect("fixture dependent is valid");
        draft
            .add_dependent("Lucas Pereira", "2015-11-23")
            .expect("fixture dependent is valid");
        draft
    }

    /// A draft that fails validation on the CPF field
    pub fn missing_cpf() -> DraftRegistration {
        let mut draft = Self::maria();
        draft.apply(DraftPatch {
            cpf: Some(String::new()),
            ..Default::default()
        });
        draft
    }

    /// A draft with a spouse name but no spouse email (incomplete pair)
    pub fn half_spouse() -> DraftRegistration {
        let mut draft = Self::maria();
        draft.apply(DraftPatch {
            spouse_name: Some("Carlos Oliveira".to_string()),
            ..Default::default()
        });
        draft
    }
}

/// Fixture for persisted registrations
pub struct RegistrationFixtures;

impl RegistrationFixtures {
    /// A persisted registration built from the `maria` draft under a
    /// deterministic id
    pub fn maria() -> Registration {
        Registration::from_draft(IdFixtures::registration_id(), &DraftFixtures::maria())
            .expect("fixture draft is valid")
    }

    /// A persisted registration with spouse and dependents, built from the
    /// `joao_with_family` draft
    pub fn joao_with_family() -> Registration {
        Registration::from_draft(
            IdFixtures::alternate_registration_id(),
            &DraftFixtures::joao_with_family(),
        )
        .expect("fixture draft is valid")
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Fixed submission timestamp inside the campaign window
    pub fn submission_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 14, 30, 0).unwrap()
    }

    /// Standard adult birth date (text form, as typed into the wizard)
    pub fn adult_birth_date_text() -> &'static str {
        "1980-03-15"
    }

    /// Standard adult birth date (parsed form)
    pub fn adult_birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1980, 3, 15).unwrap()
    }

    /// Standard child birth date for dependents
    pub fn child_birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2012, 7, 1).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic registration ID for testing
    pub fn registration_id() -> RegistrationId {
        RegistrationId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a second, distinct deterministic registration ID
    pub fn alternate_registration_id() -> RegistrationId {
        RegistrationId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic dependent ID for testing
    pub fn dependent_id() -> DependentId {
        DependentId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a deterministic notification ID for testing
    pub fn notification_id() -> NotificationId {
        NotificationId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// Digit-normalized CPF
    pub fn cpf() -> &'static str {
        "52998224725"
    }

    /// The same CPF in its display mask
    pub fn cpf_masked() -> &'static str {
        "529.982.247-25"
    }

    /// A second, distinct digit-normalized CPF
    pub fn cpf_alternate() -> &'static str {
        "11144477735"
    }

    /// The second CPF in its display mask
    pub fn cpf_alternate_masked() -> &'static str {
        "111.444.777-35"
    }

    /// Mobile phone in its display mask (11 digits)
    pub fn mobile_phone_masked() -> &'static str {
        "(41) 99988-7766"
    }

    /// The same mobile phone digit-normalized
    pub fn mobile_phone() -> &'static str {
        "41999887766"
    }

    /// Landline in its display mask (10 digits)
    pub fn landline_masked() -> &'static str {
        "(41) 3333-4444"
    }

    /// Test email address
    pub fn email() -> &'static str {
        "maria@example.com"
    }

    /// Test full name
    pub fn full_name() -> &'static str {
        "Maria Oliveira"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_registration::FieldValidator;

    #[test]
    fn test_maria_draft_is_valid() {
        let report = FieldValidator::validate_draft(&DraftFixtures::maria());
        assert!(report.is_valid, "errors: {:?}", report.errors);
    }

    #[test]
    fn test_joao_draft_is_valid_with_family() {
        let draft = DraftFixtures::joao_with_family();
        let report = FieldValidator::validate_draft(&draft);
        assert!(report.is_valid, "errors: {:?}", report.errors);
        assert!(draft.has_spouse());
        assert_eq!(draft.dependents().len(), 2);
    }

    #[test]
    fn test_invalid_fixtures_fail_validation() {
        assert!(!FieldValidator::validate_draft(&DraftFixtures::missing_cpf()).is_valid);
        assert!(!FieldValidator::validate_draft(&DraftFixtures::half_spouse()).is_valid);
    }

    #[test]
    fn test_registration_fixture_normalizes() {
        let registration = RegistrationFixtures::maria();
        assert_eq!(registration.cpf, StringFixtures::cpf());
        assert_eq!(registration.whatsapp, StringFixtures::mobile_phone());
    }

    #[test]
    fn test_id_fixtures_are_deterministic() {
        let id1 = IdFixtures::registration_id();
        let id2 = IdFixtures::registration_id();
        assert_eq!(id1, id2);
        assert_ne!(id1, IdFixtures::alternate_registration_id());
    }

    #[test]
    fn test_cpf_fixtures_agree_with_the_mask() {
        assert_eq!(
            FieldValidator::mask_cpf(StringFixtures::cpf()),
            StringFixtures::cpf_masked()
        );
        assert_eq!(
            FieldValidator::normalize_digits(StringFixtures::cpf_alternate_masked()),
            StringFixtures::cpf_alternate()
        );
    }
}
