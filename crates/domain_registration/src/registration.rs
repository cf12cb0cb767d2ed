//! Persisted registration model and summary projection
//!
//! [`Registration`] is the immutable record created exactly once by a
//! successful submission: identity/contact/address fields normalized (CPF and
//! phones digit-stripped, names trimmed), professional and spouse data as
//! optional sub-documents, and the owned dependent rows. It is never updated
//! or deleted by this core.
//!
//! [`RegistrationSummary`] maps the stored shape back to a display-friendly
//! view: masked CPF, `DD/MM/YYYY` dates, and dependent lines. Absent
//! sub-documents project to defaults, never to an error.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{DependentId, RegistrationId};

use crate::draft::DraftRegistration;
use crate::validation::{FieldValidator, ValidationReport};

/// Display format for dates shown to members
pub const DATE_DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Professional sub-document of a registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalInfo {
    pub profession: String,
    /// Employer name; empty when not supplied
    #[serde(default)]
    pub company: String,
    pub work_address: String,
    pub work_phone: String,
}

/// Spouse sub-document, stored only when the complete pair was supplied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseInfo {
    pub name: String,
    pub email: String,
}

/// A persisted dependent row, owned by exactly one registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub id: DependentId,
    pub name: String,
    pub birth_date: NaiveDate,
    pub relationship: String,
}

impl Dependent {
    /// Renders the `name (DD/MM/YYYY)` line used in summaries and the
    /// confirmation email
    pub fn display_line(&self) -> String {
        format!(
            "{} ({})",
            self.name,
            self.birth_date.format(DATE_DISPLAY_FORMAT)
        )
    }
}

/// The immutable persisted registration record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub full_name: String,
    /// Digit-normalized; unique across all registrations
    pub cpf: String,
    pub rg: String,
    pub birth_date: NaiveDate,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    /// Optional free-text address complement
    pub address_note: Option<String>,
    /// Digit-normalized
    pub whatsapp: String,
    pub email: String,
    /// Nullable in storage; rows written by this core always carry it
    pub professional: Option<ProfessionalInfo>,
    pub spouse: Option<SpouseInfo>,
    pub dependents: Vec<Dependent>,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Builds a normalized registration from a draft under a caller-supplied id
    ///
    /// Re-runs the full draft validation; a failing draft returns the
    /// field-level report and nothing is constructed. On success every value
    /// is normalized: names and free text trimmed, CPF and phones reduced to
    /// digits, the spouse sub-document present only for a complete pair, and
    /// dependents copied with blank-named entries filtered out (the add-time
    /// guard already prevents them; the write path filters all the same).
    pub fn from_draft(
        id: RegistrationId,
        draft: &DraftRegistration,
    ) -> Result<Self, ValidationReport> {
        let report = FieldValidator::validate_draft(draft);
        if !report.is_valid {
            return Err(report);
        }

        // Deterministic validators cannot disagree with the passing report
        // above; the error arms exist to keep this function total.
        let birth_date = match FieldValidator::birth_date(&draft.personal.birth_date) {
            Ok(date) => date,
            Err(_) => return Err(report),
        };
        let spouse = match FieldValidator::spouse_pair(&draft.spouse.name, &draft.spouse.email) {
            Ok(pair) => pair.map(|(name, email)| SpouseInfo { name, email }),
            Err(_) => return Err(report),
        };

        let address_note = draft.personal.address_note.trim();

        Ok(Self {
            id,
            full_name: draft.personal.full_name.trim().to_string(),
            cpf: FieldValidator::normalize_digits(&draft.personal.cpf),
            rg: draft.personal.rg.trim().to_string(),
            birth_date,
            street: draft.personal.street.trim().to_string(),
            neighborhood: draft.personal.neighborhood.trim().to_string(),
            city: draft.personal.city.trim().to_string(),
            address_note: if address_note.is_empty() {
                None
            } else {
                Some(address_note.to_string())
            },
            whatsapp: FieldValidator::normalize_digits(&draft.personal.whatsapp),
            email: draft.personal.email.trim().to_string(),
            professional: Some(ProfessionalInfo {
                profession: draft.professional.profession.trim().to_string(),
                company: draft.professional.company.trim().to_string(),
                work_address: draft.professional.work_address.trim().to_string(),
                work_phone: FieldValidator::normalize_digits(&draft.professional.work_phone),
            }),
            spouse,
            dependents: draft
                .dependents()
                .iter()
                .filter(|entry| !entry.name.trim().is_empty())
                .map(|entry| Dependent {
                    id: DependentId::new_v7(),
                    name: entry.name.clone(),
                    birth_date: entry.birth_date,
                    relationship: entry.relationship.clone(),
                })
                .collect(),
            created_at: Utc::now(),
        })
    }

    /// CPF in its `XXX.XXX.XXX-XX` display mask
    pub fn masked_cpf(&self) -> String {
        FieldValidator::mask_cpf(&self.cpf)
    }
}

/// Display-friendly view of a persisted registration
///
/// A pure projection of the stored shape back to the logical form layout.
/// Sub-documents the row does not carry project to defaults: no spouse means
/// `has_spouse = false` with empty spouse fields, no professional data means
/// empty strings. Projection never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSummary {
    pub id: RegistrationId,
    pub full_name: String,
    /// Masked form, `529.982.247-25`
    pub cpf: String,
    pub rg: String,
    /// `DD/MM/YYYY`
    pub birth_date: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub address_note: String,
    pub whatsapp: String,
    pub email: String,
    pub profession: String,
    pub company: String,
    pub work_address: String,
    pub work_phone: String,
    pub has_spouse: bool,
    pub spouse_name: String,
    pub spouse_email: String,
    /// One `name (DD/MM/YYYY)` line per dependent
    pub dependents: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl RegistrationSummary {
    /// Projects a stored registration into its display view
    pub fn project(registration: &Registration) -> Self {
        let professional = registration.professional.as_ref();
        let spouse = registration.spouse.as_ref();

        Self {
            id: registration.id,
            full_name: registration.full_name.clone(),
            cpf: registration.masked_cpf(),
            rg: registration.rg.clone(),
            birth_date: registration
                .birth_date
                .format(DATE_DISPLAY_FORMAT)
                .to_string(),
            street: registration.street.clone(),
            neighborhood: registration.neighborhood.clone(),
            city: registration.city.clone(),
            address_note: registration.address_note.clone().unwrap_or_default(),
            whatsapp: registration.whatsapp.clone(),
            email: registration.email.clone(),
            profession: professional.map(|p| p.profession.clone()).unwrap_or_default(),
            company: professional.map(|p| p.company.clone()).unwrap_or_default(),
            work_address: professional
                .map(|p| p.work_address.clone())
                .unwrap_or_default(),
            work_phone: professional
                .map(|p| p.work_phone.clone())
                .unwrap_or_default(),
            has_spouse: spouse.is_some(),
            spouse_name: spouse.map(|s| s.name.clone()).unwrap_or_default(),
            spouse_email: spouse.map(|s| s.email.clone()).unwrap_or_default(),
            dependents: registration
                .dependents
                .iter()
                .map(Dependent::display_line)
                .collect(),
            created_at: registration.created_at,
        }
    }
}

impl From<&Registration> for RegistrationSummary {
    fn from(registration: &Registration) -> Self {
        Self::project(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftPatch;

    fn filled_draft() -> DraftRegistration {
        let mut draft = DraftRegistration::new();
        draft.apply(DraftPatch {
            consent: Some(true),
            full_name: Some("  Maria Oliveira  ".to_string()),
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
        draft
    }

    #[test]
    fn test_from_draft_normalizes_fields() {
        let id = RegistrationId::new_v7();
        let registration = Registration::from_draft(id, &filled_draft()).unwrap();

        assert_eq!(registration.id, id);
        assert_eq!(registration.full_name, "Maria Oliveira");
        assert_eq!(registration.cpf, "52998224725");
        assert_eq!(registration.whatsapp, "11987654321");
        assert_eq!(
            registration.birth_date,
            NaiveDate::from_ymd_opt(1980, 5, 20).unwrap()
        );
        assert_eq!(registration.address_note, None);
        assert!(registration.spouse.is_none());
        assert!(registration.dependents.is_empty());

        let professional = registration.professional.unwrap();
        assert_eq!(professional.profession, "Engenheira Civil");
        assert_eq!(professional.company, "");
        assert_eq!(professional.work_phone, "1132104455");
    }

    #[test]
    fn test_from_draft_rejects_invalid_draft() {
        let mut draft = filled_draft();
        draft.apply(DraftPatch {
            cpf: Some("123".to_string()),
            ..Default::default()
        });

        let report = Registration::from_draft(RegistrationId::new_v7(), &draft).unwrap_err();
        assert!(!report.is_valid);
        assert!(report.has_error_on(crate::validation::Field::Cpf));
    }

    #[test]
    fn test_from_draft_builds_spouse_only_for_complete_pair() {
        let mut draft = filled_draft();
        draft.apply(DraftPatch {
            spouse_name: Some("João Oliveira".to_string()),
            spouse_email: Some("joao@example.com".to_string()),
            ..Default::default()
        });

        let registration = Registration::from_draft(RegistrationId::new_v7(), &draft).unwrap();
        let spouse = registration.spouse.unwrap();
        assert_eq!(spouse.name, "João Oliveira");
        assert_eq!(spouse.email, "joao@example.com");
    }

    #[test]
    fn test_from_draft_carries_dependents() {
        let mut draft = filled_draft();
        draft.add_dependent("Ana", "2015-04-10").unwrap();
        draft.add_dependent("Pedro", "2017-08-02").unwrap();

        let registration = Registration::from_draft(RegistrationId::new_v7(), &draft).unwrap();
        assert_eq!(registration.dependents.len(), 2);
        assert_eq!(registration.dependents[0].name, "Ana");
        assert_eq!(
            registration.dependents[0].relationship,
            crate::draft::DEFAULT_RELATIONSHIP
        );
    }

    #[test]
    fn test_masked_cpf() {
        let registration = Registration::from_draft(RegistrationId::new_v7(), &filled_draft())
            .unwrap();
        assert_eq!(registration.masked_cpf(), "529.982.247-25");
    }

    #[test]
    fn test_projection_without_spouse_has_defaults() {
        let registration = Registration::from_draft(RegistrationId::new_v7(), &filled_draft())
            .unwrap();
        let summary = RegistrationSummary::project(&registration);

        assert!(!summary.has_spouse);
        assert_eq!(summary.spouse_name, "");
        assert_eq!(summary.spouse_email, "");
        assert_eq!(summary.cpf, "529.982.247-25");
        assert_eq!(summary.birth_date, "20/05/1980");
    }

    #[test]
    fn test_projection_without_professional_is_empty_strings() {
        let mut registration =
            Registration::from_draft(RegistrationId::new_v7(), &filled_draft()).unwrap();
        registration.professional = None;

        let summary = RegistrationSummary::project(&registration);
        assert_eq!(summary.profession, "");
        assert_eq!(summary.company, "");
        assert_eq!(summary.work_address, "");
        assert_eq!(summary.work_phone, "");
    }

    #[test]
    fn test_projection_renders_dependent_lines() {
        let mut draft = filled_draft();
        draft.add_dependent("Ana", "2015-04-10").unwrap();

        let registration = Registration::from_draft(RegistrationId::new_v7(), &draft).unwrap();
        let summary = RegistrationSummary::project(&registration);
        assert_eq!(summary.dependents, vec!["Ana (10/04/2015)".to_string()]);
    }

    #[test]
    fn test_projection_via_from() {
        let registration = Registration::from_draft(RegistrationId::new_v7(), &filled_draft())
            .unwrap();
        let summary: RegistrationSummary = (&registration).into();
        assert_eq!(summary.id, registration.id);
    }
}
