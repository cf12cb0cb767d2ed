//! Registration DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_registration::{
    DraftPatch, DraftRegistration, RegistrationError, RegistrationSummary, SubmissionReceipt,
};

/// The full draft shape the submission endpoint accepts
///
/// Every text field defaults to empty so an omitted field reads as "not
/// filled in" and surfaces through the domain's field report instead of a
/// deserialization failure. The `validator` constraints are size caps only;
/// CPF shape, date parsing, phone and email checks, and the spouse pair rule
/// all belong to the domain.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRegistrationRequest {
    #[serde(default)]
    pub consent: bool,

    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub full_name: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub cpf: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub rg: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub birth_date: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub street: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub neighborhood: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub city: String,

    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub address_note: Option<String>,

    #[serde(default)]
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub whatsapp: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub profession: String,

    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub company: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub work_address: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub work_phone: String,

    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub spouse_name: Option<String>,

    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub spouse_email: Option<String>,

    #[serde(default)]
    pub dependents: Vec<DependentRequest>,
}

/// One dependent row from the form
#[derive(Debug, Clone, Deserialize)]
pub struct DependentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_date: String,
}

impl DependentRequest {
    /// Whether the row was left entirely empty
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.birth_date.trim().is_empty()
    }
}

impl SubmitRegistrationRequest {
    /// Assembles the domain draft from the wire shape
    ///
    /// Dependent rows left entirely blank are dropped the way the form drops
    /// them; rows with content go through the add-time guard, so a bad row
    /// rejects the whole request with its field report.
    pub fn into_draft(self) -> Result<DraftRegistration, RegistrationError> {
        let mut draft = DraftRegistration::new();
        draft.apply(DraftPatch {
            consent: Some(self.consent),
            full_name: Some(self.full_name),
            cpf: Some(self.cpf),
            rg: Some(self.rg),
            birth_date: Some(self.birth_date),
            street: Some(self.street),
            neighborhood: Some(self.neighborhood),
            city: Some(self.city),
            address_note: self.address_note,
            whatsapp: Some(self.whatsapp),
            email: Some(self.email),
            profession: Some(self.profession),
            company: self.company,
            work_address: Some(self.work_address),
            work_phone: Some(self.work_phone),
            spouse_name: self.spouse_name,
            spouse_email: self.spouse_email,
        });

        for dependent in &self.dependents {
            if dependent.is_blank() {
                continue;
            }
            draft.add_dependent(&dependent.name, &dependent.birth_date)?;
        }

        Ok(draft)
    }
}

/// Receipt echoed back on a successful submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    /// CPF in its display mask
    pub cpf: String,
}

impl From<SubmissionReceipt> for SubmissionResponse {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self {
            id: *receipt.id.as_uuid(),
            full_name: receipt.full_name,
            email: receipt.email,
            cpf: receipt.cpf,
        }
    }
}

/// Projected summary of a stored registration
#[derive(Debug, Serialize)]
pub struct RegistrationSummaryResponse {
    pub id: Uuid,
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

impl From<RegistrationSummary> for RegistrationSummaryResponse {
    fn from(summary: RegistrationSummary) -> Self {
        Self {
            id: *summary.id.as_uuid(),
            full_name: summary.full_name,
            cpf: summary.cpf,
            rg: summary.rg,
            birth_date: summary.birth_date,
            street: summary.street,
            neighborhood: summary.neighborhood,
            city: summary.city,
            address_note: summary.address_note,
            whatsapp: summary.whatsapp,
            email: summary.email,
            profession: summary.profession,
            company: summary.company,
            work_address: summary.work_address,
            work_phone: summary.work_phone,
            has_spouse: summary.has_spouse,
            spouse_name: summary.spouse_name,
            spouse_email: summary.spouse_email,
            dependents: summary.dependents,
            created_at: summary.created_at,
        }
    }
}

/// Body of the CPF uniqueness fast path
#[derive(Debug, Serialize)]
pub struct CpfExistsResponse {
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn full_request() -> SubmitRegistrationRequest {
        serde_json::from_value(serde_json::json!({
            "consent": true,
            "full_name": "Maria Oliveira",
            "cpf": "529.982.247-25",
            "rg": "12.345.678-9",
            "birth_date": "1980-03-15",
            "street": "Rua das Flores, 123",
            "neighborhood": "Centro",
            "city": "Curitiba",
            "whatsapp": "(41) 99988-7766",
            "email": "maria@example.com",
            "profession": "Engenheira Civil",
            "work_address": "Av. Sete de Setembro, 1000",
            "work_phone": "(41) 3333-4444",
            "dependents": [
                { "name": "Ana Oliveira", "birth_date": "2012-07-01" },
                { "name": "", "birth_date": "" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let request: SubmitRegistrationRequest = serde_json::from_value(serde_json::json!({
            "full_name": "Maria Oliveira"
        }))
        .unwrap();

        assert!(!request.consent);
        assert!(request.cpf.is_empty());
        assert!(request.dependents.is_empty());
        assert!(request.address_note.is_none());
    }

    #[test]
    fn test_into_draft_skips_blank_dependent_rows() {
        let draft = full_request().into_draft().unwrap();
        assert_eq!(draft.dependents().len(), 1);
        assert_eq!(draft.dependents()[0].name, "Ana Oliveira");
    }

    #[test]
    fn test_into_draft_rejects_partial_dependent_row() {
        let mut request = full_request();
        request.dependents.push(DependentRequest {
            name: "Lucas Oliveira".to_string(),
            birth_date: "not-a-date".to_string(),
        });

        let err = request.into_draft().unwrap_err();
        assert!(matches!(err, RegistrationError::ValidationFailed(_)));
    }

    #[test]
    fn test_size_caps_reject_oversized_fields() {
        let mut request = full_request();
        request.full_name = "x".repeat(300);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_summary_response_mirrors_projection() {
        use core_kernel::RegistrationId;
        use domain_registration::Registration;

        let draft = full_request().into_draft().unwrap();
        let registration = Registration::from_draft(RegistrationId::new_v7(), &draft).unwrap();
        let response: RegistrationSummaryResponse =
            RegistrationSummary::project(&registration).into();

        assert_eq!(response.cpf, "529.982.247-25");
        assert_eq!(response.birth_date, "15/03/1980");
        assert_eq!(response.dependents, vec!["Ana Oliveira (01/07/2012)".to_string()]);
        assert!(!response.has_spouse);
    }
}
