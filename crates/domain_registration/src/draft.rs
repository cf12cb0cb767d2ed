//! Draft registration aggregate
//!
//! The draft is the in-memory accumulation of everything the member has
//! entered across the wizard steps. It exists only inside the active wizard
//! until submission and is never partially persisted. Scalar fields mutate
//! exclusively through the merge-patch [`DraftRegistration::apply`]; the
//! dependent list mutates exclusively through the guarded
//! [`DraftRegistration::add_dependent`] / [`DraftRegistration::remove_dependent`]
//! operations, which enforce the list invariants at add time.
//!
//! Field values are kept as the raw text the member typed (masks included);
//! parsing and normalization happen in the validators and at submission.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::validation::{Field, FieldValidator, ValidationReport};

/// Upper bound on dependents per registration
pub const MAX_DEPENDENTS: usize = 6;

/// Relationship label recorded when the form does not ask for one
pub const DEFAULT_RELATIONSHIP: &str = "Filho/Dependente";

/// Identity, contact, and address fields collected on the personal-data step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDraft {
    pub full_name: String,
    pub cpf: String,
    pub rg: String,
    /// `YYYY-MM-DD` text as entered
    pub birth_date: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    /// Optional free-text complement (reference point, unit number)
    pub address_note: String,
    pub whatsapp: String,
    pub email: String,
}

/// Fields collected on the professional step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalDraft {
    pub profession: String,
    /// Optional employer name
    pub company: String,
    pub work_address: String,
    pub work_phone: String,
}

/// The optional spouse pair; blank in both fields means no spouse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseDraft {
    pub name: String,
    pub email: String,
}

/// A dependent accepted into the draft list
///
/// Entries only enter the list through [`DraftRegistration::add_dependent`],
/// so the name is always non-blank and the birth date always parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentEntry {
    pub name: String,
    pub birth_date: NaiveDate,
    pub relationship: String,
}

/// The accumulating re-registration draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRegistration {
    /// Consent acknowledgment; gates navigation past the Consent step
    pub consent: bool,
    pub personal: PersonalDraft,
    pub professional: ProfessionalDraft,
    pub spouse: SpouseDraft,
    dependents: Vec<DependentEntry>,
}

/// A partial update contributed by one wizard screen
///
/// Every field is optional; `apply` overwrites only the fields that are
/// present, so screens can patch their own slice of the draft without
/// clobbering the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftPatch {
    pub consent: Option<bool>,
    pub full_name: Option<String>,
    pub cpf: Option<String>,
    pub rg: Option<String>,
    pub birth_date: Option<String>,
    pub street: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub address_note: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub profession: Option<String>,
    pub company: Option<String>,
    pub work_address: Option<String>,
    pub work_phone: Option<String>,
    pub spouse_name: Option<String>,
    pub spouse_email: Option<String>,
}

impl DraftRegistration {
    /// Creates an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a patch into the draft, overwriting only present fields
    pub fn apply(&mut self, patch: DraftPatch) {
        if let Some(consent) = patch.consent {
            self.consent = consent;
        }
        if let Some(value) = patch.full_name {
            self.personal.full_name = value;
        }
        if let Some(value) = patch.cpf {
            self.personal.cpf = value;
        }
        if let Some(value) = patch.rg {
            self.personal.rg = value;
        }
        if let Some(value) = patch.birth_date {
            self.personal.birth_date = value;
        }
        if let Some(value) = patch.street {
            self.personal.street = value;
        }
        if let Some(value) = patch.neighborhood {
            self.personal.neighborhood = value;
        }
        if let Some(value) = patch.city {
            self.personal.city = value;
        }
        if let Some(value) = patch.address_note {
            self.personal.address_note = value;
        }
        if let Some(value) = patch.whatsapp {
            self.personal.whatsapp = value;
        }
        if let Some(value) = patch.email {
            self.personal.email = value;
        }
        if let Some(value) = patch.profession {
            self.professional.profession = value;
        }
        if let Some(value) = patch.company {
            self.professional.company = value;
        }
        if let Some(value) = patch.work_address {
            self.professional.work_address = value;
        }
        if let Some(value) = patch.work_phone {
            self.professional.work_phone = value;
        }
        if let Some(value) = patch.spouse_name {
            self.spouse.name = value;
        }
        if let Some(value) = patch.spouse_email {
            self.spouse.email = value;
        }
    }

    /// Adds a dependent, enforcing the list invariants
    ///
    /// Rejects a blank name, an unparseable or impossible birth date, and
    /// additions beyond [`MAX_DEPENDENTS`]. The relationship defaults to
    /// [`DEFAULT_RELATIONSHIP`] since the form never asks for one.
    pub fn add_dependent(&mut self, name: &str, birth_date: &str) -> Result<(), RegistrationError> {
        if self.dependents.len() >= MAX_DEPENDENTS {
            return Err(RegistrationError::DependentLimitReached {
                max: MAX_DEPENDENTS,
            });
        }

        let mut report = ValidationReport::ok();
        let trimmed_name = match FieldValidator::non_empty(name) {
            Ok(value) => Some(value),
            Err(failure) => {
                report.add_error(Field::DependentName, failure);
                None
            }
        };
        let parsed_date = match FieldValidator::birth_date(birth_date) {
            Ok(value) => Some(value),
            Err(failure) => {
                report.add_error(Field::DependentBirthDate, failure);
                None
            }
        };

        let (Some(name), Some(birth_date)) = (trimmed_name, parsed_date) else {
            return Err(RegistrationError::validation(report));
        };

        self.dependents.push(DependentEntry {
            name,
            birth_date,
            relationship: DEFAULT_RELATIONSHIP.to_string(),
        });
        Ok(())
    }

    /// Removes and returns the dependent at `index`
    pub fn remove_dependent(&mut self, index: usize) -> Result<DependentEntry, RegistrationError> {
        if index >= self.dependents.len() {
            return Err(RegistrationError::DependentNotFound { index });
        }
        Ok(self.dependents.remove(index))
    }

    /// The accepted dependent entries, in add order
    pub fn dependents(&self) -> &[DependentEntry] {
        &self.dependents
    }

    /// Whether a complete spouse pair has been entered
    pub fn has_spouse(&self) -> bool {
        !self.spouse.name.trim().is_empty() && !self.spouse.email.trim().is_empty()
    }

    /// Resets every field, including consent and dependents
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
