//! Field validation rules for the re-registration draft
//!
//! This module provides the pure validation layer for draft registrations,
//! ensuring every field is well-formed before the wizard advances and before
//! submission touches any port.
//!
//! # Validation Rules
//!
//! ## Identity
//! - Full name must be non-empty after trimming
//! - CPF must resolve to exactly 11 digits once mask punctuation is stripped
//! - RG must be non-empty after trimming
//! - Birth date must be a real calendar date (Feb 30 and day 31 in a 30-day
//!   month are rejected even when the raw text looks date-shaped)
//!
//! ## Contact & Address
//! - Street, neighborhood, and city must be non-empty; the free-text address
//!   note is optional
//! - WhatsApp and work phone must strip to 10 or 11 digits
//! - Email must have a conservative `local@domain.tld` shape
//!
//! ## Spouse
//! - Name and email are validated as a pair: both present or both absent.
//!   Exactly one supplied is a distinct failure from "both absent", which is
//!   valid
//!
//! All validators are pure and synchronous; expected-invalid input never
//! panics. Verdicts on CPF and phone depend only on the digit-stripped form,
//! so mask punctuation never changes the outcome.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::draft::DraftRegistration;
use crate::wizard::WizardStep;

/// Wire format for dates entered as text (HTML date-input style)
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Draft fields that can fail validation
///
/// Serialized in snake_case so the HTTP layer can echo field keys directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Cpf,
    Rg,
    BirthDate,
    Street,
    Neighborhood,
    City,
    Whatsapp,
    Email,
    Profession,
    WorkAddress,
    WorkPhone,
    SpouseName,
    SpouseEmail,
    DependentName,
    DependentBirthDate,
    Consent,
}

impl Field {
    /// Returns the snake_case key used in error payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::Cpf => "cpf",
            Field::Rg => "rg",
            Field::BirthDate => "birth_date",
            Field::Street => "street",
            Field::Neighborhood => "neighborhood",
            Field::City => "city",
            Field::Whatsapp => "whatsapp",
            Field::Email => "email",
            Field::Profession => "profession",
            Field::WorkAddress => "work_address",
            Field::WorkPhone => "work_phone",
            Field::SpouseName => "spouse_name",
            Field::SpouseEmail => "spouse_email",
            Field::DependentName => "dependent_name",
            Field::DependentBirthDate => "dependent_birth_date",
            Field::Consent => "consent",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    /// Value is missing or blank after trimming
    Required,
    /// CPF does not strip to exactly 11 digits
    MalformedCpf,
    /// Not a real calendar date
    InvalidDate,
    /// Phone does not strip to 10 or 11 digits
    MalformedPhone,
    /// Not a plausible `local@domain.tld` address
    MalformedEmail,
    /// Spouse name and email must be supplied together
    IncompletePair,
    /// The consent acknowledgment has not been given
    ConsentRequired,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ValidationFailure::Required => "value is required",
            ValidationFailure::MalformedCpf => "CPF must contain exactly 11 digits",
            ValidationFailure::InvalidDate => "not a valid calendar date",
            ValidationFailure::MalformedPhone => "phone must contain 10 or 11 digits",
            ValidationFailure::MalformedEmail => "not a valid email address",
            ValidationFailure::IncompletePair => "spouse name and email must be supplied together",
            ValidationFailure::ConsentRequired => "consent must be acknowledged",
        };
        f.write_str(message)
    }
}

/// A single field-level validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Which field failed
    pub field: Field,
    /// Why it failed
    pub failure: ValidationFailure,
}

impl FieldError {
    /// Creates a new field error
    pub fn new(field: Field, failure: ValidationFailure) -> Self {
        Self { field, failure }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.failure)
    }
}

/// Result of validating a step or a whole draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether every checked field passed
    pub is_valid: bool,
    /// Field-level errors
    pub errors: Vec<FieldError>,
    /// Non-fatal issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Creates a passing report
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Creates a failed report with errors
    pub fn fail(errors: Vec<FieldError>) -> Self {
        Self {
            is_valid: false,
            errors,
            warnings: Vec::new(),
        }
    }

    /// Adds a field error, marking the report failed
    pub fn add_error(&mut self, field: Field, failure: ValidationFailure) {
        self.errors.push(FieldError::new(field, failure));
        self.is_valid = false;
    }

    /// Adds a non-fatal warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Merges another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// The keys of every failed field, in error order
    pub fn failed_fields(&self) -> Vec<Field> {
        self.errors.iter().map(|e| e.field).collect()
    }

    /// Whether a specific field has an error
    pub fn has_error_on(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::ok()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return f.write_str("valid");
        }
        let joined = self
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// Validator for draft registration fields
///
/// Provides the pure per-field rules plus step-level and whole-draft
/// aggregation used by the wizard gate and the submission pipeline.
///
/// # Examples
///
/// ```rust
/// use domain_registration::validation::FieldValidator;
///
/// assert_eq!(
///     FieldValidator::cpf("529.982.247-25").unwrap(),
///     FieldValidator::cpf("52998224725").unwrap(),
/// );
/// ```
pub struct FieldValidator;

impl FieldValidator {
    /// Strips everything but ASCII digits from a raw value
    pub fn normalize_digits(raw: &str) -> String {
        raw.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Formats an 11-digit CPF in its `XXX.XXX.XXX-XX` display mask
    ///
    /// Values that are not exactly 11 digits are returned unchanged.
    pub fn mask_cpf(digits: &str) -> String {
        if digits.len() != 11 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return digits.to_string();
        }
        format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        )
    }

    /// Validates a free-text required field, returning the trimmed value
    pub fn non_empty(raw: &str) -> Result<String, ValidationFailure> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(ValidationFailure::Required)
        } else {
            Ok(trimmed.to_string())
        }
    }

    /// Validates a CPF, returning its digit-normalized form
    ///
    /// The verdict depends only on the digit-stripped value, so
    /// `"529.982.247-25"` and `"52998224725"` always agree.
    pub fn cpf(raw: &str) -> Result<String, ValidationFailure> {
        if raw.trim().is_empty() {
            return Err(ValidationFailure::Required);
        }
        let digits = Self::normalize_digits(raw);
        if digits.len() == 11 {
            Ok(digits)
        } else {
            Err(ValidationFailure::MalformedCpf)
        }
    }

    /// Validates a birth date entered as `YYYY-MM-DD` text
    ///
    /// `chrono` rejects impossible day/month combinations, so `2023-02-30`
    /// and `2023-04-31` fail even though the text is date-shaped.
    pub fn birth_date(raw: &str) -> Result<NaiveDate, ValidationFailure> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationFailure::Required);
        }
        NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT)
            .map_err(|_| ValidationFailure::InvalidDate)
    }

    /// Validates a phone number, returning its digit-normalized form
    ///
    /// Accepts landlines (10 digits) and mobiles (11 digits); mask
    /// punctuation is ignored.
    pub fn phone(raw: &str) -> Result<String, ValidationFailure> {
        if raw.trim().is_empty() {
            return Err(ValidationFailure::Required);
        }
        let digits = Self::normalize_digits(raw);
        if digits.len() == 10 || digits.len() == 11 {
            Ok(digits)
        } else {
            Err(ValidationFailure::MalformedPhone)
        }
    }

    /// Validates an email address, returning the trimmed value
    ///
    /// Conservative shape check: no whitespace, exactly one `@`, non-empty
    /// local part, and a domain containing at least one dot with a non-empty
    /// label on each side.
    pub fn email(raw: &str) -> Result<String, ValidationFailure> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationFailure::Required);
        }
        if Self::is_email_shaped(trimmed) {
            Ok(trimmed.to_string())
        } else {
            Err(ValidationFailure::MalformedEmail)
        }
    }

    fn is_email_shaped(value: &str) -> bool {
        if value.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = value.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return false;
        }
        match domain.rsplit_once('.') {
            Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
            None => false,
        }
    }

    /// Validates the spouse name/email pair
    ///
    /// Returns `Ok(None)` when both are blank, `Ok(Some((name, email)))` when
    /// both are present and well-formed. Exactly one supplied yields an
    /// `IncompletePair` error on the missing field; a malformed email with
    /// both present yields `MalformedEmail` on the spouse email.
    pub fn spouse_pair(
        name: &str,
        email: &str,
    ) -> Result<Option<(String, String)>, Vec<FieldError>> {
        let name = name.trim();
        let email = email.trim();

        match (name.is_empty(), email.is_empty()) {
            (true, true) => Ok(None),
            (false, true) => Err(vec![FieldError::new(
                Field::SpouseEmail,
                ValidationFailure::IncompletePair,
            )]),
            (true, false) => Err(vec![FieldError::new(
                Field::SpouseName,
                ValidationFailure::IncompletePair,
            )]),
            (false, false) => {
                if Self::is_email_shaped(email) {
                    Ok(Some((name.to_string(), email.to_string())))
                } else {
                    Err(vec![FieldError::new(
                        Field::SpouseEmail,
                        ValidationFailure::MalformedEmail,
                    )])
                }
            }
        }
    }

    /// Validates the fields required to leave a given wizard step
    ///
    /// Steps without required fields (Start, Dependents, Success) always
    /// produce a passing report; dependent entries are guarded at add time.
    pub fn validate_step(draft: &DraftRegistration, step: WizardStep) -> ValidationReport {
        let mut report = ValidationReport::ok();

        match step {
            WizardStep::Start => {}
            WizardStep::Consent => {
                if !draft.consent {
                    report.add_error(Field::Consent, ValidationFailure::ConsentRequired);
                }
            }
            WizardStep::PersonalData => Self::validate_personal(draft, &mut report),
            WizardStep::Professional => Self::validate_professional(draft, &mut report),
            WizardStep::Spouse => Self::validate_spouse(draft, &mut report),
            WizardStep::Dependents => {}
            WizardStep::Success => {}
        }

        report
    }

    /// Validates every submittable field group of the draft
    ///
    /// This is the submission-time re-validation: identity, contact, address,
    /// professional, and the spouse pair. The consent flag gates navigation
    /// only and is not re-checked here.
    pub fn validate_draft(draft: &DraftRegistration) -> ValidationReport {
        let mut report = ValidationReport::ok();
        Self::validate_personal(draft, &mut report);
        Self::validate_professional(draft, &mut report);
        Self::validate_spouse(draft, &mut report);
        report
    }

    fn validate_personal(draft: &DraftRegistration, report: &mut ValidationReport) {
        if let Err(failure) = Self::non_empty(&draft.personal.full_name) {
            report.add_error(Field::FullName, failure);
        }
        if let Err(failure) = Self::cpf(&draft.personal.cpf) {
            report.add_error(Field::Cpf, failure);
        }
        if let Err(failure) = Self::non_empty(&draft.personal.rg) {
            report.add_error(Field::Rg, failure);
        }
        if let Err(failure) = Self::birth_date(&draft.personal.birth_date) {
            report.add_error(Field::BirthDate, failure);
        }
        if let Err(failure) = Self::non_empty(&draft.personal.street) {
            report.add_error(Field::Street, failure);
        }
        if let Err(failure) = Self::non_empty(&draft.personal.neighborhood) {
            report.add_error(Field::Neighborhood, failure);
        }
        if let Err(failure) = Self::non_empty(&draft.personal.city) {
            report.add_error(Field::City, failure);
        }
        // address note is optional
        if let Err(failure) = Self::phone(&draft.personal.whatsapp) {
            report.add_error(Field::Whatsapp, failure);
        }
        if let Err(failure) = Self::email(&draft.personal.email) {
            report.add_error(Field::Email, failure);
        }
    }

    fn validate_professional(draft: &DraftRegistration, report: &mut ValidationReport) {
        if let Err(failure) = Self::non_empty(&draft.professional.profession) {
            report.add_error(Field::Profession, failure);
        }
        // company is optional
        if let Err(failure) = Self::non_empty(&draft.professional.work_address) {
            report.add_error(Field::WorkAddress, failure);
        }
        if let Err(failure) = Self::phone(&draft.professional.work_phone) {
            report.add_error(Field::WorkPhone, failure);
        }
    }

    fn validate_spouse(draft: &DraftRegistration, report: &mut ValidationReport) {
        if let Err(errors) = Self::spouse_pair(&draft.spouse.name, &draft.spouse.email) {
            for error in errors {
                report.add_error(error.field, error.failure);
            }
        }
    }
}
