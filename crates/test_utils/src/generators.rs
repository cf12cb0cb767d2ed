//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::NaiveDate;
use core_kernel::{DependentId, RegistrationId};
use domain_registration::DraftRegistration;
use proptest::prelude::*;

use crate::builders::DraftBuilder;

/// Strategy for generating bare 11-digit CPF values
pub fn cpf_digits_strategy() -> impl Strategy<Value = String> {
    "[0-9]{11}"
}

/// Strategy for generating CPF values in their `XXX.XXX.XXX-XX` display mask
pub fn masked_cpf_strategy() -> impl Strategy<Value = String> {
    cpf_digits_strategy().prop_map(|digits| {
        format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        )
    })
}

/// Strategy for generating 11-digit mobile phones in their display mask
pub fn mobile_phone_strategy() -> impl Strategy<Value = String> {
    (10u32..100u32, 90000u32..100000u32, 1000u32..10000u32)
        .prop_map(|(area, prefix, line)| format!("({}) {}-{:04}", area, prefix, line))
}

/// Strategy for generating 10-digit landlines in their display mask
pub fn landline_strategy() -> impl Strategy<Value = String> {
    (10u32..100u32, 2000u32..6000u32, 1000u32..10000u32)
        .prop_map(|(area, prefix, line)| format!("({}) {}-{:04}", area, prefix, line))
}

/// Strategy for generating valid email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{5,10}", "[a-z]{3,8}").prop_map(|(local, domain)| format!("{}@{}.com", local, domain))
}

/// Strategy for generating full names
pub fn full_name_strategy() -> impl Strategy<Value = String> {
    ("[A-Z][a-z]{2,10}", "[A-Z][a-z]{2,10}")
        .prop_map(|(first, last)| format!("{} {}", first, last))
}

/// Strategy for generating adult birth dates as `YYYY-MM-DD` text
///
/// Days stop at 28 so every generated combination is a real calendar date.
pub fn birth_date_text_strategy() -> impl Strategy<Value = String> {
    (1940i32..2007i32, 1u32..13u32, 1u32..29u32)
        .prop_map(|(year, month, day)| format!("{:04}-{:02}-{:02}", year, month, day))
}

/// Strategy for generating child birth dates for dependents
pub fn child_birth_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2008i32..2025i32, 1u32..13u32, 1u32..29u32).prop_map(|(year, month, day)| {
        NaiveDate::from_ymd_opt(year, month, day).expect("generated date is valid")
    })
}

/// Strategy for generating RegistrationId
pub fn registration_id_strategy() -> impl Strategy<Value = RegistrationId> {
    any::<[u8; 16]>().prop_map(|bytes| RegistrationId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating DependentId
pub fn dependent_id_strategy() -> impl Strategy<Value = DependentId> {
    any::<[u8; 16]>().prop_map(|bytes| DependentId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating drafts that pass full validation
///
/// Composes the field strategies through [`DraftBuilder`], so the structural
/// fields not being varied keep their valid defaults.
pub fn valid_draft_strategy() -> impl Strategy<Value = DraftRegistration> {
    (
        full_name_strategy(),
        masked_cpf_strategy(),
        birth_date_text_strategy(),
        mobile_phone_strategy(),
        email_strategy(),
    )
        .prop_map(|(full_name, cpf, birth_date, whatsapp, email)| {
            DraftBuilder::new()
                .with_full_name(full_name)
                .with_cpf(cpf)
                .with_birth_date(birth_date)
                .with_whatsapp(whatsapp)
                .with_email(email)
                .build()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_registration::FieldValidator;

    proptest! {
        #[test]
        fn cpf_digits_always_pass_validation(cpf in cpf_digits_strategy()) {
            prop_assert_eq!(FieldValidator::cpf(&cpf).unwrap(), cpf);
        }

        #[test]
        fn mask_never_changes_the_cpf_verdict(masked in masked_cpf_strategy()) {
            let digits = FieldValidator::normalize_digits(&masked);
            prop_assert_eq!(
                FieldValidator::cpf(&masked).unwrap(),
                FieldValidator::cpf(&digits).unwrap()
            );
        }

        #[test]
        fn mobile_phones_strip_to_11_digits(phone in mobile_phone_strategy()) {
            prop_assert_eq!(FieldValidator::phone(&phone).unwrap().len(), 11);
        }

        #[test]
        fn landlines_strip_to_10_digits(phone in landline_strategy()) {
            prop_assert_eq!(FieldValidator::phone(&phone).unwrap().len(), 10);
        }

        #[test]
        fn generated_emails_are_well_formed(email in email_strategy()) {
            prop_assert!(FieldValidator::email(&email).is_ok());
        }

        #[test]
        fn generated_birth_dates_parse(text in birth_date_text_strategy()) {
            prop_assert!(FieldValidator::birth_date(&text).is_ok());
        }

        #[test]
        fn generated_drafts_pass_full_validation(draft in valid_draft_strategy()) {
            let report = FieldValidator::validate_draft(&draft);
            prop_assert!(report.is_valid, "errors: {:?}", report.errors);
        }
    }
}
