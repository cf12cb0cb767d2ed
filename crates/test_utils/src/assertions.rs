//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use chrono::NaiveDate;
use domain_registration::{Field, ValidationReport, DATE_DISPLAY_FORMAT};

/// Asserts that a validation report passed
///
/// # Panics
///
/// Panics with the collected field errors if the report failed
pub fn assert_valid(report: &ValidationReport) {
    assert!(
        report.is_valid,
        "Expected a passing report, got errors: {:?}",
        report.errors
    );
}

/// Asserts that a validation report failed on a specific field
///
/// # Arguments
///
/// * `report` - The report under test
/// * `field` - The field expected among the failures
///
/// # Panics
///
/// Panics if the report passed or the field is not among the failures
pub fn assert_invalid_on(report: &ValidationReport, field: Field) {
    assert!(
        !report.is_valid,
        "Expected a failing report for {}, got a passing one",
        field
    );
    assert!(
        report.has_error_on(field),
        "Expected an error on {}, got errors on: {:?}",
        field,
        report.failed_fields()
    );
}

/// Asserts that a report failed on exactly the given fields, in order
pub fn assert_failed_fields(report: &ValidationReport, expected: &[Field]) {
    assert!(
        !report.is_valid,
        "Expected a failing report, got a passing one"
    );
    assert_eq!(
        report.failed_fields(),
        expected,
        "Failed fields don't match: got {:?}, expected {:?}",
        report.failed_fields(),
        expected
    );
}

/// Asserts that a value is a bare digit string of the expected length
pub fn assert_digits(value: &str, expected_len: usize) {
    assert!(
        value.chars().all(|c| c.is_ascii_digit()),
        "Expected bare digits, got '{}'",
        value
    );
    assert_eq!(
        value.len(),
        expected_len,
        "Expected {} digits, got {} in '{}'",
        expected_len,
        value.len(),
        value
    );
}

/// Asserts that a value carries the `XXX.XXX.XXX-XX` CPF display mask
pub fn assert_masked_cpf(value: &str) {
    let shape_ok = value.len() == 14
        && value.as_bytes()[3] == b'.'
        && value.as_bytes()[7] == b'.'
        && value.as_bytes()[11] == b'-'
        && value
            .chars()
            .enumerate()
            .all(|(i, c)| matches!(i, 3 | 7 | 11) || c.is_ascii_digit());
    assert!(shape_ok, "Expected a masked CPF, got '{}'", value);
}

/// Asserts that a value is a `DD/MM/YYYY` display date
pub fn assert_display_date(value: &str) {
    assert!(
        NaiveDate::parse_from_str(value, DATE_DISPLAY_FORMAT).is_ok(),
        "Expected a DD/MM/YYYY date, got '{}'",
        value
    );
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => panic!("{}: got Ok({:?})", $msg, value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err matching {}, got Ok({:?})",
                stringify!($pattern),
                value
            ),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_registration::{FieldError, ValidationFailure};

    #[test]
    fn test_assert_valid_passes() {
        assert_valid(&ValidationReport::ok());
    }

    #[test]
    #[should_panic(expected = "Expected a passing report")]
    fn test_assert_valid_fails_on_errors() {
        let report = ValidationReport::fail(vec![FieldError::new(
            Field::Cpf,
            ValidationFailure::MalformedCpf,
        )]);
        assert_valid(&report);
    }

    #[test]
    fn test_assert_invalid_on_matches_field() {
        let report = ValidationReport::fail(vec![FieldError::new(
            Field::Email,
            ValidationFailure::MalformedEmail,
        )]);
        assert_invalid_on(&report, Field::Email);
    }

    #[test]
    #[should_panic(expected = "Expected an error on cpf")]
    fn test_assert_invalid_on_wrong_field() {
        let report = ValidationReport::fail(vec![FieldError::new(
            Field::Email,
            ValidationFailure::MalformedEmail,
        )]);
        assert_invalid_on(&report, Field::Cpf);
    }

    #[test]
    fn test_assert_failed_fields_exact() {
        let report = ValidationReport::fail(vec![
            FieldError::new(Field::FullName, ValidationFailure::Required),
            FieldError::new(Field::Cpf, ValidationFailure::MalformedCpf),
        ]);
        assert_failed_fields(&report, &[Field::FullName, Field::Cpf]);
    }

    #[test]
    fn test_assert_digits() {
        assert_digits("52998224725", 11);
    }

    #[test]
    #[should_panic(expected = "Expected bare digits")]
    fn test_assert_digits_rejects_mask() {
        assert_digits("529.982.247-25", 11);
    }

    #[test]
    fn test_assert_masked_cpf() {
        assert_masked_cpf("529.982.247-25");
    }

    #[test]
    #[should_panic(expected = "Expected a masked CPF")]
    fn test_assert_masked_cpf_rejects_bare_digits() {
        assert_masked_cpf("52998224725");
    }

    #[test]
    fn test_assert_display_date() {
        assert_display_date("15/03/1980");
    }

    #[test]
    #[should_panic(expected = "Expected a DD/MM/YYYY date")]
    fn test_assert_display_date_rejects_iso() {
        assert_display_date("1980-03-15");
    }

    #[test]
    fn test_assert_ok_macro_returns_value() {
        let value: Result<i32, String> = Ok(42);
        assert_eq!(assert_ok!(value), 42);
    }

    #[test]
    fn test_assert_err_macro_returns_error() {
        let value: Result<i32, String> = Err("boom".to_string());
        assert_eq!(assert_err!(value), "boom");
    }
}
