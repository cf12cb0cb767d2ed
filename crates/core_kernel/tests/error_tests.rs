//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::ports::PortError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_invalid_state() {
    let error = CoreError::invalid_state("Cannot transition from A to B");

    match error {
        CoreError::InvalidStateTransition(msg) => assert!(msg.contains("Cannot transition")),
        _ => panic!("Expected InvalidStateTransition error"),
    }
}

#[test]
fn test_core_error_not_found() {
    let error = CoreError::not_found("Registration not found");

    match error {
        CoreError::NotFound(msg) => assert_eq!(msg, "Registration not found"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_core_error_display() {
    let error = CoreError::validation("Test error");
    let display = format!("{}", error);

    assert!(display.contains("Validation error"));
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::Configuration("Missing config".to_string());

    match error {
        CoreError::Configuration(msg) => assert_eq!(msg, "Missing config"),
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_port_error_sources_are_preserved() {
    let io_error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error = PortError::Connection {
        message: "database unreachable".to_string(),
        source: Some(Box::new(io_error)),
    };

    assert!(error.is_transient());
    let source = std::error::Error::source(&error);
    assert!(source.is_some());
}

#[test]
fn test_port_error_validation_field() {
    let error = PortError::validation_field("must be 11 digits", "cpf");

    match error {
        PortError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("cpf")),
        _ => panic!("Expected Validation error"),
    }
}
