//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::temporal::TemporalError;
use core_kernel::UserId;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_malformed_user_id_is_validation_error() {
    let error = UserId::parse("../etc").unwrap_err();

    assert!(matches!(error, CoreError::Validation(_)));
    assert!(error.to_string().contains("Validation error"));
}

#[test]
fn test_core_error_from_temporal_error() {
    let core_error: CoreError = TemporalError::OutOfRange(i64::MAX).into();

    assert!(matches!(core_error, CoreError::Temporal(_)));
    assert!(core_error.to_string().contains("out of range"));
}
