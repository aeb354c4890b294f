//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("Renderer lock poisoned".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("Renderer lock poisoned"));
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("Render target not found".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("Render target not found"));
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("Zero sized target".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Initialization failed"));
    assert!(display.contains("Zero sized target"));
}

#[test]
fn test_missing_mrt_display() {
    let err = Error::MissingMrtConfig;
    assert_eq!(format!("{}", err), "Missing MRT configuration");
}

#[test]
fn test_missing_velocity_display() {
    let err = Error::MissingVelocityChannel;
    assert_eq!(format!("{}", err), "Missing velocity output in MRT configuration");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::MissingMrtConfig;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug1 = format!("{:?}", Error::BackendError("test".to_string()));
    assert!(debug1.contains("BackendError"));

    let debug2 = format!("{:?}", Error::MissingVelocityChannel);
    assert!(debug2.contains("MissingVelocityChannel"));

    let debug3 = format!("{:?}", Error::InvalidResource("resource".to_string()));
    assert!(debug3.contains("InvalidResource"));
}

#[test]
fn test_error_clone_and_eq() {
    let err1 = Error::InvalidResource("sample".to_string());
    let err2 = err1.clone();
    assert_eq!(err1, err2);
    assert_ne!(err1, Error::MissingMrtConfig);
}

// ============================================================================
// RESULT ALIAS
// ============================================================================

#[test]
fn test_result_question_mark_propagation() {
    fn inner() -> Result<u32> {
        Err(Error::MissingMrtConfig)
    }

    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert_eq!(outer(), Err(Error::MissingMrtConfig));
}
