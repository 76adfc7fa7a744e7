/// Unit tests for DiError and DiResult types

use autowire_di::{DiError, DiResult, ServiceName};
use std::error::Error;

#[test]
fn test_error_display_not_found() {
    let error = DiError::NotFound("TestService".into());
    assert_eq!(error.to_string(), "Service not found: TestService");
}

#[test]
fn test_error_display_invalid_definition() {
    let error = DiError::InvalidDefinition("mailer".into());
    assert_eq!(error.to_string(), "Invalid definition for: mailer");
}

#[test]
fn test_error_display_not_instantiable() {
    let error = DiError::NotInstantiable("dyn app::Notifier".into());
    assert_eq!(error.to_string(), "Type dyn app::Notifier is not instantiable");
}

#[test]
fn test_error_display_unresolvable_dependency() {
    let error = DiError::UnresolvableDependency {
        service: "app::Mailer".into(),
        parameter: "retries",
    };
    assert_eq!(error.to_string(), "Cannot resolve the dependency `retries` of app::Mailer");
}

#[test]
fn test_error_display_circular() {
    let path: Vec<ServiceName> = ["ServiceA", "ServiceB", "ServiceA"].map(ServiceName::from).to_vec();
    let error = DiError::Circular(path);
    assert_eq!(error.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
}

#[test]
fn test_error_display_empty_circular_path() {
    let error = DiError::Circular(vec![]);
    assert_eq!(error.to_string(), "Circular dependency: ");
}

#[test]
fn test_error_display_depth_exceeded() {
    let error = DiError::DepthExceeded(100);
    assert_eq!(error.to_string(), "Max depth 100 exceeded");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch {
        name: "port".into(),
        expected: "alloc::string::String",
    };
    assert_eq!(error.to_string(), "Type mismatch for port: expected alloc::string::String");
}

#[test]
fn test_construction_helper() {
    let error = DiError::construction("db", std::io::Error::new(std::io::ErrorKind::Other, "refused"));
    assert_eq!(error.to_string(), "Failed to construct db: refused");
}

#[test]
fn test_diresult_err() {
    let result: DiResult<String> = Err(DiError::NotFound("TestService".into()));

    match result {
        Err(DiError::NotFound(name)) => assert_eq!(name, "TestService"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_error_clone_and_source() {
    let error = DiError::NotFound("TestService".into());
    let cloned = error.clone();

    assert_eq!(error.to_string(), cloned.to_string());
    assert!(error.source().is_none());
    assert!(format!("{:?}", error).contains("NotFound"));
}
