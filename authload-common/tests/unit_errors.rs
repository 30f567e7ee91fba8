use authload_common::AuthLoadError;

#[test]
fn test_network_error() {
    let err = AuthLoadError::NetworkError("connection refused".to_string());
    assert_eq!(err.to_string(), "Network error: connection refused");
    assert!(err.is_transport());
}

#[test]
fn test_timeout() {
    let err = AuthLoadError::Timeout("operation timed out".to_string());
    assert_eq!(err.to_string(), "Request timed out: operation timed out");
    assert!(err.is_transport());
}

#[test]
fn test_invalid_config_is_not_transport() {
    let err = AuthLoadError::InvalidConfig("threads must be at least 1".to_string());
    assert_eq!(err.to_string(), "Invalid configuration: threads must be at least 1");
    assert!(!err.is_transport());
}

#[test]
fn test_unknown_target() {
    let err = AuthLoadError::UnknownTarget("auth-oauth".to_string());
    assert_eq!(
        err.to_string(),
        "Unknown target \"auth-oauth\". Valid values: auth-session, auth-jwt"
    );
}

#[test]
fn test_error_equality() {
    let a = AuthLoadError::NetworkError("x".to_string());
    let b = AuthLoadError::NetworkError("x".to_string());
    let c = AuthLoadError::Timeout("x".to_string());
    assert_eq!(a, b);
    assert_ne!(a, c);
}
