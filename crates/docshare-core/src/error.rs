//! Unified application error types for DocShare.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Every [`ErrorKind`] renders as a
//! stable machine-readable code that the HTTP layer passes to clients.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A share was requested with missing documents, recipients, or an
    /// unusable expiry.
    InvalidShareSpec,
    /// Generic input validation failure.
    Validation,
    /// The requested resource was not found (or must look that way).
    NotFound,
    /// The share's expiry has passed.
    ShareExpired,
    /// The share was revoked.
    ShareRevoked,
    /// The supplied recipient email does not pass the share's email gate.
    EmailNotAuthorized,
    /// An extension did not move the expiry forward.
    ExpiryMustIncrease,
    /// The share forbids downloads.
    DownloadsDisabled,
    /// Authentication failed (missing or invalid bearer token).
    Authentication,
    /// The caller may not act on the resource.
    Authorization,
    /// A conflict occurred (duplicate token, concurrent modification).
    Conflict,
    /// A database error occurred.
    Database,
    /// An internal server error occurred.
    Internal,
    /// A configuration error occurred.
    Configuration,
    /// An external collaborator (mail relay, catalog) failed.
    ExternalService,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Stable error code sent to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidShareSpec => "INVALID_SHARE_SPEC",
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::ShareExpired => "SHARE_EXPIRED",
            Self::ShareRevoked => "SHARE_REVOKED",
            Self::EmailNotAuthorized => "EMAIL_NOT_AUTHORIZED",
            Self::ExpiryMustIncrease => "EXPIRY_MUST_INCREASE",
            Self::DownloadsDisabled => "DOWNLOADS_DISABLED",
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::Conflict => "CONFLICT",
            Self::Database => "DATABASE",
            Self::Internal => "INTERNAL",
            Self::Configuration => "CONFIGURATION",
            Self::ExternalService => "EXTERNAL_SERVICE",
            Self::Serialization => "SERIALIZATION",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Whether the error originates inside the service and its detail must
    /// not reach clients.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Database
                | Self::Internal
                | Self::Configuration
                | Self::ExternalService
                | Self::Serialization
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout DocShare.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-share-spec error.
    pub fn invalid_share_spec(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidShareSpec, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a share-expired error.
    pub fn share_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ShareExpired, message)
    }

    /// Create a share-revoked error.
    pub fn share_revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ShareRevoked, message)
    }

    /// Create an email-gate rejection. The message never names the
    /// authorized addresses.
    pub fn email_not_authorized() -> Self {
        Self::new(
            ErrorKind::EmailNotAuthorized,
            "This email address is not authorized to view the shared documents",
        )
    }

    /// Create an expiry-must-increase error.
    pub fn expiry_must_increase(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExpiryMustIncrease, message)
    }

    /// Create a downloads-disabled error.
    pub fn downloads_disabled() -> Self {
        Self::new(
            ErrorKind::DownloadsDisabled,
            "Downloads are disabled for this share",
        )
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorKind::InvalidShareSpec.code(), "INVALID_SHARE_SPEC");
        assert_eq!(ErrorKind::EmailNotAuthorized.code(), "EMAIL_NOT_AUTHORIZED");
        assert_eq!(ErrorKind::ExpiryMustIncrease.to_string(), "EXPIRY_MUST_INCREASE");
    }

    #[test]
    fn test_display_includes_code() {
        let err = AppError::share_revoked("Share has been revoked");
        assert_eq!(err.to_string(), "SHARE_REVOKED: Share has been revoked");
    }

    #[test]
    fn test_internal_kinds() {
        assert!(ErrorKind::Database.is_internal());
        assert!(!ErrorKind::NotFound.is_internal());
        assert!(!ErrorKind::EmailNotAuthorized.is_internal());
    }

    #[test]
    fn test_email_gate_message_is_generic() {
        let err = AppError::email_not_authorized();
        assert!(!err.message.contains('@'));
    }
}
