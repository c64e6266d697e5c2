// src/error/types.rs
//
// Typed error taxonomy.
//
// Every fallible operation in the crate returns AppResult<T>. Low-level
// failures (SQLite, pool, HTTP, JSON, IO) are converted here, once, through
// From impls; call sites only use `?`.

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Security violation: {0}")]
    Security(#[from] SecurityError),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Payment flow failures that are not security relevant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("payment was cancelled by the user")]
    Cancelled,

    #[error("no pending transaction for authority {authority}")]
    TransactionNotFound { authority: String },

    #[error("transaction {authority} expired after {age_minutes} minutes")]
    Expired { authority: String, age_minutes: i64 },

    #[error("gateway rejected the request (code {code}): {message}")]
    GatewayRejected { code: i64, message: String },
}

/// Failures that indicate tampering or a replayed callback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("replayed callback for already verified authority {authority}")]
    ReplayAttack { authority: String },

    #[error("gateway reports authority {authority} as already verified")]
    AlreadyVerifiedAtGateway { authority: String },
}

/// Coarse error category, stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Server,
    Timeout,
    Validation,
    Database,
    Authentication,
    Authorization,
    Security,
    Payment,
    NotFound,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Server => "server",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Validation => "validation",
            ErrorKind::Database => "database",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Authorization => "authorization",
            ErrorKind::Security => "security",
            ErrorKind::Payment => "payment",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Network(_) => ErrorKind::Network,
            AppError::Server { .. } => ErrorKind::Server,
            AppError::Timeout => ErrorKind::Timeout,
            AppError::Validation(_) | AppError::Domain(_) => ErrorKind::Validation,
            AppError::Database(_) | AppError::Pool(_) => ErrorKind::Database,
            AppError::Authentication(_) => ErrorKind::Authentication,
            AppError::Authorization(_) => ErrorKind::Authorization,
            AppError::Security(_) => ErrorKind::Security,
            AppError::Payment(_) => ErrorKind::Payment,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Serialization(_) | AppError::Io(_) | AppError::Unknown(_) => {
                ErrorKind::Unknown
            }
        }
    }

    /// HTTP-like status code for the error, where one applies.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AppError::Server { status, .. } => Some(*status),
            AppError::Authentication(_) => Some(401),
            AppError::Authorization(_) => Some(403),
            AppError::NotFound(_) => Some(404),
            AppError::Timeout => Some(408),
            _ => None,
        }
    }

    pub fn is_security(&self) -> bool {
        matches!(self, AppError::Security(_))
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::Timeout;
        }
        if let Some(status) = err.status() {
            return match status.as_u16() {
                401 => AppError::Authentication(err.to_string()),
                403 => AppError::Authorization(err.to_string()),
                code => AppError::Server {
                    status: code,
                    message: err.to_string(),
                },
            };
        }
        if err.is_decode() {
            return AppError::Unknown(format!("Malformed gateway response: {}", err));
        }
        AppError::Network(err.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Validation(format!("Date parse error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_errors_are_payment_kind() {
        let err: AppError = PaymentError::Cancelled.into();
        assert_eq!(err.kind(), ErrorKind::Payment);
        assert!(!err.is_security());
    }

    #[test]
    fn test_replay_is_security_kind() {
        let err: AppError = SecurityError::ReplayAttack {
            authority: "A1".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Security);
        assert!(err.is_security());
        assert!(err.to_string().contains("A1"));
    }

    #[test]
    fn test_status_codes() {
        let server = AppError::Server {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(server.status_code(), Some(503));
        assert_eq!(AppError::Timeout.status_code(), Some(408));
        assert_eq!(AppError::Validation("x".to_string()).status_code(), None);
    }

    #[test]
    fn test_sqlite_error_maps_to_database() {
        let err: AppError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err.kind(), ErrorKind::Database);
    }

    #[test]
    fn test_serializes_as_message() {
        let err = AppError::NotFound("Transaction".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Transaction not found\"");
    }
}
