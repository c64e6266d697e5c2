// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → user-facing responses
// - Provides consistent error format for clients
// - Never exposes internal implementation details (SQL, IO, pool)
// - Logs what it hides

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind, PaymentError, SecurityError};

/// Standard error response for clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorKind,
    pub message: String,
    pub details: Option<String>,
    pub status_code: Option<u16>,
}

impl ErrorResponse {
    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        let error_type = error.kind();
        let status_code = error.status_code();

        let (message, details) = match error {
            AppError::Payment(PaymentError::Cancelled) => {
                ("Payment was cancelled".to_string(), None)
            }

            AppError::Payment(PaymentError::Expired { .. }) => (
                "Payment session expired, please start again".to_string(),
                Some(error.to_string()),
            ),

            AppError::Payment(ref payment) => {
                ("Payment failed".to_string(), Some(payment.to_string()))
            }

            AppError::Security(SecurityError::ReplayAttack { .. })
            | AppError::Security(SecurityError::AlreadyVerifiedAtGateway { .. }) => (
                "This payment has already been processed".to_string(),
                None,
            ),

            AppError::Validation(message) => (message, None),

            AppError::Domain(domain_error) => (
                "Validation failed".to_string(),
                Some(domain_error.to_string()),
            ),

            AppError::NotFound(resource) => (format!("{} not found", resource), None),

            AppError::Timeout => ("The request timed out".to_string(), None),

            AppError::Network(message) => {
                log::warn!("Network error: {}", message);
                ("Network unavailable".to_string(), None)
            }

            AppError::Server { message, .. } => ("Server error".to_string(), Some(message)),

            AppError::Authentication(message) | AppError::Authorization(message) => {
                (message, None)
            }

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                (
                    "Database operation failed".to_string(),
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                ("Database connection failed".to_string(), None)
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                ("Data serialization failed".to_string(), None)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                (
                    "File system operation failed".to_string(),
                    Some(io_error.to_string()),
                )
            }

            AppError::Unknown(message) => {
                log::error!("Unknown error: {}", message);
                ("Something went wrong".to_string(), Some(message))
            }
        };

        Self {
            success: false,
            error_type,
            message,
            details,
            status_code,
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self {
            success: false,
            error_type: ErrorKind::Validation,
            message,
            details: None,
            status_code: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "Internal error".to_string())
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, String>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, String> {
        self.map_err(|e| ErrorResponse::from_app_error(e).to_json())
    }
}
