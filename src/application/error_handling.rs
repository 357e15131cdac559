// src/application/error_handling.rs
//
// Error mapping for the command boundary
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - Provides a consistent error format for the UI
// - Never exposes internal implementation details
// - Logs errors for debugging

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Standard error response for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found
    NotFound,

    /// Invalid input
    Validation,

    /// Domain rule violation
    DomainError,

    /// Database/persistence error
    Database,

    /// External provider error
    ExternalService,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::Validation,
            message: message.into(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        match error {
            AppError::NotFound => Self {
                error_type: ErrorType::NotFound,
                message: "Resource not found".to_string(),
                details: None,
            },

            AppError::Domain(domain_error) => Self {
                error_type: ErrorType::DomainError,
                message: "Domain validation failed".to_string(),
                details: Some(domain_error.to_string()),
            },

            AppError::Database(db_error) => {
                log::error!("database error: {:?}", db_error);
                Self {
                    error_type: ErrorType::Database,
                    message: "Database operation failed".to_string(),
                    details: Some("Check logs for details".to_string()),
                }
            }

            AppError::Pool(message) => {
                log::error!("pool error: {}", message);
                Self {
                    error_type: ErrorType::Database,
                    message: "Database unavailable".to_string(),
                    details: None,
                }
            }

            AppError::Http(http_error) => Self {
                error_type: ErrorType::ExternalService,
                message: "Provider request failed".to_string(),
                details: Some(http_error.to_string()),
            },

            AppError::Provider(message) => Self {
                error_type: ErrorType::ExternalService,
                message: "Provider request failed".to_string(),
                details: Some(message),
            },

            AppError::Image(image_error) => Self {
                error_type: ErrorType::Internal,
                message: "Image processing failed".to_string(),
                details: Some(image_error.to_string()),
            },

            AppError::Serialization(serde_error) => {
                log::error!("serialization error: {:?}", serde_error);
                Self {
                    error_type: ErrorType::Internal,
                    message: "Data serialization failed".to_string(),
                    details: None,
                }
            }

            AppError::Io(io_error) => {
                log::error!("io error: {:?}", io_error);
                Self {
                    error_type: ErrorType::Internal,
                    message: "File system operation failed".to_string(),
                    details: Some(io_error.to_string()),
                }
            }

            AppError::Other(message) => Self {
                error_type: ErrorType::Internal,
                message,
                details: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_not_found_maps_without_details() {
        let response = ErrorResponse::from(AppError::NotFound);
        assert!(matches!(response.error_type, ErrorType::NotFound));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_domain_error_carries_rule_in_details() {
        let response = ErrorResponse::from(AppError::Domain(DomainError::Duplicate(
            "category 'Picks' already exists".to_string(),
        )));
        assert!(matches!(response.error_type, ErrorType::DomainError));
        assert!(response.details.unwrap().contains("Picks"));
    }

    #[test]
    fn test_provider_error_is_external_service() {
        let response = ErrorResponse::from(AppError::Provider("timeout".to_string()));
        assert!(matches!(response.error_type, ErrorType::ExternalService));
    }
}
