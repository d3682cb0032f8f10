// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use miniblog_common::{Action, ResourceRef};
use thiserror::Error;

use crate::auth::{HashingError, RejectionReason, SigningError};
use crate::validation::ValidationError;

/// Broad classes of failure, used by callers to pick a user-visible outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request body was malformed or incomplete
    InputValidation,
    /// Bad credentials, or a missing/malformed/invalid token
    Authentication,
    /// Valid principal without rights over the resource
    Authorization,
    /// Referenced resource absent
    NotFound,
    /// Hashing, signing or storage failure
    Internal,
}

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Email or username already exists")]
    DuplicateAccount,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authorization header is required")]
    MissingHeader,

    #[error("Authorization header format must be Bearer {{token}}")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] RejectionReason),

    #[error("You are not authorized to {action} this {}", .resource.kind)]
    Forbidden {
        action: Action,
        resource: ResourceRef,
    },

    #[error("Not found: {0}")]
    NotFound(ResourceRef),

    #[error("Hashing error: {0}")]
    Hashing(#[from] HashingError),

    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidInput(_) | AppError::DuplicateAccount => ErrorKind::InputValidation,
            AppError::InvalidCredentials
            | AppError::MissingHeader
            | AppError::MalformedHeader
            | AppError::InvalidToken(_) => ErrorKind::Authentication,
            AppError::Forbidden { .. } => ErrorKind::Authorization,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Hashing(_)
            | AppError::Signing(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InputValidation => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "VAL_001",
            AppError::DuplicateAccount => "VAL_002",
            AppError::InvalidCredentials => "AUTH_001",
            AppError::MissingHeader => "AUTH_002",
            AppError::MalformedHeader => "AUTH_003",
            AppError::InvalidToken(RejectionReason::Expired) => "AUTH_005",
            AppError::InvalidToken(_) => "AUTH_004",
            AppError::Forbidden { .. } => "AUTHZ_001",
            AppError::NotFound(_) => "NF_001",
            AppError::Hashing(_) => "INT_001",
            AppError::Signing(_) => "INT_002",
            AppError::Storage(_) => "INT_003",
            AppError::Internal(_) => "INT_004",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::InvalidInput(e) => e.to_string(),
            AppError::DuplicateAccount => {
                "Failed to create user. Email or username may already exist.".to_string()
            },
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::MissingHeader | AppError::MalformedHeader => self.to_string(),
            AppError::InvalidToken(RejectionReason::Expired) => "Token expired".to_string(),
            AppError::InvalidToken(_) => "Invalid token".to_string(),
            AppError::Forbidden { .. } => self.to_string(),
            AppError::NotFound(resource) => {
                let mut kind = resource.kind.to_string();
                if let Some(first) = kind.get_mut(..1) {
                    first.make_ascii_uppercase();
                }
                format!("{kind} not found")
            },
            AppError::Hashing(_)
            | AppError::Signing(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if self.kind() == ErrorKind::Internal {
            tracing::error!(code = error_code, error = %self, "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {e}"))
    }
}
