/*
 * Responsibility
 * - application-wide AppError definition
 * - IntoResponse impl (HTTP status + uniform envelope body)
 * - unify sqlx/repo/validation/auth errors into caller-facing outcomes
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::v1::envelope::ApiEnvelope;
use crate::repos::error::RepoError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("{message}")]
    Validation {
        message: String,
        errors: Option<serde_json::Value>,
    },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Authentication required")
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: None,
        }
    }

}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, data) = match self {
            AppError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, message.to_string(), None)
            }
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message.to_string(), None),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                format!("{resource} not found"),
                None,
            ),
            AppError::Validation { message, errors } => {
                (StatusCode::BAD_REQUEST, message, errors)
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
        };

        ApiEnvelope::error(message, data).into_response_with(status)
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            // Unique violations surface as validation failures (duplicate email etc.);
            // everything else is opaque to the caller.
            RepoError::Conflict => AppError::validation("Record already exists"),
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}
