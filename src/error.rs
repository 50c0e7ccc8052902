/*
 * Responsibility
 * - application-wide AppError
 * - IntoResponse (HTTP status + flat {"error": "..."} JSON body)
 * - unified conversion from AuthError / RepoError
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    // Structured store error (e.g. delete blocked by a referential
    // constraint). Carries the store's message, not a generic 500.
    #[error("{0}")]
    Conflict(String),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingHeader => AppError::Unauthorized("Authorization required"),
            AuthError::MalformedHeader | AuthError::InvalidToken(_) => {
                AppError::Unauthorized("Invalid token")
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Constraint { message } => AppError::Conflict(message),
            RepoError::Db(e) => {
                // Detail stays in the log; the response body carries a
                // generic message only.
                tracing::error!(error = ?e, "store failure");
                AppError::Internal
            }
        }
    }
}
