// src/shared/error.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;

use super::shared_structs::GenericResponse;

/// Failure taxonomy shared by every route.
///
/// Handlers return `Result<HttpResponse, ApiError>` and propagate with `?`;
/// this type is the single place that maps a failure kind onto a status code
/// and the standard response envelope. Internal variants keep their source for
/// the server log but render as a generic message to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InsufficientStock(String),
    #[error("internal server error")]
    Database(#[from] sqlx::Error),
    #[error("internal server error")]
    PasswordHash(#[from] bcrypt::BcryptError),
    #[error("internal server error")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("internal server error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_)
            | ApiError::PasswordHash(_)
            | ApiError::Token(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Detail for 500s stays in the server log; the body carries only the
        // generic Display message.
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {self:?}");
        }
        HttpResponse::build(self.status_code())
            .json(GenericResponse::<()>::error(self.to_string()))
    }
}
