// src/users/auth_middleware.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use super::user_structs::{Claims, Role};
use crate::shared::error::ApiError;
use crate::AppState;

/// Identity resolved from the bearer token of the current request.
/// Protected routes take this as an extractor argument; handlers only ever
/// see the resolved claims, never the token itself.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Authorization predicate consumed by every admin-only route.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("admin access required".to_string()))
        }
    }
}

/// Authentication extractor for Actix Web.
/// Validates the JWT in the Authorization header and produces the caller's
/// identity, or rejects the request with 401 before the handler runs.
impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve_identity(req).map_err(actix_web::Error::from))
    }
}

fn resolve_identity(req: &HttpRequest) -> Result<AuthenticatedUser, ApiError> {
    // The signing secret lives in the AppState
    let jwt_secret = match req.app_data::<web::Data<AppState>>() {
        Some(state) => state.jwt_secret.clone(),
        None => {
            return Err(ApiError::Internal(
                "AppState is not available to the auth extractor".to_string(),
            ))
        }
    };

    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| ApiError::Unauthorized("missing authentication token".to_string()))?;

    let header = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("invalid authentication token".to_string()))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized("invalid token format, expected 'Bearer <token>'".to_string())
    })?;

    let claims = Claims::decode(token, &jwt_secret).map_err(|e| {
        let message = match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "token expired",
            jsonwebtoken::errors::ErrorKind::InvalidSignature => "invalid token signature",
            jsonwebtoken::errors::ErrorKind::InvalidToken => "malformed token",
            _ => "invalid authentication token",
        };
        ApiError::Unauthorized(message.to_string())
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        user_name: claims.name,
        user_email: claims.email,
        role: claims.role,
    })
}
