// src/users/user_structs.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::error::ApiError;

/// Lifetime of a signed bearer token.
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Access level of an account. Stored as text in the role column and carried
/// inside the token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Parses the role column. The schema constrains it to these two values,
    /// so anything else means the row was written outside the API.
    pub fn from_db(value: &str) -> Result<Role, ApiError> {
        match value {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(ApiError::Internal(format!("unknown role value: {other}"))),
        }
    }
}

/// Structure representing an account row in the database.
/// The password is only ever stored as a bcrypt hash.
#[derive(FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Structure receiving the data for a new account on registration.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String, // Plain text here; hashed before it is stored
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().chars().count() < 2 {
            return Err(ApiError::InvalidInput(
                "name must be at least 2 characters".to_string(),
            ));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::InvalidInput("invalid email address".to_string()));
        }
        if self.password.chars().count() < 6 {
            return Err(ApiError::InvalidInput(
                "password must be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }
}

/// Structure receiving the login credentials.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// JWT payload (claims): the account identity plus the expiry timestamp.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,     // Account id
    pub name: String, // Display name
    pub email: String,
    pub role: Role,
    pub exp: i64, // Expiration time (Unix timestamp)
}

impl Claims {
    /// Claims for a freshly authenticated account, expiring after
    /// [`TOKEN_LIFETIME_DAYS`].
    pub fn new(user: &User, role: Role) -> Self {
        Claims {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role,
            exp: (Utc::now() + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
        }
    }

    /// Signs the claims with HS256.
    pub fn encode(&self, secret: &str) -> Result<String, ApiError> {
        Ok(encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_ref()),
        )?)
    }

    /// Decodes and validates a token, including its expiry.
    pub fn decode(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &validation,
        )?;
        Ok(token_data.claims)
    }
}

/// Account fields exposed to clients.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl UserResponse {
    pub fn from_user(user: &User, role: Role) -> Self {
        UserResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role,
        }
    }
}

/// Structure for the successful register/login response body.
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}
