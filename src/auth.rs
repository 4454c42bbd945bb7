// ABOUTME: JWT issuance/validation and password hashing for user authentication
// ABOUTME: Tokens are HS256, carried as a Bearer header or the auth_token cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Authentication
//!
//! Stateless JWT sessions: login issues a signed token which the browser
//! stores in an `HttpOnly` cookie (API clients may send it as a Bearer
//! header instead). Passwords are hashed with bcrypt on a blocking task so
//! the async runtime is never stalled.

use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::task;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::security::cookies::{get_cookie_value, AUTH_COOKIE};

/// JWT claims carried in the auth token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID (UUID string)
    pub sub: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// The authenticated caller extracted from a request
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    /// Authenticated user ID
    pub user_id: Uuid,
}

/// Issues and validates auth tokens
#[derive(Clone)]
pub struct AuthManager {
    secret: String,
    ttl_secs: i64,
}

impl AuthManager {
    /// Create a manager from the configured secret and token lifetime
    #[must_use]
    pub const fn new(secret: String, ttl_secs: i64) -> Self {
        Self { secret, ttl_secs }
    }

    /// Issue a signed token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn issue_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::internal(format!("Token encoding failed: {e}")))
    }

    /// Token lifetime, for cookie Max-Age
    #[must_use]
    pub const fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Validate a token and return the authenticated user
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthInvalid`] for expired, malformed, or
    /// wrongly-signed tokens.
    pub fn validate_token(&self, token: &str) -> AppResult<AuthResult> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AppError::auth_invalid(format!("Invalid token: {e}")))?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::auth_invalid("Invalid token subject"))?;
        Ok(AuthResult { user_id })
    }

    /// Authenticate a request from its headers
    ///
    /// Accepts `Authorization: Bearer <token>` or the `auth_token` cookie.
    /// Unauthenticated requests fail closed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthInvalid`] when no usable credential is present.
    pub fn authenticate_request(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let token = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(ToOwned::to_owned)
            .or_else(|| get_cookie_value(headers, AUTH_COOKIE))
            .ok_or_else(|| AppError::auth_invalid("Missing authorization header or cookie"))?;

        self.validate_token(&token)
    }
}

/// Hash a password with bcrypt on a blocking task
///
/// # Errors
///
/// Returns an error if hashing fails or the blocking task panics.
pub async fn hash_password(password: String) -> AppResult<String> {
    task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a stored bcrypt hash on a blocking task
///
/// # Errors
///
/// Returns an error if verification fails to run; a wrong password returns
/// `Ok(false)`, not an error.
pub async fn verify_password(password: String, stored_hash: String) -> AppResult<bool> {
    task::spawn_blocking(move || bcrypt::verify(&password, &stored_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))
}
