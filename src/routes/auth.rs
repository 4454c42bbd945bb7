// ABOUTME: Registration, login, logout, and current-user endpoints
// ABOUTME: Issues JWTs and mirrors them into the auth cookie for browsers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Authentication routes

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::errors::{AppError, AppResult};
use crate::security::cookies::{clear_auth_cookie, set_auth_cookie};

use super::ServerResources;

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    username: String,
    email: Option<String>,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    username: String,
    password: String,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::register))
            .route("/api/auth/login", post(Self::login))
            .route("/api/auth/logout", post(Self::logout))
            .route("/api/auth/me", get(Self::me))
            .with_state(resources)
    }

    async fn register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> AppResult<Response> {
        let username = request.username.trim();
        if username.len() < MIN_USERNAME_LEN {
            return Err(AppError::validation(format!(
                "Username must be at least {MIN_USERNAME_LEN} characters"
            )));
        }
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = hash_password(request.password).await?;
        let user = resources
            .database
            .users()
            .create_user(username, request.email.as_deref(), &password_hash)
            .await?;
        info!(username = %user.username, "User registered");

        let user_id = uuid::Uuid::parse_str(&user.id)
            .map_err(|_| AppError::internal("Stored user ID is not a UUID"))?;
        let token = resources.auth.issue_token(user_id)?;

        let mut headers = HeaderMap::new();
        set_auth_cookie(&mut headers, &token, resources.auth.ttl_secs());
        Ok((headers, Json(json!({ "user": user, "token": token }))).into_response())
    }

    async fn login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> AppResult<Response> {
        let user = resources
            .database
            .users()
            .get_user_by_username(request.username.trim())
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid username or password"))?;

        let valid = verify_password(request.password, user.password_hash.clone()).await?;
        if !valid {
            return Err(AppError::auth_invalid("Invalid username or password"));
        }

        let user_id = uuid::Uuid::parse_str(&user.id)
            .map_err(|_| AppError::internal("Stored user ID is not a UUID"))?;
        let token = resources.auth.issue_token(user_id)?;
        info!(username = %user.username, "User logged in");

        let mut headers = HeaderMap::new();
        set_auth_cookie(&mut headers, &token, resources.auth.ttl_secs());
        Ok((headers, Json(json!({ "user": user, "token": token }))).into_response())
    }

    async fn logout() -> Response {
        let mut headers = HeaderMap::new();
        clear_auth_cookie(&mut headers);
        (headers, Json(json!({ "success": true }))).into_response()
    }

    async fn me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let user = resources
            .database
            .users()
            .get_user_by_id(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(Json(user).into_response())
    }
}
