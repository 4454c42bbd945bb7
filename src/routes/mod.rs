// ABOUTME: HTTP route modules and shared server state
// ABOUTME: Assembles per-domain routers over one Arc<ServerResources>
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! HTTP routes
//!
//! Each domain contributes its own `Router` built against shared
//! [`ServerResources`]; [`router`] merges them into the full API surface.

use std::sync::Arc;

use axum::Router;

use crate::auth::AuthManager;
use crate::database::Database;
use crate::llm::ChatBackend;

/// Authentication endpoints (register, login, logout, me)
pub mod auth;

/// Chat threads and the streaming coach endpoint
pub mod chat;

/// Profile, coach persona, progress logs, and workouts
pub mod fitness;

/// Liveness endpoint
pub mod health;

/// AI-generated training and nutrition plans
pub mod plans;

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Database handle
    pub database: Database,
    /// Token issuance and validation
    pub auth: AuthManager,
    /// Chat completion provider
    pub backend: Arc<dyn ChatBackend>,
    /// Cap on the total duration of one chat stream, in seconds
    pub stream_max_secs: u64,
}

impl ServerResources {
    /// Bundle the server's shared state
    #[must_use]
    pub fn new(
        database: Database,
        auth: AuthManager,
        backend: Arc<dyn ChatBackend>,
        stream_max_secs: u64,
    ) -> Self {
        Self {
            database,
            auth,
            backend,
            stream_max_secs,
        }
    }
}

/// Build the complete API router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(auth::AuthRoutes::routes(resources.clone()))
        .merge(fitness::FitnessRoutes::routes(resources.clone()))
        .merge(plans::PlanRoutes::routes(resources.clone()))
        .merge(chat::ChatRoutes::routes(resources))
}
