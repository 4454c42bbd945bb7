// ABOUTME: Profile, coach persona, progress log, and workout endpoints
// ABOUTME: Thin handlers over FitnessManager; every route is owner-scoped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Fitness data routes

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::database::fitness::{PersonaInput, ProfileInput, ProgressInput, WorkoutInput};
use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest};
use crate::prompts::build_weekly_checkin_prompt;

use super::ServerResources;

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

/// How many recent logs and sessions feed the weekly check-in
const CHECKIN_WINDOW: i64 = 7;

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<i64>,
}

impl ListQuery {
    fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }
}

/// Fitness data routes handler
pub struct FitnessRoutes;

impl FitnessRoutes {
    /// Create all fitness data routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/profile",
                get(Self::get_profile).put(Self::put_profile),
            )
            .route("/api/coach", get(Self::get_persona).put(Self::put_persona))
            .route("/api/coach/weekly-checkin", post(Self::weekly_checkin))
            .route(
                "/api/progress",
                get(Self::list_progress).post(Self::log_progress),
            )
            .route("/api/progress/latest", get(Self::latest_progress))
            .route(
                "/api/workouts",
                get(Self::list_workouts).post(Self::log_workout),
            )
            .route("/api/workouts/:workout_id", get(Self::get_workout))
            .with_state(resources)
    }

    async fn get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let profile = resources
            .database
            .fitness()
            .get_profile(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile not set up yet"))?;
        Ok(Json(profile).into_response())
    }

    async fn put_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(input): Json<ProfileInput>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        if let Some(age) = input.age {
            if !(13..=120).contains(&age) {
                return Err(AppError::validation("Age must be between 13 and 120"));
            }
        }
        if let Some(days) = input.days_per_week {
            if !(0..=7).contains(&days) {
                return Err(AppError::validation("Training days must be 0 to 7"));
            }
        }
        let profile = resources
            .database
            .fitness()
            .upsert_profile(auth.user_id, &input)
            .await?;
        Ok(Json(profile).into_response())
    }

    async fn get_persona(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let persona = resources
            .database
            .fitness()
            .get_persona(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Coach persona not set up yet"))?;
        Ok(Json(persona).into_response())
    }

    async fn put_persona(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(input): Json<PersonaInput>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        if let Some(language) = input.language.as_deref() {
            if language != "en" && language != "ar" {
                return Err(AppError::validation("Language must be 'en' or 'ar'"));
            }
        }
        let persona = resources
            .database
            .fitness()
            .upsert_persona(auth.user_id, &input)
            .await?;
        Ok(Json(persona).into_response())
    }

    /// Weekly check-in: a non-streaming coaching assessment of the last
    /// week's progress entries and workout sessions
    async fn weekly_checkin(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let fitness = resources.database.fitness();
        let profile = fitness
            .get_profile(auth.user_id)
            .await?
            .ok_or_else(|| AppError::validation("Set up your profile before a check-in"))?;
        let progress_logs = fitness
            .list_progress_logs(auth.user_id, CHECKIN_WINDOW)
            .await?;
        let workouts = fitness.list_workouts(auth.user_id, CHECKIN_WINDOW).await?;

        let request = ChatRequest::new(vec![
            ChatMessage::system(
                "You are a professional fitness coach providing weekly check-ins.",
            ),
            ChatMessage::user(build_weekly_checkin_prompt(
                &profile,
                &progress_logs,
                &workouts,
            )),
        ])
        .with_temperature(0.8);

        let message = resources.backend.complete(request).await?;
        info!(workouts = workouts.len(), "Weekly check-in generated");
        Ok(Json(json!({ "message": message })).into_response())
    }

    async fn list_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let logs = resources
            .database
            .fitness()
            .list_progress_logs(auth.user_id, query.limit())
            .await?;
        Ok(Json(json!({ "logs": logs })).into_response())
    }

    /// Most recent progress entry, or JSON `null` when nothing is logged yet
    async fn latest_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let log = resources
            .database
            .fitness()
            .latest_progress_log(auth.user_id)
            .await?;
        Ok(Json(json!(log)).into_response())
    }

    async fn log_progress(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(input): Json<ProgressInput>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        if input.weight_kg.is_none() && input.body_fat_pct.is_none() && input.notes.is_none() {
            return Err(AppError::validation("Progress entry cannot be empty"));
        }
        let log = resources
            .database
            .fitness()
            .create_progress_log(auth.user_id, &input)
            .await?;
        Ok(Json(log).into_response())
    }

    async fn list_workouts(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let workouts = resources
            .database
            .fitness()
            .list_workouts(auth.user_id, query.limit())
            .await?;
        Ok(Json(json!({ "workouts": workouts })).into_response())
    }

    async fn get_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(workout_id): Path<i64>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let workout = resources
            .database
            .fitness()
            .get_workout(workout_id, auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout not found"))?;
        Ok(Json(workout).into_response())
    }

    async fn log_workout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(input): Json<WorkoutInput>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Workout name is required"));
        }
        let workout = resources
            .database
            .fitness()
            .create_workout(auth.user_id, &input)
            .await?;
        Ok(Json(workout).into_response())
    }
}
