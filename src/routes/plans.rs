// ABOUTME: AI-generated training and nutrition plan endpoints
// ABOUTME: Nutrition targets are computed server-side; the model only fills in content
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Plan generation routes
//!
//! Training plans come entirely from the model as structured JSON. Nutrition
//! plans are anchored on deterministic calorie/macro math; the model only
//! contributes meal suggestions, and a malformed suggestion payload degrades
//! to a plan without meals rather than failing the request.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest};
use crate::models::ProfileRecord;
use crate::nutrition::{
    calculate_macros, calculate_mifflin_st_jeor, calculate_target_calories, calculate_tdee,
};
use crate::prompts::{build_nutrition_plan_prompt, build_training_plan_prompt};

use super::ServerResources;

/// Plan generation routes handler
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/plans/training/generate", post(Self::generate_training))
            .route("/api/plans/training", get(Self::get_training))
            .route(
                "/api/plans/nutrition/generate",
                post(Self::generate_nutrition),
            )
            .route("/api/plans/nutrition", get(Self::get_nutrition))
            .with_state(resources)
    }

    async fn require_profile(
        resources: &Arc<ServerResources>,
        user_id: uuid::Uuid,
    ) -> AppResult<ProfileRecord> {
        resources
            .database
            .fitness()
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::validation("Set up your profile before generating a plan"))
    }

    async fn generate_training(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let profile = Self::require_profile(&resources, auth.user_id).await?;

        let request = ChatRequest::new(vec![
            ChatMessage::system(
                "You are an expert strength and conditioning coach. Respond with valid JSON only.",
            ),
            ChatMessage::user(build_training_plan_prompt(&profile)),
        ])
        .with_temperature(0.7);

        let completion = resources.backend.complete(request).await?;
        let plan = extract_json(&completion)
            .ok_or_else(|| AppError::upstream("Model returned a malformed training plan"))?;

        let name = plan
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("Training Plan")
            .to_owned();
        let description = plan
            .get("description")
            .and_then(|v| v.as_str())
            .map(ToOwned::to_owned);

        let record = resources
            .database
            .fitness()
            .create_training_plan(auth.user_id, &name, description.as_deref(), &plan)
            .await?;
        info!(plan_id = record.id, "Training plan generated");
        Ok(Json(record).into_response())
    }

    async fn get_training(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let plan = resources
            .database
            .fitness()
            .get_active_training_plan(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No active training plan"))?;
        Ok(Json(plan).into_response())
    }

    async fn generate_nutrition(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let profile = Self::require_profile(&resources, auth.user_id).await?;

        let (weight, height, age, gender, goal) = match (
            profile.weight_kg,
            profile.height_cm,
            profile.age,
            profile.gender.as_deref(),
            profile.goal.as_deref(),
        ) {
            (Some(w), Some(h), Some(a), Some(g), Some(goal)) => (w, h, a, g, goal),
            _ => {
                return Err(AppError::validation(
                    "Profile needs weight, height, age, gender, and goal for nutrition targets",
                ))
            }
        };

        let bmr = calculate_mifflin_st_jeor(weight, height, age, gender);
        let tdee = calculate_tdee(bmr, profile.activity_level.as_deref(), profile.days_per_week);
        let calories = calculate_target_calories(tdee, goal);
        let macros = calculate_macros(calories, weight, goal);

        let request = ChatRequest::new(vec![
            ChatMessage::system(
                "You are an expert sports nutritionist. Respond with valid JSON only.",
            ),
            ChatMessage::user(build_nutrition_plan_prompt(&profile, calories, macros)),
        ])
        .with_temperature(0.7);

        let meal_suggestions = match resources.backend.complete(request).await {
            Ok(completion) => {
                let parsed = extract_json(&completion);
                if parsed.is_none() {
                    warn!("Meal suggestion payload was malformed; saving plan without meals");
                }
                parsed
            }
            Err(e) => {
                warn!(error = %e, "Meal suggestion generation failed; saving plan without meals");
                None
            }
        };

        let record = resources
            .database
            .fitness()
            .create_nutrition_plan(
                auth.user_id,
                "Nutrition Plan",
                calories,
                macros.protein_g,
                macros.carbs_g,
                macros.fats_g,
                meal_suggestions.as_ref(),
            )
            .await?;
        info!(plan_id = record.id, calories, "Nutrition plan generated");
        Ok(Json(record).into_response())
    }

    async fn get_nutrition(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let plan = resources
            .database
            .fitness()
            .get_active_nutrition_plan(auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No active nutrition plan"))?;
        Ok(Json(plan).into_response())
    }
}

/// Pull a JSON object out of a completion, tolerating markdown fences
fn extract_json(completion: &str) -> Option<serde_json::Value> {
    let trimmed = completion.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}
