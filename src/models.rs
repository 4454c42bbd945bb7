// ABOUTME: Data transfer records shared between the database layer and routes
// ABOUTME: Rows come back as plain records with RFC 3339 string timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Common data records
//!
//! Records serialize in camelCase since the browser client consumes them
//! directly. Timestamps are RFC 3339 strings end to end.

use serde::{Deserialize, Serialize};

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// User ID (UUID string)
    pub id: String,
    /// Unique login name
    pub username: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Bcrypt password hash; never serialized
    #[serde(skip)]
    pub password_hash: String,
    /// Account creation timestamp
    pub created_at: String,
}

/// A user's fitness profile snapshot
///
/// Every field except identity is optional: onboarding fills them in over
/// time, and prompt assembly renders absent fields as explicit "not set"
/// markers rather than dropping them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Owning user ID
    pub user_id: String,
    /// Age in years
    pub age: Option<i64>,
    /// Gender (`male`, `female`, `other`)
    pub gender: Option<String>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Primary goal (`cut`, `bulk`, `recomp`, `strength`, `hypertrophy`)
    pub goal: Option<String>,
    /// Experience level (`beginner`, `intermediate`, `advanced`)
    pub experience_level: Option<String>,
    /// Baseline activity level outside training
    pub activity_level: Option<String>,
    /// Training days per week
    pub days_per_week: Option<i64>,
    /// Session length in minutes
    pub session_length_min: Option<i64>,
    /// Available equipment (`full_gym`, `home_gym`, `dumbbells`, `bodyweight`)
    pub equipment: Option<String>,
    /// Free-text injuries / limitations
    pub injuries: Option<String>,
    /// Free-text dietary restrictions
    pub dietary_restrictions: Option<String>,
    /// Last update timestamp
    pub updated_at: String,
}

/// The user's configured coach persona
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachPersonaRecord {
    /// Owning user ID
    pub user_id: String,
    /// Display name of the coach
    pub name: String,
    /// Coaching style (`strict`, `supportive`, `analytical`)
    pub style: String,
    /// Tone (`energetic`, `calm`, `aggressive`)
    pub tone: String,
    /// Preferred response language tag (`en`, `ar`)
    pub language: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// One body-progress log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLogRecord {
    /// Log entry ID
    pub id: i64,
    /// Owning user ID
    pub user_id: String,
    /// When the measurement was taken
    pub logged_at: String,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Body fat percentage
    pub body_fat_pct: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// One logged workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSessionRecord {
    /// Session ID
    pub id: i64,
    /// Owning user ID
    pub user_id: String,
    /// Session name, e.g. "Push Day"
    pub name: String,
    /// When the workout was performed
    pub performed_at: String,
    /// Duration in minutes
    pub duration_min: Option<i64>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Exercises performed, as structured JSON
    pub exercises: Option<serde_json::Value>,
}

/// A generated training plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanRecord {
    /// Plan ID
    pub id: i64,
    /// Owning user ID
    pub user_id: String,
    /// Plan name
    pub name: String,
    /// Short description
    pub description: Option<String>,
    /// Structured plan JSON (days, exercises, sets/reps)
    pub plan: serde_json::Value,
    /// Whether this is the user's active plan
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: String,
}

/// A generated nutrition plan with calculated targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPlanRecord {
    /// Plan ID
    pub id: i64,
    /// Owning user ID
    pub user_id: String,
    /// Plan name
    pub name: String,
    /// Daily calorie target
    pub calories: i64,
    /// Daily protein target in grams
    pub protein_g: i64,
    /// Daily carbohydrate target in grams
    pub carbs_g: i64,
    /// Daily fat target in grams
    pub fats_g: i64,
    /// Optional meal suggestions JSON
    pub meal_suggestions: Option<serde_json::Value>,
    /// Whether this is the user's active plan
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: String,
}

/// A chat thread owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRecord {
    /// Thread ID
    pub id: i64,
    /// Owning user ID
    pub user_id: String,
    /// Display title
    pub title: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last-activity timestamp, bumped on every message append
    pub updated_at: String,
}

/// One immutable turn in a chat thread
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    /// Message ID; monotonically increasing within the store
    pub id: i64,
    /// Owning thread ID
    pub thread_id: i64,
    /// Role tag, `user` or `assistant`
    pub role: String,
    /// Message text
    pub content: String,
    /// Creation timestamp
    pub created_at: String,
}
