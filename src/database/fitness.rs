// ABOUTME: Fitness data persistence: profile, coach persona, progress, workouts, plans
// ABOUTME: Profile and persona are one row per user; plans keep a single active row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Fitness data storage
//!
//! Profile and coach persona are single-row-per-user upserts. Training and
//! nutrition plans keep history but only one active plan per user; creating
//! a plan deactivates the previous one.

use chrono::Utc;
use serde::Deserialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{
    CoachPersonaRecord, NutritionPlanRecord, ProfileRecord, ProgressLogRecord, TrainingPlanRecord,
    WorkoutSessionRecord,
};

/// Fields accepted when updating a fitness profile
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    /// Age in years
    pub age: Option<i64>,
    /// Gender (`male`, `female`, `other`)
    pub gender: Option<String>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Primary goal
    pub goal: Option<String>,
    /// Experience level
    pub experience_level: Option<String>,
    /// Baseline activity level
    pub activity_level: Option<String>,
    /// Training days per week
    pub days_per_week: Option<i64>,
    /// Session length in minutes
    pub session_length_min: Option<i64>,
    /// Available equipment
    pub equipment: Option<String>,
    /// Injuries or limitations
    pub injuries: Option<String>,
    /// Dietary restrictions
    pub dietary_restrictions: Option<String>,
}

/// Fields accepted when updating the coach persona
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaInput {
    /// Display name of the coach
    pub name: Option<String>,
    /// Coaching style
    pub style: Option<String>,
    /// Tone
    pub tone: Option<String>,
    /// Response language tag (`en`, `ar`)
    pub language: Option<String>,
}

/// Fields accepted when logging progress
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInput {
    /// Measurement timestamp; defaults to now
    pub logged_at: Option<String>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Body fat percentage
    pub body_fat_pct: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Fields accepted when logging a workout session
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutInput {
    /// Session name
    pub name: String,
    /// Performed-at timestamp; defaults to now
    pub performed_at: Option<String>,
    /// Duration in minutes
    pub duration_min: Option<i64>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Exercises performed, as structured JSON
    pub exercises: Option<serde_json::Value>,
}

/// Manages fitness domain rows
pub struct FitnessManager {
    pool: SqlitePool,
}

impl FitnessManager {
    /// Create a manager over the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch a user's profile
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<ProfileRecord>> {
        let row = sqlx::query(
            "SELECT user_id, age, gender, height_cm, weight_kg, goal, experience_level,
                    activity_level, days_per_week, session_length_min, equipment, injuries,
                    dietary_restrictions, updated_at
             FROM profiles WHERE user_id = ?1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_profile(&r)))
    }

    /// Create or replace a user's profile
    ///
    /// # Errors
    ///
    /// Returns a database error on upsert failure.
    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> AppResult<ProfileRecord> {
        let updated_at = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO profiles (user_id, age, gender, height_cm, weight_kg, goal,
                                   experience_level, activity_level, days_per_week,
                                   session_length_min, equipment, injuries,
                                   dietary_restrictions, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(user_id) DO UPDATE SET
                 age = excluded.age,
                 gender = excluded.gender,
                 height_cm = excluded.height_cm,
                 weight_kg = excluded.weight_kg,
                 goal = excluded.goal,
                 experience_level = excluded.experience_level,
                 activity_level = excluded.activity_level,
                 days_per_week = excluded.days_per_week,
                 session_length_min = excluded.session_length_min,
                 equipment = excluded.equipment,
                 injuries = excluded.injuries,
                 dietary_restrictions = excluded.dietary_restrictions,
                 updated_at = excluded.updated_at",
        )
        .bind(user_id.to_string())
        .bind(input.age)
        .bind(&input.gender)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(&input.goal)
        .bind(&input.experience_level)
        .bind(&input.activity_level)
        .bind(input.days_per_week)
        .bind(input.session_length_min)
        .bind(&input.equipment)
        .bind(&input.injuries)
        .bind(&input.dietary_restrictions)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        Ok(ProfileRecord {
            user_id: user_id.to_string(),
            age: input.age,
            gender: input.gender.clone(),
            height_cm: input.height_cm,
            weight_kg: input.weight_kg,
            goal: input.goal.clone(),
            experience_level: input.experience_level.clone(),
            activity_level: input.activity_level.clone(),
            days_per_week: input.days_per_week,
            session_length_min: input.session_length_min,
            equipment: input.equipment.clone(),
            injuries: input.injuries.clone(),
            dietary_restrictions: input.dietary_restrictions.clone(),
            updated_at,
        })
    }

    /// Fetch a user's coach persona
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_persona(&self, user_id: Uuid) -> AppResult<Option<CoachPersonaRecord>> {
        let row = sqlx::query(
            "SELECT user_id, name, style, tone, language, updated_at
             FROM coach_personas WHERE user_id = ?1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| CoachPersonaRecord {
            user_id: r.get("user_id"),
            name: r.get("name"),
            style: r.get("style"),
            tone: r.get("tone"),
            language: r.get("language"),
            updated_at: r.get("updated_at"),
        }))
    }

    /// Create or replace a user's coach persona; unset fields fall back to
    /// the defaults (`Coach`, `strict`, `energetic`, `en`)
    ///
    /// # Errors
    ///
    /// Returns a database error on upsert failure.
    pub async fn upsert_persona(
        &self,
        user_id: Uuid,
        input: &PersonaInput,
    ) -> AppResult<CoachPersonaRecord> {
        let updated_at = Utc::now().to_rfc3339();
        let name = input.name.as_deref().unwrap_or("Coach");
        let style = input.style.as_deref().unwrap_or("strict");
        let tone = input.tone.as_deref().unwrap_or("energetic");
        let language = input.language.as_deref().unwrap_or("en");

        sqlx::query(
            "INSERT INTO coach_personas (user_id, name, style, tone, language, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                 name = excluded.name,
                 style = excluded.style,
                 tone = excluded.tone,
                 language = excluded.language,
                 updated_at = excluded.updated_at",
        )
        .bind(user_id.to_string())
        .bind(name)
        .bind(style)
        .bind(tone)
        .bind(language)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;

        Ok(CoachPersonaRecord {
            user_id: user_id.to_string(),
            name: name.to_owned(),
            style: style.to_owned(),
            tone: tone.to_owned(),
            language: language.to_owned(),
            updated_at,
        })
    }

    /// Record a progress log entry
    ///
    /// # Errors
    ///
    /// Returns a database error on insert failure.
    pub async fn create_progress_log(
        &self,
        user_id: Uuid,
        input: &ProgressInput,
    ) -> AppResult<ProgressLogRecord> {
        let logged_at = input
            .logged_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let result = sqlx::query(
            "INSERT INTO progress_logs (user_id, logged_at, weight_kg, body_fat_pct, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(user_id.to_string())
        .bind(&logged_at)
        .bind(input.weight_kg)
        .bind(input.body_fat_pct)
        .bind(&input.notes)
        .execute(&self.pool)
        .await?;

        Ok(ProgressLogRecord {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            logged_at,
            weight_kg: input.weight_kg,
            body_fat_pct: input.body_fat_pct,
            notes: input.notes.clone(),
        })
    }

    /// List a user's progress logs, newest first, up to `limit`
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_progress_logs(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<ProgressLogRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_id, logged_at, weight_kg, body_fat_pct, notes
             FROM progress_logs WHERE user_id = ?1
             ORDER BY logged_at DESC, id DESC LIMIT ?2",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_progress).collect())
    }

    /// Fetch the most recent progress log entry
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn latest_progress_log(&self, user_id: Uuid) -> AppResult<Option<ProgressLogRecord>> {
        let row = sqlx::query(
            "SELECT id, user_id, logged_at, weight_kg, body_fat_pct, notes
             FROM progress_logs WHERE user_id = ?1
             ORDER BY logged_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_progress(&r)))
    }

    /// Record a workout session
    ///
    /// # Errors
    ///
    /// Returns a database error on insert failure.
    pub async fn create_workout(
        &self,
        user_id: Uuid,
        input: &WorkoutInput,
    ) -> AppResult<WorkoutSessionRecord> {
        let performed_at = input
            .performed_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        let exercises_json = input
            .exercises
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AppError::internal(format!("Failed to encode exercises: {e}")))?;

        let result = sqlx::query(
            "INSERT INTO workout_sessions (user_id, name, performed_at, duration_min, notes, exercises)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(user_id.to_string())
        .bind(&input.name)
        .bind(&performed_at)
        .bind(input.duration_min)
        .bind(&input.notes)
        .bind(&exercises_json)
        .execute(&self.pool)
        .await?;

        Ok(WorkoutSessionRecord {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            name: input.name.clone(),
            performed_at,
            duration_min: input.duration_min,
            notes: input.notes.clone(),
            exercises: input.exercises.clone(),
        })
    }

    /// Fetch a single workout session, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_workout(
        &self,
        workout_id: i64,
        user_id: Uuid,
    ) -> AppResult<Option<WorkoutSessionRecord>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, performed_at, duration_min, notes, exercises
             FROM workout_sessions WHERE id = ?1 AND user_id = ?2",
        )
        .bind(workout_id)
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_workout(&r)).transpose()
    }

    /// List a user's workouts, newest first, up to `limit`
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_workouts(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<WorkoutSessionRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, performed_at, duration_min, notes, exercises
             FROM workout_sessions WHERE user_id = ?1
             ORDER BY performed_at DESC, id DESC LIMIT ?2",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_workout).collect()
    }

    /// Store a training plan and make it the active one
    ///
    /// # Errors
    ///
    /// Returns a database error on insert failure.
    pub async fn create_training_plan(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
        plan: &serde_json::Value,
    ) -> AppResult<TrainingPlanRecord> {
        let created_at = Utc::now().to_rfc3339();
        let plan_json = serde_json::to_string(plan)
            .map_err(|e| AppError::internal(format!("Failed to encode plan: {e}")))?;

        sqlx::query("UPDATE training_plans SET is_active = 0 WHERE user_id = ?1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        let result = sqlx::query(
            "INSERT INTO training_plans (user_id, name, description, plan, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        )
        .bind(user_id.to_string())
        .bind(name)
        .bind(description)
        .bind(&plan_json)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(TrainingPlanRecord {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            name: name.to_owned(),
            description: description.map(ToOwned::to_owned),
            plan: plan.clone(),
            is_active: true,
            created_at,
        })
    }

    /// Fetch the user's active training plan
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_active_training_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<TrainingPlanRecord>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, description, plan, is_active, created_at
             FROM training_plans WHERE user_id = ?1 AND is_active = 1
             ORDER BY id DESC LIMIT 1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_training_plan(&r)).transpose()
    }

    /// Store a nutrition plan and make it the active one
    ///
    /// # Errors
    ///
    /// Returns a database error on insert failure.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_nutrition_plan(
        &self,
        user_id: Uuid,
        name: &str,
        calories: i64,
        protein_g: i64,
        carbs_g: i64,
        fats_g: i64,
        meal_suggestions: Option<&serde_json::Value>,
    ) -> AppResult<NutritionPlanRecord> {
        let created_at = Utc::now().to_rfc3339();
        let meals_json = meal_suggestions
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AppError::internal(format!("Failed to encode meal suggestions: {e}")))?;

        sqlx::query("UPDATE nutrition_plans SET is_active = 0 WHERE user_id = ?1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        let result = sqlx::query(
            "INSERT INTO nutrition_plans (user_id, name, calories, protein_g, carbs_g, fats_g,
                                          meal_suggestions, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
        )
        .bind(user_id.to_string())
        .bind(name)
        .bind(calories)
        .bind(protein_g)
        .bind(carbs_g)
        .bind(fats_g)
        .bind(&meals_json)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(NutritionPlanRecord {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            name: name.to_owned(),
            calories,
            protein_g,
            carbs_g,
            fats_g,
            meal_suggestions: meal_suggestions.cloned(),
            is_active: true,
            created_at,
        })
    }

    /// Fetch the user's active nutrition plan
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_active_nutrition_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<NutritionPlanRecord>> {
        let row = sqlx::query(
            "SELECT id, user_id, name, calories, protein_g, carbs_g, fats_g, meal_suggestions,
                    is_active, created_at
             FROM nutrition_plans WHERE user_id = ?1 AND is_active = 1
             ORDER BY id DESC LIMIT 1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_nutrition_plan(&r)).transpose()
    }
}

fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> ProfileRecord {
    ProfileRecord {
        user_id: row.get("user_id"),
        age: row.get("age"),
        gender: row.get("gender"),
        height_cm: row.get("height_cm"),
        weight_kg: row.get("weight_kg"),
        goal: row.get("goal"),
        experience_level: row.get("experience_level"),
        activity_level: row.get("activity_level"),
        days_per_week: row.get("days_per_week"),
        session_length_min: row.get("session_length_min"),
        equipment: row.get("equipment"),
        injuries: row.get("injuries"),
        dietary_restrictions: row.get("dietary_restrictions"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_progress(row: &sqlx::sqlite::SqliteRow) -> ProgressLogRecord {
    ProgressLogRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        logged_at: row.get("logged_at"),
        weight_kg: row.get("weight_kg"),
        body_fat_pct: row.get("body_fat_pct"),
        notes: row.get("notes"),
    }
}

fn row_to_workout(row: &sqlx::sqlite::SqliteRow) -> AppResult<WorkoutSessionRecord> {
    let exercises: Option<String> = row.get("exercises");
    let exercises = exercises
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| AppError::internal(format!("Corrupt exercises JSON: {e}")))?;

    Ok(WorkoutSessionRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        performed_at: row.get("performed_at"),
        duration_min: row.get("duration_min"),
        notes: row.get("notes"),
        exercises,
    })
}

fn row_to_training_plan(row: &sqlx::sqlite::SqliteRow) -> AppResult<TrainingPlanRecord> {
    let plan_json: String = row.get("plan");
    let plan = serde_json::from_str(&plan_json)
        .map_err(|e| AppError::internal(format!("Corrupt plan JSON: {e}")))?;

    Ok(TrainingPlanRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        plan,
        is_active: row.get::<i64, _>("is_active") != 0,
        created_at: row.get("created_at"),
    })
}

fn row_to_nutrition_plan(row: &sqlx::sqlite::SqliteRow) -> AppResult<NutritionPlanRecord> {
    let meals_json: Option<String> = row.get("meal_suggestions");
    let meal_suggestions = meals_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| AppError::internal(format!("Corrupt meal suggestions JSON: {e}")))?;

    Ok(NutritionPlanRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        calories: row.get("calories"),
        protein_g: row.get("protein_g"),
        carbs_g: row.get("carbs_g"),
        fats_g: row.get("fats_g"),
        meal_suggestions,
        is_active: row.get::<i64, _>("is_active") != 0,
        created_at: row.get("created_at"),
    })
}
