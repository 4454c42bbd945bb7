// ABOUTME: Integration tests for fitness data persistence
// ABOUTME: Covers profile/persona upserts, progress logs, workouts, and plan activation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

#![allow(missing_docs, clippy::unwrap_used)]

use std::str::FromStr;

use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use fitcoach_server::database::fitness::{
    PersonaInput, ProfileInput, ProgressInput, WorkoutInput,
};
use fitcoach_server::database::Database;

async fn test_db() -> Database {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    let db = Database::from_pool(pool);
    db.migrate().await.unwrap();
    db
}

async fn test_user(db: &Database) -> Uuid {
    let user = db.users().create_user("alice", None, "hash").await.unwrap();
    Uuid::parse_str(&user.id).unwrap()
}

#[tokio::test]
async fn profile_upsert_replaces_previous_values() {
    let db = test_db().await;
    let user = test_user(&db).await;
    let fitness = db.fitness();

    assert!(fitness.get_profile(user).await.unwrap().is_none());

    let first = ProfileInput {
        age: Some(30),
        weight_kg: Some(90.0),
        goal: Some("bulk".to_owned()),
        ..ProfileInput::default()
    };
    fitness.upsert_profile(user, &first).await.unwrap();

    let second = ProfileInput {
        age: Some(31),
        weight_kg: Some(86.5),
        goal: Some("cut".to_owned()),
        ..ProfileInput::default()
    };
    fitness.upsert_profile(user, &second).await.unwrap();

    let stored = fitness.get_profile(user).await.unwrap().unwrap();
    assert_eq!(stored.age, Some(31));
    assert_eq!(stored.weight_kg, Some(86.5));
    assert_eq!(stored.goal.as_deref(), Some("cut"));
    // Fields not in the second upsert are cleared, not merged
    assert!(stored.gender.is_none());
}

#[tokio::test]
async fn persona_defaults_fill_unset_fields() {
    let db = test_db().await;
    let user = test_user(&db).await;
    let fitness = db.fitness();

    let persona = fitness
        .upsert_persona(
            user,
            &PersonaInput {
                name: Some("Max".to_owned()),
                style: None,
                tone: None,
                language: Some("ar".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(persona.name, "Max");
    assert_eq!(persona.style, "strict");
    assert_eq!(persona.tone, "energetic");
    assert_eq!(persona.language, "ar");

    let stored = fitness.get_persona(user).await.unwrap().unwrap();
    assert_eq!(stored.language, "ar");
}

#[tokio::test]
async fn latest_progress_is_the_newest_entry() {
    let db = test_db().await;
    let user = test_user(&db).await;
    let fitness = db.fitness();

    for (ts, weight) in [
        ("2025-01-01T08:00:00+00:00", 90.0),
        ("2025-02-01T08:00:00+00:00", 88.0),
        ("2025-01-15T08:00:00+00:00", 89.2),
    ] {
        fitness
            .create_progress_log(
                user,
                &ProgressInput {
                    logged_at: Some(ts.to_owned()),
                    weight_kg: Some(weight),
                    body_fat_pct: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    let latest = fitness.latest_progress_log(user).await.unwrap().unwrap();
    assert_eq!(latest.weight_kg, Some(88.0));

    let logs = fitness.list_progress_logs(user, 50).await.unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0].weight_kg, Some(88.0));

    let capped = fitness.list_progress_logs(user, 2).await.unwrap();
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[1].weight_kg, Some(89.2));
}

#[tokio::test]
async fn workout_listing_honors_limit_and_order() {
    let db = test_db().await;
    let user = test_user(&db).await;
    let fitness = db.fitness();

    for day in 1..=7 {
        fitness
            .create_workout(
                user,
                &WorkoutInput {
                    name: format!("Session {day}"),
                    performed_at: Some(format!("2025-03-0{day}T18:00:00+00:00")),
                    duration_min: Some(60),
                    notes: None,
                    exercises: Some(json!([{ "name": "Squat", "sets": 5 }])),
                },
            )
            .await
            .unwrap();
    }

    let recent = fitness.list_workouts(user, 5).await.unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].name, "Session 7");
    assert_eq!(recent[4].name, "Session 3");
    assert!(recent[0].exercises.is_some());
}

#[tokio::test]
async fn workout_lookup_is_owner_scoped() {
    let db = test_db().await;
    let user = test_user(&db).await;
    let fitness = db.fitness();

    let workout = fitness
        .create_workout(
            user,
            &WorkoutInput {
                name: "Pull Day".to_owned(),
                performed_at: None,
                duration_min: Some(45),
                notes: None,
                exercises: None,
            },
        )
        .await
        .unwrap();

    let fetched = fitness.get_workout(workout.id, user).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Pull Day");

    let other = db
        .users()
        .create_user("intruder", None, "hash")
        .await
        .unwrap();
    let other_id = Uuid::parse_str(&other.id).unwrap();
    assert!(fitness
        .get_workout(workout.id, other_id)
        .await
        .unwrap()
        .is_none());
    assert!(fitness.get_workout(9999, user).await.unwrap().is_none());
}

#[tokio::test]
async fn new_training_plan_deactivates_previous() {
    let db = test_db().await;
    let user = test_user(&db).await;
    let fitness = db.fitness();

    let first = fitness
        .create_training_plan(user, "Plan A", None, &json!({ "weeks": 4 }))
        .await
        .unwrap();
    assert!(first.is_active);

    let second = fitness
        .create_training_plan(user, "Plan B", Some("updated"), &json!({ "weeks": 6 }))
        .await
        .unwrap();

    let active = fitness.get_active_training_plan(user).await.unwrap().unwrap();
    assert_eq!(active.id, second.id);
    assert_eq!(active.name, "Plan B");
    assert_eq!(active.plan["weeks"], 6);
}

#[tokio::test]
async fn new_nutrition_plan_deactivates_previous() {
    let db = test_db().await;
    let user = test_user(&db).await;
    let fitness = db.fitness();

    fitness
        .create_nutrition_plan(user, "Old", 2600, 160, 300, 80, None)
        .await
        .unwrap();
    let replacement = fitness
        .create_nutrition_plan(
            user,
            "Cut",
            2000,
            180,
            190,
            72,
            Some(&json!({ "mealPlan": [] })),
        )
        .await
        .unwrap();

    let active = db
        .fitness()
        .get_active_nutrition_plan(user)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, replacement.id);
    assert_eq!(active.calories, 2000);
    assert!(active.meal_suggestions.is_some());
}
