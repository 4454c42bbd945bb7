// ABOUTME: Integration tests for fitness read endpoints and the weekly check-in
// ABOUTME: Exercises the check-in prompt assembly and owner scoping over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

#![allow(missing_docs, clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;
use uuid::Uuid;

use fitcoach_server::auth::AuthManager;
use fitcoach_server::database::fitness::{ProfileInput, ProgressInput, WorkoutInput};
use fitcoach_server::database::Database;
use fitcoach_server::errors::AppResult;
use fitcoach_server::llm::{ChatBackend, ChatRequest, ChunkStream, MessageRole, StreamChunk};
use fitcoach_server::routes::{router, ServerResources};

/// Backend that answers with one fixed text and records every request
struct RecordingBackend {
    text: String,
    seen: Mutex<Vec<ChatRequest>>,
}

impl RecordingBackend {
    fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_owned(),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for RecordingBackend {
    async fn complete_stream(&self, request: ChatRequest) -> AppResult<ChunkStream> {
        self.seen.lock().unwrap().push(request);
        let text = self.text.clone();
        Ok(Box::pin(futures_util::stream::once(async move {
            Ok(StreamChunk {
                delta: text,
                finish_reason: Some("stop".to_owned()),
            })
        })))
    }
}

struct TestServer {
    app: Router,
    db: Database,
    auth: AuthManager,
    backend: Arc<RecordingBackend>,
}

async fn test_server(completion: &str) -> TestServer {
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

    let auth = AuthManager::new("test-secret".to_owned(), 3600);
    let backend = RecordingBackend::new(completion);
    let resources = Arc::new(ServerResources::new(
        db.clone(),
        auth.clone(),
        backend.clone(),
        300,
    ));

    TestServer {
        app: router(resources),
        db,
        auth,
        backend,
    }
}

async fn seed_user(server: &TestServer, username: &str) -> (Uuid, String) {
    let user = server
        .db
        .users()
        .create_user(username, None, "hash")
        .await
        .unwrap();
    let user_id = Uuid::parse_str(&user.id).unwrap();
    let token = server.auth.issue_token(user_id).unwrap();
    (user_id, token)
}

async fn seed_profile(server: &TestServer, user_id: Uuid) {
    server
        .db
        .fitness()
        .upsert_profile(
            user_id,
            &ProfileInput {
                age: Some(30),
                gender: Some("male".to_owned()),
                height_cm: Some(180.0),
                weight_kg: Some(80.0),
                goal: Some("cut".to_owned()),
                days_per_week: Some(4),
                ..ProfileInput::default()
            },
        )
        .await
        .unwrap();
}

fn request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn weekly_checkin_returns_the_coach_assessment() {
    let server = test_server("Solid week! Keep the deficit going.").await;
    let (user_id, token) = seed_user(&server, "alice").await;
    seed_profile(&server, user_id).await;

    server
        .db
        .fitness()
        .create_progress_log(
            user_id,
            &ProgressInput {
                logged_at: Some("2025-03-03T07:00:00+00:00".to_owned()),
                weight_kg: Some(79.4),
                body_fat_pct: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    server
        .db
        .fitness()
        .create_workout(
            user_id,
            &WorkoutInput {
                name: "Push Day".to_owned(),
                performed_at: Some("2025-03-02T18:00:00+00:00".to_owned()),
                duration_min: Some(55),
                notes: None,
                exercises: None,
            },
        )
        .await
        .unwrap();

    let response = server
        .app
        .clone()
        .oneshot(request(Method::POST, "/api/coach/weekly-checkin", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Solid week! Keep the deficit going.");

    // The model saw a check-in prompt built from the week's data
    let requests = server.backend.requests();
    assert_eq!(requests.len(), 1);
    assert!((requests[0].temperature - 0.8).abs() < f64::EPSILON);
    assert_eq!(requests[0].messages[0].role, MessageRole::System);
    let prompt = &requests[0].messages[1].content;
    assert!(prompt.contains("Perform a weekly check-in"));
    assert!(prompt.contains("- Goal: cut"));
    assert!(prompt.contains("- 2025-03-03: 79.4 kg"));
    assert!(prompt.contains("- Push Day (55 min)"));
}

#[tokio::test]
async fn weekly_checkin_requires_a_profile() {
    let server = test_server("unused").await;
    let (_, token) = seed_user(&server, "bob").await;

    let response = server
        .app
        .clone()
        .oneshot(request(Method::POST, "/api/coach/weekly-checkin", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(server.backend.requests().is_empty());
}

#[tokio::test]
async fn latest_progress_is_null_until_logged() {
    let server = test_server("unused").await;
    let (user_id, token) = seed_user(&server, "alice").await;

    let response = server
        .app
        .clone()
        .oneshot(request(Method::GET, "/api/progress/latest", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await.is_null());

    server
        .db
        .fitness()
        .create_progress_log(
            user_id,
            &ProgressInput {
                logged_at: None,
                weight_kg: Some(81.2),
                body_fat_pct: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let response = server
        .app
        .clone()
        .oneshot(request(Method::GET, "/api/progress/latest", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["weightKg"], json!(81.2));
}

#[tokio::test]
async fn workout_fetch_is_owner_scoped() {
    let server = test_server("unused").await;
    let (alice_id, alice_token) = seed_user(&server, "alice").await;
    let (_, bob_token) = seed_user(&server, "bob").await;

    let workout = server
        .db
        .fitness()
        .create_workout(
            alice_id,
            &WorkoutInput {
                name: "Leg Day".to_owned(),
                performed_at: None,
                duration_min: Some(70),
                notes: None,
                exercises: Some(json!([{ "name": "Squat", "sets": 5 }])),
            },
        )
        .await
        .unwrap();
    let uri = format!("/api/workouts/{}", workout.id);

    let response = server
        .app
        .clone()
        .oneshot(request(Method::GET, &uri, &alice_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["name"], "Leg Day");
    assert_eq!(body["exercises"][0]["name"], "Squat");

    let foreign = server
        .app
        .clone()
        .oneshot(request(Method::GET, &uri, &bob_token))
        .await
        .unwrap();
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
}
