// ABOUTME: Chat thread endpoints and the SSE streaming coach pipeline
// ABOUTME: Persist user turn, assemble context, relay model deltas, persist reply once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Chat routes
//!
//! The streaming endpoint runs a strict sequence: authenticate and validate,
//! persist the user turn, build the prompt context, then relay model deltas
//! as SSE frames while accumulating the full reply. The assistant message is
//! persisted exactly once, after the upstream stream completes; any abort
//! (upstream failure, timeout, client disconnect) leaves no assistant row
//! behind. The terminator frame is the literal `data: [DONE]`.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ChatRequest, MessageRole, StreamChunk};
use crate::prompts::{build_system_message, ContextInputs, Language};

use super::ServerResources;

/// How many prior messages feed the model's context window
const RECENT_WINDOW: i64 = 10;

/// How many recent workouts appear in the prompt context
const RECENT_WORKOUTS: i64 = 5;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateThreadRequest {
    title: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateThreadRequest {
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatStreamRequest {
    thread_id: i64,
    message: String,
    language: Option<Language>,
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/chat/threads",
                get(Self::list_threads).post(Self::create_thread),
            )
            .route(
                "/api/chat/threads/:thread_id",
                axum::routing::put(Self::update_thread).delete(Self::delete_thread),
            )
            .route(
                "/api/chat/threads/:thread_id/messages",
                get(Self::get_messages),
            )
            .route("/api/chat/stream", post(Self::stream_chat))
            .with_state(resources)
    }

    async fn list_threads(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let threads = resources.database.chat().list_threads(auth.user_id).await?;
        Ok(Json(json!({ "threads": threads })).into_response())
    }

    async fn create_thread(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateThreadRequest>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let thread = resources
            .database
            .chat()
            .create_thread(auth.user_id, request.title.as_deref())
            .await?;
        Ok(Json(thread).into_response())
    }

    async fn update_thread(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(thread_id): Path<i64>,
        Json(request): Json<UpdateThreadRequest>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        if request.title.trim().is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }
        let updated = resources
            .database
            .chat()
            .update_thread_title(thread_id, auth.user_id, request.title.trim())
            .await?;
        if !updated {
            return Err(AppError::not_found("Thread not found"));
        }
        Ok(Json(json!({ "success": true })).into_response())
    }

    async fn delete_thread(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(thread_id): Path<i64>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let deleted = resources
            .database
            .chat()
            .delete_thread(thread_id, auth.user_id)
            .await?;
        if !deleted {
            return Err(AppError::not_found("Thread not found"));
        }
        Ok(Json(json!({ "success": true })).into_response())
    }

    async fn get_messages(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(thread_id): Path<i64>,
    ) -> AppResult<Response> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let messages = resources
            .database
            .chat()
            .get_messages(thread_id, auth.user_id)
            .await?;
        Ok(Json(json!({ "messages": messages })).into_response())
    }

    /// Streaming coach endpoint
    ///
    /// Everything that can be rejected is rejected before the user message
    /// is persisted, so a failed request never mutates the thread.
    async fn stream_chat(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<ChatStreamRequest>,
    ) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
        let auth = resources.auth.authenticate_request(&headers)?;
        let message = request.message.trim().to_owned();
        if message.is_empty() {
            return Err(AppError::validation("Message cannot be empty"));
        }

        let thread_id = request.thread_id;
        let user_id = auth.user_id;
        let chat = resources.database.chat();
        if chat.get_thread(thread_id, user_id).await?.is_none() {
            return Err(AppError::not_found("Thread not found"));
        }

        let user_message = chat
            .add_message(thread_id, user_id, MessageRole::User, &message)
            .await?;

        let fitness = resources.database.fitness();
        let profile = fitness.get_profile(user_id).await?;
        let persona = fitness.get_persona(user_id).await?;
        let latest_progress = fitness.latest_progress_log(user_id).await?;
        let recent_workouts = fitness.list_workouts(user_id, RECENT_WORKOUTS).await?;

        let language = request.language.unwrap_or_else(|| {
            persona
                .as_ref()
                .map_or(Language::En, |p| match p.language.as_str() {
                    "ar" => Language::Ar,
                    _ => Language::En,
                })
        });

        let system_message = build_system_message(&ContextInputs {
            profile: profile.as_ref(),
            persona: persona.as_ref(),
            latest_progress: latest_progress.as_ref(),
            recent_workouts: &recent_workouts,
            language,
        });

        // History window excludes the just-persisted user turn; it is
        // re-appended below so it appears exactly once, last.
        let history = chat
            .recent_messages(thread_id, RECENT_WINDOW, user_message.id)
            .await?;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system_message));
        for m in &history {
            let role = match m.role.as_str() {
                "assistant" => MessageRole::Assistant,
                _ => MessageRole::User,
            };
            messages.push(ChatMessage {
                role,
                content: m.content.clone(),
            });
        }
        messages.push(ChatMessage::user(message));

        let llm_request = ChatRequest::new(messages);
        let max_secs = resources.stream_max_secs;
        info!(thread_id, window = history.len(), "Chat stream starting");

        let stream = async_stream::stream! {
            let mut upstream = match resources.backend.complete_stream(llm_request).await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(thread_id, error = %e, "Provider stream failed to open");
                    yield Ok(error_event(&e));
                    return;
                }
            };

            let timeout = tokio::time::sleep(Duration::from_secs(max_secs));
            tokio::pin!(timeout);

            let mut full_content = String::new();
            loop {
                // None means the duration cap fired before the next chunk
                let step: Option<Option<AppResult<StreamChunk>>> = tokio::select! {
                    () = &mut timeout => None,
                    next = upstream.next() => Some(next),
                };

                let Some(step) = step else {
                    warn!(thread_id, max_secs, "Chat stream exceeded duration cap");
                    yield Ok(error_event(&AppError::upstream(
                        "Response exceeded the stream duration limit",
                    )));
                    return;
                };

                match step {
                    Some(Ok(chunk)) => {
                        if !chunk.delta.is_empty() {
                            full_content.push_str(&chunk.delta);
                            yield Ok(content_event(&chunk.delta));
                        }
                    }
                    Some(Err(e)) => {
                        warn!(thread_id, error = %e, "Provider stream failed mid-response");
                        yield Ok(error_event(&e));
                        return;
                    }
                    None => break,
                }
            }

            match resources
                .database
                .chat()
                .add_message(thread_id, user_id, MessageRole::Assistant, &full_content)
                .await
            {
                Ok(saved) => {
                    info!(thread_id, message_id = saved.id, chars = full_content.len(),
                        "Assistant reply persisted");
                }
                Err(e) => {
                    warn!(thread_id, error = %e, "Failed to persist assistant reply");
                    yield Ok(error_event(&e));
                    return;
                }
            }

            yield Ok(Event::default().data("[DONE]"));
        };

        Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
    }
}

fn content_event(delta: &str) -> Event {
    Event::default().data(json!({ "content": delta }).to_string())
}

fn error_event(error: &AppError) -> Event {
    Event::default().data(json!({ "error": error.to_string() }).to_string())
}
