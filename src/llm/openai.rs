// ABOUTME: OpenAI-compatible chat completions backend
// ABOUTME: Streams SSE deltas from /chat/completions and handles the [DONE] sentinel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! OpenAI-compatible provider
//!
//! Works against any endpoint speaking the `chat/completions` protocol
//! (OpenAI, Azure, local inference servers). Streaming responses arrive as
//! SSE frames ending with a literal `[DONE]` sentinel.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;
use crate::errors::{AppError, AppResult};

use super::{ChatBackend, ChatMessage, ChatRequest, ChunkStream, StreamChunk};

/// Chat backend for OpenAI-compatible APIs
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
    stream: bool,
}

#[derive(Deserialize)]
struct WireChunk {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    delta: WireDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireDelta {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiBackend {
    /// Build a backend from provider configuration
    #[must_use]
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    async fn send(&self, request: &ChatRequest, stream: bool) -> AppResult<reqwest::Response> {
        let body = WireRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
            stream,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Provider request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "Provider returned {status}: {detail}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete_stream(&self, request: ChatRequest) -> AppResult<ChunkStream> {
        let response = self.send(&request, true).await?;
        debug!(model = %self.model, "Provider stream opened");

        let stream = response.bytes_stream().eventsource().filter_map(|event| {
            let item = match event {
                Ok(event) => {
                    if event.data == "[DONE]" {
                        None
                    } else {
                        Some(parse_chunk(&event.data))
                    }
                }
                Err(e) => Some(Err(AppError::upstream(format!("Provider stream error: {e}")))),
            };
            async move { item }
        });

        Ok(Box::pin(stream))
    }
}

fn parse_chunk(data: &str) -> AppResult<StreamChunk> {
    let chunk: WireChunk = serde_json::from_str(data)
        .map_err(|e| AppError::upstream(format!("Malformed provider chunk: {e}")))?;

    let (delta, finish_reason) = chunk.choices.into_iter().next().map_or_else(
        || (String::new(), None),
        |choice| {
            (
                choice.delta.content.unwrap_or_default(),
                choice.finish_reason,
            )
        },
    );

    Ok(StreamChunk {
        delta,
        finish_reason,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_delta_chunk() {
        let data = r#"{"choices":[{"delta":{"content":"Hel"},"finish_reason":null}]}"#;
        let chunk = parse_chunk(data).unwrap();
        assert_eq!(chunk.delta, "Hel");
        assert!(chunk.finish_reason.is_none());
    }

    #[test]
    fn parses_final_chunk_without_content() {
        let data = r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        let chunk = parse_chunk(data).unwrap();
        assert!(chunk.delta.is_empty());
        assert_eq!(chunk.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn rejects_malformed_chunk() {
        assert!(parse_chunk("not json").is_err());
    }
}
