// ABOUTME: LLM provider abstraction for chat completions
// ABOUTME: Defines roles, requests, stream chunks, and the ChatBackend trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! LLM provider layer
//!
//! Everything upstream-facing goes through [`ChatBackend`], a small trait
//! object held in server state. Production uses [`OpenAiBackend`]; tests
//! inject scripted backends to exercise the streaming pipeline without a
//! network.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

pub mod openai;

pub use openai::OpenAiBackend;

/// Who authored a chat message
///
/// This is a closed set; the database schema enforces the same set for
/// persisted messages (minus `system`, which is never stored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instruction preamble, assembled server-side
    System,
    /// End-user turn
    User,
    /// Model turn
    Assistant,
}

impl MessageRole {
    /// Wire and database representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// User message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// A chat completion request with sampling parameters
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Ordered messages, system first
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f64,
    /// Response token cap
    pub max_tokens: u32,
    /// Nucleus sampling cutoff
    pub top_p: f64,
    /// Frequency penalty
    pub frequency_penalty: f64,
    /// Presence penalty
    pub presence_penalty: f64,
}

impl ChatRequest {
    /// Build a request with the coaching sampling defaults
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: 0.85,
            max_tokens: 2000,
            top_p: 0.95,
            frequency_penalty: 0.3,
            presence_penalty: 0.4,
        }
    }

    /// Override the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the response token cap
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// One incremental piece of a streamed completion
#[derive(Debug, Clone)]
pub struct StreamChunk {
    /// Text appended by this chunk; may be empty on the final chunk
    pub delta: String,
    /// Why the stream ended, when the provider reports it
    pub finish_reason: Option<String>,
}

/// Boxed stream of completion chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = AppResult<StreamChunk>> + Send>>;

/// A chat completion provider
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Stream a completion as incremental chunks
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`](crate::errors::AppError) if the
    /// provider rejects the request; mid-stream failures surface as `Err`
    /// items in the stream.
    async fn complete_stream(&self, request: ChatRequest) -> AppResult<ChunkStream>;

    /// Run a completion to the end and return the full text
    ///
    /// # Errors
    ///
    /// Returns the first error the underlying stream produces.
    async fn complete(&self, request: ChatRequest) -> AppResult<String> {
        let mut stream = self.complete_stream(request).await?;
        let mut full = String::new();
        while let Some(chunk) = stream.next().await {
            full.push_str(&chunk?.delta);
        }
        Ok(full)
    }
}
