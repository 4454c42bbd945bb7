// ABOUTME: Main library entry point for the FitCoach server
// ABOUTME: Provides the REST API, conversation store, and streaming AI coach pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

#![deny(unsafe_code)]

//! # FitCoach Server
//!
//! Backend for an AI-driven fitness coaching product: user accounts,
//! profile and goal data, AI-generated training and nutrition plans,
//! workout/progress logging, and a streaming chat coach.
//!
//! ## Architecture
//!
//! - **Routes**: thin axum handlers per domain (`auth`, `fitness`, `plans`, `chat`)
//! - **Database**: per-domain managers over a shared `SQLite` pool
//! - **LLM**: provider abstraction over an OpenAI-compatible streaming API
//! - **Prompts**: deterministic prompt/context assembly for every model call

/// Configuration management from environment variables
pub mod config;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Common data transfer records shared by database and routes
pub mod models;

/// JWT authentication and password hashing
pub mod auth;

/// Secure cookie helpers for browser sessions
pub mod security;

/// Thread, message, user, and fitness data persistence
pub mod database;

/// LLM provider abstraction for AI chat integration
pub mod llm;

/// System personas and prompt-context assembly
pub mod prompts;

/// Deterministic nutrition math (BMR, TDEE, macro targets)
pub mod nutrition;

/// HTTP routes for the REST API and the chat stream
pub mod routes;
