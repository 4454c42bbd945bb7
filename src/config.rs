// ABOUTME: Environment-only server configuration
// ABOUTME: Loads ports, database URL, JWT secret, and LLM provider settings at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Server configuration loaded from environment variables
//!
//! There is no config file; everything is environment-driven so deployments
//! stay declarative. Missing required values fail startup with
//! [`AppError::Config`](crate::errors::AppError).

use std::env;

use crate::errors::{AppError, AppResult};

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default SQLite database URL
const DEFAULT_DATABASE_URL: &str = "sqlite:fitcoach.db";

/// Default OpenAI-compatible endpoint
const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Default cap on a single chat stream, in seconds
const DEFAULT_STREAM_MAX_SECS: u64 = 300;

/// Default auth token lifetime, in seconds (24 hours)
const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    pub http_port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// HS256 secret for JWT signing
    pub jwt_secret: String,
    /// Auth token lifetime in seconds
    pub token_ttl_secs: i64,
    /// LLM provider settings
    pub llm: LlmConfig,
}

/// Settings for the OpenAI-compatible chat provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// API key, sent as a bearer token
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Maximum total duration of one streaming response
    pub stream_max_secs: u64,
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if `FITCOACH_JWT_SECRET` or
    /// `FITCOACH_LLM_API_KEY` is unset, or if a numeric variable fails to
    /// parse.
    pub fn from_env() -> AppResult<Self> {
        let http_port = parse_env("FITCOACH_HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let database_url =
            env::var("FITCOACH_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());
        let jwt_secret = env::var("FITCOACH_JWT_SECRET")
            .map_err(|_| AppError::config("FITCOACH_JWT_SECRET must be set"))?;
        let token_ttl_secs = parse_env("FITCOACH_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            token_ttl_secs,
            llm: LlmConfig::from_env()?,
        })
    }
}

impl LlmConfig {
    /// Load LLM provider settings from the environment
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if `FITCOACH_LLM_API_KEY` is unset.
    pub fn from_env() -> AppResult<Self> {
        let base_url =
            env::var("FITCOACH_LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_owned());
        let api_key = env::var("FITCOACH_LLM_API_KEY")
            .map_err(|_| AppError::config("FITCOACH_LLM_API_KEY must be set"))?;
        let model = env::var("FITCOACH_LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_owned());
        let stream_max_secs = parse_env("FITCOACH_STREAM_MAX_SECS", DEFAULT_STREAM_MAX_SECS)?;

        Ok(Self {
            base_url,
            api_key,
            model,
            stream_max_secs,
        })
    }
}

/// Parse an optional numeric environment variable with a default
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
