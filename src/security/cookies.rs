// ABOUTME: Secure HTTP cookie utilities for browser authentication
// ABOUTME: Provides httpOnly, Secure, SameSite cookie helpers for the auth token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Secure cookie utilities
//!
//! The browser client authenticates with an `auth_token` cookie. Cookies are
//! `HttpOnly` and `SameSite=Lax`; the `Secure` flag follows `FITCOACH_BASE_URL`
//! (https sets it, http clears it, unset fails secure).

use std::env;
use std::fmt::Write;

use axum::http::{header, HeaderMap, HeaderValue};

/// Name of the authentication cookie
pub const AUTH_COOKIE: &str = "auth_token";

/// `SameSite` cookie policy
#[derive(Debug, Clone, Copy)]
pub enum SameSitePolicy {
    /// Cookie only sent in first-party context
    Strict,
    /// Cookie sent on top-level navigation
    Lax,
}

/// Cookie attributes for a Set-Cookie header
pub struct SecureCookieConfig {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Max-Age in seconds
    pub max_age_secs: i64,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// `SameSite` policy
    pub same_site: SameSitePolicy,
}

impl SecureCookieConfig {
    /// Create a cookie configuration with hardened defaults
    #[must_use]
    pub fn new(name: String, value: String, max_age_secs: i64) -> Self {
        Self {
            name,
            value,
            max_age_secs,
            secure: infer_secure_flag(),
            same_site: SameSitePolicy::Lax,
        }
    }

    /// Build the Set-Cookie header value
    #[must_use]
    pub fn build(&self) -> String {
        let mut cookie = format!("{}={}", self.name, self.value);
        let _ = write!(cookie, "; Max-Age={}", self.max_age_secs);
        cookie.push_str("; Path=/; HttpOnly");
        if self.secure {
            cookie.push_str("; Secure");
        }
        match self.same_site {
            SameSitePolicy::Strict => cookie.push_str("; SameSite=Strict"),
            SameSitePolicy::Lax => cookie.push_str("; SameSite=Lax"),
        }
        cookie
    }
}

/// Set the authentication cookie on a response
pub fn set_auth_cookie(headers: &mut HeaderMap, token: &str, max_age_secs: i64) {
    let cookie = SecureCookieConfig::new(AUTH_COOKIE.to_owned(), token.to_owned(), max_age_secs);
    if let Ok(value) = HeaderValue::from_str(&cookie.build()) {
        headers.insert(header::SET_COOKIE, value);
    }
}

/// Expire the authentication cookie
pub fn clear_auth_cookie(headers: &mut HeaderMap) {
    let cookie = SecureCookieConfig::new(AUTH_COOKIE.to_owned(), String::new(), 0);
    if let Ok(value) = HeaderValue::from_str(&cookie.build()) {
        headers.insert(header::SET_COOKIE, value);
    }
}

/// Read a cookie value from request headers
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

/// Derive the Secure flag from `FITCOACH_BASE_URL`; unset defaults to secure
fn infer_secure_flag() -> bool {
    env::var("FITCOACH_BASE_URL").map_or(true, |url| !url.starts_with("http://"))
}
