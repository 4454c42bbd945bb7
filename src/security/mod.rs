// ABOUTME: Security helpers for browser-facing endpoints
// ABOUTME: Currently cookie handling; session hardening lives here as it grows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Security utilities

/// Secure HTTP cookie helpers
pub mod cookies;
