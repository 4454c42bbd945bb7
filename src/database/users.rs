// ABOUTME: User account persistence
// ABOUTME: Creates accounts and looks them up by username or ID
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! User account storage

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::UserRecord;

/// Manages user account rows
pub struct UserManager {
    pool: SqlitePool,
}

impl UserManager {
    /// Create a manager over the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user with an already-hashed password
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the username is taken.
    pub async fn create_user(
        &self,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> AppResult<UserRecord> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(&created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(UserRecord {
                id,
                username: username.to_owned(),
                email: email.map(ToOwned::to_owned),
                password_hash: password_hash.to_owned(),
                created_at,
            }),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::validation("Username is already taken"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by username
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at
             FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_user(&r)))
    }

    /// Look up a user by ID
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_user_by_id(&self, user_id: Uuid) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at
             FROM users WHERE id = ?1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_user(&r)))
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}
