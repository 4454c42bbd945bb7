// ABOUTME: Chat thread and message persistence
// ABOUTME: All operations are ownership-scoped; messages are append-only and id-ordered
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Conversation storage
//!
//! Threads belong to exactly one user and every query is scoped by owner, so
//! a foreign thread ID behaves as if it does not exist. Messages are
//! append-only; their integer rowids give a stable total order per thread,
//! which is what context assembly and the recent-window query rely on.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::llm::MessageRole;
use crate::models::{MessageRecord, ThreadRecord};

/// Manages chat threads and their messages
pub struct ChatManager {
    pool: SqlitePool,
}

impl ChatManager {
    /// Create a manager over the given pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new thread for a user
    ///
    /// # Errors
    ///
    /// Returns a database error on insert failure.
    pub async fn create_thread(
        &self,
        user_id: Uuid,
        title: Option<&str>,
    ) -> AppResult<ThreadRecord> {
        let now = Utc::now().to_rfc3339();
        let title = title.unwrap_or("New Chat");

        let result = sqlx::query(
            "INSERT INTO chat_threads (user_id, title, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
        )
        .bind(user_id.to_string())
        .bind(title)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(ThreadRecord {
            id: result.last_insert_rowid(),
            user_id: user_id.to_string(),
            title: title.to_owned(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Fetch a thread, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_thread(
        &self,
        thread_id: i64,
        user_id: Uuid,
    ) -> AppResult<Option<ThreadRecord>> {
        let row = sqlx::query(
            "SELECT id, user_id, title, created_at, updated_at
             FROM chat_threads WHERE id = ?1 AND user_id = ?2",
        )
        .bind(thread_id)
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_thread(&r)))
    }

    /// List a user's threads, most recently active first
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_threads(&self, user_id: Uuid) -> AppResult<Vec<ThreadRecord>> {
        let rows = sqlx::query(
            "SELECT id, user_id, title, created_at, updated_at
             FROM chat_threads WHERE user_id = ?1
             ORDER BY updated_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_thread).collect())
    }

    /// Rename a thread; returns false if the thread does not exist or is
    /// owned by someone else
    ///
    /// # Errors
    ///
    /// Returns a database error on update failure.
    pub async fn update_thread_title(
        &self,
        thread_id: i64,
        user_id: Uuid,
        title: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE chat_threads SET title = ?1, updated_at = ?2
             WHERE id = ?3 AND user_id = ?4",
        )
        .bind(title)
        .bind(Utc::now().to_rfc3339())
        .bind(thread_id)
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a thread and, via cascade, its messages
    ///
    /// # Errors
    ///
    /// Returns a database error on delete failure.
    pub async fn delete_thread(&self, thread_id: i64, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM chat_threads WHERE id = ?1 AND user_id = ?2")
            .bind(thread_id)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Append a message to a thread the user owns and bump its activity
    /// timestamp
    ///
    /// The insert itself verifies ownership, so the append is atomic even if
    /// the thread is deleted between a prior check and this call. The insert
    /// and the activity bump commit together; a rejected append leaves the
    /// thread untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the thread does not exist or is
    /// owned by someone else.
    pub async fn add_message(
        &self,
        thread_id: i64,
        user_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> AppResult<MessageRecord> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO chat_messages (thread_id, role, content, created_at)
             SELECT ?1, ?2, ?3, ?4
             WHERE EXISTS (SELECT 1 FROM chat_threads WHERE id = ?1 AND user_id = ?5)",
        )
        .bind(thread_id)
        .bind(role.as_str())
        .bind(content)
        .bind(&now)
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Thread not found"));
        }

        sqlx::query("UPDATE chat_threads SET updated_at = ?1 WHERE id = ?2")
            .bind(&now)
            .bind(thread_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(MessageRecord {
            id: result.last_insert_rowid(),
            thread_id,
            role: role.as_str().to_owned(),
            content: content.to_owned(),
            created_at: now,
        })
    }

    /// Fetch a thread's full transcript in chronological order
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the thread does not exist or is
    /// owned by someone else.
    pub async fn get_messages(&self, thread_id: i64, user_id: Uuid) -> AppResult<Vec<MessageRecord>> {
        if self.get_thread(thread_id, user_id).await?.is_none() {
            return Err(AppError::not_found("Thread not found"));
        }

        let rows = sqlx::query(
            "SELECT id, thread_id, role, content, created_at
             FROM chat_messages WHERE thread_id = ?1
             ORDER BY id ASC",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_message).collect())
    }

    /// Fetch the most recent messages before a given message ID, in
    /// chronological order
    ///
    /// Used to build the context window for a new turn: the exclusive upper
    /// bound keeps the just-persisted user message out of the history so it
    /// can be appended exactly once by the caller.
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn recent_messages(
        &self,
        thread_id: i64,
        limit: i64,
        before_id: i64,
    ) -> AppResult<Vec<MessageRecord>> {
        let rows = sqlx::query(
            "SELECT id, thread_id, role, content, created_at
             FROM chat_messages WHERE thread_id = ?1 AND id < ?2
             ORDER BY id DESC LIMIT ?3",
        )
        .bind(thread_id)
        .bind(before_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut messages: Vec<MessageRecord> = rows.iter().map(row_to_message).collect();
        messages.reverse();
        Ok(messages)
    }
}

fn row_to_thread(row: &sqlx::sqlite::SqliteRow) -> ThreadRecord {
    ThreadRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> MessageRecord {
    MessageRecord {
        id: row.get("id"),
        thread_id: row.get("thread_id"),
        role: row.get("role"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}
