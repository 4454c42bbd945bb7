// ABOUTME: Integration tests for chat thread and message persistence
// ABOUTME: Exercises ordering, the recent window, ownership scoping, and cascades
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

#![allow(missing_docs, clippy::unwrap_used)]

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;
use uuid::Uuid;

use fitcoach_server::database::Database;
use fitcoach_server::llm::MessageRole;

async fn test_db() -> Database {
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
    db
}

async fn test_user(db: &Database, username: &str) -> Uuid {
    let user = db
        .users()
        .create_user(username, None, "hash")
        .await
        .unwrap();
    Uuid::parse_str(&user.id).unwrap()
}

#[tokio::test]
async fn creates_thread_with_default_title() {
    let db = test_db().await;
    let user = test_user(&db, "alice").await;

    let thread = db.chat().create_thread(user, None).await.unwrap();
    assert_eq!(thread.title, "New Chat");
    assert_eq!(thread.user_id, user.to_string());

    let named = db.chat().create_thread(user, Some("Leg day qs")).await.unwrap();
    assert_eq!(named.title, "Leg day qs");
    assert_ne!(named.id, thread.id);
}

#[tokio::test]
async fn messages_come_back_in_append_order() {
    let db = test_db().await;
    let user = test_user(&db, "alice").await;
    let thread = db.chat().create_thread(user, None).await.unwrap();

    let chat = db.chat();
    chat.add_message(thread.id, user, MessageRole::User, "first")
        .await
        .unwrap();
    chat.add_message(thread.id, user, MessageRole::Assistant, "second")
        .await
        .unwrap();
    chat.add_message(thread.id, user, MessageRole::User, "third")
        .await
        .unwrap();

    let messages = chat.get_messages(thread.id, user).await.unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
    assert!(messages.windows(2).all(|w| w[0].id < w[1].id));
    assert_eq!(messages[1].role, "assistant");
}

#[tokio::test]
async fn recent_window_excludes_current_message_and_limits() {
    let db = test_db().await;
    let user = test_user(&db, "alice").await;
    let thread = db.chat().create_thread(user, None).await.unwrap();
    let chat = db.chat();

    let mut last_id = 0;
    for i in 0..15 {
        let role = if i % 2 == 0 {
            MessageRole::User
        } else {
            MessageRole::Assistant
        };
        let saved = chat
            .add_message(thread.id, user, role, &format!("msg {i}"))
            .await
            .unwrap();
        last_id = saved.id;
    }

    let window = chat.recent_messages(thread.id, 10, last_id).await.unwrap();
    assert_eq!(window.len(), 10);
    // Chronological, ending just before the excluded current message
    assert_eq!(window.first().unwrap().content, "msg 4");
    assert_eq!(window.last().unwrap().content, "msg 13");
    assert!(window.iter().all(|m| m.id < last_id));
    assert!(window.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn recent_window_on_short_thread_returns_everything_before() {
    let db = test_db().await;
    let user = test_user(&db, "alice").await;
    let thread = db.chat().create_thread(user, None).await.unwrap();
    let chat = db.chat();

    chat.add_message(thread.id, user, MessageRole::User, "hello")
        .await
        .unwrap();
    let current = chat
        .add_message(thread.id, user, MessageRole::User, "again")
        .await
        .unwrap();

    let window = chat.recent_messages(thread.id, 10, current.id).await.unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].content, "hello");
}

#[tokio::test]
async fn foreign_threads_are_invisible() {
    let db = test_db().await;
    let alice = test_user(&db, "alice").await;
    let bob = test_user(&db, "bob").await;
    let thread = db.chat().create_thread(alice, None).await.unwrap();
    let chat = db.chat();

    assert!(chat.get_thread(thread.id, bob).await.unwrap().is_none());
    assert!(chat.get_messages(thread.id, bob).await.is_err());
    assert!(!chat.delete_thread(thread.id, bob).await.unwrap());
    assert!(!chat
        .update_thread_title(thread.id, bob, "hijacked")
        .await
        .unwrap());

    let append = chat
        .add_message(thread.id, bob, MessageRole::User, "sneaky")
        .await;
    assert!(append.is_err());

    // Nothing leaked into the thread
    assert!(chat.get_messages(thread.id, alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_append_leaves_thread_activity_untouched() {
    let db = test_db().await;
    let alice = test_user(&db, "alice").await;
    let bob = test_user(&db, "bob").await;
    let thread = db.chat().create_thread(alice, None).await.unwrap();
    let chat = db.chat();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let append = chat
        .add_message(thread.id, bob, MessageRole::User, "sneaky")
        .await;
    assert!(append.is_err());

    // The insert and the activity bump commit together, so a rejected
    // append must not advance updated_at
    let unchanged = chat.get_thread(thread.id, alice).await.unwrap().unwrap();
    assert_eq!(unchanged.updated_at, thread.updated_at);

    chat.add_message(thread.id, alice, MessageRole::User, "hello")
        .await
        .unwrap();
    let bumped = chat.get_thread(thread.id, alice).await.unwrap().unwrap();
    assert!(bumped.updated_at > thread.updated_at);
}

#[tokio::test]
async fn appending_bumps_thread_activity_order() {
    let db = test_db().await;
    let user = test_user(&db, "alice").await;
    let chat = db.chat();

    let older = chat.create_thread(user, Some("older")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = chat.create_thread(user, Some("newer")).await.unwrap();

    let listed = chat.list_threads(user).await.unwrap();
    assert_eq!(listed[0].id, newer.id);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    chat.add_message(older.id, user, MessageRole::User, "wake up")
        .await
        .unwrap();

    let listed = chat.list_threads(user).await.unwrap();
    assert_eq!(listed[0].id, older.id);
}

#[tokio::test]
async fn deleting_a_thread_cascades_to_messages() {
    let db = test_db().await;
    let user = test_user(&db, "alice").await;
    let thread = db.chat().create_thread(user, None).await.unwrap();
    let chat = db.chat();

    chat.add_message(thread.id, user, MessageRole::User, "doomed")
        .await
        .unwrap();
    assert!(chat.delete_thread(thread.id, user).await.unwrap());

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM chat_messages WHERE thread_id = ?1")
        .bind(thread.id)
        .fetch_one(db.pool())
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 0);
}
