// ABOUTME: Server entry point: config, database, provider, router, serve
// ABOUTME: Binds the HTTP listener and runs until SIGINT/SIGTERM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! FitCoach server binary

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use fitcoach_server::auth::AuthManager;
use fitcoach_server::config::ServerConfig;
use fitcoach_server::database::Database;
use fitcoach_server::errors::{AppError, AppResult};
use fitcoach_server::llm::OpenAiBackend;
use fitcoach_server::routes::{router, ServerResources};

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    info!(port = config.http_port, "Starting FitCoach server");

    let database = Database::connect(&config.database_url).await?;
    database.migrate().await?;
    info!(url = %config.database_url, "Database ready");

    let auth = AuthManager::new(config.jwt_secret.clone(), config.token_ttl_secs);
    let backend = Arc::new(OpenAiBackend::new(&config.llm));
    let resources = Arc::new(ServerResources::new(
        database,
        auth,
        backend,
        config.llm.stream_max_secs,
    ));

    let app = router(resources)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.http_port))
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind port: {e}")))?;
    info!(port = config.http_port, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut signal) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            signal.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("Shutdown signal received");
}
