//! Clarity journal HTTP surface
//!
//! Axum server with three routes. Each handler is a thin wrapper around an
//! inner function that takes the state explicitly, so the inner functions
//! can be called from tests without going through the router.
//!
//! Endpoints:
//! - GET  /         entry form
//! - POST /submit   store an entry with its reflection, 303 to /entries
//! - GET  /entries  all entries, newest first

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use clarity_core::config::HttpConfig;
use clarity_core::ReflectionGenerator;
use serde::Deserialize;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::error::ServerError;
use crate::render::Templates;
use crate::subsystems::{listing, submit};

/// Shared state for all HTTP handlers
pub struct AppState {
    pub pool: SqlitePool,
    pub generator: Arc<dyn ReflectionGenerator>,
    pub templates: Templates,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        generator: Arc<dyn ReflectionGenerator>,
    ) -> Result<Self, ServerError> {
        Ok(Self {
            pool,
            generator,
            templates: Templates::new()?,
        })
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/submit", post(submit_handler))
        .route("/entries", get(entries_handler))
        // Entries have no length cap; the 2 MiB extractor default would 413 them.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on the configured address until the shutdown signal fires.
pub async fn start_http_server(
    state: Arc<AppState>,
    config: &HttpConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Clarity journal listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub entry: Option<String>,
}

// ============================================================================
// Inner functions
// ============================================================================

pub fn index_inner(templates: &Templates) -> Result<Html<String>, ServerError> {
    Ok(Html(templates.index()?))
}

/// Store the submitted entry and point the client at the listing.
/// An empty `entry` is accepted; an absent one is a 400.
pub async fn submit_inner(state: &AppState, form: SubmitForm) -> Result<Redirect, ServerError> {
    let text = form
        .entry
        .ok_or_else(|| ServerError::BadRequest("entry field is required".to_string()))?;

    submit::submit_entry(&text, &state.pool, state.generator.as_ref()).await?;

    Ok(Redirect::to("/entries"))
}

pub async fn entries_inner(state: &AppState) -> Result<Html<String>, ServerError> {
    let page = listing::render_listing(&state.pool, &state.templates).await?;
    Ok(Html(page))
}

// ============================================================================
// Axum handler wrappers
// ============================================================================

pub async fn index_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    index_inner(&state.templates)
}

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SubmitForm>,
) -> Result<Redirect, ServerError> {
    submit_inner(&state, form).await
}

pub async fn entries_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    entries_inner(&state).await
}
