//! Study Quiz Backend
//!
//! A REST backend that turns user-submitted study notes into AI-generated
//! multiple-choice quizzes and tracks a per-user daily study streak.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod quizgen;
mod streak;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use quizgen::QuizGenerator;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub quiz_gen: Arc<QuizGenerator>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Study Quiz Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Quiz model: {}", config.openai_model);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (STUDYQUIZ_API_PSK). Authentication is disabled!");
    }
    if config.openai_api_key.is_empty() {
        tracing::warn!("No OPENAI_API_KEY configured. Quiz generation will fail.");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Quiz generator client, constructed once and injected
    let quiz_gen = Arc::new(QuizGenerator::new(&config));

    // Create application state
    let state = AppState {
        repo,
        quiz_gen,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Topics
        .route("/topics", get(api::list_topics))
        .route("/topics", post(api::create_topic))
        .route("/topics/{id}", get(api::get_topic))
        .route("/topics/{id}", delete(api::delete_topic))
        // Quizzes
        .route("/quizzes/generate", post(api::generate_quiz))
        .route("/quizzes/{id}", get(api::get_quiz))
        .route("/quizzes/{id}/submit", post(api::submit_quiz))
        // Streak
        .route("/streak", get(api::get_streak))
        // Apply auth middleware (PSK + user identity)
        .layer(middleware::from_fn(move |req, next| {
            auth::auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
