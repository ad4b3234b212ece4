//! D-Day server library
//!
//! Router construction and command line options. `main.rs` only wires
//! configuration, logging and the listener around [`build_router`].

pub mod api;
pub mod health;
pub mod response;
pub mod rest;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use clap::Parser;
use dday_core::{DDayConfig, DDayDatabase, ObservabilityConfig, ServerConfig};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Parser, Debug)]
#[command(name = "dday-server")]
#[command(about = "D-Day countdown backend")]
#[command(version)]
pub struct Cli {
    /// Database connection string (defaults to `sqlite://dday.db?mode=rwc`)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Port to listen on (defaults to `PORT` or 8080)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Apply command line overrides on top of environment configuration
    #[must_use]
    pub fn apply(&self, mut config: DDayConfig) -> DDayConfig {
        if let Some(url) = &self.database_url {
            config.database.url.clone_from(url);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        config
    }

    /// Logging setup; production environments always log JSON
    #[must_use]
    pub fn observability(&self, server: &ServerConfig) -> ObservabilityConfig {
        ObservabilityConfig {
            log_level: if self.verbose { "debug" } else { "info" }.to_string(),
            json_logs: self.json_logs || server.is_production(),
            ..ObservabilityConfig::default()
        }
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DDayDatabase>,
}

impl AppState {
    #[must_use]
    pub fn new(db: DDayDatabase) -> Self {
        Self { db: Arc::new(db) }
    }
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health_check))
        .nest("/api/v1/ddays", api::routes())
        .route("/api/v1/ddays/", api::collection())
        .nest("/rest/ddays", rest::routes())
        .route("/rest/ddays/", rest::collection())
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
