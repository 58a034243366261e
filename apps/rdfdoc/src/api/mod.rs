//! # rdfdoc HTTP Module
//!
//! Serves every resource of the store as a document.
//!
//! ## Endpoints
//!
//! - `GET /` and `GET /{*path}` - the document of `<proto>://<host>/<path>`,
//!   negotiated on `Accept`
//!
//! ## Configuration
//!
//! - `cors_origins` (`RDFDOC_CORS_ORIGINS`): comma-separated list of allowed
//!   origins, or "*" for all (default: all, documents are public and
//!   read-only)
//!
//! On Unix, `SIGHUP` reloads the store from disk.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{document_handler, request_base};

use crate::config::ServerConfig;
use crate::render::Renderer;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use rdfdoc_core::{Engine, RdfDocError};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// Current snapshot of the store.
    pub engine: Arc<Engine>,
    pub renderer: Arc<Renderer>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(engine: Engine, renderer: Renderer, config: ServerConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            renderer: Arc::new(renderer),
            config: Arc::new(config),
        }
    }

    /// Load the engine and templates named by `config`.
    pub fn load(config: ServerConfig) -> Result<Self, RdfDocError> {
        let engine = Engine::open(config.engine_config()?)?;
        let renderer = Renderer::load(&config.template_path, config.debug)?;
        Ok(Self::new(engine, renderer, config))
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from `cors_origins`.
///
/// - unset or "*": any origin
/// - otherwise: the comma-separated origins that parse
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins.map(str::trim) {
        None | Some("*") => {
            tracing::info!("CORS: allowing all origins");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, allowing all origins");
                CorsLayer::permissive()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
                    .allow_headers([header::ACCEPT])
            }
        }
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.config.cors_origins.as_deref());

    Router::new()
        .route("/", get(handlers::document_handler))
        .route("/{*path}", get(handlers::document_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), RdfDocError> {
    #[cfg(unix)]
    spawn_reload_on_hangup(Arc::clone(&state.engine))?;

    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RdfDocError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("rdfdoc HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| RdfDocError::Io(format!("Server error: {}", e)))
}

/// Reload the store whenever the process receives `SIGHUP`.
#[cfg(unix)]
fn spawn_reload_on_hangup(engine: Arc<Engine>) -> Result<(), RdfDocError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())
        .map_err(|e| RdfDocError::Io(format!("Cannot listen for SIGHUP: {}", e)))?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            tracing::info!("SIGHUP received, reloading store");
            let engine = Arc::clone(&engine);
            // Failures are logged by the engine; the old snapshot keeps serving.
            if let Err(e) = tokio::task::spawn_blocking(move || engine.reload()).await {
                tracing::error!("Reload task failed: {}", e);
            }
        }
    });
    Ok(())
}
