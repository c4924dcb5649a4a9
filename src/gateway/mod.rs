//! Axum-based HTTP gateway with the authentication gate in front of every
//! route.
//!
//! Layers, outermost first:
//! - CORS (any origin) so preflight requests never hit the gate
//! - Request timeout (30s)
//! - Request body size limit (64KB)
//! - [`gate::request_gate`], which also covers the 404 fallback

pub mod error;
pub mod gate;
pub mod session;
pub mod users;

pub use error::ApiError;
pub use gate::{CurrentUser, EXCLUDED_PATHS};

use crate::auth::{AuthStrategy, AuthType};
use crate::config::Config;
use crate::users::{UserLookup, UserStore};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{Method, StatusCode},
    middleware,
    response::Json,
    routing::{delete, get, post, MethodRouter},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    /// Strategy in force; `None` disables the gate entirely.
    pub auth: Option<Arc<AuthStrategy>>,
    pub users: Arc<UserStore>,
}

impl AppState {
    /// Build the state described by `config`, opening the user file if one
    /// is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let users = match config.users.path {
            Some(ref path) => Arc::new(UserStore::open(path)?),
            None => Arc::new(UserStore::in_memory()),
        };
        Ok(Self::new(config.auth.auth_type, &config.auth.session_name, users))
    }

    pub fn new(auth_type: AuthType, session_name: &str, users: Arc<UserStore>) -> Self {
        let lookup: Arc<dyn UserLookup> = users.clone();
        let auth = AuthStrategy::from_type(auth_type, session_name, lookup).map(Arc::new);
        Self { auth, users }
    }
}

/// Register `path` and `path/` with the same handlers.
fn route_both(router: Router<AppState>, path: &str, method: MethodRouter<AppState>) -> Router<AppState> {
    router
        .route(path, method.clone())
        .route(&format!("{path}/"), method)
}

/// Assemble the API router with all layers applied.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new();
    router = route_both(router, "/api/v1/status", get(handle_status));
    router = route_both(router, "/api/v1/stats", get(handle_stats));
    router = route_both(router, "/api/v1/unauthorized", get(handle_unauthorized));
    router = route_both(router, "/api/v1/forbidden", get(handle_forbidden));
    router = route_both(
        router,
        "/api/v1/users",
        get(users::handle_list).post(users::handle_create),
    );
    router = route_both(
        router,
        "/api/v1/users/{user_id}",
        get(users::handle_get)
            .put(users::handle_update)
            .delete(users::handle_delete),
    );
    router = route_both(router, "/api/v1/auth_session/login", post(session::handle_login));
    router = route_both(
        router,
        "/api/v1/auth_session/logout",
        delete(session::handle_logout),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    router
        .fallback(handle_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), gate::request_gate))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
        .layer(cors)
}

/// Run the HTTP gateway until Ctrl-C.
pub async fn run_gateway(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.gateway.host, config.gateway.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr()?;

    tracing::info!(
        addr = %local,
        auth_type = %config.auth.auth_type,
        session_name = config.auth.session_name.as_str(),
        users = state.users.count(),
        "Gateway listening"
    );
    if state.auth.is_none() {
        tracing::warn!("No auth strategy configured; every route is public");
    }

    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// INDEX HANDLERS
// ══════════════════════════════════════════════════════════════════════════════

/// GET /api/v1/status: always public
async fn handle_status() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "OK"}))
}

/// GET /api/v1/stats: object counts
async fn handle_stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({"users": state.users.count()}))
}

/// GET /api/v1/unauthorized: always 401
async fn handle_unauthorized() -> ApiError {
    ApiError::Unauthorized
}

/// GET /api/v1/forbidden: always 403
async fn handle_forbidden() -> ApiError {
    ApiError::Forbidden
}

async fn handle_not_found() -> ApiError {
    ApiError::NotFound
}
