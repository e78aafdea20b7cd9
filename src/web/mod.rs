//! Web layer - HTTP interface and request handlers.
//!
//! This module provides the axum-based HTTP surface for the application:
//! the public activation endpoints, the admin sign-in flow, and the
//! authenticated dashboard API. Handlers stay thin - they parse the
//! request, call into [`crate::core`], and translate the result into JSON.

/// Request handlers grouped by domain
pub mod handlers;

use crate::config::settings::Settings;
use crate::errors::{Error, Result};
use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub db: DatabaseConnection,
    /// Application settings loaded at startup
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Creates a new `AppState` with the given connection and settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: Arc<Settings>) -> Self {
        Self { db, settings }
    }
}

/// Current wall-clock time as epoch seconds, the time base every workflow
/// uses.
#[must_use]
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Error wrapper that renders crate errors as HTTP responses.
///
/// Every variant maps to a status code and a JSON `{"error": "..."}` body;
/// no error escapes as a crash or an empty 500.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::CardNotFound { .. }
            | Error::PackageNotFound { .. }
            | Error::SubscriberNotFound { .. } => StatusCode::NOT_FOUND,
            Error::CardAlreadyUsed { .. }
            | Error::UsernameTaken { .. }
            | Error::PackageUnavailable { .. } => StatusCode::CONFLICT,
            Error::Config { .. } | Error::PasswordHash { .. } | Error::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "request rejected");
        }

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Convenience result type for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Builds the application router with all routes and middleware.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public activation flow
        .route("/api/activation/verify", post(handlers::activation::verify))
        .route("/api/activation/activate", post(handlers::activation::activate))
        // Admin auth
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        // Packages
        .route("/api/packages", get(handlers::package::list).post(handlers::package::create))
        .route(
            "/api/packages/:id",
            put(handlers::package::update).delete(handlers::package::remove),
        )
        // Cards
        .route("/api/cards", get(handlers::card::list))
        .route("/api/cards/generate", post(handlers::card::generate))
        .route("/api/cards/export", get(handlers::card::export))
        .route("/api/cards/:id", delete(handlers::card::remove))
        // Subscribers
        .route(
            "/api/subscribers",
            get(handlers::subscriber::list).post(handlers::subscriber::create),
        )
        .route("/api/subscribers/suggest", get(handlers::subscriber::suggest))
        .route("/api/subscribers/:id", delete(handlers::subscriber::remove))
        // Reports
        .route("/api/reports/dashboard", get(handlers::report::dashboard))
        .route("/api/reports/monthly", get(handlers::report::monthly))
        .route("/api/reports/packages", get(handlers::report::packages))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves the API until the process exits.
pub async fn serve(state: AppState) -> Result<()> {
    let bind_addr = state.settings.server.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| Error::Config {
            message: format!("Failed to bind {bind_addr}: {e}"),
        })?;

    tracing::info!("listening on {bind_addr}");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::Config {
            message: format!("Server error: {e}"),
        })
}

/// Extracts the bearer token from an Authorization header value.
pub(crate) fn bearer_token(headers: &axum::http::HeaderMap) -> Result<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(Error::Unauthorized)
}
