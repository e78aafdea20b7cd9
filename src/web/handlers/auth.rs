//! Admin authentication endpoints.

use crate::core;
use crate::web::{ApiResult, AppState, bearer_token, unix_now};
use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use super::CurrentAdmin;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    pub email: String,
    /// Session expiry, epoch seconds
    pub expires_at: i64,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (admin, session) = core::auth::sign_in(
        &state.db,
        &req.email,
        &req.password,
        state.settings.session_ttl_secs(),
        unix_now(),
    )
    .await?;

    Ok(Json(LoginResponse {
        token: session.token,
        email: admin.email,
        expires_at: session.expires_at,
    }))
}

/// `POST /api/auth/logout`
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<()>> {
    let token = bearer_token(&headers)?;
    core::auth::sign_out(&state.db, token).await?;
    Ok(Json(()))
}

/// `GET /api/auth/me`
pub async fn me(CurrentAdmin(admin): CurrentAdmin) -> Json<MeResponse> {
    Json(MeResponse { email: admin.email })
}
