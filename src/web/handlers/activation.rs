//! Public card activation endpoints.
//!
//! These are the only unauthenticated routes besides login: an end user who
//! bought a card verifies the code, sees the package, and redeems it with a
//! username of their choice. The generated password appears once in the
//! activation response and is never retrievable again through this flow.

use crate::core;
use crate::web::{ApiResult, AppState, unix_now};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

/// Package details shown to the end user before they commit a username.
#[derive(Debug, Serialize)]
pub struct PackagePreview {
    pub name: String,
    pub price: f64,
    pub duration_days: i64,
    /// Empty string means unlimited
    pub speed_limit: String,
    /// Empty string means unlimited
    pub download_limit: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    /// Normalized code, as it will be redeemed
    pub code: String,
    pub package: PackagePreview,
}

#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    pub code: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ActivateResponse {
    pub username: String,
    /// Present only when a new account was created; shown exactly once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub expires_at: i64,
    pub expires_on: String,
    pub renewed: bool,
}

/// `POST /api/activation/verify`
pub async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<Json<VerifyResponse>> {
    let verified = core::activation::verify_card(&state.db, &req.code).await?;

    Ok(Json(VerifyResponse {
        code: verified.card.code,
        package: PackagePreview {
            name: verified.package.name,
            price: verified.package.price,
            duration_days: verified.package.duration_days,
            speed_limit: verified.package.speed_limit,
            download_limit: verified.package.download_limit,
        },
    }))
}

/// `POST /api/activation/activate`
pub async fn activate(
    State(state): State<AppState>,
    Json(req): Json<ActivateRequest>,
) -> ApiResult<Json<ActivateResponse>> {
    let outcome =
        core::activation::activate_card(&state.db, &req.code, &req.username, unix_now()).await?;

    Ok(Json(ActivateResponse {
        username: outcome.username,
        password: outcome.password,
        expires_at: outcome.expires_at,
        expires_on: outcome.expires_on,
        renewed: outcome.renewed,
    }))
}
