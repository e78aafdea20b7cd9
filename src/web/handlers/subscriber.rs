//! Subscriber management endpoints (admin only).

use crate::core::codegen;
use crate::core::subscriber::{self, NewSubscriber};
use crate::entities::subscriber as subscriber_entity;
use crate::web::{ApiResult, AppState, unix_now};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use super::CurrentAdmin;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Substring matched against username, full name, and phone
    #[serde(default)]
    pub q: String,
}

/// A subscriber row decorated with the derived fields the dashboard shows.
#[derive(Debug, Serialize)]
pub struct SubscriberRow {
    #[serde(flatten)]
    pub subscriber: subscriber_entity::Model,
    /// Effective status, computed from stored status and expiry
    pub active: bool,
    /// Formatted cumulative download, e.g. "1.5 GB"
    pub download_display: String,
    /// Formatted cumulative upload
    pub upload_display: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub package_id: i64,
}

/// Fresh credential suggestions for the add-subscriber form.
#[derive(Debug, Serialize)]
pub struct CredentialSuggestion {
    pub username: String,
    pub password: String,
}

/// `GET /api/subscribers/suggest` - generates a `user_xxxxxx` username and
/// an 8-character password as suggestions. Uniqueness is only settled when
/// the subscriber is actually inserted.
pub async fn suggest(CurrentAdmin(_): CurrentAdmin) -> Json<CredentialSuggestion> {
    Json(CredentialSuggestion {
        username: codegen::generate_username(),
        password: codegen::generate_password(),
    })
}

/// `GET /api/subscribers`
pub async fn list(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<SubscriberRow>>> {
    let now = unix_now();
    let subscribers = subscriber::search_subscribers(&state.db, &query.q).await?;

    let rows = subscribers
        .into_iter()
        .map(|sub| SubscriberRow {
            active: subscriber::is_active(&sub, now),
            download_display: subscriber::format_bytes(sub.total_download),
            upload_display: subscriber::format_bytes(sub.total_upload),
            subscriber: sub,
        })
        .collect();
    Ok(Json(rows))
}

/// `POST /api/subscribers` - direct creation by an administrator,
/// bypassing the card workflow.
pub async fn create(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> ApiResult<Json<subscriber_entity::Model>> {
    let created = subscriber::create_subscriber(
        &state.db,
        NewSubscriber {
            username: req.username,
            password: req.password,
            full_name: req.full_name,
            phone: req.phone,
            package_id: req.package_id,
        },
        unix_now(),
    )
    .await?;
    Ok(Json(created))
}

/// `DELETE /api/subscribers/:id`
pub async fn remove(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<()>> {
    subscriber::delete_subscriber(&state.db, id).await?;
    Ok(Json(()))
}
