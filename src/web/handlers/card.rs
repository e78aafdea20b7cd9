//! Card administration endpoints (admin only).

use crate::core::card;
use crate::entities::card as card_entity;
use crate::web::{ApiResult, AppState, unix_now};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use super::CurrentAdmin;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Maximum rows to return; defaults to the standard listing size
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub cards: Vec<card_entity::Model>,
    pub unused: u64,
    pub used: u64,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub package_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub batch_id: String,
    pub cards: Vec<card_entity::Model>,
    /// Cards whose insert failed and were skipped
    pub failed: u32,
}

/// `GET /api/cards`
pub async fn list(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse>> {
    let cards = card::get_recent_cards(&state.db, query.limit).await?;
    let counts = card::count_cards(&state.db).await?;

    Ok(Json(ListResponse {
        cards,
        unused: counts.unused,
        used: counts.used,
    }))
}

/// `POST /api/cards/generate`
pub async fn generate(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let batch = card::generate_batch(&state.db, req.package_id, req.quantity, unix_now()).await?;

    Ok(Json(GenerateResponse {
        batch_id: batch.batch_id,
        cards: batch.created,
        failed: batch.failed,
    }))
}

/// `DELETE /api/cards/:id`
pub async fn remove(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<()>> {
    card::delete_card(&state.db, id).await?;
    Ok(Json(()))
}

/// `GET /api/cards/export` - unused cards as `code,package_name` CSV for
/// printing.
pub async fn export(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let csv = card::export_unused_cards(&state.db).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"cards.csv\"",
            ),
        ],
        csv,
    ))
}
