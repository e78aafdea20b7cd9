//! Report endpoints (admin only).

use crate::core::report;
use crate::web::{ApiResult, AppState, unix_now};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use super::CurrentAdmin;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub active_subscribers: u64,
    pub total_subscribers: u64,
    pub cards_unused: u64,
    pub cards_used: u64,
    pub revenue_total: f64,
    pub revenue_this_month: f64,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Number of months in the series, newest last; defaults to 6
    pub months: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyRow {
    pub year: i32,
    pub month: u32,
    pub activations: u64,
    pub revenue: f64,
}

#[derive(Debug, Serialize)]
pub struct PackageShareRow {
    pub package_id: i64,
    pub package_name: String,
    pub used_cards: u64,
}

/// `GET /api/reports/dashboard`
pub async fn dashboard(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
) -> ApiResult<Json<DashboardResponse>> {
    let stats = report::dashboard_stats(&state.db, unix_now()).await?;
    Ok(Json(DashboardResponse {
        active_subscribers: stats.active_subscribers,
        total_subscribers: stats.total_subscribers,
        cards_unused: stats.cards_unused,
        cards_used: stats.cards_used,
        revenue_total: stats.revenue_total,
        revenue_this_month: stats.revenue_this_month,
    }))
}

/// `GET /api/reports/monthly`
pub async fn monthly(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<Json<Vec<MonthlyRow>>> {
    let series =
        report::monthly_series(&state.db, query.months.unwrap_or(6), unix_now()).await?;
    Ok(Json(
        series
            .into_iter()
            .map(|p| MonthlyRow {
                year: p.year,
                month: p.month,
                activations: p.activations,
                revenue: p.revenue,
            })
            .collect(),
    ))
}

/// `GET /api/reports/packages`
pub async fn packages(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PackageShareRow>>> {
    let shares = report::package_distribution(&state.db).await?;
    Ok(Json(
        shares
            .into_iter()
            .map(|s| PackageShareRow {
                package_id: s.package_id,
                package_name: s.package_name,
                used_cards: s.used_cards,
            })
            .collect(),
    ))
}
