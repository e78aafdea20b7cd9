//! Package management endpoints (admin only).

use crate::core::package::{self, PackageInput};
use crate::entities::package as package_entity;
use crate::web::{ApiResult, AppState};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use super::CurrentAdmin;

#[derive(Debug, Deserialize)]
pub struct PackageRequest {
    pub name: String,
    pub price: f64,
    pub duration_days: i64,
    #[serde(default)]
    pub speed_limit: String,
    #[serde(default)]
    pub download_limit: String,
}

impl From<PackageRequest> for PackageInput {
    fn from(req: PackageRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
            duration_days: req.duration_days,
            speed_limit: req.speed_limit,
            download_limit: req.download_limit,
        }
    }
}

/// A package plus its current subscriber count, as shown on the packages
/// page.
#[derive(Debug, Serialize)]
pub struct PackageRow {
    #[serde(flatten)]
    pub package: package_entity::Model,
    pub subscriber_count: u64,
}

/// `GET /api/packages`
pub async fn list(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PackageRow>>> {
    let packages = package::get_active_packages(&state.db).await?;

    let mut rows = Vec::with_capacity(packages.len());
    for pkg in packages {
        let subscriber_count = package::subscriber_count(&state.db, pkg.id).await?;
        rows.push(PackageRow {
            package: pkg,
            subscriber_count,
        });
    }
    Ok(Json(rows))
}

/// `POST /api/packages`
pub async fn create(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Json(req): Json<PackageRequest>,
) -> ApiResult<Json<package_entity::Model>> {
    let created = package::create_package(&state.db, req.into()).await?;
    Ok(Json(created))
}

/// `PUT /api/packages/:id`
pub async fn update(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PackageRequest>,
) -> ApiResult<Json<package_entity::Model>> {
    let updated = package::update_package(&state.db, id, req.into()).await?;
    Ok(Json(updated))
}

/// `DELETE /api/packages/:id` - soft delete; the package disappears from
/// active listings but keeps existing references valid.
pub async fn remove(
    CurrentAdmin(_): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<()>> {
    package::deactivate_package(&state.db, id).await?;
    Ok(Json(()))
}
