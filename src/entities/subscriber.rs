//! Subscriber entity - an end-user account with a subscription window.
//!
//! The stored `status` is not the whole truth: a subscriber whose
//! `expires_at` has passed is effectively expired even while the row still
//! says active. Effective status is always computed at read time via
//! [`crate::core::subscriber::is_active`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored account state. Combined with `expires_at` to compute the
/// effective status; never trusted on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum SubscriberStatus {
    /// Account enabled; effective while `expires_at` lies in the future
    #[sea_orm(string_value = "active")]
    Active,
    /// Account disabled by an administrator
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Subscriber database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscribers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name; unique across all subscribers
    #[sea_orm(unique)]
    pub username: String,
    /// Hotspot login password, stored as issued
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    /// Currently subscribed package
    pub package_id: i64,
    pub status: SubscriberStatus,
    /// Subscription start, epoch seconds
    pub started_at: i64,
    /// Subscription end, epoch seconds; renewal overwrites this from "now"
    pub expires_at: i64,
    /// Cumulative download counter in bytes
    pub total_download: i64,
    /// Cumulative upload counter in bytes
    pub total_upload: i64,
    /// Row creation time, epoch seconds
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::package::Entity",
        from = "Column::PackageId",
        to = "super::package::Column::Id"
    )]
    Package,
}

impl Related<super::package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
