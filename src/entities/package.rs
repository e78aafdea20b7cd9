//! Package entity - a purchasable subscription plan.
//!
//! Each package defines the duration, speed, and data limits a subscriber
//! gets when the package is activated. Packages are soft-deleted by clearing
//! `is_active` so that historical cards and subscribers keep a valid
//! reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Package database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "packages")]
pub struct Model {
    /// Unique identifier for the package
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Monthly 50GB")
    pub name: String,
    /// Price in currency units; never negative
    pub price: f64,
    /// Subscription length in days; always positive
    pub duration_days: i64,
    /// Speed limit display string (e.g., "50 Mbps"); empty means unlimited
    pub speed_limit: String,
    /// Data limit display string (e.g., "100 GB"); empty means unlimited
    pub download_limit: String,
    /// Soft-delete flag; inactive packages are hidden but never removed
    pub is_active: bool,
}

/// Defines relationships between Package and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One package has many prepaid cards
    #[sea_orm(has_many = "super::card::Entity")]
    Cards,
    /// One package has many subscribers
    #[sea_orm(has_many = "super::subscriber::Entity")]
    Subscribers,
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl Related<super::subscriber::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscribers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
