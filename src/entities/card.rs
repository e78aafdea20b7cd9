//! Card entity - a single-use prepaid redemption code bound to one package.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a card. The only transition is `Unused` to `Used`;
/// a used card never becomes redeemable again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// Card has never been redeemed and can activate a subscription
    #[sea_orm(string_value = "unused")]
    Unused,
    /// Card was consumed by an activation; terminal state
    #[sea_orm(string_value = "used")]
    Used,
}

/// Card database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Globally unique redemption code (`MKT-XXXX-XXXX-XXXX-XXXX`)
    #[sea_orm(unique)]
    pub code: String,
    /// Package this card activates
    pub package_id: i64,
    pub status: CardStatus,
    /// Username of the subscriber that redeemed the card, once used
    pub used_by: Option<String>,
    /// Redemption time, epoch seconds, once used
    pub used_at: Option<i64>,
    /// Grouping tag shared by all cards generated in one bulk operation
    pub batch_id: Option<String>,
    /// Creation time, epoch seconds
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
