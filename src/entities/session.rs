//! Session entity - an opaque bearer token for a signed-in admin.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Session database model. A session is valid until `expires_at`; signing
/// out deletes the row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Opaque bearer token handed to the client
    #[sea_orm(unique)]
    pub token: String,
    /// Admin this session belongs to
    pub admin_id: i64,
    /// Creation time, epoch seconds
    pub created_at: i64,
    /// Expiry time, epoch seconds
    pub expires_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::admin::Entity",
        from = "Column::AdminId",
        to = "super::admin::Column::Id"
    )]
    Admin,
}

impl Related<super::admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
