//! Database connection and table creation for hotspot-panel.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Table creation uses `SeaORM`'s `Schema::create_table_from_entity` so the
//! database schema always matches the entity definitions without manual SQL.

use crate::entities::{Admin, Card, Package, Session, Subscriber};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/hotspot_panel.sqlite".to_string())
}

/// Establishes a connection to the database using the `DATABASE_URL`
/// environment variable, falling back to a default local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
///
/// Idempotent in practice for fresh databases; existing deployments keep
/// their data since `SQLite` errors on re-creation are surfaced to the
/// caller, which only invokes this during initial setup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let package_table = schema.create_table_from_entity(Package).if_not_exists().take();
    let card_table = schema.create_table_from_entity(Card).if_not_exists().take();
    let subscriber_table = schema
        .create_table_from_entity(Subscriber)
        .if_not_exists()
        .take();
    let admin_table = schema.create_table_from_entity(Admin).if_not_exists().take();
    let session_table = schema.create_table_from_entity(Session).if_not_exists().take();

    db.execute(builder.build(&package_table)).await?;
    db.execute(builder.build(&card_table)).await?;
    db.execute(builder.build(&subscriber_table)).await?;
    db.execute(builder.build(&admin_table)).await?;
    db.execute(builder.build(&session_table)).await?;

    Ok(())
}
