//! Shared test utilities for hotspot-panel.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::package::{PackageInput, create_package},
    entities::{CardStatus, SubscriberStatus, card, package, subscriber},
    errors::Result,
};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A valid package input for tests that only care about one field.
#[must_use]
pub fn sample_package_input() -> PackageInput {
    PackageInput {
        name: "Monthly".to_string(),
        price: 25.0,
        duration_days: 30,
        speed_limit: "50 Mbps".to_string(),
        download_limit: String::new(),
    }
}

/// Creates an active test package with the given name and duration.
pub async fn create_test_package(
    db: &DatabaseConnection,
    name: &str,
    duration_days: i64,
) -> Result<package::Model> {
    create_package(
        db,
        PackageInput {
            name: name.to_string(),
            duration_days,
            ..sample_package_input()
        },
    )
    .await
}

/// Creates an active test package with an explicit price, for revenue tests.
pub async fn create_test_package_priced(
    db: &DatabaseConnection,
    name: &str,
    duration_days: i64,
    price: f64,
) -> Result<package::Model> {
    create_package(
        db,
        PackageInput {
            name: name.to_string(),
            duration_days,
            price,
            ..sample_package_input()
        },
    )
    .await
}

/// Inserts an unused card with a fixed code, bypassing batch generation.
pub async fn create_test_card(
    db: &DatabaseConnection,
    code: &str,
    package_id: i64,
) -> Result<card::Model> {
    let model = card::ActiveModel {
        code: Set(code.to_string()),
        package_id: Set(package_id),
        status: Set(CardStatus::Unused),
        used_by: Set(None),
        used_at: Set(None),
        batch_id: Set(None),
        created_at: Set(0),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Inserts a subscriber with plain defaults, for tests that need a row
/// without going through the admin-creation validation.
pub async fn create_test_subscriber(
    db: &DatabaseConnection,
    username: &str,
    package_id: i64,
    now: i64,
) -> Result<subscriber::Model> {
    let model = subscriber::ActiveModel {
        username: Set(username.to_string()),
        password: Set("testpass".to_string()),
        full_name: Set(None),
        phone: Set(None),
        package_id: Set(package_id),
        status: Set(SubscriberStatus::Active),
        started_at: Set(now),
        expires_at: Set(now + 30 * 86_400),
        total_download: Set(0),
        total_upload: Set(0),
        created_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// An in-memory subscriber model for pure predicate tests; never persisted.
#[must_use]
pub fn sample_subscriber_model() -> subscriber::Model {
    subscriber::Model {
        id: 1,
        username: "sample".to_string(),
        password: "testpass".to_string(),
        full_name: None,
        phone: None,
        package_id: 1,
        status: SubscriberStatus::Active,
        started_at: 0,
        expires_at: 0,
        total_download: 0,
        total_upload: 0,
        created_at: 0,
    }
}
