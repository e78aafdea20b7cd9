//! Package business logic - subscription plan management.
//!
//! Provides functions for creating, retrieving, updating, and soft-deleting
//! packages. Deleting a package only clears its `is_active` flag so that
//! existing cards and subscribers keep a resolvable reference; an inactive
//! package can no longer be sold or activated.

use crate::{
    entities::{Package, package},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields accepted when creating or updating a package.
#[derive(Debug, Clone)]
pub struct PackageInput {
    /// Display name; must not be blank
    pub name: String,
    /// Price in currency units; must not be negative
    pub price: f64,
    /// Subscription length in days; must be positive
    pub duration_days: i64,
    /// Speed limit display string; empty means unlimited
    pub speed_limit: String,
    /// Data limit display string; empty means unlimited
    pub download_limit: String,
}

fn validate_input(input: &PackageInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Package name cannot be empty"));
    }
    if input.price < 0.0 || !input.price.is_finite() {
        return Err(Error::validation(format!(
            "Package price must be zero or positive, got {}",
            input.price
        )));
    }
    if input.duration_days <= 0 {
        return Err(Error::validation(format!(
            "Package duration must be at least one day, got {}",
            input.duration_days
        )));
    }
    Ok(())
}

/// Retrieves all active packages, ordered alphabetically by name.
pub async fn get_active_packages(db: &DatabaseConnection) -> Result<Vec<package::Model>> {
    Package::find()
        .filter(package::Column::IsActive.eq(true))
        .order_by_asc(package::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a package by its id regardless of active flag.
pub async fn get_package_by_id(
    db: &DatabaseConnection,
    package_id: i64,
) -> Result<Option<package::Model>> {
    Package::find_by_id(package_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new package after validating its invariants
/// (`price >= 0`, `duration_days > 0`, non-blank name).
pub async fn create_package(
    db: &DatabaseConnection,
    input: PackageInput,
) -> Result<package::Model> {
    validate_input(&input)?;

    let model = package::ActiveModel {
        name: Set(input.name.trim().to_string()),
        price: Set(input.price),
        duration_days: Set(input.duration_days),
        speed_limit: Set(input.speed_limit.trim().to_string()),
        download_limit: Set(input.download_limit.trim().to_string()),
        is_active: Set(true),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    tracing::info!(package_id = created.id, name = %created.name, "created package");
    Ok(created)
}

/// Updates an existing package in place, applying the same validation as
/// creation. The active flag is untouched; use [`deactivate_package`] for
/// soft deletion.
pub async fn update_package(
    db: &DatabaseConnection,
    package_id: i64,
    input: PackageInput,
) -> Result<package::Model> {
    validate_input(&input)?;

    let existing = get_package_by_id(db, package_id)
        .await?
        .ok_or(Error::PackageNotFound { id: package_id })?;

    let mut model: package::ActiveModel = existing.into();
    model.name = Set(input.name.trim().to_string());
    model.price = Set(input.price);
    model.duration_days = Set(input.duration_days);
    model.speed_limit = Set(input.speed_limit.trim().to_string());
    model.download_limit = Set(input.download_limit.trim().to_string());

    let updated = model.update(db).await?;
    tracing::info!(package_id, "updated package");
    Ok(updated)
}

/// Soft-deletes a package by clearing its active flag. The row is kept so
/// historical cards and subscribers still resolve.
pub async fn deactivate_package(db: &DatabaseConnection, package_id: i64) -> Result<()> {
    let existing = get_package_by_id(db, package_id)
        .await?
        .ok_or(Error::PackageNotFound { id: package_id })?;

    let mut model: package::ActiveModel = existing.into();
    model.is_active = Set(false);
    model.update(db).await?;
    tracing::info!(package_id, "deactivated package");
    Ok(())
}

/// Counts subscribers currently assigned to a package.
pub async fn subscriber_count(db: &DatabaseConnection, package_id: i64) -> Result<u64> {
    use crate::entities::{Subscriber, subscriber};

    Subscriber::find()
        .filter(subscriber::Column::PackageId.eq(package_id))
        .count(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_package_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let blank = PackageInput {
            name: "  ".to_string(),
            ..sample_package_input()
        };
        assert!(matches!(
            create_package(&db, blank).await.unwrap_err(),
            Error::Validation { .. }
        ));

        let negative_price = PackageInput {
            price: -5.0,
            ..sample_package_input()
        };
        assert!(matches!(
            create_package(&db, negative_price).await.unwrap_err(),
            Error::Validation { .. }
        ));

        let zero_duration = PackageInput {
            duration_days: 0,
            ..sample_package_input()
        };
        assert!(matches!(
            create_package(&db, zero_duration).await.unwrap_err(),
            Error::Validation { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_fetch_package() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_package(&db, sample_package_input()).await?;
        assert_eq!(created.name, "Monthly");
        assert_eq!(created.duration_days, 30);
        assert!(created.is_active);

        let fetched = get_package_by_id(&db, created.id).await?.unwrap();
        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_active_list() -> Result<()> {
        let db = setup_test_db().await?;

        let pkg = create_package(&db, sample_package_input()).await?;
        assert_eq!(get_active_packages(&db).await?.len(), 1);

        deactivate_package(&db, pkg.id).await?;
        assert!(get_active_packages(&db).await?.is_empty());

        // Soft delete: the row itself survives
        let still_there = get_package_by_id(&db, pkg.id).await?.unwrap();
        assert!(!still_there.is_active);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_package() -> Result<()> {
        let db = setup_test_db().await?;

        let pkg = create_package(&db, sample_package_input()).await?;
        let updated = update_package(
            &db,
            pkg.id,
            PackageInput {
                name: "Weekly".to_string(),
                price: 10.0,
                duration_days: 7,
                speed_limit: String::new(),
                download_limit: "20 GB".to_string(),
            },
        )
        .await?;

        assert_eq!(updated.name, "Weekly");
        assert_eq!(updated.duration_days, 7);
        assert_eq!(updated.speed_limit, "");

        let missing = update_package(&db, 9999, sample_package_input()).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::PackageNotFound { id: 9999 }
        ));

        Ok(())
    }
}
