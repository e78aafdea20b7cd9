//! Card business logic - bulk generation and administration.
//!
//! Cards are created in batches of 1 to 100 for a single active package.
//! Codes are generated independently with no dedup pre-check; at ~82.7 bits
//! of entropy a collision against the unique constraint is vanishingly rare,
//! and when it does happen only that one insert is lost. Batches are never
//! rolled back on partial failure; the result reports what actually landed.

use crate::{
    core::codegen,
    entities::{Card, CardStatus, card},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use std::collections::HashMap;

/// Smallest batch an administrator may request.
pub const MIN_BATCH_SIZE: u32 = 1;
/// Largest batch an administrator may request.
pub const MAX_BATCH_SIZE: u32 = 100;

/// Default number of cards shown in the admin listing.
pub const RECENT_CARDS_LIMIT: u64 = 100;

/// Outcome of a bulk generation call.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Tag shared by every card created in this call
    pub batch_id: String,
    /// Cards that were actually persisted
    pub created: Vec<card::Model>,
    /// Number of requested cards whose insert failed (e.g., a code
    /// collision); these are simply absent from the batch
    pub failed: u32,
}

/// Per-status card counts for the admin listing header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardCounts {
    pub unused: u64,
    pub used: u64,
}

/// Creates a batch of unused cards for one package.
///
/// # Arguments
/// * `package_id` - Package every card in the batch will activate
/// * `quantity` - Number of cards, `1..=100`; rejected before any storage
///   call when out of range
/// * `now` - Current time, epoch seconds; used for the batch tag and the
///   cards' creation timestamps
pub async fn generate_batch(
    db: &DatabaseConnection,
    package_id: i64,
    quantity: u32,
    now: i64,
) -> Result<BatchResult> {
    if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&quantity) {
        return Err(Error::validation(format!(
            "Card quantity must be between {MIN_BATCH_SIZE} and {MAX_BATCH_SIZE}, got {quantity}"
        )));
    }

    let package = crate::core::package::get_package_by_id(db, package_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or(Error::PackageNotFound { id: package_id })?;

    let batch_id = format!("BATCH-{now}");
    let mut created = Vec::with_capacity(quantity as usize);
    let mut failed = 0u32;

    for _ in 0..quantity {
        let code = codegen::generate_card_code();
        let model = card::ActiveModel {
            code: Set(code.clone()),
            package_id: Set(package.id),
            status: Set(CardStatus::Unused),
            used_by: Set(None),
            used_at: Set(None),
            batch_id: Set(Some(batch_id.clone())),
            created_at: Set(now),
            ..Default::default()
        };

        // Partial-failure policy: a lost insert does not abort the batch.
        match model.insert(db).await {
            Ok(card) => created.push(card),
            Err(e) => {
                failed += 1;
                tracing::warn!(code = %code, error = %e, "card insert failed, skipping");
            }
        }
    }

    tracing::info!(
        batch_id = %batch_id,
        created = created.len(),
        failed,
        package_id = package.id,
        "generated card batch"
    );

    Ok(BatchResult {
        batch_id,
        created,
        failed,
    })
}

/// Retrieves the most recently created cards, newest first.
pub async fn get_recent_cards(
    db: &DatabaseConnection,
    limit: Option<u64>,
) -> Result<Vec<card::Model>> {
    Card::find()
        .order_by_desc(card::Column::CreatedAt)
        .order_by_desc(card::Column::Id)
        .limit(limit.unwrap_or(RECENT_CARDS_LIMIT))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts cards by status.
pub async fn count_cards(db: &DatabaseConnection) -> Result<CardCounts> {
    let unused = Card::find()
        .filter(card::Column::Status.eq(CardStatus::Unused))
        .count(db)
        .await?;
    let used = Card::find()
        .filter(card::Column::Status.eq(CardStatus::Used))
        .count(db)
        .await?;
    Ok(CardCounts { unused, used })
}

/// Permanently deletes a card.
pub async fn delete_card(db: &DatabaseConnection, card_id: i64) -> Result<()> {
    let result = Card::delete_by_id(card_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::CardNotFound {
            code: card_id.to_string(),
        });
    }
    tracing::info!(card_id, "deleted card");
    Ok(())
}

/// Exports all unused cards as CSV lines of `code,package_name`, for
/// printing and distribution to resellers.
pub async fn export_unused_cards(db: &DatabaseConnection) -> Result<String> {
    let packages = crate::core::package::get_active_packages(db).await?;
    let names: HashMap<i64, &str> = packages
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();

    let cards = Card::find()
        .filter(card::Column::Status.eq(CardStatus::Unused))
        .order_by_asc(card::Column::Id)
        .all(db)
        .await?;

    let mut out = String::with_capacity(cards.len() * 32);
    for card in &cards {
        let package_name = names.get(&card.package_id).copied().unwrap_or("-");
        out.push_str(&card.code);
        out.push(',');
        out.push_str(package_name);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const NOW: i64 = 1_000_000_000;

    #[tokio::test]
    async fn test_batch_quantity_bounds() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package(&db, "Monthly", 30).await?;

        for bad in [0u32, 101] {
            let err = generate_batch(&db, pkg.id, bad, NOW).await.unwrap_err();
            assert!(matches!(err, Error::Validation { .. }));
        }
        // Nothing was persisted by the rejected calls
        assert_eq!(count_cards(&db).await?.unused, 0);

        let one = generate_batch(&db, pkg.id, 1, NOW).await?;
        assert_eq!(one.created.len(), 1);
        assert_eq!(one.failed, 0);

        let hundred = generate_batch(&db, pkg.id, 100, NOW + 1).await?;
        assert_eq!(hundred.created.len(), 100);
        assert!(
            hundred
                .created
                .iter()
                .all(|c| c.batch_id.as_deref() == Some(hundred.batch_id.as_str()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_batch_requires_active_package() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package(&db, "Monthly", 30).await?;
        crate::core::package::deactivate_package(&db, pkg.id).await?;

        let err = generate_batch(&db, pkg.id, 5, NOW).await.unwrap_err();
        assert!(matches!(err, Error::PackageNotFound { .. }));

        let err = generate_batch(&db, 424_242, 5, NOW).await.unwrap_err();
        assert!(matches!(err, Error::PackageNotFound { id: 424_242 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_cards_start_unused_with_shared_batch_id() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package(&db, "Monthly", 30).await?;

        let batch = generate_batch(&db, pkg.id, 10, NOW).await?;
        assert_eq!(batch.batch_id, format!("BATCH-{NOW}"));
        for card in &batch.created {
            assert_eq!(card.status, CardStatus::Unused);
            assert_eq!(card.used_by, None);
            assert_eq!(card.used_at, None);
            assert_eq!(card.package_id, pkg.id);
        }

        let counts = count_cards(&db).await?;
        assert_eq!(counts.unused, 10);
        assert_eq!(counts.used, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_card() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package(&db, "Monthly", 30).await?;
        let batch = generate_batch(&db, pkg.id, 1, NOW).await?;

        delete_card(&db, batch.created[0].id).await?;
        assert_eq!(count_cards(&db).await?.unused, 0);

        let err = delete_card(&db, batch.created[0].id).await.unwrap_err();
        assert!(matches!(err, Error::CardNotFound { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_export_lists_only_unused() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package(&db, "Monthly", 30).await?;
        let batch = generate_batch(&db, pkg.id, 3, NOW).await?;

        // Consume one card so it must disappear from the export
        crate::core::activation::activate_card(&db, &batch.created[0].code, "someone", NOW)
            .await?;

        let csv = export_unused_cards(&db).await?;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let (code, name) = line.split_once(',').unwrap();
            assert!(code.starts_with("MKT-"));
            assert_eq!(name, "Monthly");
            assert_ne!(code, batch.created[0].code);
        }

        Ok(())
    }
}
