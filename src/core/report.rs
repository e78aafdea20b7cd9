//! Report generation business logic.
//!
//! Derives the dashboard and reports numbers from storage: subscriber and
//! card counts, revenue sums, package distribution, and a month-by-month
//! sales series. Revenue is attributed at redemption time - a card counts
//! toward revenue in the month it was used, valued at its package's price.
//! Nothing here mutates state; every function is a read-time aggregation.

use crate::{
    entities::{Card, CardStatus, Package, Subscriber, SubscriberStatus, card, subscriber},
    errors::Result,
};
use chrono::{DateTime, Datelike};
use sea_orm::{DatabaseConnection, prelude::*};
use std::collections::HashMap;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    /// Subscribers whose effective status is active right now
    pub active_subscribers: u64,
    /// All subscriber rows, active or expired
    pub total_subscribers: u64,
    /// Cards not yet redeemed
    pub cards_unused: u64,
    /// Cards sold (redeemed)
    pub cards_used: u64,
    /// Revenue over all time, currency units
    pub revenue_total: f64,
    /// Revenue since the start of the current calendar month
    pub revenue_this_month: f64,
}

/// One package's share of redeemed cards, for the distribution chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageShare {
    pub package_id: i64,
    pub package_name: String,
    pub used_cards: u64,
}

/// One month of sales history.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    /// Cards redeemed in this month
    pub activations: u64,
    /// Revenue from those redemptions
    pub revenue: f64,
}

/// Epoch seconds of the first instant of the calendar month containing `now`.
fn month_start(now: i64) -> i64 {
    let Some(dt) = DateTime::from_timestamp(now, 0) else {
        return 0;
    };
    let Some(first) = dt.date_naive().with_day(1) else {
        return 0;
    };
    first
        .and_hms_opt(0, 0, 0)
        .map_or(0, |naive| naive.and_utc().timestamp())
}

/// Price of every package by id, including deactivated ones so historical
/// redemptions keep their value.
async fn package_prices(db: &DatabaseConnection) -> Result<HashMap<i64, f64>> {
    let packages = Package::find().all(db).await?;
    Ok(packages.into_iter().map(|p| (p.id, p.price)).collect())
}

/// Computes the dashboard headline numbers.
pub async fn dashboard_stats(db: &DatabaseConnection, now: i64) -> Result<DashboardStats> {
    let total_subscribers = Subscriber::find().count(db).await?;
    let active_subscribers = Subscriber::find()
        .filter(subscriber::Column::Status.eq(SubscriberStatus::Active))
        .filter(subscriber::Column::ExpiresAt.gt(now))
        .count(db)
        .await?;

    let counts = crate::core::card::count_cards(db).await?;

    let prices = package_prices(db).await?;
    let used_cards = Card::find()
        .filter(card::Column::Status.eq(CardStatus::Used))
        .all(db)
        .await?;

    let since = month_start(now);
    let mut revenue_total = 0.0;
    let mut revenue_this_month = 0.0;
    for c in &used_cards {
        let price = prices.get(&c.package_id).copied().unwrap_or(0.0);
        revenue_total += price;
        if c.used_at.is_some_and(|t| t >= since) {
            revenue_this_month += price;
        }
    }

    Ok(DashboardStats {
        active_subscribers,
        total_subscribers,
        cards_unused: counts.unused,
        cards_used: counts.used,
        revenue_total,
        revenue_this_month,
    })
}

/// Computes how redeemed cards are distributed across packages,
/// largest share first. Packages with no redemptions are omitted.
pub async fn package_distribution(db: &DatabaseConnection) -> Result<Vec<PackageShare>> {
    let packages = Package::find().all(db).await?;
    let used_cards = Card::find()
        .filter(card::Column::Status.eq(CardStatus::Used))
        .all(db)
        .await?;

    let mut counts: HashMap<i64, u64> = HashMap::new();
    for c in &used_cards {
        *counts.entry(c.package_id).or_default() += 1;
    }

    let mut shares: Vec<PackageShare> = packages
        .into_iter()
        .filter_map(|p| {
            counts.get(&p.id).map(|&used_cards| PackageShare {
                package_id: p.id,
                package_name: p.name,
                used_cards,
            })
        })
        .collect();
    shares.sort_by(|a, b| b.used_cards.cmp(&a.used_cards));
    Ok(shares)
}

/// Builds a month-by-month series of activations and revenue for the last
/// `months` calendar months, oldest first and ending with the month
/// containing `now`. Months with no sales appear with zeros.
pub async fn monthly_series(
    db: &DatabaseConnection,
    months: u32,
    now: i64,
) -> Result<Vec<MonthlyPoint>> {
    let months = months.max(1);

    let Some(now_dt) = DateTime::from_timestamp(now, 0) else {
        return Ok(Vec::new());
    };
    let (mut year, mut month) = (now_dt.year(), now_dt.month());

    // Walk backwards to collect the window of (year, month) keys
    let mut keys = Vec::with_capacity(months as usize);
    for _ in 0..months {
        keys.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    keys.reverse();

    let prices = package_prices(db).await?;
    let used_cards = Card::find()
        .filter(card::Column::Status.eq(CardStatus::Used))
        .all(db)
        .await?;

    let mut buckets: HashMap<(i32, u32), (u64, f64)> = HashMap::new();
    for c in &used_cards {
        let Some(used_at) = c.used_at else { continue };
        let Some(dt) = DateTime::from_timestamp(used_at, 0) else {
            continue;
        };
        let entry = buckets.entry((dt.year(), dt.month())).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += prices.get(&c.package_id).copied().unwrap_or(0.0);
    }

    Ok(keys
        .into_iter()
        .map(|(year, month)| {
            let (activations, revenue) = buckets.get(&(year, month)).copied().unwrap_or((0, 0.0));
            MonthlyPoint {
                year,
                month,
                activations,
                revenue,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::activation::activate_card;
    use crate::test_utils::*;

    // 2001-09-09T01:46:40Z
    const NOW: i64 = 1_000_000_000;

    #[test]
    fn test_month_start() {
        // NOW is Sep 9th 2001; the month starts Sep 1st 00:00:00 UTC
        let start = month_start(NOW);
        let dt = DateTime::from_timestamp(start, 0).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2001, 9, 1));
        assert_eq!(dt.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[tokio::test]
    async fn test_dashboard_stats_counts_and_revenue() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package_priced(&db, "Monthly", 30, 25.0).await?;

        let a = create_test_card(&db, "MKT-AAAA-AAAA-AAAA-AAAA", pkg.id).await?;
        let b = create_test_card(&db, "MKT-BBBB-BBBB-BBBB-BBBB", pkg.id).await?;
        create_test_card(&db, "MKT-CCCC-CCCC-CCCC-CCCC", pkg.id).await?;

        // One redemption this month, one far in the past month
        activate_card(&db, &a.code, "fresh", NOW).await?;
        activate_card(&db, &b.code, "old", NOW - 40 * 86_400).await?;

        let stats = dashboard_stats(&db, NOW).await?;
        assert_eq!(stats.total_subscribers, 2);
        // "old" was activated 40 days ago on a 30-day package: expired
        assert_eq!(stats.active_subscribers, 1);
        assert_eq!(stats.cards_used, 2);
        assert_eq!(stats.cards_unused, 1);
        assert_eq!(stats.revenue_total, 50.0);
        assert_eq!(stats.revenue_this_month, 25.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_package_distribution_orders_by_share() -> Result<()> {
        let db = setup_test_db().await?;
        let daily = create_test_package_priced(&db, "Daily", 1, 2.0).await?;
        let monthly = create_test_package_priced(&db, "Monthly", 30, 25.0).await?;

        for (i, pkg_id) in [daily.id, daily.id, monthly.id].iter().enumerate() {
            let card =
                create_test_card(&db, &format!("MKT-AAAA-BBBB-CCCC-{i:04}"), *pkg_id).await?;
            activate_card(&db, &card.code, &format!("user{i}"), NOW).await?;
        }

        let shares = package_distribution(&db).await?;
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].package_name, "Daily");
        assert_eq!(shares[0].used_cards, 2);
        assert_eq!(shares[1].used_cards, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_series_window() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package_priced(&db, "Monthly", 30, 10.0).await?;

        let recent = create_test_card(&db, "MKT-AAAA-AAAA-AAAA-AAAA", pkg.id).await?;
        let older = create_test_card(&db, "MKT-BBBB-BBBB-BBBB-BBBB", pkg.id).await?;
        activate_card(&db, &recent.code, "recent", NOW).await?;
        // ~2 months earlier lands in a different bucket
        activate_card(&db, &older.code, "older", NOW - 65 * 86_400).await?;

        let series = monthly_series(&db, 6, NOW).await?;
        assert_eq!(series.len(), 6);
        // Ends with the current month
        let last = series.last().unwrap();
        assert_eq!((last.year, last.month), (2001, 9));
        assert_eq!(last.activations, 1);
        assert_eq!(last.revenue, 10.0);

        let total_activations: u64 = series.iter().map(|p| p.activations).sum();
        assert_eq!(total_activations, 2);
        // Months without sales are present as zeros
        assert!(series.iter().any(|p| p.activations == 0));

        Ok(())
    }
}
