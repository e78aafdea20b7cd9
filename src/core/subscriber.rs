//! Subscriber business logic - account management and effective status.
//!
//! Subscribers come into existence two ways: directly, created by an
//! administrator with explicit credentials, or indirectly through card
//! activation (see [`crate::core::activation`]). The stored status column is
//! never trusted alone; [`is_active`] combines it with the expiry timestamp
//! at read time so there is no cached state to drift.

use crate::{
    entities::{Subscriber, SubscriberStatus, subscriber},
    errors::{Error, Result},
};
use sea_orm::{Condition, QueryOrder, Set, prelude::*};

/// Fields accepted when an administrator creates a subscriber directly.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    /// Package the subscription starts on
    pub package_id: i64,
}

/// Computed effective status: active storage flag and an expiry still in
/// the future. This predicate is the single source of truth; the stored
/// column alone is not.
#[must_use]
pub fn is_active(sub: &subscriber::Model, now: i64) -> bool {
    sub.status == SubscriberStatus::Active && sub.expires_at > now
}

/// Formats a byte counter for display: `1.5 GB`, `12.0 MB`, `3.2 KB`,
/// or `0 B` for an empty counter.
#[must_use]
pub fn format_bytes(bytes: i64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    if bytes <= 0 {
        return "0 B".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let b = bytes as f64;
    if b >= GB {
        format!("{:.1} GB", b / GB)
    } else if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Retrieves all subscribers, newest first.
pub async fn get_all_subscribers(db: &DatabaseConnection) -> Result<Vec<subscriber::Model>> {
    Subscriber::find()
        .order_by_desc(subscriber::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Searches subscribers by username, full name, or phone substring,
/// newest first. An empty query returns everything.
pub async fn search_subscribers(
    db: &DatabaseConnection,
    query: &str,
) -> Result<Vec<subscriber::Model>> {
    let query = query.trim();
    if query.is_empty() {
        return get_all_subscribers(db).await;
    }

    Subscriber::find()
        .filter(
            Condition::any()
                .add(subscriber::Column::Username.contains(query))
                .add(subscriber::Column::FullName.contains(query))
                .add(subscriber::Column::Phone.contains(query)),
        )
        .order_by_desc(subscriber::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a subscriber by exact username.
pub async fn get_subscriber_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<subscriber::Model>> {
    Subscriber::find()
        .filter(subscriber::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a subscriber directly, bypassing the card workflow.
///
/// The subscription window starts at `now` and runs for the chosen
/// package's duration. A duplicate username is reported as
/// [`Error::UsernameTaken`] rather than a raw constraint failure.
pub async fn create_subscriber(
    db: &DatabaseConnection,
    input: NewSubscriber,
    now: i64,
) -> Result<subscriber::Model> {
    if input.username.trim().is_empty() {
        return Err(Error::validation("Username cannot be empty"));
    }
    if input.password.is_empty() {
        return Err(Error::validation("Password cannot be empty"));
    }

    let package = crate::core::package::get_package_by_id(db, input.package_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or(Error::PackageNotFound {
            id: input.package_id,
        })?;

    let expires_at = now + package.duration_days * 86_400;
    let username = input.username.trim().to_string();

    let model = subscriber::ActiveModel {
        username: Set(username.clone()),
        password: Set(input.password),
        full_name: Set(input.full_name.filter(|s| !s.is_empty())),
        phone: Set(input.phone.filter(|s| !s.is_empty())),
        package_id: Set(package.id),
        status: Set(SubscriberStatus::Active),
        started_at: Set(now),
        expires_at: Set(expires_at),
        total_download: Set(0),
        total_upload: Set(0),
        created_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await.map_err(|e| {
        if Error::is_unique_violation(&e) {
            Error::UsernameTaken { username }
        } else {
            e.into()
        }
    })?;

    tracing::info!(subscriber_id = created.id, username = %created.username, "created subscriber");
    Ok(created)
}

/// Permanently deletes a subscriber.
pub async fn delete_subscriber(db: &DatabaseConnection, subscriber_id: i64) -> Result<()> {
    let result = Subscriber::delete_by_id(subscriber_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::SubscriberNotFound {
            who: subscriber_id.to_string(),
        });
    }
    tracing::info!(subscriber_id, "deleted subscriber");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const NOW: i64 = 1_000_000_000;

    #[test]
    fn test_is_active_predicate() {
        let mut sub = sample_subscriber_model();
        sub.status = SubscriberStatus::Active;
        sub.expires_at = NOW + 1;
        assert!(is_active(&sub, NOW));

        // Expired while storage still says active
        sub.expires_at = NOW;
        assert!(!is_active(&sub, NOW));

        // Disabled while the window is still open
        sub.status = SubscriberStatus::Inactive;
        sub.expires_at = NOW + 10_000;
        assert!(!is_active(&sub, NOW));
    }

    #[test]
    fn test_format_bytes_boundaries() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1_536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[tokio::test]
    async fn test_create_subscriber_sets_window_from_package() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package(&db, "Monthly", 30).await?;

        let sub = create_subscriber(
            &db,
            NewSubscriber {
                username: "newuser".to_string(),
                password: "secret12".to_string(),
                full_name: Some("Ahmad".to_string()),
                phone: None,
                package_id: pkg.id,
            },
            NOW,
        )
        .await?;

        assert_eq!(sub.started_at, NOW);
        assert_eq!(sub.expires_at, NOW + 30 * 86_400);
        assert_eq!(sub.total_download, 0);
        assert!(is_active(&sub, NOW));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package(&db, "Monthly", 30).await?;

        let input = NewSubscriber {
            username: "dupuser".to_string(),
            password: "secret12".to_string(),
            full_name: None,
            phone: None,
            package_id: pkg.id,
        };
        create_subscriber(&db, input.clone(), NOW).await?;

        let err = create_subscriber(&db, input, NOW).await.unwrap_err();
        assert!(matches!(err, Error::UsernameTaken { username } if username == "dupuser"));

        Ok(())
    }

    #[tokio::test]
    async fn test_search_matches_name_and_phone() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package(&db, "Monthly", 30).await?;

        create_subscriber(
            &db,
            NewSubscriber {
                username: "user_one".to_string(),
                password: "pw".to_string(),
                full_name: Some("Alice Example".to_string()),
                phone: Some("0770000001".to_string()),
                package_id: pkg.id,
            },
            NOW,
        )
        .await?;
        create_subscriber(
            &db,
            NewSubscriber {
                username: "user_two".to_string(),
                password: "pw".to_string(),
                full_name: Some("Bob Example".to_string()),
                phone: Some("0770000002".to_string()),
                package_id: pkg.id,
            },
            NOW,
        )
        .await?;

        assert_eq!(search_subscribers(&db, "Alice").await?.len(), 1);
        assert_eq!(search_subscribers(&db, "0770000002").await?.len(), 1);
        assert_eq!(search_subscribers(&db, "user_").await?.len(), 2);
        assert_eq!(search_subscribers(&db, "").await?.len(), 2);
        assert!(search_subscribers(&db, "nobody").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_subscriber() -> Result<()> {
        let db = setup_test_db().await?;
        let pkg = create_test_package(&db, "Monthly", 30).await?;
        let sub = create_test_subscriber(&db, "gone", pkg.id, NOW).await?;

        delete_subscriber(&db, sub.id).await?;
        assert!(get_subscriber_by_username(&db, "gone").await?.is_none());

        let err = delete_subscriber(&db, sub.id).await.unwrap_err();
        assert!(matches!(err, Error::SubscriberNotFound { .. }));

        Ok(())
    }
}
