//! Card verification and redemption - the activation workflow.
//!
//! Verification is a read-only preview: the end user types a code, sees the
//! package it would activate, and nothing in storage changes. Redemption
//! consumes the card and creates or renews the subscriber in a single
//! database transaction, so a card can never be burned without the
//! subscription landing, and two racing redemptions of the same card cannot
//! both succeed - the second one re-reads the card inside its transaction
//! and finds it already used.

use crate::{
    core::codegen,
    entities::{Card, CardStatus, Package, Subscriber, SubscriberStatus, card, package, subscriber},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait, prelude::*};

/// Minimum accepted code length, checked before any lookup.
const MIN_CODE_LEN: usize = 5;

/// Seconds per day, the unit of package durations.
const SECS_PER_DAY: i64 = 86_400;

/// A card that passed verification, together with the package it activates.
#[derive(Debug, Clone)]
pub struct VerifiedCard {
    pub card: card::Model,
    pub package: package::Model,
}

/// Result of a successful redemption, carrying everything the end user
/// must be shown exactly once.
#[derive(Debug, Clone)]
pub struct ActivationOutcome {
    /// Username the subscription now belongs to
    pub username: String,
    /// Freshly generated password; `None` when an existing subscriber was
    /// renewed and already holds credentials
    pub password: Option<String>,
    /// New subscription end, epoch seconds
    pub expires_at: i64,
    /// Human-readable expiry date for display
    pub expires_on: String,
    /// Whether an existing subscriber was renewed rather than created
    pub renewed: bool,
}

/// Normalizes a user-entered code: trimmed and uppercased.
/// Rejects anything shorter than [`MIN_CODE_LEN`] before touching storage.
fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() < MIN_CODE_LEN {
        return Err(Error::validation("Please enter the card code"));
    }
    Ok(code.to_uppercase())
}

/// Normalizes a user-entered username: lowercased with everything outside
/// `[a-z0-9_]` stripped, matching what the activation form accepts.
fn normalize_username(username: &str) -> Result<String> {
    let cleaned: String = username
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    if cleaned.is_empty() {
        return Err(Error::validation("Please enter a username"));
    }
    Ok(cleaned)
}

/// Formats an epoch-seconds expiry as a date for display.
#[must_use]
pub fn format_expiry_date(expires_at: i64) -> String {
    chrono::DateTime::from_timestamp(expires_at, 0)
        .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d").to_string())
}

/// Looks up a card by normalized code and resolves it to a redeemable
/// `{card, package}` pair, on any connection or transaction.
async fn fetch_verified<C: ConnectionTrait>(db: &C, code: &str) -> Result<VerifiedCard> {
    let card = Card::find()
        .filter(card::Column::Code.eq(code))
        .one(db)
        .await?
        .ok_or_else(|| Error::CardNotFound {
            code: code.to_string(),
        })?;

    if card.status == CardStatus::Used {
        // Deliberately reveals nothing about the package
        return Err(Error::CardAlreadyUsed {
            code: code.to_string(),
        });
    }

    // A dangling or deactivated package means the store is inconsistent;
    // refuse rather than activating against it.
    let package = Package::find_by_id(card.package_id)
        .one(db)
        .await?
        .filter(|p| p.is_active)
        .ok_or(Error::PackageUnavailable {
            id: card.package_id,
        })?;

    Ok(VerifiedCard { card, package })
}

/// Verifies a card code entered by an end user.
///
/// Read-only and idempotent: calling this any number of times mutates
/// nothing. Returns the card and its package on success.
///
/// # Errors
/// * [`Error::Validation`] - code shorter than 5 characters, no lookup done
/// * [`Error::CardNotFound`] - no card with this code
/// * [`Error::CardAlreadyUsed`] - card was redeemed before
/// * [`Error::PackageUnavailable`] - card references a missing or inactive
///   package
pub async fn verify_card(db: &DatabaseConnection, code: &str) -> Result<VerifiedCard> {
    let code = normalize_code(code)?;
    fetch_verified(db, &code).await
}

/// Redeems a card for a username, creating or renewing the subscription.
///
/// The entire workflow runs in one transaction: the card is re-verified,
/// the subscriber upserted, and the card consumed, then everything commits
/// together. Renewal recomputes the window from `now` - remaining time on a
/// previous subscription is never added on top.
///
/// # Arguments
/// * `code` - card code as typed by the end user
/// * `username` - requested account name; lowercased and stripped to
///   `[a-z0-9_]` before use
/// * `now` - current time, epoch seconds
pub async fn activate_card(
    db: &DatabaseConnection,
    code: &str,
    username: &str,
    now: i64,
) -> Result<ActivationOutcome> {
    let code = normalize_code(code)?;
    let username = normalize_username(username)?;

    let txn = db.begin().await?;

    // Re-check inside the transaction: between the user's verify click and
    // this call the card may have been redeemed by someone else.
    let verified = fetch_verified(&txn, &code).await?;
    let expires_at = now + verified.package.duration_days * SECS_PER_DAY;

    let existing = Subscriber::find()
        .filter(subscriber::Column::Username.eq(username.as_str()))
        .one(&txn)
        .await?;

    let (password, renewed) = match existing {
        Some(sub) => {
            // Renewal: new window from now, same credentials, counters kept.
            let mut model: subscriber::ActiveModel = sub.into();
            model.expires_at = Set(expires_at);
            model.package_id = Set(verified.package.id);
            model.status = Set(SubscriberStatus::Active);
            model.update(&txn).await?;
            (None, true)
        }
        None => {
            let password = codegen::generate_password();
            let model = subscriber::ActiveModel {
                username: Set(username.clone()),
                password: Set(password.clone()),
                full_name: Set(None),
                phone: Set(None),
                package_id: Set(verified.package.id),
                status: Set(SubscriberStatus::Active),
                started_at: Set(now),
                expires_at: Set(expires_at),
                total_download: Set(0),
                total_upload: Set(0),
                created_at: Set(now),
                ..Default::default()
            };
            model.insert(&txn).await?;
            (Some(password), false)
        }
    };

    let mut card_model: card::ActiveModel = verified.card.into();
    card_model.status = Set(CardStatus::Used);
    card_model.used_by = Set(Some(username.clone()));
    card_model.used_at = Set(Some(now));
    card_model.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(code = %code, username = %username, renewed, "card activated");

    Ok(ActivationOutcome {
        username,
        password,
        expires_at,
        expires_on: format_expiry_date(expires_at),
        renewed,
    })
}
