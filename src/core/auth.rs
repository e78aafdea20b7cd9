//! Admin authentication - sign-in, sign-out, and session lookup.
//!
//! Admin passwords are stored as argon2 hashes. A successful sign-in issues
//! an opaque session token (uuid v4) persisted with an expiry; the token is
//! presented as a bearer credential on every admin request and deleted on
//! sign-out. Expired sessions are treated as absent.

use crate::{
    entities::{Admin, Session, admin, session},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{Set, prelude::*};

/// Hashes a password for storage.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

/// Verifies a password against a stored hash. A mismatch is reported as
/// [`Error::InvalidCredentials`]; a malformed hash as a hashing error.
fn verify_password(hash: &str, password: &str) -> Result<()> {
    let parsed = PasswordHash::new(hash).map_err(|e| Error::PasswordHash {
        message: e.to_string(),
    })?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| Error::InvalidCredentials)
}

/// Creates an admin account.
pub async fn create_admin(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    now: i64,
) -> Result<admin::Model> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(Error::validation("Admin email cannot be empty"));
    }
    if password.is_empty() {
        return Err(Error::validation("Admin password cannot be empty"));
    }

    let model = admin::ActiveModel {
        email: Set(email.clone()),
        password_hash: Set(hash_password(password)?),
        created_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await.map_err(|e| {
        if Error::is_unique_violation(&e) {
            Error::validation(format!("An admin with email `{email}` already exists"))
        } else {
            e.into()
        }
    })?;

    tracing::info!(admin_id = created.id, email = %created.email, "created admin");
    Ok(created)
}

/// Seeds the bootstrap admin account on startup when none with the given
/// email exists yet. Does nothing on later starts.
pub async fn ensure_bootstrap_admin(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    now: i64,
) -> Result<()> {
    let email = email.trim().to_lowercase();
    let existing = Admin::find()
        .filter(admin::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;

    if existing.is_none() {
        create_admin(db, &email, password, now).await?;
        tracing::info!(email = %email, "seeded bootstrap admin");
    }
    Ok(())
}

/// Signs an admin in, returning the account and a fresh session.
///
/// Unknown emails and wrong passwords are indistinguishable to the caller:
/// both yield [`Error::InvalidCredentials`].
pub async fn sign_in(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    session_ttl_secs: i64,
    now: i64,
) -> Result<(admin::Model, session::Model)> {
    let email = email.trim().to_lowercase();
    let admin = Admin::find()
        .filter(admin::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
        .ok_or(Error::InvalidCredentials)?;

    verify_password(&admin.password_hash, password)?;

    let token = uuid::Uuid::new_v4().to_string();
    let model = session::ActiveModel {
        token: Set(token),
        admin_id: Set(admin.id),
        created_at: Set(now),
        expires_at: Set(now + session_ttl_secs),
        ..Default::default()
    };
    let session = model.insert(db).await?;

    tracing::info!(admin_id = admin.id, "admin signed in");
    Ok((admin, session))
}

/// Signs out by deleting the session. Unknown tokens are a no-op; sign-out
/// never fails because the session is already gone.
pub async fn sign_out(db: &DatabaseConnection, token: &str) -> Result<()> {
    Session::delete_many()
        .filter(session::Column::Token.eq(token))
        .exec(db)
        .await?;
    Ok(())
}

/// Resolves a bearer token to its admin account.
///
/// Expired sessions are deleted on sight and reported as
/// [`Error::Unauthorized`], same as tokens that never existed.
pub async fn authenticate(
    db: &DatabaseConnection,
    token: &str,
    now: i64,
) -> Result<admin::Model> {
    let session = Session::find()
        .filter(session::Column::Token.eq(token))
        .one(db)
        .await?
        .ok_or(Error::Unauthorized)?;

    if session.expires_at <= now {
        Session::delete_by_id(session.id).exec(db).await?;
        return Err(Error::Unauthorized);
    }

    Admin::find_by_id(session.admin_id)
        .one(db)
        .await?
        .ok_or(Error::Unauthorized)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const NOW: i64 = 1_000_000_000;
    const TTL: i64 = 24 * 3600;

    #[tokio::test]
    async fn test_sign_in_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        create_admin(&db, "Admin@Example.com", "hunter22", NOW).await?;

        let (admin, session) = sign_in(&db, "admin@example.com", "hunter22", TTL, NOW).await?;
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(session.expires_at, NOW + TTL);

        let me = authenticate(&db, &session.token, NOW + 10).await?;
        assert_eq!(me.id, admin.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() -> Result<()> {
        let db = setup_test_db().await?;
        create_admin(&db, "admin@example.com", "hunter22", NOW).await?;

        let err = sign_in(&db, "admin@example.com", "nope", TTL, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));

        let err = sign_in(&db, "ghost@example.com", "hunter22", TTL, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));

        Ok(())
    }

    #[tokio::test]
    async fn test_session_expiry_and_sign_out() -> Result<()> {
        let db = setup_test_db().await?;
        create_admin(&db, "admin@example.com", "hunter22", NOW).await?;
        let (_, session) = sign_in(&db, "admin@example.com", "hunter22", TTL, NOW).await?;

        // Valid until the very last second
        assert!(authenticate(&db, &session.token, NOW + TTL - 1).await.is_ok());
        let err = authenticate(&db, &session.token, NOW + TTL).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));

        // Expired session was cleaned up; token now behaves as unknown
        let err = authenticate(&db, &session.token, NOW).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));

        let (_, session) = sign_in(&db, "admin@example.com", "hunter22", TTL, NOW).await?;
        sign_out(&db, &session.token).await?;
        let err = authenticate(&db, &session.token, NOW + 1).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));

        // Signing out twice is fine
        sign_out(&db, &session.token).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        ensure_bootstrap_admin(&db, "root@example.com", "initial1", NOW).await?;
        ensure_bootstrap_admin(&db, "root@example.com", "changed2", NOW + 5).await?;

        // The second call must not overwrite the original password
        assert!(sign_in(&db, "root@example.com", "initial1", TTL, NOW).await.is_ok());
        let err = sign_in(&db, "root@example.com", "changed2", TTL, NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));

        Ok(())
    }
}
