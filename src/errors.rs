//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`], and the web layer
//! translates each variant into an HTTP status plus a JSON body. Storage and
//! auth failures are converted at the workflow boundary; nothing panics on a
//! bad request.

use thiserror::Error;

/// Crate-wide error type covering validation, lookup, conflict, and
/// infrastructure failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input, rejected before any storage call.
    #[error("{message}")]
    Validation {
        /// Human-readable description of what was wrong with the input
        message: String,
    },

    /// No card exists with the given code.
    #[error("card `{code}` was not found")]
    CardNotFound {
        /// The (normalized) code that was looked up
        code: String,
    },

    /// The card exists but has already been redeemed.
    #[error("card `{code}` has already been used")]
    CardAlreadyUsed {
        /// The (normalized) code that was looked up
        code: String,
    },

    /// No package exists with the given id.
    #[error("package {id} was not found")]
    PackageNotFound {
        /// Primary key of the missing package
        id: i64,
    },

    /// A card references a package that no longer exists or was deactivated.
    /// This is an inconsistent-state condition; the workflow refuses to
    /// proceed rather than activating against a dangling reference.
    #[error("package {id} referenced by this card is no longer available")]
    PackageUnavailable {
        /// Primary key of the dangling package reference
        id: i64,
    },

    /// No subscriber exists with the given identifier.
    #[error("subscriber `{who}` was not found")]
    SubscriberNotFound {
        /// Username or id of the missing subscriber
        who: String,
    },

    /// A subscriber with this username already exists.
    #[error("username `{username}` is already taken")]
    UsernameTaken {
        /// The conflicting username
        username: String,
    },

    /// Sign-in failed: unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Missing, unknown, or expired session token.
    #[error("authentication required")]
    Unauthorized,

    /// Configuration file or environment problem.
    #[error("configuration error: {message}")]
    Config {
        /// What failed to load or parse
        message: String,
    },

    /// Password hashing or verification machinery failed.
    #[error("credential hashing error: {message}")]
    PasswordHash {
        /// Underlying argon2 error text
        message: String,
    },

    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with a formatted message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether a database error is a unique-constraint violation.
    ///
    /// SQLite reports these as runtime query errors mentioning `UNIQUE`;
    /// callers that insert user-chosen identifiers use this to translate the
    /// failure into a friendly conflict error instead of a generic one.
    #[must_use]
    pub fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
        err.to_string().contains("UNIQUE")
    }
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
