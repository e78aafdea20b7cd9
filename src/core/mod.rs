//! Core business logic - framework-agnostic workflows over the database.
//!
//! Everything user-facing (the HTTP layer) is a thin adapter over these
//! modules. All functions take a `DatabaseConnection`, validate their
//! inputs before touching storage, and return [`crate::errors::Result`].

/// Card verification and redemption workflow
pub mod activation;
/// Admin sign-in, sign-out, and session lookup
pub mod auth;
/// Bulk card generation and administration
pub mod card;
/// Card code, username, and password generation
pub mod codegen;
/// Subscription plan management
pub mod package;
/// Dashboard and report aggregation
pub mod report;
/// Subscriber account management
pub mod subscriber;
