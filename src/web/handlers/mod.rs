//! Request handlers grouped by domain, plus the admin session extractor.

/// Public card verification and redemption endpoints
pub mod activation;
/// Admin sign-in, sign-out, and whoami endpoints
pub mod auth;
/// Card generation and administration endpoints
pub mod card;
/// Package management endpoints
pub mod package;
/// Report endpoints
pub mod report;
/// Subscriber management endpoints
pub mod subscriber;

use crate::core;
use crate::entities::admin;
use crate::web::{ApiError, AppState, bearer_token, unix_now};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Extractor that resolves the request's bearer token to a signed-in admin.
///
/// Adding `CurrentAdmin` to a handler's parameters is what makes a route
/// require authentication; requests without a valid, unexpired session are
/// rejected with 401 before the handler body runs.
pub struct CurrentAdmin(pub admin::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let admin = core::auth::authenticate(&state.db, token, unix_now()).await?;
        Ok(Self(admin))
    }
}
