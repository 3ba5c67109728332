//! Caller identity for every request.
//!
//! Handlers never see a raw token: they receive `CurrentUser`, which is
//! `None` for anonymous callers, and pass it explicitly into the gram and
//! comment services. Actions that need a signed-in caller call
//! [`require_user`] before doing anything else.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use super::{jwt::JwtKeys, repo_types::User};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

/// The authenticated caller, if any.
pub struct CurrentUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        current_user(state, &parts.headers).await.map(CurrentUser)
    }
}

/// Resolves the caller from an `Authorization: Bearer` header.
///
/// Anything short of a valid access token for an existing user is an
/// anonymous caller. Only a failing user lookup is an error.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> AppResult<Option<User>> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };

    let keys = JwtKeys::from_ref(state);
    let claims = match keys.verify_access(token) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "rejected bearer token");
            return Ok(None);
        }
    };

    let user = state.users.find_by_id(claims.sub).await?;
    if user.is_none() {
        debug!(user_id = %claims.sub, "token subject no longer exists");
    }
    Ok(user)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Short-circuits anonymous callers with `Unauthenticated`.
pub fn require_user(caller: Option<&User>) -> AppResult<&User> {
    caller.ok_or(AppError::Unauthenticated)
}
