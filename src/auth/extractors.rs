use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use time::OffsetDateTime;
use tracing::{error, warn};

use super::{jwt::JwtKeys, repo_types::User};
use crate::{error::ApiError, state::AppState};

/// The caller resolved from a bearer token.
///
/// Missing header, bad token and unknown subject all reject with the same
/// `ApiError::Unauthenticated`, so clients cannot tell which check failed.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            warn!("missing or malformed Authorization header");
            ApiError::Unauthenticated
        })?;

        let keys = JwtKeys::from_ref(state);
        let subject = keys.verify(token, OffsetDateTime::now_utc()).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::Unauthenticated
        })?;

        match state.store.find_user_by_email(&subject).await {
            Ok(Some(user)) => Ok(AuthUser(user)),
            Ok(None) => {
                warn!(subject = %subject, "token subject no longer exists");
                Err(ApiError::Unauthenticated)
            }
            Err(e) => {
                error!(error = %e, "user lookup failed during auth");
                Err(e.into())
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
