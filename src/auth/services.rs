use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginForm, SignupRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::UserRepo,
    repo_types::User,
};
use crate::error::{ApiError, ApiResult};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Creates the account and returns a token for it.
pub async fn signup<R: UserRepo + ?Sized>(
    users: &R,
    keys: &JwtKeys,
    req: SignupRequest,
    now: OffsetDateTime,
) -> ApiResult<String> {
    let username = req.username.trim();
    let email = req.email.trim();

    if username.is_empty() {
        return Err(ApiError::Validation("Username is required".into()));
    }
    if !is_valid_email(email) {
        warn!(email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if req.password.is_empty() {
        return Err(ApiError::Validation("Password is required".into()));
    }

    let hash = hash_password(&req.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = users
        .create_user(username, email, &hash)
        .await
        .map_err(|e| {
            warn!(email, error = %e, "signup rejected");
            ApiError::from(e)
        })?;

    let token = keys.issue(&user.email, now).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal(e.to_string())
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(token)
}

/// Checks credentials and returns a fresh token.
pub async fn login<R: UserRepo + ?Sized>(
    users: &R,
    keys: &JwtKeys,
    form: LoginForm,
    now: OffsetDateTime,
) -> ApiResult<String> {
    let email = form.username.trim();

    let Some(user) = users.find_user_by_email(email).await? else {
        warn!(email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&form.password, &user.password_hash) {
        warn!(email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = keys.issue(&user.email, now).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal(e.to_string())
    })?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(token)
}

/// Fresh profile for an authenticated caller; a vanished account counts as unauthenticated.
pub async fn current_user<R: UserRepo + ?Sized>(users: &R, id: Uuid) -> ApiResult<User> {
    users.find_user_by_id(id).await?.ok_or_else(|| {
        warn!(user_id = %id, "profile lookup for missing user");
        ApiError::Unauthenticated
    })
}
