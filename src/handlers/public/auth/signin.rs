// handlers/public/auth/signin.rs - POST /api/auth/signin handler

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::{session_cookie, verify_password_blocking};
use crate::database::models::PublicUser;
use crate::error::ApiError;
use crate::handlers::utils::normalize_email;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// Sign in by email or username.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: String,
}

const WRONG_CREDENTIALS: &str = "Wrong credentials";

/// POST /api/auth/signin - Verify credentials and open a session
///
/// On success the token travels only in the `access_token` cookie; the body
/// carries the public profile. Unknown accounts and wrong passwords get the
/// same 401 so the endpoint does not reveal which accounts exist.
pub async fn signin_post(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> ApiResult<PublicUser> {
    let Json(payload) = payload?;

    let user = match (payload.email.as_deref(), payload.username.as_deref()) {
        (Some(email), _) if !email.trim().is_empty() => {
            state.store.find_user_by_email(&normalize_email(email)).await?
        }
        (_, Some(username)) if !username.trim().is_empty() => {
            state.store.find_user_by_username(username.trim()).await?
        }
        _ => return Err(ApiError::field_error("email", "Email or username is required")),
    };

    let Some(user) = user else {
        tracing::warn!("Sign-in failed: unknown account");
        return Err(ApiError::invalid_credential(WRONG_CREDENTIALS));
    };

    if !verify_password_blocking(payload.password, user.password_hash.clone()).await? {
        tracing::warn!("Sign-in failed: wrong password for user {}", user.id);
        return Err(ApiError::invalid_credential(WRONG_CREDENTIALS));
    }

    let issued = state.tokens.issue(user.id)?;
    tracing::info!("User {} signed in", user.id);

    Ok(ApiResponse::success(PublicUser::from(user))
        .with_cookie(session_cookie(&issued, state.config.security.cookie_secure)))
}
