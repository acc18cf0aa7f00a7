use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{cleared_cookie, ensure_owner, hash_password_blocking, Resource};
use crate::database::models::{PublicUser, UserChanges};
use crate::error::ApiError;
use crate::handlers::utils::{
    normalize_email, validate_email_format, validate_http_url, validate_password, validate_username_format,
    FieldErrors,
};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// Partial profile update. Absent fields stay as they are.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

impl UpdateUserRequest {
    async fn into_changes(self) -> Result<UserChanges, ApiError> {
        let username = self.username.map(|u| u.trim().to_string());
        let email = self.email.as_deref().map(normalize_email);
        let avatar = self.avatar.map(|a| a.trim().to_string());

        let mut errors = FieldErrors::new();
        if let Some(username) = &username {
            errors.check("username", validate_username_format(username));
        }
        if let Some(email) = &email {
            errors.check("email", validate_email_format(email));
        }
        if let Some(password) = &self.password {
            errors.check("password", validate_password(password));
        }
        if let Some(avatar) = &avatar {
            errors.check("avatar", validate_http_url(avatar));
        }
        errors.into_result()?;

        let password_hash = match self.password {
            Some(password) => Some(hash_password_blocking(password).await?),
            None => None,
        };

        Ok(UserChanges {
            username,
            email,
            password_hash,
            avatar,
        })
    }
}

/// GET /api/user/:id - Public profile of any user, for signed-in callers
pub async fn profile_get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<PublicUser> {
    let Path(id) = path?;

    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(PublicUser::from(user)))
}

/// POST /api/user/update/:id - Update the caller's own profile
pub async fn profile_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<PublicUser> {
    let Path(id) = path?;
    ensure_owner(&user, id, Resource::Account)?;

    let Json(payload) = payload?;
    let changes = payload.into_changes().await?;
    let password_changed = changes.password_hash.is_some();

    let updated = state
        .store
        .update_user(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if password_changed {
        tracing::info!("User {} changed password", id);
    } else {
        tracing::info!("User {} updated profile", id);
    }

    Ok(ApiResponse::success(PublicUser::from(updated)))
}

/// DELETE /api/user/delete/:id - Delete the caller's account and listings
pub async fn profile_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    ensure_owner(&user, id, Resource::Account)?;

    if !state.store.delete_user(id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!("User {} deleted their account", id);

    Ok(ApiResponse::success(json!({ "message": "User has been deleted", "id": id }))
        .with_cookie(cleared_cookie(state.config.security.cookie_secure)))
}
