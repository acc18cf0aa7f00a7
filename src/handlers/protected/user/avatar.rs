use axum::extract::{rejection::JsonRejection, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::database::models::{PublicUser, UserChanges};
use crate::error::ApiError;
use crate::handlers::utils::validate_http_url;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    pub avatar: String,
}

/// PUT /api/user/update-avatar - Replace the caller's avatar URL
///
/// The target is always the authenticated caller; there is no id to spoof.
pub async fn avatar_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<AvatarRequest>, JsonRejection>,
) -> ApiResult<PublicUser> {
    let Json(payload) = payload?;
    let avatar = payload.avatar.trim().to_string();
    validate_http_url(&avatar).map_err(|problem| ApiError::field_error("avatar", problem))?;

    let updated = state
        .store
        .update_user(user.id, UserChanges::avatar(avatar))
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!("User {} updated avatar", user.id);

    Ok(ApiResponse::success(PublicUser::from(updated)))
}
