use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Path, State,
};
use axum::{Extension, Json};
use uuid::Uuid;

use super::ListingPatch;
use crate::auth::{ensure_owner, Resource};
use crate::database::models::Listing;
use crate::error::ApiError;
use crate::handlers::utils::validate_listing;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// POST /api/listing/update/:id - Update a listing the caller owns
///
/// Order of checks: 404 if the listing is gone, 403 if the caller is not its
/// owner, 400 if the merged listing is invalid, 409 if the stored version no
/// longer matches `expectedVersion` (or the version read here, when absent).
pub async fn listing_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ListingPatch>, JsonRejection>,
) -> ApiResult<Listing> {
    let Path(id) = path?;

    let current = state
        .store
        .find_listing(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;
    ensure_owner(&user, current.user_ref, Resource::Listing)?;

    let Json(patch) = payload?;
    let expected_version = patch.expected_version.unwrap_or(current.version);
    let draft = patch.merge(current.draft());
    validate_listing(&draft)?;

    let updated = state.store.update_listing(id, expected_version, draft).await?;

    tracing::info!("User {} updated listing {} to version {}", user.id, id, updated.version);

    Ok(ApiResponse::success(updated))
}
