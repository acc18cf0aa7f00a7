use axum::extract::{rejection::PathRejection, Path, State};
use axum::Extension;
use uuid::Uuid;

use crate::auth::{ensure_owner, Resource};
use crate::database::models::Listing;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// GET /api/user/listings/:id - The caller's own listings, oldest first
pub async fn listings_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Vec<Listing>> {
    let Path(id) = path?;
    ensure_owner(&user, id, Resource::Listings)?;

    let listings = state.store.listings_by_owner(id).await?;
    Ok(ApiResponse::success(listings))
}
