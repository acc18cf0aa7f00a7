// handlers/public/listing.rs - GET /api/listing/get/:id handler

use axum::extract::{rejection::PathRejection, Path, State};
use uuid::Uuid;

use crate::database::models::Listing;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET /api/listing/get/:id - Read a single listing, no session needed
pub async fn listing_get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Listing> {
    let Path(id) = path?;

    let listing = state
        .store
        .find_listing(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;

    Ok(ApiResponse::success(listing))
}
