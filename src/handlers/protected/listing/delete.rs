use axum::extract::{rejection::PathRejection, Path, State};
use axum::Extension;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{ensure_owner, Resource};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// DELETE /api/listing/delete/:id - Delete a listing the caller owns
pub async fn listing_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;

    let listing = state
        .store
        .find_listing(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Listing not found"))?;
    ensure_owner(&user, listing.user_ref, Resource::Listing)?;

    // Lost a race with another delete of the same listing
    if !state.store.delete_listing(id).await? {
        return Err(ApiError::not_found("Listing not found"));
    }

    tracing::info!("User {} deleted listing {}", user.id, id);

    Ok(ApiResponse::success(json!({ "message": "Listing has been deleted", "id": id })))
}

#[cfg(test)]
mod tests {
    use crate::testing::{create_listing, send, sign_up, test_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let (state, store) = test_state();
        let app = crate::app(state);
        let alice = sign_up(&app, "alice").await;
        let listing = create_listing(&app, &alice).await;
        let uri = format!("/api/listing/delete/{}", listing["id"].as_str().unwrap());

        let first = send(&app, "DELETE", &uri, Some(&alice.cookie), None).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(store.listing_count().await, 0);

        let second = send(&app, "DELETE", &uri, Some(&alice.cookie), None).await;
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stranger_cannot_delete() {
        let (state, store) = test_state();
        let app = crate::app(state);
        let alice = sign_up(&app, "alice").await;
        let bob = sign_up(&app, "bob").await;
        let listing = create_listing(&app, &alice).await;

        let response = send(
            &app,
            "DELETE",
            &format!("/api/listing/delete/{}", listing["id"].as_str().unwrap()),
            Some(&bob.cookie),
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(store.listing_count().await, 1);
    }

    #[tokio::test]
    async fn tampered_cookie_is_rejected() {
        let (state, store) = test_state();
        let app = crate::app(state);
        let alice = sign_up(&app, "alice").await;
        let listing = create_listing(&app, &alice).await;
        let tampered = format!("{}x", alice.cookie);

        let response = send(
            &app,
            "DELETE",
            &format!("/api/listing/delete/{}", listing["id"].as_str().unwrap()),
            Some(&tampered),
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.listing_count().await, 1);
    }
}
