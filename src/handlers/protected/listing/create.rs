use axum::extract::{rejection::JsonRejection, State};
use axum::{Extension, Json};

use super::CreateListingRequest;
use crate::database::models::Listing;
use crate::handlers::utils::validate_listing;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::AppState;

/// POST /api/listing/create - Create a listing owned by the caller
pub async fn listing_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateListingRequest>, JsonRejection>,
) -> ApiResult<Listing> {
    let Json(payload) = payload?;
    let draft = payload.into_draft();
    validate_listing(&draft)?;

    let listing = state.store.create_listing(user.id, draft).await?;

    tracing::info!("User {} created listing {}", user.id, listing.id);

    Ok(ApiResponse::created(listing))
}

#[cfg(test)]
mod tests {
    use crate::database::Store;
    use crate::testing::{listing_body, read_json, send, sign_up, test_state};
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn owner_comes_from_session_not_body() {
        let (state, store) = test_state();
        let app = crate::app(state);
        let alice = sign_up(&app, "alice").await;
        let bob = sign_up(&app, "bob").await;

        let mut body = listing_body();
        body["userRef"] = json!(bob.id);
        let response = send(&app, "POST", "/api/listing/create", Some(&alice.cookie), Some(body)).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let created = read_json(response).await["data"].clone();
        assert_eq!(created["userRef"], alice.id.to_string());
        assert!(store.listings_by_owner(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn image_order_survives_round_trip() {
        let (state, store) = test_state();
        let app = crate::app(state);
        let alice = sign_up(&app, "alice").await;

        let mut body = listing_body();
        body["imageUrls"] = json!([
            "https://img.example.com/3.jpg",
            "https://img.example.com/1.jpg",
            "https://img.example.com/2.jpg"
        ]);
        let response = send(&app, "POST", "/api/listing/create", Some(&alice.cookie), Some(body)).await;
        let created = read_json(response).await["data"].clone();
        let id = Uuid::parse_str(created["id"].as_str().unwrap()).unwrap();

        let stored = store.find_listing(id).await.unwrap().unwrap();
        assert_eq!(
            stored.image_urls,
            vec![
                "https://img.example.com/3.jpg",
                "https://img.example.com/1.jpg",
                "https://img.example.com/2.jpg"
            ]
        );
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn invalid_listing_is_not_stored() {
        let (state, store) = test_state();
        let app = crate::app(state);
        let alice = sign_up(&app, "alice").await;

        let mut body = listing_body();
        body["imageUrls"] = json!([]);
        body["discountPrice"] = json!(5000);
        let response = send(&app, "POST", "/api/listing/create", Some(&alice.cookie), Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let errors = read_json(response).await["fieldErrors"].clone();
        assert!(errors["imageUrls"].is_string());
        assert!(errors["discountPrice"].is_string());
        assert_eq!(store.listing_count().await, 0);
    }

    #[tokio::test]
    async fn anonymous_create_never_reaches_store() {
        let (state, store) = test_state();
        let app = crate::app(state);

        let response = send(&app, "POST", "/api/listing/create", None, Some(listing_body())).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.listing_count().await, 0);
    }
}
