// handlers/public/auth/signout.rs - GET /api/auth/signout handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::auth::cleared_cookie;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET /api/auth/signout - Clear the session cookie
///
/// Tokens are not persisted, so this is advisory: a copied token stays valid
/// until it expires.
pub async fn signout_get(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "message": "User has been logged out" }))
        .with_cookie(cleared_cookie(state.config.security.cookie_secure)))
}
