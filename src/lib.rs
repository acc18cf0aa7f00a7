pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

#[cfg(test)]
pub mod testing;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{TokenError, TokenIssuer};
use crate::config::AppConfig;
use crate::database::Store;
use crate::error::ApiError;
use crate::middleware::{access_guard, ApiResponse};

/// Shared, immutable-after-startup dependencies handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenIssuer>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, TokenError> {
        let expiry = i64::try_from(config.security.jwt_expiry_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .ok_or(TokenError::InvalidExpiry)?;
        let tokens = TokenIssuer::new(&config.security.jwt_secret, expiry)?;

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            store,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let api = &state.config.api;
    let body_limit = api.max_request_size_bytes;
    let request_logging = api.enable_request_logging;
    let cors = cors_layer(&state.config);

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        .merge(listing_public_routes())
        // Protected (session required)
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    if let Some(cors) = cors {
        router = router.layer(cors);
    }
    if request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup_post))
        .route("/api/auth/signin", post(auth::signin_post))
        .route("/api/auth/signout", get(auth::signout_get))
}

fn listing_public_routes() -> Router<AppState> {
    use handlers::public::listing;

    Router::new().route("/api/listing/get/:id", get(listing::listing_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{listing, user};

    Router::new()
        // Account (caller must be the target)
        .route("/api/user/update-avatar", put(user::avatar_put))
        .route("/api/user/update/:id", post(user::profile_update))
        .route("/api/user/delete/:id", delete(user::profile_delete))
        .route("/api/user/listings/:id", get(user::listings_get))
        .route("/api/user/:id", get(user::profile_get))
        // Listings (caller must own the listing)
        .route("/api/listing/create", post(listing::listing_create))
        .route("/api/listing/update/:id", post(listing::listing_update))
        .route("/api/listing/delete/:id", delete(listing::listing_delete))
        .route_layer(from_fn_with_state(state, access_guard))
}

/// Credentialed CORS needs explicit origins; `None` when CORS is disabled.
fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Estate API",
            "version": version,
            "description": "Real-estate listing marketplace backend",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/signup, /api/auth/signin, /api/auth/signout (public)",
                "listing_read": "/api/listing/get/:id (public)",
                "user": "/api/user/* (session required, caller must be the target)",
                "listing": "/api/listing/create, /api/listing/update/:id, /api/listing/delete/:id (session required, caller must own the listing)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let now = chrono::Utc::now();

    state.store.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Database temporarily unavailable")
    })?;

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": now,
        "database": "ok"
    })))
}
