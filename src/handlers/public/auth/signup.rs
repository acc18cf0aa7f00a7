// handlers/public/auth/signup.rs - POST /api/auth/signup handler

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::hash_password_blocking;
use crate::database::models::{NewUser, PublicUser};
use crate::handlers::utils::{
    normalize_email, validate_email_format, validate_password, validate_username_format, FieldErrors,
};
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// POST /api/auth/signup - Register a new account
///
/// Username and email must be unique (409 otherwise). The password is stored
/// as an Argon2 hash and never echoed back. No session is issued; clients
/// sign in afterwards.
pub async fn signup_post(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<PublicUser> {
    let Json(payload) = payload?;

    let username = payload.username.trim().to_string();
    let email = normalize_email(&payload.email);

    let mut errors = FieldErrors::new();
    errors.check("username", validate_username_format(&username));
    errors.check("email", validate_email_format(&email));
    errors.check("password", validate_password(&payload.password));
    errors.into_result()?;

    let password_hash = hash_password_blocking(payload.password).await?;

    let user = state
        .store
        .create_user(NewUser {
            username,
            email,
            password_hash,
            avatar: state.config.api.default_avatar.clone(),
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.id, user.username);

    Ok(ApiResponse::created(PublicUser::from(user)))
}

#[cfg(test)]
mod tests {
    use crate::testing::{read_json, send, test_state};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn creates_account_without_exposing_hash() {
        let (state, store) = test_state();
        let app = crate::app(state);

        let response = send(
            &app,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"username": "alice", "email": "Alice@Example.com", "password": "long enough pw"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["data"]["email"], "alice@example.com");
        assert!(body["data"]["avatar"].as_str().is_some_and(|a| a.starts_with("https://")));
        assert!(body["data"].get("passwordHash").is_none());
        assert!(!body.to_string().contains("argon2"));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (state, store) = test_state();
        let app = crate::app(state);
        let payload = json!({"username": "alice", "email": "alice@example.com", "password": "long enough pw"});

        send(&app, "POST", "/api/auth/signup", None, Some(payload)).await;
        let response = send(
            &app,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"username": "alice2", "email": "ALICE@example.com", "password": "long enough pw"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn reports_every_invalid_field() {
        let (state, store) = test_state();
        let app = crate::app(state);

        let response = send(
            &app,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"username": "a", "email": "nope", "password": "short"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["fieldErrors"]["username"].is_string());
        assert!(body["fieldErrors"]["email"].is_string());
        assert!(body["fieldErrors"]["password"].is_string());
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (state, _) = test_state();
        let app = crate::app(state);

        let response = send(&app, "POST", "/api/auth/signup", None, Some(json!({"username": "alice"}))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["code"], "VALIDATION_ERROR");
    }
}
