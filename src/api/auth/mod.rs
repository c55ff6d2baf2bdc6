//! Account and session endpoints
//!
//! Signup and login both answer with a `Set-Cookie` carrying a fresh
//! session token; logout revokes it server-side and expires the cookie.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Identity;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Signup and login request body
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Body returned with a new session cookie
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = Identity::new(request.email.trim())
        .map_err(|e| ApiError::bad_request(e.to_string()).with_param("email"))?;

    let created = state
        .credentials
        .register(identity.as_str(), &request.password)?;

    if !created {
        return Err(ApiError::conflict("User already exists").with_param("email"));
    }

    start_session(&state, identity, StatusCode::CREATED)
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = request.email.trim();

    if !state.credentials.verify(email, &request.password) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let identity =
        Identity::new(email).map_err(|_| ApiError::unauthorized("Invalid email or password"))?;

    start_session(&state, identity, StatusCode::OK)
}

/// POST /logout
///
/// Succeeds with or without a live session.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = state.cookie.extract(&headers) {
        state.sessions.revoke(&token).map_err(|e| {
            error!(error = %e, "Failed to revoke session");
            ApiError::from(e)
        })?;
    }

    Ok((
        [(header::SET_COOKIE, state.cookie.clear()?)],
        Json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

fn start_session(
    state: &AppState,
    identity: Identity,
    status: StatusCode,
) -> Result<Response, ApiError> {
    let token = state.sessions.issue(&identity).map_err(|e| {
        error!(error = %e, "Failed to issue session");
        ApiError::from(e)
    })?;

    Ok((
        status,
        [(header::SET_COOKIE, state.cookie.issue(&token)?)],
        Json(SessionResponse {
            user: identity.into(),
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::api::test_support::{body_json, credentials_request, session_cookie, test_app};

    #[tokio::test]
    async fn test_signup_sets_cookie() {
        let (app, _) = test_app();

        let response = app
            .oneshot(credentials_request("/signup", "a@x.com", "pw1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let cookie = session_cookie(&response).unwrap();
        assert!(cookie.starts_with("goblog="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));

        let body = body_json(response).await;
        assert_eq!(body["user"], "a@x.com");
    }

    #[tokio::test]
    async fn test_signup_existing_user_conflicts() {
        let (app, _) = test_app();

        let first = app
            .clone()
            .oneshot(credentials_request("/signup", "a@x.com", "pw1"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .clone()
            .oneshot(credentials_request("/signup", "a@x.com", "other"))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);

        // The original password still works
        let login = app
            .oneshot(credentials_request("/login", "a@x.com", "pw1"))
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signup_empty_email() {
        let (app, _) = test_app();

        let response = app
            .oneshot(credentials_request("/signup", "  ", "pw1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (app, _) = test_app();

        app.clone()
            .oneshot(credentials_request("/signup", "a@x.com", "pw1"))
            .await
            .unwrap();

        let response = app
            .oneshot(credentials_request("/login", "a@x.com", "wrong"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(session_cookie(&response).is_none());
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let (app, _) = test_app();

        let response = app
            .oneshot(credentials_request("/login", "nobody@x.com", "pw1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let (app, state) = test_app();

        let response = app
            .clone()
            .oneshot(credentials_request("/signup", "a@x.com", "pw1"))
            .await
            .unwrap();
        let cookie = session_cookie(&response).unwrap();
        let pair = cookie.split(';').next().unwrap().to_string();
        let token = pair.trim_start_matches("goblog=").to_string();
        assert!(state.sessions.resolve(&token).is_some());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .header(header::COOKIE, pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).unwrap().contains("Max-Age=0"));
        assert!(state.sessions.resolve(&token).is_none());
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let (app, _) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
