// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::authenticate,
    error::{ApiError, ErrorBody},
    models::{LoginRequest, RefreshRequest, TokenPairResponse},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/token/refresh", post(auth::refresh))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/v1/users/me", get(users::get_current_user))
        .with_state(state.clone());

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        // The gate sits over every route; exemptions are path-based.
        .layer(middleware::from_fn_with_state(state, authenticate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Unknown routes still answer with the response envelope.
async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::refresh,
        health::health,
        health::liveness,
        users::get_current_user
    ),
    components(
        schemas(
            LoginRequest,
            RefreshRequest,
            TokenPairResponse,
            users::UserMeResponse,
            health::HealthResponse,
            ErrorBody
        )
    ),
    tags(
        (name = "Auth", description = "Login and token rotation"),
        (name = "Users", description = "Authenticated user info"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderError, StubProvider};
    use crate::state::test_support::{test_state, test_state_with_provider};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn send_get(router: &Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _) = test_state();
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn login_then_access_then_rotate_flow() {
        let (state, _) = test_state();
        let app = router(state);

        // Login issues an envelope with the credential pair.
        let (status, body) = send_json(
            &app,
            "/auth/login",
            json!({"providerCredential": "provider-token"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["error"].is_null());

        let user_id = body["data"]["userId"].as_str().unwrap().to_string();
        let access_token = body["data"]["accessToken"].as_str().unwrap().to_string();
        let refresh_token = body["data"]["refreshToken"].as_str().unwrap().to_string();

        // The access token opens the protected route.
        let (status, body) = send_get(&app, "/v1/users/me", Some(&access_token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["userId"], user_id.as_str());

        // Rotation returns a fresh pair for the same user.
        let (status, body) = send_json(
            &app,
            "/auth/token/refresh",
            json!({"refreshToken": refresh_token}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["userId"], user_id.as_str());
        let new_refresh = body["data"]["refreshToken"].as_str().unwrap().to_string();
        assert_ne!(new_refresh, refresh_token);

        // The consumed refresh token is dead.
        let (status, body) = send_json(
            &app,
            "/auth/token/refresh",
            json!({"refreshToken": refresh_token}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Refresh token is not valid");
    }

    #[tokio::test]
    async fn provider_rejection_surfaces_as_classified_failure() {
        let (state, _) = test_state_with_provider(StubProvider::failing(
            ProviderError::Unauthorized,
        ));
        let app = router(state);

        let (status, body) = send_json(
            &app,
            "/auth/login",
            json!({"providerCredential": "expired"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], 401);
    }

    #[tokio::test]
    async fn blank_refresh_token_is_401_missing() {
        let (state, _) = test_state();
        let app = router(state);

        let (status, body) =
            send_json(&app, "/auth/token/refresh", json!({"refreshToken": ""})).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Refresh token is required");
    }

    #[tokio::test]
    async fn protected_route_requires_token() {
        let (state, _) = test_state();
        let app = router(state);

        let (status, body) = send_get(&app, "/v1/users/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = send_get(&app, "/v1/users/me", Some("garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_route_is_enveloped_404_for_authenticated_caller() {
        let (state, _) = test_state();
        let app = router(state);

        let (_, body) = send_json(
            &app,
            "/auth/login",
            json!({"providerCredential": "provider-token"}),
        )
        .await;
        let access_token = body["data"]["accessToken"].as_str().unwrap().to_string();

        let (status, body) = send_get(&app, "/v1/nothing-here", Some(&access_token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 404);

        // Without a token the gate answers first.
        let (status, _) = send_get(&app, "/v1/nothing-here", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn health_is_exempt() {
        let (state, _) = test_state();
        let app = router(state);

        let (status, body) = send_get(&app, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
    }
}
