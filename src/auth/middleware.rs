// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authentication gate.
//!
//! A middleware layered over the whole router. Every request is either
//! exempt (allow-listed path, or a CORS pre-flight) or must carry a valid
//! `Authorization: Bearer` access token. Rejection short-circuits the
//! pipeline: the gate writes the error envelope itself and downstream
//! handlers never run.
//!
//! The client always receives a plain 401; the specific token-failure
//! kind is only logged, to avoid giving probes an oracle.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

use super::error::AuthError;

/// Allow-list of paths reachable without an access token.
///
/// Entries are exact matches, except entries ending in `/**` which match
/// the base path and everything under it.
#[derive(Debug, Clone, Default)]
pub struct ExemptPaths {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl ExemptPaths {
    pub fn parse<'a>(entries: impl IntoIterator<Item = &'a str>) -> Self {
        let mut exact = Vec::new();
        let mut prefixes = Vec::new();

        for entry in entries {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.strip_suffix("/**") {
                Some(base) => prefixes.push(base.trim_end_matches('/').to_string()),
                None => exact.push(entry.to_string()),
            }
        }

        Self { exact, prefixes }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.exact.iter().any(|candidate| candidate == path)
            || self.prefixes.iter().any(|base| {
                path == base || (path.starts_with(base) && path[base.len()..].starts_with('/'))
            })
    }
}

/// The gate itself. State machine per request:
/// unauthenticated -> exempt | checking -> authenticated | rejected.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Pre-flight requests carry no credentials by design.
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let path = request.uri().path();
    if state.exempt_paths.matches(path) {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(request.headers()) else {
        tracing::debug!(path, "rejected request without bearer credential");
        return AuthError::MissingCredentials.into_response();
    };

    match state.codec.validate(token) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(kind) => {
            tracing::warn!(%kind, path, "rejected request with failing access token");
            AuthError::InvalidAccessToken.into_response()
        }
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// Missing header, non-UTF-8 value, wrong scheme, and empty token all
/// collapse to `None`; no codec call is made for them.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::Auth;
    use crate::state::test_support::test_state;
    use axum::{body::Body, body::to_bytes, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;
    use uuid::Uuid;

    #[test]
    fn exempt_paths_exact_and_prefix_matching() {
        let exempt = ExemptPaths::parse(["/auth/login", "/health/**", "/docs/**"]);

        assert!(exempt.matches("/auth/login"));
        assert!(!exempt.matches("/auth/login/extra"));
        assert!(exempt.matches("/health"));
        assert!(exempt.matches("/health/live"));
        assert!(!exempt.matches("/healthz"));
        assert!(exempt.matches("/docs"));
        assert!(exempt.matches("/docs/index.html"));
        assert!(!exempt.matches("/v1/users/me"));
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer    ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    fn gated_router() -> (Router, crate::state::AppState) {
        let (state, _) = test_state();

        async fn protected(Auth(identity): Auth) -> String {
            identity.user_id.to_string()
        }

        async fn open() -> &'static str {
            "ok"
        }

        let router = Router::new()
            .route("/v1/whoami", get(protected))
            .route("/health", get(open))
            .layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .with_state(state.clone());

        (router, state)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn exempt_path_passes_without_header() {
        let (router, _) = gated_router();

        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_path_without_header_is_rejected_with_envelope() {
        let (router, _) = gated_router();

        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .uri("/v1/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], 401);
    }

    #[tokio::test]
    async fn malformed_bearer_never_reaches_the_handler() {
        let (router, _) = gated_router();

        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .uri("/v1/whoami")
                    .header(AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        // Generic message only; no token internals.
        assert_eq!(body["error"]["message"], "Access token is expired or invalid");
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_attached_identity() {
        let (router, state) = gated_router();
        let subject = Uuid::new_v4();
        let token = state.codec.issue(subject).unwrap();

        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .uri("/v1/whoami")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), subject.to_string());
    }

    #[tokio::test]
    async fn options_requests_pass_unconditionally() {
        let (router, _) = gated_router();

        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/v1/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // 405 from the router, not 401 from the gate: the gate let it through.
        assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
