// --- File: crates/slotwise_common/src/auth.rs ---

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::{auth_error, config_error};

pub const API_KEY_HEADER: &str = "X-Api-Key";

/// State for the API key middleware: the expected key, if one is configured.
#[derive(Clone, Debug)]
pub struct ApiKeyAuthState {
    pub api_key: Option<String>,
}

/// Axum middleware guarding admin routes with a shared key in the `X-Api-Key` header.
pub async fn api_key_middleware(
    State(auth_state): State<Arc<ApiKeyAuthState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = auth_state.api_key.as_deref().filter(|key| !key.is_empty()) else {
        error!("API key not configured; rejecting admin request");
        return config_error("API key not configured on server").into_response();
    };

    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(provided) if constant_time_eq(provided.as_bytes(), expected.as_bytes()) => {
            debug!("admin request authenticated");
            next.run(req).await
        }
        Some(_) => {
            warn!("admin request with invalid API key");
            auth_error("invalid credentials").into_response()
        }
        None => {
            warn!("admin request missing {} header", API_KEY_HEADER);
            auth_error(format!("missing {} header", API_KEY_HEADER)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn guarded(api_key: Option<&str>) -> Router {
        let state = Arc::new(ApiKeyAuthState {
            api_key: api_key.map(str::to_string),
        });
        Router::new()
            .route("/admin", get(|| async { "secret" }))
            .layer(middleware::from_fn_with_state(state, api_key_middleware))
    }

    async fn status_for(router: Router, key: Option<&str>) -> StatusCode {
        let mut request = Request::get("/admin");
        if let Some(key) = key {
            request = request.header(API_KEY_HEADER, key);
        }
        router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn accepts_matching_key() {
        assert_eq!(status_for(guarded(Some("k1")), Some("k1")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_wrong_or_missing_key() {
        assert_eq!(
            status_for(guarded(Some("k1")), Some("k2")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_for(guarded(Some("k1")), None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unconfigured_key_is_server_error() {
        assert_eq!(
            status_for(guarded(None), Some("anything")).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
