//! Axum router construction and route mapping.
//!
//! The [`app`] function wires every registry endpoint to its handler and
//! returns a ready-to-serve [`axum::Router`]. The static `/sessions/all`
//! route coexists with the `/sessions/:id` capture; the router prefers the
//! static segment, and `"all"` would fail id validation anyway.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the axum [`Router`] with all registry routes.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness probe, not part of the registry API.
        .route("/health", get(health_check))
        .route(
            "/sessions",
            get(handlers::get_all_sessions).post(handlers::create_session),
        )
        .route("/sessions/all", get(handlers::list_session_ids))
        .route(
            "/sessions/:id",
            get(handlers::get_session).patch(handlers::update_session),
        )
        .with_state(state)
        // Per-request logging spans around every handler.
        .layer(TraceLayer::new_for_http())
}

/// `GET /health` — report service liveness.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::config::Config;
    use crate::session::SessionRecord;
    use crate::store::FileStore;

    fn test_app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = FileStore::new(dir.path()).expect("failed to open store");
        let state = Arc::new(AppState {
            config: Config::default(),
            store: Arc::new(store),
        });
        (dir, app(state))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_find_list_scenario() {
        let (_dir, app) = test_app();

        // Empty directory: nothing listed.
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/sessions/all").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["sessions"], serde_json::json!([]));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/sessions",
                r#"{"host":"127.0.0.1","port":9000,"options":["A","B"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(id.len(), 6);
        assert!(id.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let record: SessionRecord = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(record.host.to_string(), "127.0.0.1");
        assert_eq!(record.port, 9000);
        assert_eq!(record.options, vec!["A", "B"]);

        let response = app
            .oneshot(Request::builder().uri("/sessions/all").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await["sessions"],
            serde_json::json!([id])
        );
    }

    #[tokio::test]
    async fn test_create_incomplete_is_bad_request() {
        let (_dir, app) = test_app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/sessions",
                r#"{"host":"127.0.0.1","port":0,"options":[]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                "POST",
                "/sessions",
                r#"{"host":"127.0.0.1","port":9000,"options":null}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_fields() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/sessions",
                r#"{"host":"127.0.0.1","port":9000,"options":[],"leader":"me"}"#,
            ))
            .await
            .unwrap();
        // Unknown fields fail body deserialization before the store runs.
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_unknown_session_is_not_found() {
        let (_dir, app) = test_app();
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/sessions/AB12C3").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // A malformed id never names a session either.
        let response = app
            .oneshot(Request::builder().uri("/sessions/bogus!").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_merges_leader_address() {
        let (_dir, app) = test_app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/sessions",
                r#"{"host":"127.0.0.1","port":9000,"options":["A"]}"#,
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/sessions/{id}"),
                r#"{"host":"10.0.0.2"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let record = body_json(response).await;
        assert_eq!(record["host"], "10.0.0.2");
        assert_eq!(record["port"], 9000);
        assert_eq!(record["options"], serde_json::json!(["A"]));
    }

    #[tokio::test]
    async fn test_patch_unknown_session_is_not_found() {
        let (_dir, app) = test_app();
        let response = app
            .oneshot(json_request("PATCH", "/sessions/AB12C3", r#"{"port":9001}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_all_sessions_returns_records() {
        let (_dir, app) = test_app();
        for port in [9000, 9001] {
            let body = format!(r#"{{"host":"127.0.0.1","port":{port},"options":[]}}"#);
            let response = app
                .clone()
                .oneshot(json_request("POST", "/sessions", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(Request::builder().uri("/sessions").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let records = body_json(response).await;
        assert_eq!(records.as_array().unwrap().len(), 2);
    }
}
