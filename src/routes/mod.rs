//! Router assembly: HTTP endpoints, WebSocket upgrade, assets, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (one session per connection)
/// - session API under `/api/v1/session/...`
/// - question/result images under `/assets/...`
/// - Static SPA from the configured static dir with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();
    let static_service = ServeDir::new(&static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/session", post(http::http_create_session))
        .route(
            "/api/v1/session/:id",
            get(http::http_get_session).delete(http::http_delete_session),
        )
        .route("/api/v1/session/:id/start", post(http::http_post_start))
        .route("/api/v1/session/:id/submit", post(http::http_post_submit))
        .route("/api/v1/session/:id/restart", post(http::http_post_restart))
        // Images
        .route("/assets/*name", get(http::http_get_asset))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    use crate::config::QuizConfig;

    const CSV: &str = "\u{feff}id,question,type,image,choice1,choice2,choice3,answer\n\
        3,세번째,주관식,,,,,c\n\
        \n\
        1,첫번째,주관식,q1.png,,,,a\n\
        2,두번째,객관식,,a,b,c,b\n";

    fn fixture() -> (TempDir, Router) {
        let (dir, _, app) = fixture_with_state();
        (dir, app)
    }

    fn fixture_with_state() -> (TempDir, Arc<AppState>, Router) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("mz_test.csv"), CSV).unwrap();
        fs::write(dir.path().join("q1.png"), b"\x89PNG").unwrap();
        let cfg = QuizConfig {
            questions_path: dir.path().join("mz_test.csv"),
            asset_dir: dir.path().to_path_buf(),
            static_dir: dir.path().join("static"),
            ..QuizConfig::default()
        };
        let state = Arc::new(AppState::new(cfg).unwrap());
        (dir, state.clone(), build_router(state))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_question_count() {
        let (_dir, app) = fixture();
        let (status, body) = call(&app, "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["questions"], 3);
    }

    #[tokio::test]
    async fn full_quiz_over_http() {
        let (_dir, app) = fixture();

        let (status, body) = call(&app, "POST", "/api/v1/session", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["view"]["page"], "start");
        let id = body["sessionId"].as_str().unwrap().to_string();
        let base = format!("/api/v1/session/{id}");

        let (status, body) = call(&app, "POST", &format!("{base}/start"), Some(json!({"username": "민수"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["page"], "question");
        assert_eq!(body["view"]["id"], "1");
        assert_eq!(body["view"]["image"]["file"], "q1.png");
        assert_eq!(body["view"]["totalPages"], 3);
        assert_eq!(body["view"]["type"], "subjective");

        call(&app, "POST", &format!("{base}/submit"), Some(json!({"answer": "A"}))).await;

        let (status, body) = call(&app, "POST", &format!("{base}/submit"), Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "보기를 선택해 주세요.");
        assert_eq!(body["view"]["pageNumber"], 2);

        call(&app, "POST", &format!("{base}/submit"), Some(json!({"answer": "b"}))).await;
        let (status, body) = call(&app, "POST", &format!("{base}/submit"), Some(json!({"answer": "x"}))).await;
        assert_eq!(status, StatusCode::OK);
        let view = &body["view"];
        assert_eq!(view["page"], "result");
        assert_eq!(view["correctCount"], 2);
        assert_eq!(view["tier"], "tier1");
        assert_eq!(view["header"], "민수님의 결과");
        let marks: Vec<_> = view["rows"].as_array().unwrap().iter().map(|r| r["mark"].clone()).collect();
        assert_eq!(marks, vec![json!("O"), json!("O"), json!("X")]);

        let (status, body) = call(&app, "POST", &format!("{base}/restart"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["page"], "start");
        assert_eq!(body["view"]["username"], "민수");

        let (status, _) = call(&app, "DELETE", &base, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = call(&app, "GET", &base, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown_session");
    }

    #[tokio::test]
    async fn idle_session_expires_to_not_found() {
        let (_dir, state, app) = fixture_with_state();
        let (_, body) = call(&app, "POST", "/api/v1/session", None).await;
        let id = body["sessionId"].as_str().unwrap().to_string();

        let idle = Duration::from_secs(state.config.session_ttl_secs + 1);
        state.sessions.write().await.get_mut(&id).unwrap().touched = Instant::now().checked_sub(idle).unwrap();

        let (status, body) = call(&app, "POST", &format!("/api/v1/session/{id}/start"), Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown_session");
        assert!(state.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn misplaced_action_is_a_conflict() {
        let (_dir, app) = fixture();
        let (_, body) = call(&app, "POST", "/api/v1/session", None).await;
        let id = body["sessionId"].as_str().unwrap();
        let (status, body) = call(&app, "POST", &format!("/api/v1/session/{id}/restart"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "invalid_transition");
    }

    #[tokio::test]
    async fn assets_serve_images_only() {
        let (_dir, app) = fixture();
        let res = app
            .clone()
            .oneshot(Request::builder().uri("/assets/q1.png").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(Request::builder().uri("/assets/mz_test.csv").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
