//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

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
/// - WebSocket at `/ws`
/// - JSON API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/ws", get(ws::ws_upgrade))
        .nest("/api/v1", api_routes())
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
        .fallback_service(static_service)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(http::http_health))
        // Session
        .route("/auth/login", post(http::http_login))
        .route("/auth/signup", post(http::http_signup))
        .route("/auth/logout", post(http::http_logout))
        .route("/me", get(http::http_me))
        .route("/me/progress", get(http::http_progress_summary))
        // Catalog + progress
        .route("/topics", get(http::http_list_topics))
        .route("/topics/:id", get(http::http_get_topic))
        .route("/topics/:id/start", post(http::http_start_topic))
        .route("/topics/:id/complete", post(http::http_complete_topic))
        .route("/videos/watched", post(http::http_video_watched))
        .route("/score", post(http::http_add_score))
        .route("/style", axum::routing::put(http::http_set_style))
        // Quiz
        .route("/quiz/answer", post(http::http_quiz_answer))
        .route("/quiz/finish", post(http::http_quiz_finish))
        .route("/quiz/switch_style", post(http::http_switch_style))
        .route("/confusion/reset", post(http::http_reset_confusion))
        // Leaderboard
        .route("/leaderboard", get(http::http_leaderboard))
        .route("/leaderboard/top/:count", get(http::http_leaderboard_top))
        .route("/leaderboard/me", get(http::http_leaderboard_me))
        // Feeds
        .route(
            "/notifications",
            get(http::http_notifications)
                .post(http::http_add_notification)
                .delete(http::http_clear_notifications),
        )
        .route("/notifications/read_all", post(http::http_mark_all_read))
        .route("/notifications/:id/read", post(http::http_mark_read))
        .route(
            "/understanding",
            get(http::http_understanding).post(http::http_save_understanding),
        )
        .route("/understanding/:topic_id", get(http::http_understanding_for_topic))
        .route(
            "/preferences",
            get(http::http_preferences).put(http::http_save_preferences),
        )
        .route("/wallpapers", get(http::http_wallpapers))
        .route("/quote", get(http::http_quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::MemoryStore;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::with_store(AppConfig::default(), Arc::new(MemoryStore::new()));
        build_router(Arc::new(state))
    }

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut req = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = app();
        let (status, body) = call(&app, Request::get("/api/v1/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn session_routes_require_bearer_token() {
        let app = app();
        let (status, body) = call(&app, Request::get("/api/v1/me").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "not authenticated");
    }

    #[tokio::test]
    async fn login_then_score_then_leaderboard() {
        let app = app();
        let (status, body) = call(
            &app,
            post_json("/api/v1/auth/login", None, serde_json::json!({ "email": "alex@edutwin.com", "password": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) =
            call(&app, post_json("/api/v1/score", Some(&token), serde_json::json!({ "points": 40 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalScore"], 125);
        assert_eq!(body["rank"], 2);

        let (_, body) = call(&app, Request::get("/api/v1/leaderboard?limit=2").body(Body::empty()).unwrap()).await;
        assert_eq!(body["leaderboard"][1]["userId"], "user-1");
        assert_eq!(body["pagination"]["totalPages"], 3);
    }

    #[tokio::test]
    async fn unknown_quiz_topic_is_not_found() {
        let app = app();
        let (_, body) = call(
            &app,
            post_json("/api/v1/auth/login", None, serde_json::json!({ "email": "a@b.c" })),
        )
        .await;
        let token = body["token"].as_str().unwrap().to_string();
        let (status, _) = call(
            &app,
            post_json(
                "/api/v1/quiz/answer",
                Some(&token),
                serde_json::json!({ "topicId": "topic-42", "questionId": "q-1", "option": 0 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn notifications_read_all_and_clear() {
        let app = app();
        let (_, body) = call(&app, Request::get("/api/v1/notifications").body(Body::empty()).unwrap()).await;
        assert_eq!(body["unreadCount"], 7);
        let (_, body) = call(&app, post_json("/api/v1/notifications/reminder-6/read", None, Value::Null)).await;
        assert_eq!(body["unreadCount"], 6);
        let (_, body) = call(&app, post_json("/api/v1/notifications/read_all", None, Value::Null)).await;
        assert_eq!(body["unreadCount"], 0);
        let (status, body) =
            call(&app, Request::delete("/api/v1/notifications").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notifications"].as_array().map(|a| a.len()), Some(0));
    }

    #[tokio::test]
    async fn understanding_values_are_clamped_over_http() {
        let app = app();
        for (value, expected) in [(-5, 0), (150, 100), (300, 100)] {
            let (status, body) = call(
                &app,
                post_json(
                    "/api/v1/understanding",
                    None,
                    serde_json::json!({ "topicId": 9, "topicTitle": "Decorators", "value": value }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["entries"][0]["topicId"], 9);
            assert_eq!(body["entries"][0]["value"], expected);
        }
    }

    #[tokio::test]
    async fn malformed_input_gets_json_error_body() {
        let app = app();
        let req = Request::post("/api/v1/understanding")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let (status, body) = call(&app, req).await;
        assert!(status.is_client_error());
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));

        let (status, body) =
            call(&app, Request::get("/api/v1/understanding/abc").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) =
            call(&app, Request::get("/api/v1/leaderboard?page=-1").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn huge_leaderboard_page_is_empty() {
        let app = app();
        let uri = format!("/api/v1/leaderboard?page={}&limit=2", usize::MAX / 2 + 2);
        let (status, body) = call(&app, Request::get(uri.as_str()).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["leaderboard"].as_array().map(|a| a.len()), Some(0));
        assert_eq!(body["pagination"]["hasNext"], false);
    }

    #[tokio::test]
    async fn topics_filter_and_progress_summary() {
        let app = app();
        let (status, body) =
            call(&app, Request::get("/api/v1/topics?language=java").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(|a| a.len()), Some(1));
        assert_eq!(body[0]["id"], "topic-3");

        let (status, _) =
            call(&app, Request::get("/api/v1/topics?status=pending").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, body) = call(&app, post_json("/api/v1/auth/login", None, serde_json::json!({ "email": "a@b.c" }))).await;
        let token = body["token"].as_str().unwrap().to_string();
        let req = Request::get("/api/v1/me/progress")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalTopics"], 5);
        assert_eq!(body["completionRate"], 20);
        assert_eq!(body["totalScore"], 85);
    }
}
