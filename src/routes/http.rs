//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Session-scoped endpoints read the token from `Authorization: Bearer <token>`.

use std::sync::Arc;
use axum::{
  extract::{FromRequest, FromRequestParts, State},
  http::{header, HeaderMap, StatusCode},
  response::IntoResponse,
  Json,
};
use chrono::Datelike;
use tracing::{info, instrument};

use crate::domain::{UnderstandingEntry, User, WatchedVideo};
use crate::error::AppError;
use crate::leaderboard::Page;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

/// `Json` whose rejection is reported as an `AppError` JSON body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Bearer token from the request headers, if any.
fn bearer(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

fn require_token(headers: &HeaderMap) -> Result<&str, AppError> {
  bearer(headers).ok_or(AppError::Unauthorized)
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

// -------- Session --------

#[instrument(level = "info", skip(state, body), fields(email = %body.email))]
pub async fn http_login(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<LoginIn>,
) -> Result<Json<SessionOut>, AppError> {
  let out = logic::login(&state, &body.email, &body.password).await?;
  info!(target: "edutwin_backend", user_id = %out.user.id, "HTTP login");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(email = %body.email))]
pub async fn http_signup(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<SignupIn>,
) -> Result<Json<SessionOut>, AppError> {
  let out = logic::signup(&state, &body.name, &body.email, &body.password).await?;
  info!(target: "edutwin_backend", user_id = %out.user.id, "HTTP signup");
  Ok(Json(out))
}

#[instrument(level = "info", skip_all)]
pub async fn http_logout(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<StatusCode, AppError> {
  logic::logout(&state, require_token(&headers)?).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip_all)]
pub async fn http_progress_summary(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<Json<ProgressSummaryOut>, AppError> {
  Ok(Json(logic::progress_summary(&state, require_token(&headers)?).await?))
}

#[instrument(level = "info", skip_all)]
pub async fn http_me(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Json<User>, AppError> {
  Ok(Json(logic::current_user(&state, require_token(&headers)?).await?))
}

// -------- Catalog + progress --------

#[instrument(level = "info", skip(state, headers))]
pub async fn http_list_topics(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiQuery(q): ApiQuery<TopicsQuery>,
) -> Result<Json<Vec<TopicSummary>>, AppError> {
  Ok(Json(logic::list_topics(&state, bearer(&headers), &q).await?))
}

#[instrument(level = "info", skip(state, headers))]
pub async fn http_get_topic(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiPath(id): ApiPath<String>,
) -> Result<Json<TopicDetailOut>, AppError> {
  Ok(Json(logic::topic_detail(&state, bearer(&headers), &id).await?))
}

#[instrument(level = "info", skip(state, headers))]
pub async fn http_start_topic(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiPath(id): ApiPath<String>,
) -> Result<Json<ProgressOut>, AppError> {
  Ok(Json(logic::start_topic(&state, require_token(&headers)?, &id).await?))
}

#[instrument(level = "info", skip(state, headers))]
pub async fn http_complete_topic(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiPath(id): ApiPath<String>,
) -> Result<Json<ProgressOut>, AppError> {
  Ok(Json(logic::complete_topic(&state, require_token(&headers)?, &id).await?))
}

#[instrument(level = "info", skip(state, headers, video), fields(video_id = %video.video.id))]
pub async fn http_video_watched(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiJson(video): ApiJson<WatchedVideo>,
) -> Result<Json<ProgressOut>, AppError> {
  Ok(Json(logic::mark_video_watched(&state, require_token(&headers)?, video).await?))
}

#[instrument(level = "info", skip(state, headers, body), fields(points = body.points))]
pub async fn http_add_score(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiJson(body): ApiJson<ScoreIn>,
) -> Result<Json<ScoreOut>, AppError> {
  Ok(Json(logic::add_score(&state, require_token(&headers)?, body.points).await?))
}

#[instrument(level = "info", skip(state, headers, body), fields(style = ?body.style))]
pub async fn http_set_style(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiJson(body): ApiJson<StyleIn>,
) -> Result<Json<User>, AppError> {
  Ok(Json(logic::set_style(&state, require_token(&headers)?, body.style).await?))
}

// -------- Quiz --------

#[instrument(level = "info", skip(state, headers, body), fields(%body.topic_id, %body.question_id, option = body.option))]
pub async fn http_quiz_answer(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiJson(body): ApiJson<QuizAnswerIn>,
) -> Result<Json<QuizAnswerOut>, AppError> {
  let token = require_token(&headers)?;
  let out = logic::answer_question(&state, token, &body.topic_id, &body.question_id, body.option).await?;
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, headers, body), fields(%body.topic_id))]
pub async fn http_quiz_finish(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiJson(body): ApiJson<QuizFinishIn>,
) -> Result<Json<QuizFinishOut>, AppError> {
  Ok(Json(logic::finish_quiz(&state, require_token(&headers)?, &body.topic_id).await?))
}

#[instrument(level = "info", skip(state, headers, body), fields(style = ?body.style))]
pub async fn http_switch_style(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  ApiJson(body): ApiJson<StyleIn>,
) -> Result<Json<User>, AppError> {
  Ok(Json(logic::switch_style(&state, require_token(&headers)?, body.style).await?))
}

#[instrument(level = "info", skip_all)]
pub async fn http_reset_confusion(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<Json<User>, AppError> {
  Ok(Json(logic::reset_confusion(&state, require_token(&headers)?).await?))
}

// -------- Leaderboard --------

#[instrument(level = "info", skip(state), fields(page = ?q.page, limit = ?q.limit))]
pub async fn http_leaderboard(State(state): State<Arc<AppState>>, ApiQuery(q): ApiQuery<PageQuery>) -> Json<Page> {
  Json(logic::leaderboard_page(&state, q.page, q.limit).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_leaderboard_top(State(state): State<Arc<AppState>>, ApiPath(count): ApiPath<usize>) -> Json<TopOut> {
  Json(logic::leaderboard_top(&state, count).await)
}

#[instrument(level = "info", skip_all)]
pub async fn http_leaderboard_me(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<Json<UserRankOut>, AppError> {
  Ok(Json(logic::leaderboard_me(&state, require_token(&headers)?).await?))
}

// -------- Notifications --------

#[instrument(level = "info", skip_all)]
pub async fn http_notifications(State(state): State<Arc<AppState>>) -> Json<NotificationsOut> {
  Json(logic::notifications(&state).await)
}

#[instrument(level = "info", skip(state, body), fields(kind = body.kind.as_str()))]
pub async fn http_add_notification(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<NotificationIn>,
) -> Result<Json<NotificationsOut>, AppError> {
  Ok(Json(logic::add_notification(&state, body).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_mark_read(
  State(state): State<Arc<AppState>>,
  ApiPath(id): ApiPath<String>,
) -> Result<Json<NotificationsOut>, AppError> {
  Ok(Json(logic::mark_notification_read(&state, &id).await?))
}

#[instrument(level = "info", skip_all)]
pub async fn http_mark_all_read(State(state): State<Arc<AppState>>) -> Result<Json<NotificationsOut>, AppError> {
  Ok(Json(logic::mark_all_notifications_read(&state).await?))
}

#[instrument(level = "info", skip_all)]
pub async fn http_clear_notifications(State(state): State<Arc<AppState>>) -> Result<Json<NotificationsOut>, AppError> {
  Ok(Json(logic::clear_notifications(&state).await?))
}

// -------- Understanding --------

#[instrument(level = "info", skip_all)]
pub async fn http_understanding(State(state): State<Arc<AppState>>) -> Json<UnderstandingOut> {
  Json(logic::understanding(&state).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_understanding_for_topic(
  State(state): State<Arc<AppState>>,
  ApiPath(topic_id): ApiPath<u32>,
) -> Result<Json<UnderstandingEntry>, AppError> {
  Ok(Json(logic::understanding_for_topic(&state, topic_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(topic_id = body.topic_id, value = body.value))]
pub async fn http_save_understanding(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<UnderstandingIn>,
) -> Result<Json<UnderstandingOut>, AppError> {
  Ok(Json(logic::save_understanding(&state, body).await?))
}

// -------- Preferences + catalog extras --------

#[instrument(level = "info", skip_all)]
pub async fn http_preferences(State(state): State<Arc<AppState>>) -> Json<PreferencesOut> {
  Json(logic::preferences(&state).await)
}

#[instrument(level = "info", skip(state, body), fields(%body.wallpaper_id))]
pub async fn http_save_preferences(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<PreferencesIn>,
) -> Result<Json<PreferencesOut>, AppError> {
  Ok(Json(logic::save_preferences(&state, body).await?))
}

#[instrument(level = "info")]
pub async fn http_wallpapers() -> Json<WallpapersOut> { Json(logic::wallpapers()) }

#[instrument(level = "info")]
pub async fn http_quote() -> Json<QuoteOut> {
  Json(logic::quote(chrono::Utc::now().ordinal()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  #[test]
  fn bearer_token_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(bearer(&headers), None);
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
    assert_eq!(bearer(&headers), None);
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
    assert!(matches!(require_token(&headers), Err(AppError::Unauthorized)));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok-1"));
    assert_eq!(bearer(&headers), Some("tok-1"));
  }
}
