//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Session lifecycle (mock login/signup/logout)
//!   - Progress actions (start/complete topics, watched videos, score, style)
//!   - The quiz flow (answer, confusion tracking, finish)
//!   - Leaderboard views
//!   - Notification, understanding and preference feeds

use rand::seq::SliceRandom;
use tracing::{debug, info, instrument, warn};

use crate::auth;
use crate::domain::{ExplanationStyle, LeaderboardEntry, NotificationKind, Topic, User, WatchedVideo};
use crate::error::AppError;
use crate::leaderboard::Page;
use crate::notifications::{CONGRATS_TEMPLATE, CONGRATS_TITLE};
use crate::protocol::*;
use crate::quiz::{verdict, QuizAttempt};
use crate::seeds::{DAILY_CHALLENGES, MOTIVATIONAL_QUOTES, WALLPAPERS};
use crate::state::AppState;
use crate::util::{fill_template, percent};

/// `topic-3` -> 3. Feed entries refer to topics by number.
pub fn numeric_topic_id(topic_id: &str) -> Option<u32> {
  topic_id.strip_prefix("topic-")?.parse().ok()
}

// -------- Session --------

#[instrument(level = "info", skip(state, password))]
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<SessionOut, AppError> {
  let mut user = auth::login(email, password).ok_or_else(|| AppError::BadRequest("email is required".into()))?;
  // Score and rank carry over from earlier sessions through the shared board.
  if let Some(entry) = state.leaderboard.read().await.position(&user.id) {
    user.progress.total_score = entry.score;
    user.rank = entry.rank;
  }
  let token = state.sessions.write().await.create(user.clone());
  Ok(SessionOut { token, user })
}

#[instrument(level = "info", skip(state, password))]
pub async fn signup(state: &AppState, name: &str, email: &str, password: &str) -> Result<SessionOut, AppError> {
  let rank = state.leaderboard.read().await.next_rank();
  let user = auth::signup(name, email, password, &state.catalog, rank)
    .ok_or_else(|| AppError::BadRequest("name and email are required".into()))?;
  let token = state.sessions.write().await.create(user.clone());
  Ok(SessionOut { token, user })
}

#[instrument(level = "info", skip_all)]
pub async fn logout(state: &AppState, token: &str) -> Result<(), AppError> {
  let session = state.sessions.write().await.remove(token).ok_or(AppError::Unauthorized)?;
  info!(target: "edutwin_backend", user_id = %session.user.id, "Session ended");
  Ok(())
}

#[instrument(level = "debug", skip_all)]
pub async fn current_user(state: &AppState, token: &str) -> Result<User, AppError> {
  state.with_session(token, |s| s.user.clone()).await
}

// -------- Catalog --------

/// Status is included only when a session is attached. Language and search
/// match case-insensitively; filtering by status requires a session.
pub async fn list_topics(
  state: &AppState,
  token: Option<&str>,
  filter: &TopicsQuery,
) -> Result<Vec<TopicSummary>, AppError> {
  let user = match token {
    Some(t) => current_user(state, t).await.ok(),
    None => None,
  };
  if filter.status.is_some() && user.is_none() {
    return Err(AppError::Unauthorized);
  }
  let language = filter.language.as_deref().map(str::to_lowercase);
  let search = filter.search.as_deref().map(str::to_lowercase);

  let topics = state
    .catalog
    .iter()
    .map(|t| TopicSummary::from_topic(t, user.as_ref().map(|u| u.progress.topic_status(&t.id))))
    .filter(|t| language.as_ref().map_or(true, |l| t.language.to_lowercase() == *l))
    .filter(|t| search.as_ref().map_or(true, |q| t.topic_name.to_lowercase().contains(q.as_str())))
    .filter(|t| filter.status.map_or(true, |st| t.status == Some(st)))
    .collect();
  Ok(topics)
}

pub async fn topic_detail(state: &AppState, token: Option<&str>, topic_id: &str) -> Result<TopicDetailOut, AppError> {
  let topic = state.topic(topic_id).ok_or_else(|| AppError::NotFound(format!("topic {}", topic_id)))?;
  let status = match token {
    Some(t) => current_user(state, t).await.ok().map(|u| u.progress.topic_status(topic_id)),
    None => None,
  };
  Ok(TopicDetailOut { topic: topic.clone(), status })
}

// -------- Progress --------

#[instrument(level = "info", skip(state, token))]
pub async fn start_topic(state: &AppState, token: &str, topic_id: &str) -> Result<ProgressOut, AppError> {
  let known = state.topic(topic_id).is_some();
  state
    .with_session(token, |s| {
      if !known {
        warn!(target: "progress", %topic_id, "Unknown topic; start ignored");
        return ProgressOut { changed: false, user: s.user.clone() };
      }
      let changed = s.user.progress.start_topic(topic_id);
      debug!(target: "progress", %topic_id, changed, "Topic started");
      ProgressOut { changed, user: s.user.clone() }
    })
    .await
}

/// Completing a topic for the first time also posts a congrats notification.
#[instrument(level = "info", skip(state, token))]
pub async fn complete_topic(state: &AppState, token: &str, topic_id: &str) -> Result<ProgressOut, AppError> {
  let Some(topic) = state.topic(topic_id) else {
    warn!(target: "progress", %topic_id, "Unknown topic; complete ignored");
    let user = current_user(state, token).await?;
    return Ok(ProgressOut { changed: false, user });
  };
  let out = state
    .with_session(token, |s| {
      let changed = s.user.progress.complete_topic(topic_id);
      ProgressOut { changed, user: s.user.clone() }
    })
    .await?;

  if out.changed {
    post_congrats(state, topic).await;
    info!(target: "progress", %topic_id, "Topic completed");
  }
  Ok(out)
}

/// The completion is already committed, so a failed write is only logged.
async fn post_congrats(state: &AppState, topic: &Topic) {
  let message = fill_template(CONGRATS_TEMPLATE, &[("title", topic.topic_name.as_str())]);
  let added = state
    .notifications
    .write()
    .await
    .add(NotificationKind::Congrats, CONGRATS_TITLE.into(), message, numeric_topic_id(&topic.id));
  if let Err(e) = added {
    warn!(target: "notifications", topic_id = %topic.id, error = %e, "Failed to post congrats notification");
  }
}

/// Topic counts plus score and rank for the dashboard.
#[instrument(level = "debug", skip_all)]
pub async fn progress_summary(state: &AppState, token: &str) -> Result<ProgressSummaryOut, AppError> {
  state
    .with_session(token, |s| ProgressSummaryOut {
      overview: s.user.progress.summary(),
      total_score: s.user.progress.total_score,
      rank: s.user.rank,
    })
    .await
}

#[instrument(level = "info", skip(state, token, video), fields(video_id = %video.video.id))]
pub async fn mark_video_watched(state: &AppState, token: &str, video: WatchedVideo) -> Result<ProgressOut, AppError> {
  state
    .with_session(token, |s| {
      let changed = s.user.progress.mark_video_watched(video);
      ProgressOut { changed, user: s.user.clone() }
    })
    .await
}

#[instrument(level = "info", skip(state, token))]
pub async fn add_score(state: &AppState, token: &str, points: i64) -> Result<ScoreOut, AppError> {
  state
    .with_session_and_board(token, |s, board| {
      let total_score = s.user.add_score(points, board);
      ScoreOut { total_score, rank: s.user.rank, leaderboard: board.entries().to_vec() }
    })
    .await
}

#[instrument(level = "info", skip(state, token))]
pub async fn set_style(state: &AppState, token: &str, style: ExplanationStyle) -> Result<User, AppError> {
  state
    .with_session(token, |s| {
      s.user.progress.set_preferred_style(style);
      s.user.clone()
    })
    .await
}

#[instrument(level = "info", skip(state, token))]
pub async fn reset_confusion(state: &AppState, token: &str) -> Result<User, AppError> {
  state
    .with_session(token, |s| {
      s.user.progress.reset_confusion();
      s.user.clone()
    })
    .await
}

// -------- Quiz --------

/// Grade one answer and update the confusion counter. Answering a question of
/// another topic starts a fresh attempt.
#[instrument(level = "info", skip(state, token))]
pub async fn answer_question(
  state: &AppState,
  token: &str,
  topic_id: &str,
  question_id: &str,
  option: usize,
) -> Result<QuizAnswerOut, AppError> {
  let topic = state.topic(topic_id).ok_or_else(|| AppError::NotFound(format!("topic {}", topic_id)))?;
  let question = topic
    .question(question_id)
    .ok_or_else(|| AppError::NotFound(format!("question {} of {}", question_id, topic_id)))?;
  let points = state.config.quiz.points_per_correct;
  let threshold = state.config.quiz.confusion_threshold;

  state
    .with_session(token, |s| {
      let current = match s.quiz.take() {
        Some(a) if a.topic_id == topic_id => a,
        _ => QuizAttempt::new(topic_id),
      };
      let attempt = s.quiz.insert(current);
      let correct = attempt.answer(question, option, points);
      let attempt_points = attempt.points;
      if correct {
        s.user.progress.reset_confusion();
      } else {
        s.user.progress.increment_confusion();
      }
      let confusion_count = s.user.progress.confusion_count;
      let suggest_style_switch = s.user.progress.needs_style_switch(threshold);
      if suggest_style_switch {
        info!(target: "progress", %topic_id, confusion_count, "Suggesting another explanation style");
      }
      QuizAnswerOut {
        correct,
        correct_answer: question.correct_answer,
        attempt_points,
        confusion_count,
        suggest_style_switch,
      }
    })
    .await
}

/// Accept the suggested style switch: new style, confusion back to zero.
#[instrument(level = "info", skip(state, token))]
pub async fn switch_style(state: &AppState, token: &str, style: ExplanationStyle) -> Result<User, AppError> {
  state
    .with_session(token, |s| {
      s.user.progress.set_preferred_style(style);
      s.user.progress.reset_confusion();
      s.user.clone()
    })
    .await
}

/// Commit the attempt: complete the topic, add its points, post congrats.
#[instrument(level = "info", skip(state, token))]
pub async fn finish_quiz(state: &AppState, token: &str, topic_id: &str) -> Result<QuizFinishOut, AppError> {
  let topic = state.topic(topic_id).ok_or_else(|| AppError::NotFound(format!("topic {}", topic_id)))?;
  let max_points = topic.quiz.len() as i64 * state.config.quiz.points_per_correct;

  let (out, newly_completed) = state
    .with_session_and_board(token, |s, board| {
      let points = match s.quiz.take() {
        Some(a) if a.topic_id == topic_id => {
          debug!(target: "progress", %topic_id, answered = a.answered_count(), "Closing quiz attempt");
          a.points
        }
        other => {
          s.quiz = other;
          0
        }
      };
      let newly_completed = s.user.progress.complete_topic(topic_id);
      let total_score = s.user.add_score(points, board);
      let percentage = percent(points, max_points);
      let out = QuizFinishOut { points, percentage, verdict: verdict(percentage), total_score, rank: s.user.rank };
      (out, newly_completed)
    })
    .await?;

  if newly_completed {
    post_congrats(state, topic).await;
  }
  info!(target: "progress", %topic_id, points = out.points, percentage = out.percentage, "Quiz finished");
  Ok(out)
}

// -------- Leaderboard --------

pub async fn leaderboard_page(state: &AppState, page: Option<usize>, limit: Option<usize>) -> Page {
  let limit = limit.unwrap_or(state.config.leaderboard.page_size);
  state.leaderboard.read().await.page(page.unwrap_or(1), limit)
}

pub async fn leaderboard_top(state: &AppState, count: usize) -> TopOut {
  TopOut { top_users: state.leaderboard.read().await.top(count) }
}

/// The caller's rank and neighbours. A user who has not scored yet gets a
/// provisional entry one past the end of the board.
#[instrument(level = "debug", skip_all)]
pub async fn leaderboard_me(state: &AppState, token: &str) -> Result<UserRankOut, AppError> {
  let user = current_user(state, token).await?;
  let board = state.leaderboard.read().await;
  let out = match board.position(&user.id) {
    Some(entry) => UserRankOut {
      user_rank: entry.rank,
      user_entry: entry.clone(),
      nearby_users: board.nearby(&user.id),
      total_users: board.len(),
    },
    None => {
      let entry = LeaderboardEntry {
        rank: board.next_rank(),
        user_id: user.id.clone(),
        name: user.name.clone(),
        score: user.progress.total_score,
        topics_completed: user.progress.completed_topics.len(),
        avatar: user.avatar.clone(),
      };
      let start = board.len().saturating_sub(2);
      let mut nearby = board.entries()[start..].to_vec();
      nearby.push(entry.clone());
      UserRankOut { user_rank: entry.rank, user_entry: entry, nearby_users: nearby, total_users: board.len() + 1 }
    }
  };
  Ok(out)
}

// -------- Feeds --------

pub async fn notifications(state: &AppState) -> NotificationsOut {
  let feed = state.notifications.read().await;
  NotificationsOut { notifications: feed.list().to_vec(), unread_count: feed.unread_count() }
}

#[instrument(level = "info", skip(state, body))]
pub async fn add_notification(state: &AppState, body: NotificationIn) -> Result<NotificationsOut, AppError> {
  state.notifications.write().await.add(body.kind, body.title, body.message, body.topic_id)?;
  Ok(notifications(state).await)
}

pub async fn mark_notification_read(state: &AppState, id: &str) -> Result<NotificationsOut, AppError> {
  state.notifications.write().await.mark_read(id)?;
  Ok(notifications(state).await)
}

pub async fn mark_all_notifications_read(state: &AppState) -> Result<NotificationsOut, AppError> {
  state.notifications.write().await.mark_all_read()?;
  Ok(notifications(state).await)
}

pub async fn clear_notifications(state: &AppState) -> Result<NotificationsOut, AppError> {
  state.notifications.write().await.clear()?;
  Ok(notifications(state).await)
}

pub async fn understanding(state: &AppState) -> UnderstandingOut {
  let feed = state.understanding.read().await;
  UnderstandingOut { entries: feed.entries().to_vec(), average_understanding: feed.average() }
}

pub async fn understanding_for_topic(state: &AppState, topic_id: u32) -> Result<crate::domain::UnderstandingEntry, AppError> {
  state
    .understanding
    .read()
    .await
    .get_by_topic(topic_id)
    .cloned()
    .ok_or_else(|| AppError::NotFound(format!("understanding for topic {}", topic_id)))
}

#[instrument(level = "info", skip(state, body), fields(topic_id = body.topic_id))]
pub async fn save_understanding(state: &AppState, body: UnderstandingIn) -> Result<UnderstandingOut, AppError> {
  state
    .understanding
    .write()
    .await
    .save(body.topic_id, body.topic_title, body.value, body.label)?;
  Ok(understanding(state).await)
}

pub async fn preferences(state: &AppState) -> PreferencesOut {
  PreferencesOut { preferences: state.preferences.read().await.get().clone() }
}

#[instrument(level = "info", skip(state, body))]
pub async fn save_preferences(state: &AppState, body: PreferencesIn) -> Result<PreferencesOut, AppError> {
  let preferences = state.preferences.write().await.save(body.avatar, body.wallpaper_id)?;
  Ok(PreferencesOut { preferences })
}

pub fn wallpapers() -> WallpapersOut {
  WallpapersOut { wallpapers: WALLPAPERS }
}

/// Random quote plus the daily challenge for `day_of_year` (1-based).
pub fn quote(day_of_year: u32) -> QuoteOut {
  let quote = MOTIVATIONAL_QUOTES
    .choose(&mut rand::thread_rng())
    .unwrap_or(&MOTIVATIONAL_QUOTES[0])
    .clone();
  let daily_challenge = DAILY_CHALLENGES[day_of_year as usize % DAILY_CHALLENGES.len()];
  QuoteOut { quote, daily_challenge }
}
