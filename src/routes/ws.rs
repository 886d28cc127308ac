//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.
//!
//! A connection is bound to a session by `login`, `signup` or `resume`; the
//! token lives for the lifetime of the socket.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::error::AppError;
use crate::logic;
use crate::protocol::{ClientWsMessage, ServerWsMessage, SessionOut};
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "edutwin_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "edutwin_backend", "WebSocket connected");
  let mut token: Option<String> = None;
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "edutwin_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut token)
              .await
              .unwrap_or_else(|e| ServerWsMessage::Error { message: e.to_string() })
          }
          Err(e) => {
            debug!(target: "edutwin_backend", raw = %trunc_for_log(&txt, 200), "WS unparsable message");
            ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }
          }
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "edutwin_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "edutwin_backend", bound = token.is_some(), "WebSocket disconnected");
}

fn bound(token: &Option<String>) -> Result<&str, AppError> {
  token.as_deref().ok_or(AppError::Unauthorized)
}

fn bind(token: &mut Option<String>, out: SessionOut) -> ServerWsMessage {
  *token = Some(out.token.clone());
  ServerWsMessage::Session(out)
}

#[instrument(level = "info", skip(state, token))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  token: &mut Option<String>,
) -> Result<ServerWsMessage, AppError> {
  let reply = match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Login { email, password } => bind(token, logic::login(state, &email, &password).await?),

    ClientWsMessage::Signup { name, email, password } => {
      bind(token, logic::signup(state, &name, &email, &password).await?)
    }

    ClientWsMessage::Resume { token: t } => {
      let user = logic::current_user(state, &t).await?;
      info!(target: "edutwin_backend", user_id = %user.id, "WS session resumed");
      bind(token, SessionOut { token: t, user })
    }

    ClientWsMessage::Logout => {
      logic::logout(state, bound(token)?).await?;
      *token = None;
      ServerWsMessage::LoggedOut
    }

    ClientWsMessage::StartTopic { topic_id } => {
      ServerWsMessage::Progress(logic::start_topic(state, bound(token)?, &topic_id).await?)
    }

    ClientWsMessage::CompleteTopic { topic_id } => {
      ServerWsMessage::Progress(logic::complete_topic(state, bound(token)?, &topic_id).await?)
    }

    ClientWsMessage::VideoWatched { video } => {
      ServerWsMessage::Progress(logic::mark_video_watched(state, bound(token)?, video).await?)
    }

    ClientWsMessage::AddScore { points } => ServerWsMessage::Score(logic::add_score(state, bound(token)?, points).await?),

    ClientWsMessage::SetStyle { style } => {
      ServerWsMessage::User { user: logic::set_style(state, bound(token)?, style).await? }
    }

    ClientWsMessage::AnswerQuestion { topic_id, question_id, option } => {
      let out = logic::answer_question(state, bound(token)?, &topic_id, &question_id, option).await?;
      ServerWsMessage::AnswerResult(out)
    }

    ClientWsMessage::FinishQuiz { topic_id } => {
      ServerWsMessage::QuizFinished(logic::finish_quiz(state, bound(token)?, &topic_id).await?)
    }

    ClientWsMessage::SwitchStyle { style } => {
      ServerWsMessage::User { user: logic::switch_style(state, bound(token)?, style).await? }
    }

    ClientWsMessage::ResetConfusion => {
      ServerWsMessage::User { user: logic::reset_confusion(state, bound(token)?).await? }
    }

    ClientWsMessage::Leaderboard { page, limit } => {
      ServerWsMessage::Leaderboard(logic::leaderboard_page(state, page, limit).await)
    }

    ClientWsMessage::Notifications => ServerWsMessage::Notifications(logic::notifications(state).await),

    ClientWsMessage::MarkRead { id } => {
      ServerWsMessage::Notifications(logic::mark_notification_read(state, &id).await?)
    }

    ClientWsMessage::MarkAllRead => {
      ServerWsMessage::Notifications(logic::mark_all_notifications_read(state).await?)
    }

    ClientWsMessage::ClearNotifications => ServerWsMessage::Notifications(logic::clear_notifications(state).await?),

    ClientWsMessage::SaveUnderstanding(body) => {
      ServerWsMessage::Understanding(logic::save_understanding(state, body).await?)
    }

    ClientWsMessage::ProgressSummary => {
      ServerWsMessage::ProgressSummary(logic::progress_summary(state, bound(token)?).await?)
    }
  };
  Ok(reply)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::storage::MemoryStore;

  fn state() -> AppState {
    AppState::with_store(AppConfig::default(), Arc::new(MemoryStore::new()))
  }

  fn parse(json: &str) -> ClientWsMessage {
    serde_json::from_str(json).unwrap()
  }

  #[tokio::test]
  async fn unbound_connection_is_rejected_for_session_messages() {
    let state = state();
    let mut token = None;
    let res = handle_client_ws(parse(r#"{"type":"add_score","points":5}"#), &state, &mut token).await;
    assert!(matches!(res, Err(AppError::Unauthorized)));
  }

  #[tokio::test]
  async fn login_binds_and_logout_unbinds() {
    let state = state();
    let mut token = None;
    let reply = handle_client_ws(parse(r#"{"type":"login","email":"alex@edutwin.com"}"#), &state, &mut token)
      .await
      .unwrap();
    assert!(matches!(reply, ServerWsMessage::Session(_)));
    assert!(token.is_some());

    let reply = handle_client_ws(parse(r#"{"type":"add_score","points":70}"#), &state, &mut token).await.unwrap();
    match reply {
      ServerWsMessage::Score(out) => {
        assert_eq!(out.total_score, 155);
        assert_eq!(out.rank, 1);
      }
      other => panic!("unexpected reply: {:?}", other),
    }

    let reply = handle_client_ws(parse(r#"{"type":"logout"}"#), &state, &mut token).await.unwrap();
    assert!(matches!(reply, ServerWsMessage::LoggedOut));
    assert!(token.is_none());
    assert_eq!(state.sessions.read().await.len(), 0);
  }

  #[tokio::test]
  async fn resume_attaches_an_existing_session() {
    let state = state();
    let session = logic::login(&state, "alex@edutwin.com", "").await.unwrap();
    let mut token = None;
    let msg = format!(r#"{{"type":"resume","token":"{}"}}"#, session.token);
    handle_client_ws(parse(&msg), &state, &mut token).await.unwrap();
    assert_eq!(token.as_deref(), Some(session.token.as_str()));

    let mut other = None;
    let res = handle_client_ws(parse(r#"{"type":"resume","token":"bogus"}"#), &state, &mut other).await;
    assert!(matches!(res, Err(AppError::Unauthorized)));
  }

  #[tokio::test]
  async fn progress_summary_over_ws() {
    let state = state();
    let mut token = None;
    handle_client_ws(parse(r#"{"type":"login","email":"a@b.c"}"#), &state, &mut token).await.unwrap();
    match handle_client_ws(parse(r#"{"type":"progress_summary"}"#), &state, &mut token).await.unwrap() {
      ServerWsMessage::ProgressSummary(out) => {
        assert_eq!(out.overview.total_topics, 5);
        assert_eq!(out.rank, 3);
      }
      other => panic!("unexpected reply: {:?}", other),
    }
  }
}
