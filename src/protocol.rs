//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Field names are camelCase to match what the web client sends and reads.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Difficulty, ExplanationStyle, LeaderboardEntry, Notification, NotificationKind, Preferences,
    Quote, Topic, TopicStatus, UnderstandingEntry, User, Wallpaper, WatchedVideo,
};
use crate::progress::ProgressSummary;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Login {
        email: String,
        #[serde(default)]
        password: String,
    },
    Signup {
        name: String,
        email: String,
        #[serde(default)]
        password: String,
    },
    /// Attach an existing HTTP session to this connection.
    Resume {
        token: String,
    },
    Logout,
    StartTopic {
        #[serde(rename = "topicId")]
        topic_id: String,
    },
    CompleteTopic {
        #[serde(rename = "topicId")]
        topic_id: String,
    },
    VideoWatched {
        video: WatchedVideo,
    },
    AddScore {
        points: i64,
    },
    SetStyle {
        style: ExplanationStyle,
    },
    AnswerQuestion {
        #[serde(rename = "topicId")]
        topic_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        option: usize,
    },
    FinishQuiz {
        #[serde(rename = "topicId")]
        topic_id: String,
    },
    SwitchStyle {
        style: ExplanationStyle,
    },
    ResetConfusion,
    Leaderboard {
        #[serde(default)]
        page: Option<usize>,
        #[serde(default)]
        limit: Option<usize>,
    },
    Notifications,
    MarkRead {
        id: String,
    },
    MarkAllRead,
    ClearNotifications,
    SaveUnderstanding(UnderstandingIn),
    ProgressSummary,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session(SessionOut),
    LoggedOut,
    User { user: User },
    Progress(ProgressOut),
    Score(ScoreOut),
    AnswerResult(QuizAnswerOut),
    QuizFinished(QuizFinishOut),
    Leaderboard(crate::leaderboard::Page),
    Notifications(NotificationsOut),
    Understanding(UnderstandingOut),
    ProgressSummary(ProgressSummaryOut),
    Error { message: String },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct LoginIn {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupIn {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionOut {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSummary {
    pub id: String,
    pub language: String,
    pub topic_name: String,
    pub difficulty: Difficulty,
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TopicStatus>,
}

impl TopicSummary {
    pub fn from_topic(t: &Topic, status: Option<TopicStatus>) -> Self {
        Self {
            id: t.id.clone(),
            language: t.language.clone(),
            topic_name: t.topic_name.clone(),
            difficulty: t.difficulty,
            question_count: t.quiz.len(),
            status,
        }
    }
}

/// `GET /topics` filters. `status` needs a session.
#[derive(Debug, Default, Deserialize)]
pub struct TopicsQuery {
    pub language: Option<String>,
    pub status: Option<TopicStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TopicDetailOut {
    pub topic: Topic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TopicStatus>,
}

#[derive(Debug, Serialize)]
pub struct ProgressOut {
    pub changed: bool,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummaryOut {
    #[serde(flatten)]
    pub overview: ProgressSummary,
    pub total_score: i64,
    pub rank: u32,
}

#[derive(Debug, Deserialize)]
pub struct ScoreIn {
    pub points: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOut {
    pub total_score: i64,
    pub rank: u32,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
pub struct StyleIn {
    pub style: ExplanationStyle,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswerIn {
    pub topic_id: String,
    pub question_id: String,
    pub option: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswerOut {
    pub correct: bool,
    pub correct_answer: usize,
    pub attempt_points: i64,
    pub confusion_count: u32,
    pub suggest_style_switch: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizFinishIn {
    pub topic_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizFinishOut {
    pub points: i64,
    pub percentage: u32,
    pub verdict: &'static str,
    pub total_score: i64,
    pub rank: u32,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TopOut {
    #[serde(rename = "topUsers")]
    pub top_users: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRankOut {
    pub user_rank: u32,
    pub user_entry: LeaderboardEntry,
    pub nearby_users: Vec<LeaderboardEntry>,
    pub total_users: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationIn {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub topic_id: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsOut {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderstandingIn {
    pub topic_id: u32,
    pub topic_title: String,
    /// Clamped to 0..=100 on save.
    pub value: i64,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderstandingOut {
    pub entries: Vec<UnderstandingEntry>,
    pub average_understanding: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesIn {
    pub avatar: String,
    pub wallpaper_id: String,
}

#[derive(Debug, Serialize)]
pub struct PreferencesOut {
    pub preferences: Preferences,
}

#[derive(Debug, Serialize)]
pub struct WallpapersOut {
    pub wallpapers: &'static [Wallpaper],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteOut {
    pub quote: Quote,
    pub daily_challenge: &'static str,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_with_camel_case_fields() {
        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"type":"answer_question","topicId":"topic-1","questionId":"q-2","option":2}"#)
                .unwrap();
        assert!(matches!(
            msg,
            ClientWsMessage::AnswerQuestion { ref topic_id, option: 2, .. } if topic_id == "topic-1"
        ));
        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"type":"save_understanding","topicId":6,"topicTitle":"Gen","value":70}"#).unwrap();
        assert!(matches!(msg, ClientWsMessage::SaveUnderstanding(UnderstandingIn { topic_id: 6, .. })));
        let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"set_style","style":"analogy"}"#).unwrap();
        assert!(matches!(msg, ClientWsMessage::SetStyle { style: ExplanationStyle::Analogy }));
    }

    #[test]
    fn topics_query_parses_kebab_case_status() {
        let q: TopicsQuery =
            serde_json::from_str(r#"{"language":"python","status":"in-progress","search":"loop"}"#).unwrap();
        assert_eq!(q.status, Some(TopicStatus::InProgress));
        assert_eq!(q.language.as_deref(), Some("python"));
    }

    #[test]
    fn server_error_message_is_tagged() {
        let out = serde_json::to_value(ServerWsMessage::Error { message: "x".into() }).unwrap();
        assert_eq!(out["type"], "error");
        assert_eq!(out["message"], "x");
    }
}
