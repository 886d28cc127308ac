//! Domain models: catalog topics, users and their progress, leaderboard entries,
//! notifications, understanding entries, and preferences.
//!
//! Field names serialize as camelCase so stored blobs and API payloads keep the
//! shape the web client already reads.

use serde::{Deserialize, Serialize};

/// Presentation mode for the same topic content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationStyle {
  #[default]
  Visual,
  Simplified,
  Logical,
  Analogy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicStatus {
  Completed,
  Pending,
  InProgress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Explanation {
  pub style: ExplanationStyle,
  pub title: String,
  pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
  pub id: String,
  pub question: String,
  pub options: Vec<String>,
  pub correct_answer: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
  pub id: String,
  pub title: String,
  pub language: String,
  pub youtube_id: String,
  pub thumbnail: String,
  pub duration: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedVideo {
  #[serde(flatten)]
  pub video: Video,
  pub watched_at: String,
  pub time_watched: String,
}

/// Static catalog entry. Read-only once the catalog is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
  pub id: String,
  pub language: String,
  pub topic_name: String,
  pub difficulty: Difficulty,
  pub overview: String,
  pub explanations: Vec<Explanation>,
  pub quiz: Vec<QuizQuestion>,
  pub recommended_videos: Vec<Video>,
}

impl Topic {
  pub fn question(&self, question_id: &str) -> Option<&QuizQuestion> {
    self.quiz.iter().find(|q| q.id == question_id)
  }
}

/// Learning progress carried by a session user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
  pub completed_topics: Vec<String>,
  pub pending_topics: Vec<String>,
  pub in_progress_topics: Vec<String>,
  pub videos_watched: Vec<WatchedVideo>,
  pub total_score: i64,
  pub preferred_style: ExplanationStyle,
  pub confusion_count: u32,
}

/// Session-scoped user. Never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: String,
  pub name: String,
  pub email: String,
  pub avatar: String,
  pub rank: u32,
  #[serde(flatten)]
  pub progress: Progress,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
  pub rank: u32,
  pub user_id: String,
  pub name: String,
  pub score: i64,
  pub topics_completed: usize,
  pub avatar: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  Reminder,
  Congrats,
  Info,
}

impl NotificationKind {
  pub fn as_str(self) -> &'static str {
    match self {
      NotificationKind::Reminder => "reminder",
      NotificationKind::Congrats => "congrats",
      NotificationKind::Info => "info",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
  pub id: String,
  #[serde(rename = "type")]
  pub kind: NotificationKind,
  pub title: String,
  pub message: String,
  /// Milliseconds since the Unix epoch.
  pub timestamp: i64,
  pub read: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub topic_id: Option<u32>,
}

/// Self-rated understanding of one topic (0-100).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderstandingEntry {
  pub topic_id: u32,
  pub topic_title: String,
  pub value: u8,
  pub label: String,
  pub saved_at: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallpaperCategory {
  Pastel,
  Dark,
  Gaming,
  Aesthetic,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallpaper {
  pub id: &'static str,
  pub name: &'static str,
  pub category: WallpaperCategory,
  pub gradient: &'static str,
}

/// Persisted preference blob. Only these two fields are stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPreferences {
  #[serde(default)]
  pub avatar: String,
  #[serde(default)]
  pub wallpaper_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
  pub avatar: String,
  pub wallpaper_id: String,
  pub wallpaper: Wallpaper,
}

#[derive(Clone, Debug, Serialize)]
pub struct Quote {
  pub quote: &'static str,
  pub author: &'static str,
}
