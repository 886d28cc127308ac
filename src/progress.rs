//! Learning-progress operations on a session user.
//!
//! Unknown or repeated topic ids never fail; the call just reports that
//! nothing changed.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{ExplanationStyle, Progress, TopicStatus, User, WatchedVideo};
use crate::leaderboard::Leaderboard;
use crate::util::percent;

/// Topic counts for the dashboard overview.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
  pub total_topics: usize,
  pub completed_topics: usize,
  pub in_progress_topics: usize,
  pub pending_topics: usize,
  /// Rounded percentage of completed topics; 0 with no topics.
  pub completion_rate: u32,
  pub videos_watched: usize,
}

impl Progress {
  /// pending -> in-progress. No-op if already completed or in progress.
  pub fn start_topic(&mut self, topic_id: &str) -> bool {
    if self.is_completed(topic_id) || self.in_progress_topics.iter().any(|t| t == topic_id) {
      return false;
    }
    self.in_progress_topics.push(topic_id.to_string());
    self.pending_topics.retain(|t| t != topic_id);
    true
  }

  /// Any state -> completed. Returns true only the first time.
  pub fn complete_topic(&mut self, topic_id: &str) -> bool {
    let newly = !self.is_completed(topic_id);
    if newly {
      self.completed_topics.push(topic_id.to_string());
    }
    self.pending_topics.retain(|t| t != topic_id);
    self.in_progress_topics.retain(|t| t != topic_id);
    newly
  }

  /// Most recent first; a video id is recorded once.
  pub fn mark_video_watched(&mut self, video: WatchedVideo) -> bool {
    if self.videos_watched.iter().any(|v| v.video.id == video.video.id) {
      return false;
    }
    self.videos_watched.insert(0, video);
    true
  }

  pub fn topic_status(&self, topic_id: &str) -> TopicStatus {
    if self.is_completed(topic_id) {
      TopicStatus::Completed
    } else if self.in_progress_topics.iter().any(|t| t == topic_id) {
      TopicStatus::InProgress
    } else {
      TopicStatus::Pending
    }
  }

  pub fn summary(&self) -> ProgressSummary {
    let completed = self.completed_topics.len();
    let total = completed + self.in_progress_topics.len() + self.pending_topics.len();
    ProgressSummary {
      total_topics: total,
      completed_topics: completed,
      in_progress_topics: self.in_progress_topics.len(),
      pending_topics: self.pending_topics.len(),
      completion_rate: percent(completed as i64, total as i64),
      videos_watched: self.videos_watched.len(),
    }
  }

  pub fn is_completed(&self, topic_id: &str) -> bool {
    self.completed_topics.iter().any(|t| t == topic_id)
  }

  pub fn set_preferred_style(&mut self, style: ExplanationStyle) {
    self.preferred_style = style;
  }

  pub fn increment_confusion(&mut self) -> u32 {
    self.confusion_count = self.confusion_count.saturating_add(1);
    self.confusion_count
  }

  pub fn reset_confusion(&mut self) {
    self.confusion_count = 0;
  }

  /// Whether repeated wrong answers warrant suggesting another explanation style.
  pub fn needs_style_switch(&self, threshold: u32) -> bool {
    self.confusion_count >= threshold
  }
}

impl User {
  /// Add points and push the new total into the leaderboard. The user's rank
  /// follows the board.
  #[instrument(level = "debug", skip(self, board), fields(user_id = %self.id))]
  pub fn add_score(&mut self, points: i64, board: &mut Leaderboard) -> i64 {
    self.progress.total_score = self.progress.total_score.saturating_add(points);
    self.rank = board.record_score(
      &self.id,
      &self.name,
      &self.avatar,
      self.progress.total_score,
      self.progress.completed_topics.len(),
    );
    debug!(target: "progress", user_id = %self.id, points, total = self.progress.total_score, rank = self.rank, "Score updated");
    self.progress.total_score
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Video;
  use crate::seeds::{demo_user, seed_leaderboard};

  fn video(id: &str) -> WatchedVideo {
    WatchedVideo {
      video: Video {
        id: id.into(),
        title: "t".into(),
        language: "Python".into(),
        youtube_id: "y".into(),
        thumbnail: String::new(),
        duration: "1:00".into(),
      },
      watched_at: "2026-02-21".into(),
      time_watched: "0:30".into(),
    }
  }

  #[test]
  fn start_moves_pending_to_in_progress_once() {
    let mut p = demo_user().progress;
    assert!(p.start_topic("topic-3"));
    assert_eq!(p.topic_status("topic-3"), TopicStatus::InProgress);
    assert!(!p.pending_topics.contains(&"topic-3".to_string()));
    assert!(!p.start_topic("topic-3"));
    assert_eq!(p.in_progress_topics.iter().filter(|t| *t == "topic-3").count(), 1);
  }

  #[test]
  fn start_ignores_completed_topic() {
    let mut p = demo_user().progress;
    assert!(!p.start_topic("topic-1"));
    assert_eq!(p.topic_status("topic-1"), TopicStatus::Completed);
  }

  #[test]
  fn complete_is_idempotent_and_clears_other_lists() {
    let mut p = demo_user().progress;
    assert!(p.complete_topic("topic-2"));
    assert!(!p.complete_topic("topic-2"));
    assert_eq!(p.completed_topics, vec!["topic-1".to_string(), "topic-2".to_string()]);
    assert!(p.in_progress_topics.is_empty());
    assert!(p.complete_topic("topic-4"));
    assert!(!p.pending_topics.contains(&"topic-4".to_string()));
  }

  #[test]
  fn watched_video_is_deduped_and_prepended() {
    let mut p = Progress::default();
    assert!(p.mark_video_watched(video("a")));
    assert!(p.mark_video_watched(video("b")));
    assert!(!p.mark_video_watched(video("a")));
    let ids: Vec<_> = p.videos_watched.iter().map(|v| v.video.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
  }

  #[test]
  fn confusion_counter_drives_style_switch() {
    let mut p = Progress::default();
    p.increment_confusion();
    assert!(!p.needs_style_switch(2));
    p.increment_confusion();
    assert!(p.needs_style_switch(2));
    p.reset_confusion();
    assert_eq!(p.confusion_count, 0);
  }

  #[test]
  fn add_score_updates_rank_from_leaderboard() {
    let mut board = Leaderboard::new(seed_leaderboard());
    let mut user = demo_user();
    assert_eq!(user.add_score(70, &mut board), 155);
    assert_eq!(user.rank, 1);
    assert_eq!(board.entries()[0].user_id, user.id);
  }

  #[test]
  fn summary_counts_and_rate() {
    let mut user = demo_user();
    let summary = user.progress.summary();
    assert_eq!(summary.total_topics, 5);
    assert_eq!(summary.completed_topics, 1);
    assert_eq!(summary.in_progress_topics, 1);
    assert_eq!(summary.pending_topics, 3);
    assert_eq!(summary.completion_rate, 20);
    assert_eq!(summary.videos_watched, 2);

    user.progress.complete_topic("topic-3");
    assert_eq!(user.progress.summary().completion_rate, 40);
    assert_eq!(Progress::default().summary().completion_rate, 0);
  }
}
