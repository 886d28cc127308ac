//! Loading service configuration (storage backend, quiz tuning, leaderboard
//! paging) from TOML.
//!
//! See `AppConfig` for the expected schema. Every section is optional.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub storage: StorageCfg,
  #[serde(default)]
  pub quiz: QuizCfg,
  #[serde(default)]
  pub leaderboard: LeaderboardCfg,
}

#[derive(Clone, Copy, Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
  #[default]
  File,
  Memory,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageCfg {
  #[serde(default)]
  pub backend: StorageBackend,
  #[serde(default = "default_data_dir")]
  pub dir: PathBuf,
}

impl Default for StorageCfg {
  fn default() -> Self {
    Self { backend: StorageBackend::default(), dir: default_data_dir() }
  }
}

fn default_data_dir() -> PathBuf {
  PathBuf::from("./data")
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuizCfg {
  /// Points for each correctly answered question.
  #[serde(default = "default_points")]
  pub points_per_correct: i64,
  /// Wrong answers in a row before suggesting another explanation style.
  #[serde(default = "default_threshold")]
  pub confusion_threshold: u32,
}

impl Default for QuizCfg {
  fn default() -> Self {
    Self { points_per_correct: default_points(), confusion_threshold: default_threshold() }
  }
}

fn default_points() -> i64 { 10 }
fn default_threshold() -> u32 { 2 }

#[derive(Clone, Debug, Deserialize)]
pub struct LeaderboardCfg {
  #[serde(default = "default_page_size")]
  pub page_size: usize,
}

impl Default for LeaderboardCfg {
  fn default() -> Self {
    Self { page_size: default_page_size() }
  }
}

fn default_page_size() -> usize { 50 }

/// Read `EDUTWIN_CONFIG_PATH` (if set) and apply `EDUTWIN_DATA_DIR` on top.
/// Any IO/parse error is logged and the defaults are used.
pub fn load_app_config_from_env() -> AppConfig {
  let mut cfg = std::env::var("EDUTWIN_CONFIG_PATH")
    .ok()
    .and_then(|path| load_app_config(&path))
    .unwrap_or_default();
  if let Ok(dir) = std::env::var("EDUTWIN_DATA_DIR") {
    if !dir.is_empty() {
      cfg.storage.dir = PathBuf::from(dir);
    }
  }
  cfg
}

fn load_app_config(path: &str) -> Option<AppConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "edutwin_backend", %path, "Loaded app config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "edutwin_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "edutwin_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_toml_yields_defaults() {
    let cfg: AppConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.storage.backend, StorageBackend::File);
    assert_eq!(cfg.quiz.points_per_correct, 10);
    assert_eq!(cfg.quiz.confusion_threshold, 2);
    assert_eq!(cfg.leaderboard.page_size, 50);
  }

  #[test]
  fn partial_sections_keep_other_defaults() {
    let cfg: AppConfig = toml::from_str(
      r#"
      [storage]
      backend = "memory"

      [quiz]
      confusion_threshold = 3
      "#,
    )
    .unwrap();
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.storage.dir, PathBuf::from("./data"));
    assert_eq!(cfg.quiz.confusion_threshold, 3);
    assert_eq!(cfg.quiz.points_per_correct, 10);
  }

  #[test]
  fn unreadable_file_is_none() {
    assert!(load_app_config("/definitely/not/here.toml").is_none());
  }
}
