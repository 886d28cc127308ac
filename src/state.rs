//! Application state: topic catalog, sessions, leaderboard, and the persisted
//! feeds (notifications, understanding, preferences).
//!
//! Each store sits behind its own `RwLock`. A mutation holds the write lock
//! for the whole read-modify-persist cycle. When more than one lock is needed
//! they are taken in this order: sessions, leaderboard, notifications.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::auth::{Session, SessionRegistry};
use crate::config::{load_app_config_from_env, AppConfig, StorageBackend};
use crate::domain::Topic;
use crate::error::AppError;
use crate::leaderboard::Leaderboard;
use crate::notifications::NotificationFeed;
use crate::preferences::PreferencesStore;
use crate::seeds::{seed_leaderboard, seed_topics};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::understanding::UnderstandingFeed;

pub struct AppState {
    pub config: AppConfig,
    pub catalog: Vec<Topic>,
    pub sessions: RwLock<SessionRegistry>,
    pub leaderboard: RwLock<Leaderboard>,
    pub notifications: RwLock<NotificationFeed>,
    pub understanding: RwLock<UnderstandingFeed>,
    pub preferences: RwLock<PreferencesStore>,
}

impl AppState {
    /// Build state from env: load config, open storage, seed catalog and leaderboard.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_app_config_from_env();
        let store: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Memory => {
                info!(target: "storage", "Using in-memory storage");
                Arc::new(MemoryStore::new())
            }
            StorageBackend::File => match FileStore::open(&config.storage.dir) {
                Ok(fs) => {
                    info!(target: "storage", dir = %config.storage.dir.display(), "Using file storage");
                    Arc::new(fs)
                }
                Err(e) => {
                    error!(target: "storage", dir = %config.storage.dir.display(), error = %e, "Cannot open data dir; falling back to in-memory storage");
                    Arc::new(MemoryStore::new())
                }
            },
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let catalog = seed_topics();
        let leaderboard = Leaderboard::new(seed_leaderboard());
        let notifications = NotificationFeed::load(store.clone());
        let understanding = UnderstandingFeed::load(store.clone());
        let preferences = PreferencesStore::load(store);

        info!(
            target: "edutwin_backend",
            topics = catalog.len(),
            leaderboard = leaderboard.len(),
            notifications = notifications.list().len(),
            understanding = understanding.entries().len(),
            "Startup inventory"
        );

        Self {
            config,
            catalog,
            sessions: RwLock::new(SessionRegistry::default()),
            leaderboard: RwLock::new(leaderboard),
            notifications: RwLock::new(notifications),
            understanding: RwLock::new(understanding),
            preferences: RwLock::new(preferences),
        }
    }

    /// Catalog lookup by `topic-N` id.
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.catalog.iter().find(|t| t.id == id)
    }

    /// Run `f` against the session for `token`, holding the sessions write lock.
    pub async fn with_session<R>(
        &self,
        token: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(token).ok_or(AppError::Unauthorized)?;
        Ok(f(session))
    }

    /// Like `with_session`, with the leaderboard locked as well.
    pub async fn with_session_and_board<R>(
        &self,
        token: &str,
        f: impl FnOnce(&mut Session, &mut Leaderboard) -> R,
    ) -> Result<R, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(token).ok_or(AppError::Unauthorized)?;
        let mut board = self.leaderboard.write().await;
        Ok(f(session, &mut board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::demo_user;

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let state = AppState::with_store(AppConfig::default(), Arc::new(MemoryStore::new()));
        let res = state.with_session("nope", |_| ()).await;
        assert!(matches!(res, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn state_reuses_persisted_feeds() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let state = AppState::with_store(AppConfig::default(), store.clone());
        state.notifications.write().await.clear().unwrap();
        let token = state.sessions.write().await.create(demo_user());
        assert!(state.with_session(&token, |s| s.user.id.clone()).await.is_ok());

        let again = AppState::with_store(AppConfig::default(), store);
        assert!(again.notifications.read().await.list().is_empty());
        assert_eq!(again.topic("topic-4").map(|t| t.language.as_str()), Some("C"));
        assert!(again.topic("topic-99").is_none());
    }
}
