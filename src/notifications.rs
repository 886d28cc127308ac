//! Notification feed persisted under `edutwin-notifications`.
//!
//! Every mutation builds the next list, writes it to storage, and only then
//! replaces the in-memory list.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::{Notification, NotificationKind};
use crate::error::StorageError;
use crate::seeds::{congrats_offset_ms, reminder_offset_ms, COMPLETED_FEED_TOPICS, PENDING_FEED_TOPICS};
use crate::storage::{load_json, save_json, KeyValueStore, NOTIFICATIONS_KEY};
use crate::util::{fill_template, now_ms};

const REMINDER_TITLE: &str = "Pending: Complete this topic";
const REMINDER_TEMPLATE: &str =
    "You haven't completed \"{title}\" ({lang}) yet. Continue learning to stay on track!";
pub const CONGRATS_TITLE: &str = "Congratulations! Topic completed 🎉";
pub const CONGRATS_TEMPLATE: &str = "Great job finishing \"{title}\"! Keep up the awesome work.";

/// Reminders for pending topics (unread) and congrats for completed ones
/// (read), newest first.
pub fn default_notifications(now: i64) -> Vec<Notification> {
    let mut out = Vec::with_capacity(PENDING_FEED_TOPICS.len() + COMPLETED_FEED_TOPICS.len());
    for (i, t) in PENDING_FEED_TOPICS.iter().enumerate() {
        out.push(Notification {
            id: format!("reminder-{}", t.id),
            kind: NotificationKind::Reminder,
            title: REMINDER_TITLE.into(),
            message: fill_template(REMINDER_TEMPLATE, &[("title", t.title), ("lang", t.lang)]),
            timestamp: now - reminder_offset_ms(i),
            read: false,
            topic_id: Some(t.id),
        });
    }
    for (i, t) in COMPLETED_FEED_TOPICS.iter().enumerate() {
        out.push(Notification {
            id: format!("congrats-{}", t.id),
            kind: NotificationKind::Congrats,
            title: CONGRATS_TITLE.into(),
            message: fill_template(CONGRATS_TEMPLATE, &[("title", t.title)]),
            timestamp: now - congrats_offset_ms(i),
            read: true,
            topic_id: Some(t.id),
        });
    }
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}

pub struct NotificationFeed {
    store: Arc<dyn KeyValueStore>,
    items: Vec<Notification>,
}

impl NotificationFeed {
    /// Load from storage, generating and persisting defaults on first use or
    /// when the stored blob cannot be read.
    #[instrument(level = "info", skip_all)]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match load_json::<Vec<Notification>>(store.as_ref(), NOTIFICATIONS_KEY) {
            Some(items) => items,
            None => {
                let defaults = default_notifications(now_ms());
                if let Err(e) = save_json(store.as_ref(), NOTIFICATIONS_KEY, &defaults) {
                    warn!(target: "notifications", error = %e, "Failed to persist default notifications");
                }
                info!(target: "notifications", count = defaults.len(), "Generated default notifications");
                defaults
            }
        };
        Self { store, items }
    }

    pub fn list(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    fn commit(&mut self, next: Vec<Notification>) -> Result<(), StorageError> {
        save_json(self.store.as_ref(), NOTIFICATIONS_KEY, &next)?;
        self.items = next;
        Ok(())
    }

    #[instrument(level = "info", skip(self, title, message))]
    pub fn add(
        &mut self,
        kind: NotificationKind,
        title: String,
        message: String,
        topic_id: Option<u32>,
    ) -> Result<Notification, StorageError> {
        let n = Notification {
            id: format!("{}-{}", kind.as_str(), Uuid::new_v4().simple()),
            kind,
            title,
            message,
            timestamp: now_ms(),
            read: false,
            topic_id,
        };
        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.push(n.clone());
        next.extend(self.items.iter().cloned());
        self.commit(next)?;
        info!(target: "notifications", id = %n.id, "Notification added");
        Ok(n)
    }

    /// Unknown ids leave the list unchanged (it is still persisted).
    #[instrument(level = "info", skip(self))]
    pub fn mark_read(&mut self, id: &str) -> Result<(), StorageError> {
        let next = self
            .items
            .iter()
            .map(|n| if n.id == id { Notification { read: true, ..n.clone() } } else { n.clone() })
            .collect();
        self.commit(next)
    }

    #[instrument(level = "info", skip(self))]
    pub fn mark_all_read(&mut self) -> Result<(), StorageError> {
        let next = self
            .items
            .iter()
            .map(|n| Notification { read: true, ..n.clone() })
            .collect();
        self.commit(next)
    }

    #[instrument(level = "info", skip(self))]
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.commit(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn first_load_generates_and_persists_defaults() {
        let store = store();
        let feed = NotificationFeed::load(store.clone());
        assert_eq!(feed.list().len(), 12);
        assert_eq!(feed.unread_count(), 7);
        assert_eq!(feed.list()[0].id, "reminder-6");
        for pair in feed.list().windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
        let stored: Vec<Notification> = load_json(store.as_ref(), NOTIFICATIONS_KEY).unwrap();
        assert_eq!(stored, feed.list());
    }

    #[test]
    fn malformed_storage_falls_back_to_defaults() {
        let store = store();
        store.set(NOTIFICATIONS_KEY, "{oops").unwrap();
        let feed = NotificationFeed::load(store.clone());
        assert_eq!(feed.list().len(), 12);
        assert!(load_json::<Vec<Notification>>(store.as_ref(), NOTIFICATIONS_KEY).is_some());
    }

    #[test]
    fn persistence_round_trip_preserves_order_and_fields() {
        let store = store();
        let mut feed = NotificationFeed::load(store.clone());
        feed.add(NotificationKind::Info, "Hi".into(), "hello".into(), None).unwrap();
        feed.mark_read("reminder-7").unwrap();
        let reloaded = NotificationFeed::load(store);
        assert_eq!(reloaded.list(), feed.list());
        assert_eq!(reloaded.list()[0].title, "Hi");
        assert!(reloaded.list().iter().any(|n| n.id == "reminder-7" && n.read));
    }

    #[test]
    fn add_mark_and_clear() {
        let store = store();
        let mut feed = NotificationFeed::load(store.clone());
        let a = feed.add(NotificationKind::Congrats, "A".into(), "a".into(), Some(6)).unwrap();
        let b = feed.add(NotificationKind::Congrats, "B".into(), "b".into(), Some(6)).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("congrats-"));
        assert_eq!(feed.unread_count(), 9);
        feed.mark_read("does-not-exist").unwrap();
        assert_eq!(feed.unread_count(), 9);
        feed.mark_all_read().unwrap();
        assert_eq!(feed.unread_count(), 0);
        feed.clear().unwrap();
        assert!(feed.list().is_empty());
        assert!(NotificationFeed::load(store).list().is_empty());
    }
}
