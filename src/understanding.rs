//! Per-topic understanding/confidence feed persisted under
//! `edutwin-understanding`. Same persistence pattern as the notification feed.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::UnderstandingEntry;
use crate::error::StorageError;
use crate::seeds::default_understanding;
use crate::storage::{load_json, save_json, KeyValueStore, UNDERSTANDING_KEY};
use crate::util::now_ms;

/// Confidence label shown next to a 0-100 rating.
pub fn label_for(value: u8) -> &'static str {
    match value {
        0..=24 => "Struggling",
        25..=49 => "Getting there",
        50..=74 => "Understand it",
        _ => "Mastered it!",
    }
}

pub struct UnderstandingFeed {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<UnderstandingEntry>,
}

impl UnderstandingFeed {
    #[instrument(level = "info", skip_all)]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match load_json::<Vec<UnderstandingEntry>>(store.as_ref(), UNDERSTANDING_KEY) {
            Some(entries) => entries,
            None => {
                let defaults = default_understanding(now_ms());
                if let Err(e) = save_json(store.as_ref(), UNDERSTANDING_KEY, &defaults) {
                    warn!(target: "understanding", error = %e, "Failed to persist default understanding entries");
                }
                info!(target: "understanding", count = defaults.len(), "Generated default understanding entries");
                defaults
            }
        };
        Self { store, entries }
    }

    pub fn entries(&self) -> &[UnderstandingEntry] {
        &self.entries
    }

    pub fn get_by_topic(&self, topic_id: u32) -> Option<&UnderstandingEntry> {
        self.entries.iter().find(|e| e.topic_id == topic_id)
    }

    /// Rounded mean of all values; 0 for an empty feed.
    pub fn average(&self) -> u32 {
        if self.entries.is_empty() {
            return 0;
        }
        let sum: u32 = self.entries.iter().map(|e| u32::from(e.value)).sum();
        (f64::from(sum) / self.entries.len() as f64).round() as u32
    }

    /// Upsert by topic id. A replaced entry keeps its slot; a new one goes first.
    /// Values are clamped to 0..=100. An empty label is derived from the value.
    #[instrument(level = "info", skip(self, topic_title, label))]
    pub fn save(
        &mut self,
        topic_id: u32,
        topic_title: String,
        value: i64,
        label: String,
    ) -> Result<UnderstandingEntry, StorageError> {
        let value = value.clamp(0, 100) as u8;
        let label = if label.trim().is_empty() { label_for(value).to_string() } else { label };
        let full = UnderstandingEntry { topic_id, topic_title, value, label, saved_at: now_ms() };

        let next = match self.entries.iter().position(|e| e.topic_id == topic_id) {
            Some(idx) => {
                let mut next = self.entries.clone();
                next[idx] = full.clone();
                next
            }
            None => {
                let mut next = Vec::with_capacity(self.entries.len() + 1);
                next.push(full.clone());
                next.extend(self.entries.iter().cloned());
                next
            }
        };
        save_json(self.store.as_ref(), UNDERSTANDING_KEY, &next)?;
        self.entries = next;
        info!(target: "understanding", topic_id, value, "Understanding saved");
        Ok(full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn feed() -> (Arc<dyn KeyValueStore>, UnderstandingFeed) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let feed = UnderstandingFeed::load(store.clone());
        (store, feed)
    }

    #[test]
    fn defaults_and_average() {
        let (_, feed) = feed();
        assert_eq!(feed.entries().len(), 5);
        // (82 + 58 + 90 + 35 + 72) / 5 = 67.4
        assert_eq!(feed.average(), 67);
        assert_eq!(feed.get_by_topic(3).map(|e| e.value), Some(90));
        assert!(feed.get_by_topic(42).is_none());
    }

    #[test]
    fn saving_twice_keeps_one_entry_with_latest_value() {
        let (store, mut feed) = feed();
        feed.save(6, "Advanced Iterators & Generators".into(), 40, String::new()).unwrap();
        feed.save(6, "Advanced Iterators & Generators".into(), 80, String::new()).unwrap();
        let matching: Vec<_> = feed.entries().iter().filter(|e| e.topic_id == 6).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].value, 80);
        assert_eq!(matching[0].label, "Mastered it!");
        assert_eq!(feed.entries()[0].topic_id, 6);
        assert_eq!(UnderstandingFeed::load(store).entries(), feed.entries());
    }

    #[test]
    fn replacing_existing_entry_keeps_position() {
        let (_, mut feed) = feed();
        feed.save(3, "C Pointers Introduction".into(), 20, "Struggling".into()).unwrap();
        assert_eq!(feed.entries()[2].topic_id, 3);
        assert_eq!(feed.entries()[2].value, 20);
    }

    #[test]
    fn empty_feed_average_is_zero() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(UNDERSTANDING_KEY, "[]").unwrap();
        let feed = UnderstandingFeed::load(store);
        assert!(feed.entries().is_empty());
        assert_eq!(feed.average(), 0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let (_, mut feed) = feed();
        let high = feed.save(7, "Closures & Lambdas".into(), 300, String::new()).unwrap();
        assert_eq!(high.value, 100);
        assert_eq!(high.label, "Mastered it!");
        let low = feed.save(8, "Async/Await".into(), -5, String::new()).unwrap();
        assert_eq!(low.value, 0);
        assert_eq!(low.label, "Struggling");
        assert_eq!(feed.save(8, "Async/Await".into(), 150, String::new()).unwrap().value, 100);
    }

    #[test]
    fn labels_follow_thresholds() {
        assert_eq!(label_for(0), "Struggling");
        assert_eq!(label_for(25), "Getting there");
        assert_eq!(label_for(74), "Understand it");
        assert_eq!(label_for(100), "Mastered it!");
    }
}
