//! Global leaderboard: descending by score, ranks 1..N, recomputed on every
//! score update.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::LeaderboardEntry;

pub const MAX_TOP: usize = 100;
const NEARBY_RADIUS: usize = 2;

#[derive(Clone, Debug, Default)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_entries: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Serialize)]
pub struct Page {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub pagination: Pagination,
}

impl Leaderboard {
    /// Build from arbitrary entries; incoming ranks are ignored and recomputed.
    pub fn new(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.rerank();
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set a user's score and completed count, inserting the user if absent,
    /// then re-sort and re-rank. Returns the user's new rank.
    #[instrument(level = "debug", skip(self, name, avatar))]
    pub fn record_score(
        &mut self,
        user_id: &str,
        name: &str,
        avatar: &str,
        score: i64,
        topics_completed: usize,
    ) -> u32 {
        match self.entries.iter_mut().find(|e| e.user_id == user_id) {
            Some(entry) => {
                entry.score = score;
                entry.topics_completed = topics_completed;
            }
            None => self.entries.push(LeaderboardEntry {
                rank: 0,
                user_id: user_id.to_string(),
                name: name.to_string(),
                score,
                topics_completed,
                avatar: avatar.to_string(),
            }),
        }
        self.rerank();
        let rank = self.position(user_id).map(|e| e.rank).unwrap_or(0);
        debug!(target: "leaderboard", %user_id, score, rank, "Leaderboard re-ranked");
        rank
    }

    /// Stable sort keeps tied entries in their previous relative order.
    fn rerank(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.rank = i as u32 + 1;
        }
    }

    pub fn position(&self, user_id: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.user_id == user_id)
    }

    /// Rank the user would take if not on the board yet.
    pub fn next_rank(&self) -> u32 {
        self.entries.len() as u32 + 1
    }

    pub fn top(&self, count: usize) -> Vec<LeaderboardEntry> {
        self.entries.iter().take(count.min(MAX_TOP)).cloned().collect()
    }

    /// 1-based page of at most `limit` entries. Out-of-range pages are empty.
    pub fn page(&self, page: usize, limit: usize) -> Page {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_TOP);
        let total_entries = self.entries.len();
        let total_pages = total_entries.div_ceil(limit);
        let leaderboard = match (page - 1).checked_mul(limit) {
            Some(offset) => self.entries.iter().skip(offset).take(limit).cloned().collect(),
            None => Vec::new(),
        };
        Page {
            leaderboard,
            pagination: Pagination {
                current_page: page,
                total_pages,
                total_entries,
                has_next: page < total_pages,
                has_previous: page > 1,
            },
        }
    }

    /// The user's entry with up to two neighbours on each side.
    pub fn nearby(&self, user_id: &str) -> Vec<LeaderboardEntry> {
        let Some(idx) = self.entries.iter().position(|e| e.user_id == user_id) else {
            return Vec::new();
        };
        let start = idx.saturating_sub(NEARBY_RADIUS);
        let end = (idx + NEARBY_RADIUS + 1).min(self.entries.len());
        self.entries[start..end].to_vec()
    }
}
