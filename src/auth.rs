//! Mock authentication and the in-memory session registry.
//!
//! Credentials are not verified: any non-empty email logs in as the demo
//! user, and signup only needs a name and an email. Sessions live for the
//! lifetime of the process and are never persisted.

use std::collections::HashMap;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Progress, Topic, User};
use crate::quiz::QuizAttempt;
use crate::seeds::{demo_user, DEFAULT_AVATAR};

pub struct Session {
    pub user: User,
    pub quiz: Option<QuizAttempt>,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    /// Register a session for `user` and return its bearer token.
    pub fn create(&mut self, user: User) -> String {
        let token = Uuid::new_v4().to_string();
        info!(target: "edutwin_backend", user_id = %user.id, "Session created");
        self.sessions.insert(token.clone(), Session { user, quiz: None });
        token
    }

    pub fn get(&self, token: &str) -> Option<&Session> {
        self.sessions.get(token)
    }

    pub fn get_mut(&mut self, token: &str) -> Option<&mut Session> {
        self.sessions.get_mut(token)
    }

    pub fn remove(&mut self, token: &str) -> Option<Session> {
        self.sessions.remove(token)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// The password is accepted but ignored.
#[instrument(level = "info", skip(_password))]
pub fn login(email: &str, _password: &str) -> Option<User> {
    if email.is_empty() {
        return None;
    }
    Some(User { email: email.to_string(), ..demo_user() })
}

/// New account with a fresh id, nothing started, every catalog topic pending.
#[instrument(level = "info", skip(_password, catalog))]
pub fn signup(name: &str, email: &str, _password: &str, catalog: &[Topic], rank: u32) -> Option<User> {
    if name.is_empty() || email.is_empty() {
        return None;
    }
    Some(User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: DEFAULT_AVATAR.to_string(),
        rank,
        progress: Progress {
            pending_topics: catalog.iter().map(|t| t.id.clone()).collect(),
            ..Progress::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::{seed_topics, DEMO_USER_ID};

    #[test]
    fn login_requires_email_and_yields_demo_user() {
        assert!(login("", "x").is_none());
        let user = login("me@example.com", "").unwrap();
        assert_eq!(user.id, DEMO_USER_ID);
        assert_eq!(user.email, "me@example.com");
        assert_eq!(user.progress.total_score, 85);
    }

    #[test]
    fn signup_starts_with_everything_pending() {
        assert!(signup("", "a@b.c", "pw", &seed_topics(), 6).is_none());
        assert!(signup("Ann", "", "pw", &seed_topics(), 6).is_none());
        let user = signup("Ann", "a@b.c", "pw", &seed_topics(), 6).unwrap();
        assert_eq!(user.progress.pending_topics.len(), 5);
        assert!(user.progress.completed_topics.is_empty());
        assert_eq!(user.progress.total_score, 0);
        assert_eq!(user.rank, 6);
        assert_ne!(user.id, DEMO_USER_ID);
    }

    #[test]
    fn registry_tracks_sessions_by_token() {
        let mut reg = SessionRegistry::default();
        let t1 = reg.create(login("a@b.c", "").unwrap());
        let t2 = reg.create(login("d@e.f", "").unwrap());
        assert_ne!(t1, t2);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get(&t1).unwrap().user.email, "a@b.c");
        assert!(reg.remove(&t1).is_some());
        assert!(reg.get(&t1).is_none());
        assert!(reg.remove(&t1).is_none());
    }
}
