//! In-memory session store.
//!
//! Sessions live only in process memory. The store is bounded: it holds at
//! most `max_sessions` records (evicting the least recently active one when
//! full), forgets sessions idle for longer than `idle_ttl`, and keeps at most
//! `max_history` exchanges per session.

use crate::session::{ConversationContext, Exchange};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use cloudbuddy_core::SessionKey;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Number of hex characters kept from the derived session hash.
const SESSION_KEY_LEN: usize = 8;

/// User id used when the caller does not identify itself.
pub const DEFAULT_USER_ID: &str = "default";

/// Derives the session key for a user on a given calendar day.
///
/// The same user on the same day always gets the same key; a new day gives
/// a new key, so daily conversations start fresh.
#[must_use]
pub fn session_key_for(user_id: &str, date: NaiveDate) -> SessionKey {
    let digest = Sha256::digest(format!("{user_id}_{date}").as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(SESSION_KEY_LEN);
    SessionKey::new(key)
}

/// Limits applied to the session store.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Maximum number of sessions held at once.
    pub max_sessions: usize,
    /// Sessions idle for longer than this are dropped.
    pub idle_ttl: Duration,
    /// Maximum exchanges kept per session.
    pub max_history: usize,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            idle_ttl: Duration::hours(24),
            max_history: 100,
        }
    }
}

#[derive(Debug, Clone)]
struct SessionRecord {
    context: ConversationContext,
    last_active_at: DateTime<Utc>,
}

impl SessionRecord {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            context: ConversationContext::default(),
            last_active_at: now,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_active_at > ttl
    }
}

/// Process-wide conversation memory, keyed by [`SessionKey`].
#[derive(Debug)]
pub struct SessionStore {
    config: SessionStoreConfig,
    sessions: RwLock<HashMap<SessionKey, SessionRecord>>,
}

impl SessionStore {
    /// Creates an empty store with the given limits.
    #[must_use]
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns today's session key for `user_id`.
    #[must_use]
    pub fn get_or_create_session_id(&self, user_id: Option<&str>) -> SessionKey {
        session_key_for(user_id.unwrap_or(DEFAULT_USER_ID), Local::now().date_naive())
    }

    /// Returns a copy of the session's context.
    ///
    /// Unknown or expired sessions yield an empty context; nothing is
    /// inserted.
    #[must_use]
    pub fn get_context(&self, key: &SessionKey) -> ConversationContext {
        let now = Utc::now();
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        match sessions.get(key) {
            Some(record) if !record.is_expired(now, self.config.idle_ttl) => {
                record.context.clone()
            }
            _ => ConversationContext::default(),
        }
    }

    /// Records one exchange for the session, creating it if needed.
    ///
    /// `service` and `topic` overwrite the sticky fields only when `Some`.
    pub fn store_context(
        &self,
        key: &SessionKey,
        user_message: impl Into<String>,
        bot_response: impl Into<String>,
        service: Option<String>,
        topic: Option<String>,
    ) {
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        let expired = sessions
            .get(key)
            .is_some_and(|record| record.is_expired(now, self.config.idle_ttl));
        if expired {
            tracing::debug!(session_id = %key, "Replacing expired session");
            sessions.remove(key);
        }

        if !sessions.contains_key(key) && sessions.len() >= self.config.max_sessions {
            evict_least_recent(&mut sessions);
        }

        let record = sessions
            .entry(key.clone())
            .or_insert_with(|| SessionRecord::new(now));
        record
            .context
            .record(Exchange::new(user_message, bot_response, service, topic));
        record.context.truncate_history(self.config.max_history);
        record.last_active_at = now;
    }

    /// Removes the session if present. Returns whether anything was removed.
    pub fn clear(&self, key: &SessionKey) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(key).is_some()
    }

    /// Drops every session idle past the configured TTL.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    /// Drops every session idle past the TTL as of `now`.
    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.config.idle_ttl;
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(now, ttl));
        before - sessions.len()
    }

    /// Returns the number of sessions currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no sessions are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured limits.
    #[must_use]
    pub fn config(&self) -> &SessionStoreConfig {
        &self.config
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionStoreConfig::default())
    }
}

fn evict_least_recent(sessions: &mut HashMap<SessionKey, SessionRecord>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, record)| record.last_active_at)
        .map(|(key, _)| key.clone());
    if let Some(key) = oldest {
        tracing::debug!(session_id = %key, "Evicting least recently active session");
        sessions.remove(&key);
    }
}
