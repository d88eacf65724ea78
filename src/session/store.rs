use super::types::{Conversation, Turn};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

/// Session key -> conversation context, owned by the gateway and handed to
/// collaborators as `Arc<ConversationStore>`.
///
/// The map is sharded, so lookups for different keys do not contend.
/// Creation of a missing key goes through the shard's entry lock: the first
/// caller inserts and every concurrent caller gets that same context.
#[derive(Debug, Default)]
pub struct ConversationStore {
    sessions: DashMap<String, Arc<Conversation>>,
    max_turns: usize,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose transcripts keep at most `max_turns` turns (0 = unbounded).
    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_turns,
        }
    }

    pub fn get_or_create(&self, key: &str) -> Arc<Conversation> {
        if let Some(existing) = self.sessions.get(key) {
            return Arc::clone(existing.value());
        }

        let entry = self.sessions.entry(key.to_string()).or_insert_with(|| {
            tracing::info!(session = key, "created conversation");
            Arc::new(Conversation::new(key, self.max_turns))
        });
        Arc::clone(entry.value())
    }

    pub fn get(&self, key: &str) -> Option<Arc<Conversation>> {
        self.sessions.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Copy of the session's turns, or `None` for a sender never seen.
    pub async fn history(&self, key: &str) -> Option<Vec<Turn>> {
        let conversation = self.get(key)?;
        Some(conversation.snapshot().await)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle for at least `ttl`. Sessions with a turn in flight,
    /// or still held by a caller of `get_or_create`, are kept. Returns the
    /// number evicted.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        self.evict_idle_at(Utc::now(), ttl)
    }

    fn evict_idle_at(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let before = self.sessions.len();
        self.sessions.retain(|_, conversation| {
            let idle = now.signed_duration_since(conversation.last_active()) >= ttl;
            // The map's own reference is the only one left.
            let unclaimed = Arc::strong_count(conversation) == 1;
            let evict = idle && unclaimed && conversation.try_lock().is_some();
            if evict {
                tracing::debug!(
                    session = conversation.key(),
                    age_secs = now.signed_duration_since(conversation.created_at()).num_seconds(),
                    "evicting idle session"
                );
            }
            !evict
        });
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::info!(evicted, remaining = self.sessions.len(), "evicted idle sessions");
        }
        evicted
    }
}
