use crate::providers::{MessageRole, ProviderMessage};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{Mutex, MutexGuard};

/// One message in a session's history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: MessageRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn to_provider_message(&self) -> ProviderMessage {
        ProviderMessage {
            role: self.role,
            content: self.text.clone(),
        }
    }
}

/// Append-only turn sequence of one session.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    max_turns: usize,
}

impl Transcript {
    fn with_limit(max_turns: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_turns,
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append one user turn and the assistant reply to it, as a unit.
    ///
    /// With a turn limit set, whole exchanges are dropped from the front
    /// until the transcript fits.
    pub fn record_exchange(&mut self, user_text: &str, assistant_text: &str) {
        self.turns.push(Turn::new(MessageRole::User, user_text));
        self.turns.push(Turn::new(MessageRole::Assistant, assistant_text));

        if self.max_turns > 0 && self.turns.len() > self.max_turns {
            let excess = self.turns.len() - self.max_turns;
            let cut = (excess + 1) & !1;
            self.turns.drain(..cut.min(self.turns.len()));
        }
    }
}

/// Conversation context bound to one session key.
///
/// The transcript sits behind an async mutex: whoever holds the guard owns
/// the session until the guard drops, so concurrent turns for one sender are
/// serialized instead of interleaved.
#[derive(Debug)]
pub struct Conversation {
    key: String,
    created_at: DateTime<Utc>,
    last_active_ms: AtomicI64,
    transcript: Mutex<Transcript>,
}

impl Conversation {
    pub(crate) fn new(key: &str, max_turns: usize) -> Self {
        let now = Utc::now();
        Self {
            key: key.to_string(),
            created_at: now,
            last_active_ms: AtomicI64::new(now.timestamp_millis()),
            transcript: Mutex::new(Transcript::with_limit(max_turns)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_active_ms.load(Ordering::Relaxed))
            .unwrap_or(self.created_at)
    }

    /// Wait for exclusive access to the transcript.
    pub async fn lock(&self) -> MutexGuard<'_, Transcript> {
        let guard = self.transcript.lock().await;
        self.touch();
        guard
    }

    /// Exclusive access without waiting; `None` while a turn is in flight.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, Transcript>> {
        self.transcript.try_lock().ok()
    }

    pub async fn snapshot(&self) -> Vec<Turn> {
        self.transcript.lock().await.turns().to_vec()
    }

    fn touch(&self) {
        self.last_active_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }
}
