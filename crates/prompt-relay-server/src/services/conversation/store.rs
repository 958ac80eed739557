use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::chat::ChatMessage;

pub type SharedLog = Arc<Mutex<ConversationLog>>;

/// Ordered message history of one conversation.
///
/// Turns are append-only; once the log exceeds its configured window the
/// oldest turns are trimmed, never rewritten.
#[derive(Debug)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
    max_messages: usize,
}

impl ConversationLog {
    fn new(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
            debug!(trimmed = excess, "Conversation window trimmed");
        }
    }

    /// Full dialogue turn order, as replayed to the model provider.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

struct Entry {
    log: SharedLog,
    last_used: AtomicU64,
}

/// Thread-safe in-memory conversation store.
///
/// Uses DashMap for lock-free concurrent lookup across conversations. The
/// store is constructed at startup and injected into handlers; it tracks at
/// most `max_conversations` logs, evicting the least-recently-used one when
/// a new identifier arrives at the cap.
pub struct ConversationStore {
    entries: DashMap<String, Entry>,
    clock: AtomicU64,
    max_conversations: usize,
    max_messages: usize,
}

impl ConversationStore {
    pub fn new(max_conversations: usize, max_messages: usize) -> Self {
        info!(
            max_conversations,
            max_messages, "Initializing conversation store"
        );
        Self {
            entries: DashMap::new(),
            clock: AtomicU64::new(0),
            max_conversations,
            max_messages,
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Get or create the log for an identifier, refreshing its recency
    /// stamp. All callers using the same identifier share one log.
    pub fn entry(&self, id: &str) -> SharedLog {
        if let Some(entry) = self.entries.get(id) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            return entry.log.clone();
        }

        if self.entries.len() >= self.max_conversations {
            self.evict_lru();
        }

        let stamp = self.tick();
        let entry = self.entries.entry(id.to_string()).or_insert_with(|| Entry {
            log: Arc::new(Mutex::new(ConversationLog::new(self.max_messages))),
            last_used: AtomicU64::new(stamp),
        });
        entry.log.clone()
    }

    fn evict_lru(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().last_used.load(Ordering::Relaxed))
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            debug!(conversation_id = %key, "Evicted least-recently-used conversation");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }
}
