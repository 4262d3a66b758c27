//! Message storage
//!
//! - `message`: Fixed-schema message value type
//! - `collection`: Owned, time-orderable message lists
//! - `jsonl`: JSON Lines backed store
//! - `cache`: Pair-wise common-substring cache

pub mod cache;
pub mod collection;
pub mod jsonl;
pub mod message;

pub use cache::{CacheEntry, LruPairCache, MemoryPairCache, PairCache, PairKey, SUBJECT_FIELD};
pub use collection::MessageCollection;
pub use jsonl::JsonlMessageStore;
pub use message::{Message, RecipientField};

/// Read access to a message corpus
pub trait MessageStore {
    fn message(&self, id: &str) -> Option<&Message>;

    fn messages(&self) -> &[Message];

    fn message_ids(&self) -> Vec<&str> {
        self.messages().iter().map(|m| m.id.as_str()).collect()
    }

    /// Messages from `sender` that list `recipient` in any recipient field
    fn directed(&self, sender: &str, recipient: &str) -> MessageCollection {
        self.messages()
            .iter()
            .filter(|m| m.sender == sender && m.has_any_recipient(recipient))
            .cloned()
            .collect()
    }

    /// Every message, copied into an owned collection
    fn collection(&self) -> MessageCollection {
        self.messages().iter().cloned().collect()
    }
}
