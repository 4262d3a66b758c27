use crate::error::{Error, Result};
use crate::store::{Message, RecipientField};
use crate::utils::{TimeInterval, within};
use chrono::Duration;
use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use std::fmt;

/// Validated settings for conversation threading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreadConfig {
    thres: f64,
    time_delta: Duration,
    parallel: bool,
    warn_on_cache_miss: bool,
}

impl ThreadConfig {
    pub const DEFAULT_THRES: f64 = 0.25;

    /// `thres` must lie in `[0, 1]` and `time_delta` must be positive
    pub fn new(thres: f64, time_delta: Duration) -> Result<Self> {
        if !(0.0..=1.0).contains(&thres) {
            return Err(Error::InvalidConfig(format!(
                "thres must be within [0, 1], got {}",
                thres
            )));
        }
        if time_delta <= Duration::zero() {
            return Err(Error::InvalidConfig(format!(
                "time_delta must be positive, got {}s",
                time_delta.num_seconds()
            )));
        }
        Ok(Self {
            thres,
            time_delta,
            parallel: true,
            warn_on_cache_miss: true,
        })
    }

    pub fn default_time_delta() -> Duration {
        Duration::days(2)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cache_miss_warnings(mut self, warn: bool) -> Self {
        self.warn_on_cache_miss = warn;
        self
    }

    pub fn thres(&self) -> f64 {
        self.thres
    }

    pub fn time_delta(&self) -> Duration {
        self.time_delta
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn warn_on_cache_miss(&self) -> bool {
        self.warn_on_cache_miss
    }
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            thres: Self::DEFAULT_THRES,
            time_delta: Self::default_time_delta(),
            parallel: true,
            warn_on_cache_miss: true,
        }
    }
}

/// A conversation thread: messages in ascending time order
#[derive(Debug, Clone)]
pub struct Thread<'a> {
    messages: Vec<&'a Message>,
}

impl<'a> Thread<'a> {
    pub(crate) fn new(messages: Vec<&'a Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[&'a Message] {
        &self.messages
    }

    pub fn message_ids(&self) -> Vec<&'a str> {
        self.messages.iter().map(|m| m.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.messages.iter().any(|m| m.id == id)
    }

    /// Number of messages, optionally only those sent inside `interval`
    pub fn message_count(&self, interval: Option<&TimeInterval>) -> usize {
        self.messages
            .iter()
            .filter(|m| within(interval, m.timestamp))
            .count()
    }

    pub fn count_from_sender(&self, sender: &str, interval: Option<&TimeInterval>) -> usize {
        self.messages
            .iter()
            .filter(|m| m.sender == sender && within(interval, m.timestamp))
            .count()
    }

    /// Message count per sender address
    pub fn count_by_sender(&self) -> FxHashMap<&'a str, usize> {
        let mut counts = FxHashMap::default();
        for msg in &self.messages {
            *counts.entry(msg.sender.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_with_recipient(
        &self,
        field: RecipientField,
        address: &str,
        interval: Option<&TimeInterval>,
    ) -> usize {
        self.messages
            .iter()
            .filter(|m| m.has_recipient(field, address) && within(interval, m.timestamp))
            .count()
    }

    /// Sender-text tokens of every message `sender` wrote in this thread
    pub fn sender_tokens(&self, sender: &str) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.sender == sender)
            .flat_map(|m| m.sender_tokens(true))
            .collect()
    }
}

impl fmt::Display for Thread<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-=-=-=-=-=-=-=-=-=-= Start of thread -=-=-=-=-=-=-=-=-=-=")?;
        for msg in &self.messages {
            writeln!(f, "{}", msg)?;
        }
        writeln!(f, "-=-=-=-=-=-=-=-=-=-=- End of thread -=-=-=-=-=-=-=-=-=-=-")
    }
}

/// All threads found in one message slice
///
/// Positions in `threaded` refer to the slice handed to the builder and
/// cover only messages that share a thread with at least one other message.
#[derive(Debug, Clone, Default)]
pub struct ThreadSet<'a> {
    threads: Vec<Thread<'a>>,
    threaded: RoaringBitmap,
}

impl<'a> ThreadSet<'a> {
    pub(crate) fn new(threads: Vec<Thread<'a>>, threaded: RoaringBitmap) -> Self {
        Self { threads, threaded }
    }

    pub fn threads(&self) -> &[Thread<'a>] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Thread<'a>> {
        self.threads.iter()
    }

    /// Threads holding at least `min_size` messages
    pub fn with_min_size(&self, min_size: usize) -> impl Iterator<Item = &Thread<'a>> {
        self.threads.iter().filter(move |t| t.len() >= min_size)
    }

    pub fn thread_of(&self, id: &str) -> Option<&Thread<'a>> {
        self.threads.iter().find(|t| t.contains(id))
    }

    /// Input positions of messages in multi-message threads
    ///
    /// Positions past `u32::MAX` are not recorded.
    pub fn threaded_message_ids(&self) -> &RoaringBitmap {
        &self.threaded
    }

    pub fn threaded_count(&self) -> u64 {
        self.threaded.len()
    }

    /// Messages from `sender` in multi-message threads
    pub fn threaded_count_from_sender(&self, sender: &str, interval: Option<&TimeInterval>) -> usize {
        self.with_min_size(2)
            .map(|t| t.count_from_sender(sender, interval))
            .sum()
    }
}

impl<'s, 'a> IntoIterator for &'s ThreadSet<'a> {
    type Item = &'s Thread<'a>;
    type IntoIter = std::slice::Iter<'s, Thread<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.threads.iter()
    }
}
