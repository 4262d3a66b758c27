//! Conversation threading
//!
//! Messages are paired when they fall within the configured time window,
//! each sender lists the other in TO, the senders differ and the subject
//! lines are within the distance threshold. Threads are the connected
//! components of the resulting pair graph.

use super::graph::ConversationGraph;
use super::types::{Thread, ThreadConfig, ThreadSet};
use crate::search::{common_substrings, distance_from_substrings};
use crate::store::{Message, PairCache, PairKey, RecipientField, SUBJECT_FIELD};
use rayon::prelude::*;
use roaring::RoaringBitmap;

/// Groups messages into conversation threads
pub struct ThreadBuilder<'c> {
    config: ThreadConfig,
    cache: &'c dyn PairCache,
}

impl<'c> ThreadBuilder<'c> {
    pub fn new(config: ThreadConfig, cache: &'c dyn PairCache) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &ThreadConfig {
        &self.config
    }

    /// Thread every timestamped message in `messages`
    ///
    /// Messages without a timestamp belong to no thread. A timestamped
    /// message that matches nothing forms a thread of its own.
    pub fn build<'m>(&self, messages: &'m [Message]) -> ThreadSet<'m> {
        let ordered = time_ordered(messages);
        let candidates = self.candidate_pairs(messages, &ordered);

        let accepted: Vec<(usize, usize)> = if self.config.parallel() {
            candidates
                .into_par_iter()
                .filter(|&(i, j)| self.accepts(&messages[ordered[i]], &messages[ordered[j]]))
                .collect()
        } else {
            candidates
                .into_iter()
                .filter(|&(i, j)| self.accepts(&messages[ordered[i]], &messages[ordered[j]]))
                .collect()
        };

        let mut graph = ConversationGraph::new(ordered.len());
        for &(i, j) in &accepted {
            graph.add_edge(i, j);
        }

        let mut threaded = RoaringBitmap::new();
        let threads: Vec<Thread<'m>> = graph
            .components()
            .into_iter()
            .map(|component| {
                if component.len() > 1 {
                    threaded.extend(component.iter().filter_map(|&i| bitmap_position(ordered[i])));
                }
                Thread::new(component.iter().map(|&i| &messages[ordered[i]]).collect())
            })
            .collect();

        log::debug!(
            "threaded {} messages: {} edges, {} threads",
            ordered.len(),
            accepted.len(),
            threads.len()
        );
        ThreadSet::new(threads, threaded)
    }

    /// Rank pairs `(i, j)`, `i < j`, inside the time window that are replies
    /// to each other
    fn candidate_pairs(&self, messages: &[Message], ordered: &[usize]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, &a) in ordered.iter().enumerate() {
            let first = &messages[a];
            let Some(t1) = first.timestamp else { continue };

            for (j, &b) in ordered.iter().enumerate().skip(i + 1) {
                let second = &messages[b];
                let Some(t2) = second.timestamp else { continue };

                if t2 - t1 > self.config.time_delta() {
                    log::trace!("({}, {}): exceeds time delta", first.id, second.id);
                    break;
                }

                if !is_reply_pair(first, second) {
                    log::trace!("({}, {}): no bidirectional TO match", first.id, second.id);
                    continue;
                }
                pairs.push((i, j));
            }
        }
        pairs
    }

    fn accepts(&self, a: &Message, b: &Message) -> bool {
        let dist = self.subject_distance(a, b);
        let accepted = dist <= self.config.thres();
        log::trace!(
            "({}, {}): distance {:.4} {}",
            a.id,
            b.id,
            dist,
            if accepted { "match" } else { "above threshold" }
        );
        accepted
    }

    /// Subject distance, recomputing and storing it on a cache miss
    pub fn subject_distance(&self, a: &Message, b: &Message) -> f64 {
        let key = PairKey::new(&a.id, &b.id);
        let reason = match self.cache.get(&key, SUBJECT_FIELD) {
            Some(substrings) if fits_subjects(&substrings, a, b) => {
                return distance_from_substrings(&a.subject, &b.subject, &substrings);
            }
            Some(_) => "stale cached common substring",
            None => "no cached common substring",
        };

        if self.config.warn_on_cache_miss() {
            log::warn!("{} for {}, recomputing", reason, key);
        } else {
            log::debug!("{} for {}, recomputing", reason, key);
        }
        let substrings = common_substrings(&[a.subject.as_str(), b.subject.as_str()]);
        let dist = distance_from_substrings(&a.subject, &b.subject, &substrings);
        self.cache.set(&key, SUBJECT_FIELD, substrings);
        dist
    }
}

/// Input position as a bitmap entry; positions past `u32::MAX` are left out
fn bitmap_position(position: usize) -> Option<u32> {
    let entry = u32::try_from(position).ok();
    if entry.is_none() {
        log::warn!("message position {} does not fit the threaded bitmap", position);
    }
    entry
}

/// A cached list is usable when its longest entry occurs in both subjects
fn fits_subjects(substrings: &[String], a: &Message, b: &Message) -> bool {
    substrings
        .first()
        .is_none_or(|lcs| a.subject.contains(lcs.as_str()) && b.subject.contains(lcs.as_str()))
}

/// Each sender is in the other's TO list and the senders differ
fn is_reply_pair(a: &Message, b: &Message) -> bool {
    a.sender != b.sender
        && b.has_recipient(RecipientField::To, &a.sender)
        && a.has_recipient(RecipientField::To, &b.sender)
}

/// Positions of timestamped messages, ascending by time then id
fn time_ordered(messages: &[Message]) -> Vec<usize> {
    let mut ordered: Vec<usize> = (0..messages.len())
        .filter(|&i| messages[i].timestamp.is_some())
        .collect();
    ordered.sort_by(|&a, &b| {
        messages[a]
            .timestamp
            .cmp(&messages[b].timestamp)
            .then_with(|| messages[a].id.cmp(&messages[b].id))
    });
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPairCache;
    use chrono::{Duration, TimeZone, Utc};

    fn msg(id: &str, sender: &str, to: &[&str], subject: &str, secs: i64) -> Message {
        Message::new(id, sender)
            .with_recipients(RecipientField::To, to.iter().copied())
            .with_subject(subject)
            .with_timestamp(Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn thread_ids(set: &ThreadSet<'_>) -> Vec<Vec<String>> {
        let mut ids: Vec<Vec<String>> = set
            .iter()
            .map(|t| t.message_ids().into_iter().map(String::from).collect())
            .collect();
        ids.sort();
        ids
    }

    fn meeting_messages() -> Vec<Message> {
        vec![
            msg("C", "z", &["w"], "Unrelated", 5000),
            msg("B", "y", &["x"], "RE: Meeting tomorrow", 3600),
            msg("A", "x", &["y"], "Meeting tomorrow", 0),
        ]
    }

    #[test]
    fn test_reply_pair_forms_thread() {
        let cache = MemoryPairCache::new();
        let builder = ThreadBuilder::new(ThreadConfig::default(), &cache);
        let messages = meeting_messages();

        let set = builder.build(&messages);
        assert_eq!(thread_ids(&set), vec![vec!["A", "B"], vec!["C"]]);

        // positions 1 and 2 of the input slice are threaded
        assert_eq!(set.threaded_message_ids().iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(set.threaded_count(), 2);
    }

    #[test]
    fn test_cache_miss_is_written_back() {
        let cache = MemoryPairCache::new();
        let config = ThreadConfig::default().with_cache_miss_warnings(false);
        let builder = ThreadBuilder::new(config, &cache);
        builder.build(&meeting_messages());

        let cached = cache.get(&PairKey::new("A", "B"), SUBJECT_FIELD);
        assert_eq!(cached, Some(vec!["Meeting tomorrow".to_string()]));
        // C never qualified as a candidate
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cached_value_is_trusted() {
        let cache = MemoryPairCache::new();
        cache.set(&PairKey::new("A", "B"), SUBJECT_FIELD, vec![]);
        let builder = ThreadBuilder::new(ThreadConfig::default(), &cache);

        let messages = meeting_messages();
        let set = builder.build(&messages);
        assert_eq!(thread_ids(&set), vec![vec!["A"], vec!["B"], vec!["C"]]);
    }

    #[test]
    fn test_stale_cached_value_is_recomputed() {
        let cache = MemoryPairCache::new();
        let key = PairKey::new("A", "B");
        cache.set(&key, SUBJECT_FIELD, vec!["long stale subject".to_string()]);
        let config = ThreadConfig::default().with_cache_miss_warnings(false);
        let builder = ThreadBuilder::new(config, &cache);
        let messages = vec![
            msg("A", "x", &["y"], "ab", 0),
            msg("B", "y", &["x"], "cd", 60),
        ];

        let set = builder.build(&messages);
        assert_eq!(set.threaded_count(), 0);
        assert_eq!(thread_ids(&set), vec![vec!["A"], vec!["B"]]);
        assert_eq!(cache.get(&key, SUBJECT_FIELD), Some(vec![String::new()]));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_bitmap_position_limit() {
        assert_eq!(bitmap_position(7), Some(7));
        assert_eq!(bitmap_position(u32::MAX as usize), Some(u32::MAX));
        assert_eq!(bitmap_position(u32::MAX as usize + 1), None);
    }

    #[test]
    fn test_time_window_excludes_pair() {
        let cache = MemoryPairCache::new();
        let config = ThreadConfig::new(0.25, Duration::minutes(30)).unwrap();
        let builder = ThreadBuilder::new(config, &cache);

        let messages = meeting_messages();
        let set = builder.build(&messages);
        assert_eq!(set.len(), 3);
        assert_eq!(set.threaded_count(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_requires_bidirectional_to() {
        let cache = MemoryPairCache::new();
        let builder = ThreadBuilder::new(ThreadConfig::default(), &cache);
        let messages = vec![
            msg("A", "x", &["y"], "Budget", 0),
            // y answers x only on CC
            Message::new("B", "y")
                .with_recipients(RecipientField::Cc, ["x"])
                .with_subject("RE: Budget")
                .with_timestamp(Utc.timestamp_opt(60, 0).unwrap()),
        ];

        assert_eq!(builder.build(&messages).threaded_count(), 0);
    }

    #[test]
    fn test_same_sender_never_pairs() {
        let cache = MemoryPairCache::new();
        let builder = ThreadBuilder::new(ThreadConfig::default(), &cache);
        let messages = vec![
            msg("A", "x", &["x"], "Notes", 0),
            msg("B", "x", &["x"], "Notes", 60),
        ];

        assert_eq!(builder.build(&messages).len(), 2);
    }

    #[test]
    fn test_missing_timestamp_is_excluded() {
        let cache = MemoryPairCache::new();
        let builder = ThreadBuilder::new(ThreadConfig::default(), &cache);
        let mut messages = meeting_messages();
        messages.push(
            Message::new("D", "y")
                .with_recipients(RecipientField::To, ["x"])
                .with_subject("Meeting tomorrow"),
        );

        let set = builder.build(&messages);
        assert!(set.thread_of("D").is_none());
        assert_eq!(thread_ids(&set), vec![vec!["A", "B"], vec!["C"]]);
    }

    #[test]
    fn test_transitive_thread_and_sequential_mode() {
        let cache = MemoryPairCache::new();
        let config = ThreadConfig::default().with_parallel(false);
        let builder = ThreadBuilder::new(config, &cache);
        let messages = vec![
            msg("A", "x", &["y"], "Q3 forecast review", 0),
            msg("B", "y", &["x", "z"], "RE: Q3 forecast review", 100),
            msg("C", "z", &["y"], "RE: RE: Q3 forecast review", 200),
        ];

        let set = builder.build(&messages);
        assert_eq!(thread_ids(&set), vec![vec!["A", "B", "C"]]);
        assert_eq!(set.threads()[0].count_from_sender("y", None), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let messages: Vec<Message> = (0..40)
            .map(|i| {
                let (s, r) = if i % 2 == 0 { ("x", "y") } else { ("y", "x") };
                let subject = format!("topic {}", i / 4);
                msg(&format!("m{:02}", i), s, &[r], &subject, i * 600)
            })
            .collect();

        let cache = MemoryPairCache::new();
        let sequential = ThreadBuilder::new(ThreadConfig::default().with_parallel(false), &cache);
        let parallel = ThreadBuilder::new(ThreadConfig::default(), &cache);

        assert_eq!(
            thread_ids(&sequential.build(&messages)),
            thread_ids(&parallel.build(&messages))
        );
    }

    #[test]
    fn test_empty_input() {
        let cache = MemoryPairCache::new();
        let builder = ThreadBuilder::new(ThreadConfig::default(), &cache);
        let set = builder.build(&[]);
        assert!(set.is_empty());
        assert_eq!(set.threaded_count(), 0);
    }
}
