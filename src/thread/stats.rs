//! Corpus-level statistics over cached pairs and message content

use crate::search::distance_from_substrings;
use crate::store::{CacheEntry, MemoryPairCache, Message, MessageStore};
use ahash::AHashMap;
use chrono::{DateTime, Utc};

/// Distance of every cached pair for `field` whose messages are in `store`
///
/// The cached substrings are used as the longest common substring, so no
/// suffix structures are built here.
pub fn distance_distribution<S>(store: &S, cache: &MemoryPairCache, field: &str) -> Vec<f64>
where
    S: MessageStore + ?Sized,
{
    let entries: Vec<CacheEntry> = cache.entries();
    let mut distances = Vec::with_capacity(entries.len());
    let mut missing = 0usize;

    for entry in entries.iter().filter(|e| e.field == field) {
        let [a, b] = &entry.pair;
        let texts = store
            .message(a)
            .zip(store.message(b))
            .and_then(|(ma, mb)| field_text(ma, field).zip(field_text(mb, field)));

        match texts {
            Some((s1, s2)) => distances.push(distance_from_substrings(s1, s2, &entry.substrings)),
            None => missing += 1,
        }
    }

    if missing > 0 {
        log::warn!("{} cached {} pairs reference unknown messages", missing, field);
    }
    distances
}

fn field_text<'m>(msg: &'m Message, field: &str) -> Option<&'m str> {
    match field {
        "Subject" => Some(&msg.subject),
        "Body" => Some(&msg.body),
        _ => None,
    }
}

type ContentKey<'m> = (
    Option<DateTime<Utc>>,
    &'m str,
    &'m [String],
    &'m [String],
    &'m [String],
    &'m str,
    &'m str,
);

/// Groups of message ids whose content apart from the id is identical
///
/// Only groups with two or more members are returned, in order of first
/// appearance.
pub fn find_duplicates(messages: &[Message]) -> Vec<Vec<&str>> {
    let mut groups: AHashMap<ContentKey<'_>, usize> = AHashMap::new();
    let mut ids: Vec<Vec<&str>> = Vec::new();

    for msg in messages {
        let key = (
            msg.timestamp,
            msg.sender.as_str(),
            msg.to.as_slice(),
            msg.cc.as_slice(),
            msg.bcc.as_slice(),
            msg.subject.as_str(),
            msg.body.as_str(),
        );
        let slot = *groups.entry(key).or_insert_with(|| {
            ids.push(Vec::new());
            ids.len() - 1
        });
        ids[slot].push(msg.id.as_str());
    }

    log::debug!("{} messages, {} unique", messages.len(), ids.len());
    ids.retain(|group| group.len() > 1);
    ids
}
