//! Ordered message collections

use super::message::Message;
use crate::utils::{TimeInterval, within};
use std::cmp::Ordering;
use std::ops::Index;

/// An owned, positionally addressable list of messages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageCollection {
    messages: Vec<Message>,
}

impl MessageCollection {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Sort ascending by timestamp; messages without one go last, ties by id
    pub fn time_order(&mut self) {
        self.messages.sort_by(compare_by_time);
    }

    /// Sort descending by timestamp; messages without one still go last
    pub fn time_order_reverse(&mut self) {
        self.messages.sort_by(|a, b| match (a.timestamp, b.timestamp) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.id.cmp(&b.id)),
            _ => compare_by_time(a, b),
        });
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn get(&self, position: usize) -> Option<&Message> {
        self.messages.get(position)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_ids(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.id.as_str()).collect()
    }

    /// Number of messages, optionally only those sent inside `interval`
    pub fn message_count(&self, interval: Option<&TimeInterval>) -> usize {
        self.messages
            .iter()
            .filter(|m| within(interval, m.timestamp))
            .count()
    }

    pub fn into_inner(self) -> Vec<Message> {
        self.messages
    }
}

fn compare_by_time(a: &Message, b: &Message) -> Ordering {
    match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}

impl Index<usize> for MessageCollection {
    type Output = Message;

    fn index(&self, position: usize) -> &Message {
        &self.messages[position]
    }
}

impl FromIterator<Message> for MessageCollection {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Extend<Message> for MessageCollection {
    fn extend<I: IntoIterator<Item = Message>>(&mut self, iter: I) {
        self.messages.extend(iter);
    }
}

impl<'a> IntoIterator for &'a MessageCollection {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn msg(id: &str, secs: Option<i64>) -> Message {
        let m = Message::new(id, "a@x.com");
        match secs {
            Some(s) => m.with_timestamp(Utc.timestamp_opt(s, 0).unwrap()),
            None => m,
        }
    }

    #[test]
    fn test_time_order() {
        let mut c: MessageCollection = vec![
            msg("c", Some(30)),
            msg("none", None),
            msg("a", Some(10)),
            msg("b", Some(10)),
        ]
        .into_iter()
        .collect();

        c.time_order();
        assert_eq!(c.message_ids(), vec!["a", "b", "c", "none"]);

        c.time_order_reverse();
        assert_eq!(c.message_ids(), vec!["c", "a", "b", "none"]);
    }

    #[test]
    fn test_message_count_with_interval() {
        let c = MessageCollection::new(vec![msg("a", Some(10)), msg("b", Some(50)), msg("n", None)]);
        let interval = TimeInterval::new(
            Utc.timestamp_opt(0, 0).unwrap(),
            Utc.timestamp_opt(20, 0).unwrap(),
        )
        .unwrap();

        assert_eq!(c.message_count(None), 3);
        assert_eq!(c.message_count(Some(&interval)), 1);
        assert_eq!(c[1].id, "b");
    }
}
