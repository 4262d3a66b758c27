//! Communication relationships between two addresses
//!
//! A directed relationship holds every message one address sent to
//! another. The undirected relationship composes both directions.

use crate::error::{Error, Result};
use crate::store::{MessageCollection, MessageStore, RecipientField};
use crate::thread::{ThreadBuilder, ThreadSet};
use crate::utils::{TimeInterval, within};
use std::fmt;

/// Message statistics shared by both relationship kinds
pub trait CommRelationship {
    fn message_count(&self, interval: Option<&TimeInterval>) -> usize;

    /// Messages listing the recipient in TO
    fn direct_count(&self, interval: Option<&TimeInterval>) -> usize;

    /// Messages listing the recipient in CC or BCC but not in TO
    fn indirect_count(&self, interval: Option<&TimeInterval>) -> usize;

    fn sender_tokens(&self, interval: Option<&TimeInterval>) -> Vec<String>;
}

/// Messages sent by `sender` that name `recipient` in any recipient field
#[derive(Debug, Clone)]
pub struct DirectedRelationship {
    sender: String,
    recipient: String,
    messages: MessageCollection,
}

impl DirectedRelationship {
    pub fn new(sender: &str, recipient: &str, mut messages: MessageCollection) -> Self {
        messages.time_order();
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            messages,
        }
    }

    pub fn from_store<S>(store: &S, sender: &str, recipient: &str) -> Self
    where
        S: MessageStore + ?Sized,
    {
        Self::new(sender, recipient, store.directed(sender, recipient))
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn messages(&self) -> &MessageCollection {
        &self.messages
    }
}

impl CommRelationship for DirectedRelationship {
    fn message_count(&self, interval: Option<&TimeInterval>) -> usize {
        self.messages.message_count(interval)
    }

    fn direct_count(&self, interval: Option<&TimeInterval>) -> usize {
        self.messages
            .iter()
            .filter(|m| within(interval, m.timestamp))
            .filter(|m| m.has_recipient(RecipientField::To, &self.recipient))
            .count()
    }

    fn indirect_count(&self, interval: Option<&TimeInterval>) -> usize {
        self.messages
            .iter()
            .filter(|m| within(interval, m.timestamp))
            .filter(|m| {
                !m.has_recipient(RecipientField::To, &self.recipient)
                    && (m.has_recipient(RecipientField::Cc, &self.recipient)
                        || m.has_recipient(RecipientField::Bcc, &self.recipient))
            })
            .count()
    }

    fn sender_tokens(&self, interval: Option<&TimeInterval>) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| within(interval, m.timestamp))
            .flat_map(|m| m.sender_tokens(true))
            .collect()
    }
}

impl fmt::Display for DirectedRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.sender, self.recipient)
    }
}

/// Undirected relationship between two addresses, stored in sorted order
#[derive(Debug, Clone)]
pub struct Relationship {
    outbound: [DirectedRelationship; 2],
    messages: MessageCollection,
}

impl Relationship {
    pub fn from_store<S>(store: &S, a: &str, b: &str) -> Self
    where
        S: MessageStore + ?Sized,
    {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let forward = DirectedRelationship::from_store(store, first, second);
        let backward = DirectedRelationship::from_store(store, second, first);

        let mut messages = forward.messages().clone();
        if first != second {
            messages.extend(backward.messages().iter().cloned());
        }
        messages.time_order();

        Self {
            outbound: [forward, backward],
            messages,
        }
    }

    pub fn participants(&self) -> (&str, &str) {
        (self.outbound[0].sender(), self.outbound[1].sender())
    }

    /// Messages exchanged in either direction, time ordered
    pub fn messages(&self) -> &MessageCollection {
        &self.messages
    }

    /// The directed side whose sender is `sender`
    pub fn outbound(&self, sender: &str) -> Result<&DirectedRelationship> {
        self.outbound
            .iter()
            .find(|rel| rel.sender() == sender)
            .ok_or_else(|| Error::NotParticipant(sender.to_string()))
    }

    /// Conversation threads among this relationship's messages
    pub fn threads<'r>(&'r self, builder: &ThreadBuilder<'_>) -> ThreadSet<'r> {
        builder.build(self.messages.as_slice())
    }

    /// Messages from `sender` that share a thread with another message
    pub fn threaded_count_from_sender(
        &self,
        sender: &str,
        builder: &ThreadBuilder<'_>,
        interval: Option<&TimeInterval>,
    ) -> Result<usize> {
        self.outbound(sender)?;
        Ok(self.threads(builder).threaded_count_from_sender(sender, interval))
    }

    fn sides(&self) -> &[DirectedRelationship] {
        let (a, b) = self.participants();
        if a == b { &self.outbound[..1] } else { &self.outbound }
    }
}

impl CommRelationship for Relationship {
    fn message_count(&self, interval: Option<&TimeInterval>) -> usize {
        self.sides().iter().map(|r| r.message_count(interval)).sum()
    }

    fn direct_count(&self, interval: Option<&TimeInterval>) -> usize {
        self.sides().iter().map(|r| r.direct_count(interval)).sum()
    }

    fn indirect_count(&self, interval: Option<&TimeInterval>) -> usize {
        self.sides().iter().map(|r| r.indirect_count(interval)).sum()
    }

    fn sender_tokens(&self, interval: Option<&TimeInterval>) -> Vec<String> {
        self.sides()
            .iter()
            .flat_map(|r| r.sender_tokens(interval))
            .collect()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.participants();
        write!(f, "{} <-> {}", a, b)
    }
}
