//! Message value type
//!
//! Fixed schema for the messages consumed by threading and relationship
//! statistics. Only the timestamp is optional; recipient lists default to
//! empty when a record omits them.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Markers after which a body only contains quoted or forwarded text
const QUOTE_MARKERS: &[&str] = &[
    "-----Original Message-----",
    "---------------------- Forwarded by",
    "From:",
    "To:",
    "-----Original Appointment-----",
    "--------------------------\nSent from my BlackBerry Wireless Handheld",
];

static SOFT_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"=20").unwrap());
static STRAY_EQUALS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b=|=\b").unwrap());
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+'[a-zA-Z]+|[a-zA-Z]+").unwrap());

/// Recipient list of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipientField {
    To,
    Cc,
    Bcc,
}

impl RecipientField {
    pub const ALL: [RecipientField; 3] = [RecipientField::To, RecipientField::Cc, RecipientField::Bcc];

    pub fn name(&self) -> &'static str {
        match self {
            RecipientField::To => "TO",
            RecipientField::Cc => "CC",
            RecipientField::Bcc => "BCC",
        }
    }
}

impl fmt::Display for RecipientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single email message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub sender: String,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

impl Message {
    pub fn new(id: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: None,
            sender: sender.into(),
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: String::new(),
            body: String::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_recipients<I, S>(mut self, field: RecipientField, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = match field {
            RecipientField::To => &mut self.to,
            RecipientField::Cc => &mut self.cc,
            RecipientField::Bcc => &mut self.bcc,
        };
        list.extend(addresses.into_iter().map(Into::into));
        self
    }

    pub fn recipients(&self, field: RecipientField) -> &[String] {
        match field {
            RecipientField::To => &self.to,
            RecipientField::Cc => &self.cc,
            RecipientField::Bcc => &self.bcc,
        }
    }

    pub fn has_recipient(&self, field: RecipientField, address: &str) -> bool {
        self.recipients(field).iter().any(|a| a == address)
    }

    /// Listed in any of TO, CC or BCC
    pub fn has_any_recipient(&self, address: &str) -> bool {
        RecipientField::ALL
            .iter()
            .any(|&field| self.has_recipient(field, address))
    }

    /// Body text written by the sender, with quoted replies, forwards and
    /// quoted-printable debris removed
    pub fn sender_text(&self) -> String {
        let mut body = self.body.as_str();
        for marker in QUOTE_MARKERS {
            if let Some(idx) = body.find(marker) {
                body = &body[..idx];
            }
        }

        let body = SOFT_BREAK.replace_all(body, "");
        STRAY_EQUALS.replace_all(&body, "").into_owned()
    }

    /// Word tokens (allowing one inner apostrophe) from the sender text
    pub fn sender_tokens(&self, lower: bool) -> Vec<String> {
        let text = self.sender_text();
        TOKEN
            .find_iter(&text)
            .map(|m| {
                if lower {
                    m.as_str().to_lowercase()
                } else {
                    m.as_str().to_string()
                }
            })
            .collect()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MessageID : {}", self.id)?;
        match self.timestamp {
            Some(t) => writeln!(f, "Datetime : {}", t.to_rfc3339())?,
            None => writeln!(f, "Datetime : not defined")?,
        }
        writeln!(f, "Sender : {}", self.sender)?;
        for field in RecipientField::ALL {
            writeln!(f, "{} : {}", field, self.recipients(field).join(", "))?;
        }
        writeln!(f, "Subject : {}", self.subject)?;
        writeln!(f, "Body : {}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_lookup() {
        let msg = Message::new("m1", "a@x.com")
            .with_recipients(RecipientField::To, ["b@x.com"])
            .with_recipients(RecipientField::Bcc, ["c@x.com"]);

        assert!(msg.has_recipient(RecipientField::To, "b@x.com"));
        assert!(!msg.has_recipient(RecipientField::Cc, "b@x.com"));
        assert!(msg.has_any_recipient("c@x.com"));
        assert!(!msg.has_any_recipient("a@x.com"));
    }

    #[test]
    fn test_sender_text_strips_quoted_reply() {
        let msg = Message::new("m1", "a@x.com").with_body(
            "Sounds good=20 to me.\n\n-----Original Message-----\nFrom: b@x.com\nold text",
        );
        assert_eq!(msg.sender_text(), "Sounds good to me.\n\n");
    }

    #[test]
    fn test_sender_text_strips_stray_equals() {
        let msg = Message::new("m1", "a@x.com").with_body("pro=\nposal =ok and a=b");
        assert_eq!(msg.sender_text(), "pro\nposal ok and ab");
    }

    #[test]
    fn test_sender_tokens() {
        let msg = Message::new("m1", "a@x.com").with_body("Don't SEND it, 2 times!\nTo: someone");
        assert_eq!(msg.sender_tokens(true), vec!["don't", "send", "it", "times"]);
        assert_eq!(msg.sender_tokens(false), vec!["Don't", "SEND", "it", "times"]);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"id": "m1", "sender": "a@x.com", "timestamp": "2001-05-14T16:39:00Z"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert!(msg.timestamp.is_some());
        assert!(msg.to.is_empty());
        assert_eq!(msg.subject, "");

        let json = r#"{"id": "m2", "sender": "a@x.com", "timestamp": null}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn test_display_lists_fields() {
        let msg = Message::new("m1", "a@x.com")
            .with_recipients(RecipientField::To, ["b@x.com", "c@x.com"])
            .with_subject("Hi");
        let text = msg.to_string();
        assert!(text.contains("TO : b@x.com, c@x.com"));
        assert!(text.contains("Datetime : not defined"));
    }
}
