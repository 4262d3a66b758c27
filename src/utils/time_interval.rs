//! Closed time intervals used to restrict message counts

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// A validated interval `[begin, end]` with `begin < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if begin < end {
            Ok(Self { begin, end })
        } else {
            Err(Error::InvalidInterval { begin, end })
        }
    }

    /// Parse both endpoints as RFC 3339 timestamps
    pub fn parse(begin: &str, end: &str) -> Result<Self> {
        Self::new(parse_timestamp(begin)?, parse_timestamp(end)?)
    }

    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive on both ends; a missing timestamp is never inside
    pub fn contains(&self, timestamp: Option<DateTime<Utc>>) -> bool {
        timestamp.is_some_and(|t| self.begin <= t && t <= self.end)
    }
}

/// `true` when no interval is given or the timestamp falls inside it
pub fn within(interval: Option<&TimeInterval>, timestamp: Option<DateTime<Utc>>) -> bool {
    interval.is_none_or(|i| i.contains(timestamp))
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::InvalidTimestamp(format!("{}: {}", s, e)))
}
