//! Library error type

use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid time interval: {begin} is not before {end}")]
    InvalidInterval {
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("{0} is not one of the relationship participants")]
    NotParticipant(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
