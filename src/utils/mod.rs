//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - Application data directory and configuration file
//! - [`time_interval`] - Validated closed time intervals
//! - [`progress`] - Progress bars (no-op without the `progress` feature)

pub mod app_data;
pub mod progress;
pub mod time_interval;

pub use app_data::*;
pub use time_interval::{TimeInterval, parse_timestamp, within};
