//! # subthread - Suffix-array string toolkit and email threading
//!
//! Generalized suffix arrays over several strings at once, the substring
//! queries built on them, and a conversation threader for email corpora
//! that uses subject-line similarity.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`suffix_array`] - Suffix array, LCP and BWT construction
//! - [`search`] - Common substrings, supermaximal repeats, string distance
//! - [`store`] - Messages, JSON Lines store and the pair-wise cache
//! - [`thread`] - Conversation threading and corpus statistics
//! - [`relationship`] - Directed and undirected communication counts
//! - [`output`] - Result formatting
//! - [`utils`] - Configuration, time intervals, progress bars
//!
//! ## Quick Start
//!
//! ```ignore
//! use subthread::store::{JsonlMessageStore, MemoryPairCache, MessageStore};
//! use subthread::thread::{ThreadBuilder, ThreadConfig};
//! use std::path::Path;
//!
//! let store = JsonlMessageStore::open(Path::new("messages.jsonl")).unwrap();
//! let cache = MemoryPairCache::new();
//! let builder = ThreadBuilder::new(ThreadConfig::default(), &cache);
//!
//! for thread in builder.build(store.messages()).with_min_size(2) {
//!     println!("{:?}", thread.message_ids());
//! }
//! ```
//!
//! ## Substring search
//!
//! ```ignore
//! use subthread::search::{common_substrings, distance};
//!
//! assert_eq!(common_substrings(&["banana", "ananas"]), vec!["anana"]);
//! assert_eq!(distance("abc", "xyz", None), 1.0);
//! ```

pub mod error;
pub mod output;
pub mod relationship;
pub mod search;
pub mod store;
pub mod suffix_array;
pub mod thread;
pub mod utils;

pub use error::{Error, Result};
