//! Conversation threading
//!
//! - `types`: Thread configuration, threads and thread sets
//! - `graph`: Union-find over accepted message pairs
//! - `builder`: Pair scan and component extraction
//! - `precompute`: Batch fill of the pair cache
//! - `stats`: Distance distribution and duplicate detection

pub mod builder;
pub mod graph;
pub mod precompute;
pub mod stats;
pub mod types;

pub use builder::ThreadBuilder;
pub use graph::ConversationGraph;
pub use precompute::precompute_subject_substrings;
pub use stats::{distance_distribution, find_duplicates};
pub use types::{Thread, ThreadConfig, ThreadSet};
