//! Batch computation of subject-line common substrings
//!
//! Fills a pair cache ahead of threading so the builder only reads it.
//! Candidate pairs are looser than the builder's: the later sender only
//! has to appear in any recipient list of the earlier message.

use crate::search::common_substrings;
use crate::store::{Message, PairCache, PairKey, SUBJECT_FIELD};
use crate::utils::progress::message_bar;
use chrono::Duration;
use rayon::prelude::*;

/// Store common subject substrings for every candidate pair in `cache`
///
/// Returns the number of pairs compared.
pub fn precompute_subject_substrings(
    messages: &[Message],
    cache: &dyn PairCache,
    time_delta: Duration,
    silent: bool,
) -> usize {
    let mut ordered: Vec<&Message> = messages.iter().filter(|m| m.timestamp.is_some()).collect();
    ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    let bar = message_bar(ordered.len() as u64, silent);
    let comparisons: usize = (0..ordered.len())
        .into_par_iter()
        .map(|i| {
            let count = compare_forward(&ordered, i, cache, time_delta);
            bar.inc(1);
            count
        })
        .sum();
    bar.finish_with_message(format!("{} comparisons", comparisons));

    log::info!(
        "precomputed {} subject pairs over {} messages",
        comparisons,
        ordered.len()
    );
    comparisons
}

fn compare_forward(
    ordered: &[&Message],
    anchor: usize,
    cache: &dyn PairCache,
    time_delta: Duration,
) -> usize {
    let a = ordered[anchor];
    let Some(t1) = a.timestamp else { return 0 };

    let mut count = 0;
    for b in &ordered[anchor + 1..] {
        let Some(t2) = b.timestamp else { continue };
        if t2 - t1 > time_delta {
            break;
        }
        if a.has_any_recipient(&b.sender) {
            let substrings = common_substrings(&[a.subject.as_str(), b.subject.as_str()]);
            cache.set(&PairKey::new(&a.id, &b.id), SUBJECT_FIELD, substrings);
            count += 1;
        }
    }
    count
}
