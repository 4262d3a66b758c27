//! Performance benchmarks for suffix structures and threading
//!
//! Run with: cargo bench

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use subthread::search::{common_substrings, supermaximal_repeats};
use subthread::store::{MemoryPairCache, Message, RecipientField};
use subthread::suffix_array::SuffixArrayIndex;
use subthread::thread::{ThreadBuilder, ThreadConfig};

const SUBJECTS: &[&str] = &[
    "Gas contract for June deliveries",
    "RE: Gas contract for June deliveries",
    "FW: Q3 forecast review",
    "Lunch on Friday?",
    "RE: RE: Weekly power trading report",
];

/// Deterministic pseudo-text of `len` characters over a small alphabet
fn text(len: usize, seed: u64) -> String {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (b'a' + ((state >> 33) % 6) as u8) as char
        })
        .collect()
}

fn corpus(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let (sender, recipient) = if i % 2 == 0 { ("x", "y") } else { ("y", "x") };
            Message::new(format!("m{}", i), sender)
                .with_recipients(RecipientField::To, [recipient])
                .with_subject(SUBJECTS[i % SUBJECTS.len()])
                .with_timestamp(Utc.timestamp_opt(i as i64 * 900, 0).unwrap())
        })
        .collect()
}

fn bench_suffix_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("suffix_array");

    for len in [1_000, 10_000, 100_000] {
        let inputs = [text(len, 1), text(len, 2)];
        group.bench_with_input(BenchmarkId::new("build_lcp", len), &inputs, |b, inputs| {
            b.iter(|| {
                let index = SuffixArrayIndex::from_strings(black_box(inputs));
                black_box(index.lcp_array())
            })
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let inputs = [text(5_000, 3), text(5_000, 4), text(5_000, 5)];
    group.bench_function("common_substrings_3x5k", |b| {
        b.iter(|| common_substrings(black_box(&inputs)))
    });
    group.bench_function("supermaximal_repeats_3x5k", |b| {
        b.iter(|| supermaximal_repeats(black_box(&inputs)))
    });
    group.bench_function("subject_pair", |b| {
        b.iter(|| common_substrings(black_box(&SUBJECTS[..2])))
    });

    group.finish();
}

fn bench_threading(c: &mut Criterion) {
    let mut group = c.benchmark_group("threading");
    group.sample_size(20);

    let messages = corpus(500);
    for parallel in [false, true] {
        let config = ThreadConfig::default()
            .with_parallel(parallel)
            .with_cache_miss_warnings(false);
        group.bench_with_input(BenchmarkId::new("build_500", parallel), &config, |b, config| {
            b.iter(|| {
                let cache = MemoryPairCache::new();
                let builder = ThreadBuilder::new(*config, &cache);
                black_box(builder.build(&messages).len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_suffix_array, bench_search, bench_threading);
criterion_main!(benches);
