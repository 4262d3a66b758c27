use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use subthread::output;
use subthread::relationship::Relationship;
use subthread::search::{longest_common_substrings, supermaximal_repeats};
use subthread::store::{
    JsonlMessageStore, LruPairCache, MemoryPairCache, MessageStore, PairCache, SUBJECT_FIELD,
};
use subthread::thread::{
    ThreadBuilder, ThreadConfig, distance_distribution, find_duplicates,
    precompute_subject_substrings,
};
use subthread::utils::{self, AppConfig, TimeInterval};

#[derive(Parser)]
#[command(name = "subthread")]
#[command(about = "Suffix-array string toolkit and email conversation threading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Longest substrings common to every input
    Lcs {
        #[arg(required = true)]
        strings: Vec<String>,
    },
    /// Supermaximal repeats across the inputs
    Repeats {
        #[arg(required = true)]
        strings: Vec<String>,
    },
    /// Normalized longest-common-substring distance
    Distance { s1: String, s2: String },
    /// Group messages into conversation threads
    Threads {
        /// JSON Lines message file
        messages: PathBuf,

        /// Pair cache file (read, and updated with recomputed pairs)
        #[arg(long)]
        cache: Option<PathBuf>,

        /// Maximum subject distance
        #[arg(long)]
        thres: Option<f64>,

        /// Maximum hours between paired messages
        #[arg(long)]
        time_delta_hours: Option<i64>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Only show threads with at least this many messages
        #[arg(long, default_value_t = 2)]
        min_size: usize,
    },
    /// Fill a pair cache with subject-line common substrings
    Precompute {
        messages: PathBuf,

        /// Pair cache file (defaults to one per corpus in the app data directory)
        #[arg(long)]
        cache: Option<PathBuf>,

        #[arg(long)]
        time_delta_hours: Option<i64>,
    },
    /// Subject distances of every cached pair
    Distribution {
        messages: PathBuf,

        #[arg(long)]
        cache: Option<PathBuf>,

        /// Write the distances as JSON to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Report messages that are identical apart from their id
    Duplicates { messages: PathBuf },
    /// Message counts between two addresses
    Relationship {
        messages: PathBuf,
        a: String,
        b: String,

        /// Interval start (RFC 3339)
        #[arg(long, requires = "end")]
        begin: Option<String>,

        /// Interval end (RFC 3339)
        #[arg(long, requires = "begin")]
        end: Option<String>,
    },
    /// Show the effective configuration and its path
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = AppConfig::load()?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.effective_worker_threads())
        .build_global()
        .context("Failed to start worker pool")?;

    let color = !cli.no_color;
    match cli.command {
        Commands::Lcs { strings } => {
            let result = longest_common_substrings(&strings);
            output::print_common_substrings(&mut output::stdout(color), &strings, &result)?;
        }
        Commands::Repeats { strings } => {
            let repeats = supermaximal_repeats(&strings);
            output::print_repeats(&mut output::stdout(color), &repeats)?;
        }
        Commands::Distance { s1, s2 } => {
            println!("{:.6}", subthread::search::distance(&s1, &s2, None));
        }
        Commands::Threads {
            messages,
            cache,
            thres,
            time_delta_hours,
            json,
            min_size,
        } => {
            let thread_config = thread_config(&config, thres, time_delta_hours)?;
            run_threads(&messages, cache.as_deref(), &config, thread_config, json, min_size, color)?;
        }
        Commands::Precompute {
            messages,
            cache,
            time_delta_hours,
        } => {
            let thread_config = thread_config(&config, None, time_delta_hours)?;
            let cache_path = resolve_cache_path(&messages, cache)?;
            let store = JsonlMessageStore::open(&messages)?;
            let pair_cache = MemoryPairCache::new();

            let comparisons = precompute_subject_substrings(
                store.messages(),
                &pair_cache,
                thread_config.time_delta(),
                false,
            );
            pair_cache.save(&cache_path)?;
            println!("{} comparisons cached in {}", comparisons, cache_path.display());
        }
        Commands::Distribution {
            messages,
            cache,
            out,
        } => {
            let cache_path = resolve_cache_path(&messages, cache)?;
            let store = JsonlMessageStore::open(&messages)?;
            let pair_cache = MemoryPairCache::load(&cache_path)?;
            let distances = distance_distribution(&store, &pair_cache, SUBJECT_FIELD);

            match out {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let mut writer = std::io::BufWriter::new(file);
                    output::print_json(&mut writer, &distances)?;
                    println!("{} distances written to {}", distances.len(), path.display());
                }
                None => output::print_json(&mut std::io::stdout().lock(), &distances)?,
            }
        }
        Commands::Duplicates { messages } => {
            let store = JsonlMessageStore::open(&messages)?;
            let groups = find_duplicates(store.messages());
            for group in &groups {
                println!("{}", group.join(" "));
            }
            println!(
                "{} messages, {} sets of duplicates",
                store.len(),
                groups.len()
            );
        }
        Commands::Relationship {
            messages,
            a,
            b,
            begin,
            end,
        } => {
            let interval = match (begin, end) {
                (Some(begin), Some(end)) => Some(TimeInterval::parse(&begin, &end)?),
                _ => None,
            };
            let store = JsonlMessageStore::open(&messages)?;
            let relationship = Relationship::from_store(&store, &a, &b);

            let pair_cache = MemoryPairCache::new();
            let thread_config = config.thread_config()?.with_cache_miss_warnings(false);
            let builder = ThreadBuilder::new(thread_config, &pair_cache);
            let threads = relationship.threads(&builder);
            let (first, second) = relationship.participants();
            let threaded = [
                threads.threaded_count_from_sender(first, interval.as_ref()),
                threads.threaded_count_from_sender(second, interval.as_ref()),
            ];

            output::print_relationship(
                &mut output::stdout(color),
                &relationship,
                threaded,
                interval.as_ref(),
            )?;
        }
        Commands::Config => {
            println!("{}", utils::get_config_path()?.display());
            output::print_json(&mut std::io::stdout().lock(), &config)?;
        }
    }

    Ok(())
}

/// Config file values overridden by command-line flags
fn thread_config(
    config: &AppConfig,
    thres: Option<f64>,
    time_delta_hours: Option<i64>,
) -> Result<ThreadConfig> {
    let mut config = config.clone();
    if let Some(thres) = thres {
        config.thres = thres;
    }
    if let Some(hours) = time_delta_hours {
        config.time_delta_secs = hours.saturating_mul(3600);
    }
    Ok(config.thread_config()?)
}

fn resolve_cache_path(messages: &Path, cache: Option<PathBuf>) -> Result<PathBuf> {
    match cache {
        Some(path) => Ok(path),
        None => utils::default_cache_path(messages),
    }
}

fn run_threads(
    messages: &Path,
    cache_path: Option<&Path>,
    config: &AppConfig,
    thread_config: ThreadConfig,
    json: bool,
    min_size: usize,
    color: bool,
) -> Result<()> {
    let store = JsonlMessageStore::open(messages)?;

    // Without a persisted cache every pair is a miss, so warnings are noise
    let memory_cache = match cache_path {
        Some(path) => Some(MemoryPairCache::load(path)?),
        None => None,
    };
    let lru_cache = match (memory_cache.is_none(), NonZeroUsize::new(config.cache_capacity)) {
        (true, Some(capacity)) => Some(LruPairCache::new(capacity)),
        _ => None,
    };
    let fallback = MemoryPairCache::new();
    let pair_cache: &dyn PairCache = if let Some(cache) = &memory_cache {
        cache
    } else if let Some(cache) = &lru_cache {
        cache
    } else {
        &fallback
    };
    let warn = memory_cache.is_some() && thread_config.warn_on_cache_miss();
    let thread_config = thread_config.with_cache_miss_warnings(warn);

    let builder = ThreadBuilder::new(thread_config, pair_cache);
    let threads = builder.build(store.messages());

    if json {
        output::print_json(
            &mut std::io::stdout().lock(),
            &output::thread_summaries(&threads, min_size),
        )?;
    } else {
        output::print_threads(&mut output::stdout(color), &threads, min_size)?;
    }

    if let (Some(cache), Some(path)) = (&memory_cache, cache_path) {
        cache.save(path)?;
    }
    Ok(())
}
