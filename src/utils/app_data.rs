use crate::thread::ThreadConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "subthread";
const CONFIG_FILE: &str = "config.json";
const CACHE_DIR: &str = "caches";

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Maximum subject distance for two messages to join a thread
    #[serde(default = "default_thres")]
    pub thres: f64,

    /// Maximum time between the two messages of a candidate pair
    #[serde(default = "default_time_delta_secs")]
    pub time_delta_secs: i64,

    /// Evaluate candidate pair distances on the rayon pool
    #[serde(default = "default_parallel_pairs")]
    pub parallel_pairs: bool,

    /// Number of worker threads for pair evaluation
    /// If 0, uses the number of CPU cores
    #[serde(default)]
    pub worker_threads: usize,

    /// Capacity of the in-memory pair cache (0 = unbounded)
    #[serde(default)]
    pub cache_capacity: usize,

    /// Log a warning when a pair is missing from the cache
    #[serde(default = "default_warn_on_cache_miss")]
    pub warn_on_cache_miss: bool,
}

fn default_thres() -> f64 {
    0.25
}

fn default_time_delta_secs() -> i64 {
    2 * 24 * 60 * 60
}

fn default_parallel_pairs() -> bool {
    true
}

fn default_warn_on_cache_miss() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            thres: default_thres(),
            time_delta_secs: default_time_delta_secs(),
            parallel_pairs: default_parallel_pairs(),
            worker_threads: 0,
            cache_capacity: 0,
            warn_on_cache_miss: default_warn_on_cache_miss(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .context("Failed to read config file")?;
            let config: AppConfig = serde_json::from_str(&content)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Get the effective worker count (resolves 0 to CPU count)
    pub fn effective_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus()
        } else {
            self.worker_threads
        }
    }

    /// Validated threading configuration
    pub fn thread_config(&self) -> crate::Result<ThreadConfig> {
        let time_delta = chrono::Duration::try_seconds(self.time_delta_secs).ok_or_else(|| {
            crate::Error::InvalidConfig(format!(
                "time_delta_secs {} is out of range",
                self.time_delta_secs
            ))
        })?;
        ThreadConfig::new(self.thres, time_delta)
            .map(|config| {
                config
                    .with_parallel(self.parallel_pairs)
                    .with_cache_miss_warnings(self.warn_on_cache_miss)
            })
    }
}

/// Get the number of CPUs available
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

/// Default pair-cache file for a message corpus
pub fn default_cache_path(messages_path: &Path) -> Result<PathBuf> {
    let caches_dir = get_app_data_dir()?.join(CACHE_DIR);
    fs::create_dir_all(&caches_dir)?;
    Ok(caches_dir.join(format!("{}.json", hash_path(messages_path))))
}

/// Hash a path to create a unique file name
/// Format: first 16 chars of the file stem + hash
fn hash_path(path: &Path) -> String {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let path_str = canonical.to_string_lossy();

    let stem = canonical
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let sanitized: String = stem
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(16)
        .collect();

    let mut hasher = DefaultHasher::new();
    path_str.hash(&mut hasher);
    let hash = hasher.finish();

    format!("{}-{:016x}", sanitized, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_path() {
        let hash1 = hash_path(Path::new("/data/enron/messages.jsonl"));
        let hash2 = hash_path(Path::new("/data/enron/messages.jsonl"));
        let hash3 = hash_path(Path::new("/data/other/messages.jsonl"));

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert!(hash1.starts_with("messages-"));
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.thres, 0.25);
        assert_eq!(config.time_delta_secs, 172_800);
        assert!(config.parallel_pairs);
        assert_eq!(config.cache_capacity, 0);
    }

    #[test]
    fn test_effective_worker_threads() {
        let mut config = AppConfig::default();

        // 0 should resolve to CPU count
        assert!(config.effective_worker_threads() >= 1);

        config.worker_threads = 4;
        assert_eq!(config.effective_worker_threads(), 4);
    }

    #[test]
    fn test_app_config_partial_json() {
        // Should use defaults for missing fields
        let json = r#"{"thres": 0.1}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.thres, 0.1);
        assert_eq!(config.time_delta_secs, 172_800);
        assert!(config.warn_on_cache_miss);
    }

    #[test]
    fn test_app_config_empty_json() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.thres, 0.25);
        assert!(config.parallel_pairs);
    }

    #[test]
    fn test_thread_config_validation() {
        let config = AppConfig {
            thres: 1.5,
            ..Default::default()
        };
        assert!(config.thread_config().is_err());

        let config = AppConfig {
            time_delta_secs: 3600,
            parallel_pairs: false,
            ..Default::default()
        };
        let thread_config = config.thread_config().unwrap();
        assert_eq!(thread_config.time_delta(), chrono::Duration::hours(1));
        assert!(!thread_config.parallel());
    }

    #[test]
    fn test_thread_config_rejects_out_of_range_time_delta() {
        for secs in [i64::MAX, i64::MIN] {
            let config = AppConfig {
                time_delta_secs: secs,
                ..Default::default()
            };
            assert!(
                matches!(config.thread_config(), Err(crate::Error::InvalidConfig(_))),
                "{}",
                secs
            );
        }
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("subthread-missing-{}.json", std::process::id()));
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.thres, 0.25);
    }
}
