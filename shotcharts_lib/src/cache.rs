//! Response cache: a [`CacheStore`] trait with in-memory and on-disk
//! backends.
//!
//! Entries are written once after a complete successful fetch and never
//! expire; staleness is the accepted tradeoff for staying under the
//! upstream rate limit. `clear` (or deleting the cache directory) is the
//! only invalidation. Caching is best-effort: a read failure is a miss
//! and a write failure is a log line, never an error to the caller.

use std::fs;
use std::path::PathBuf;

use dashmap::DashMap;

/// Key/value store for serialized fetch responses.
pub trait CacheStore: Send + Sync {
    /// Returns the cached payload for `key`, or `None` on a miss.
    fn get(&self, key: &str) -> Option<String>;
    /// Stores a payload under `key`. Failures are logged, never raised.
    fn put(&self, key: &str, payload: &str);
    /// Removes all entries, returning how many were removed.
    fn clear(&self) -> usize;
}

/// Builds the deterministic cache key for a logical request.
///
/// A pure function of the request name and its parameters: the same
/// query always lands on the same key, within and across runs. Parameter
/// values are sanitized so keys stay filesystem-safe.
pub fn cache_key(endpoint: &str, params: &[(&str, &str)]) -> String {
    let mut key = String::from(endpoint);
    for (name, value) in params {
        key.push('_');
        key.push_str(name);
        key.push('-');
        key.push_str(&sanitize(value));
    }
    key
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Thread-safe in-memory cache. Used in tests and for callers that do
/// not want responses to outlive the process.
#[derive(Default)]
pub struct MemoryCache {
    store: DashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.store.get(key).map(|entry| entry.value().clone())
    }

    fn put(&self, key: &str, payload: &str) {
        self.store.insert(key.to_string(), payload.to_string());
    }

    fn clear(&self) -> usize {
        let count = self.store.len();
        self.store.clear();
        count
    }
}

/// On-disk cache holding one `<key>.json` file per entry.
///
/// The directory is created lazily on first write. Files hold the same
/// JSON serialization as the in-memory tables, so a cached file can be
/// opened and inspected directly.
pub struct FsCache {
    dir: PathBuf,
}

impl FsCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CacheStore for FsCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(payload) => Some(payload),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!("unreadable cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    fn put(&self, key: &str, payload: &str) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::warn!("cannot create cache dir {}: {}", self.dir.display(), e);
            return;
        }
        let path = self.entry_path(key);
        if let Err(e) = fs::write(&path, payload) {
            tracing::warn!("cache write failed for {}: {}", path.display(), e);
        }
    }

    fn clear(&self) -> usize {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };
        let mut count = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && fs::remove_file(&path).is_ok()
            {
                count += 1;
            }
        }
        count
    }
}
