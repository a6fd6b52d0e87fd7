//! Content-addressed response cache.
//!
//! One JSON file per entry under `<root>/<model>/<digest>.json`. Writes go
//! to a temporary file in the destination directory followed by an atomic
//! rename, so a crash or a concurrent writer never leaves a partially
//! written entry observable. Concurrent workers that both miss the same key
//! and both write converge on one consistent value because the rename
//! replaces the whole file; no in-process lock is involved, which keeps the
//! discipline correct even when the writers are separate OS processes.
//!
//! Malformed or unreadable entries are logged and treated as cache misses,
//! never as fatal errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use merge_bench_domain::errors::CacheError;

/// A cached model response.
///
/// Entries are immutable once written; re-writing a key replaces the whole
/// file with identical content, which is tolerated by design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Exact prompt the response was obtained for.
    pub prompt: String,

    /// Raw response text.
    pub response: String,

    /// Reasoning trace, when the model exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// When the response was captured.
    pub cached_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Build an entry captured now.
    pub fn new(prompt: impl Into<String>, response: impl Into<String>, reasoning: Option<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            reasoning,
            cached_at: Utc::now(),
        }
    }

    /// The completion text handed to the response parser.
    ///
    /// When a reasoning trace is present it is re-wrapped in the
    /// `<think>...</think>` prelude the parser knows how to strip.
    pub fn full_text(&self) -> String {
        match &self.reasoning {
            Some(reasoning) => format!("<think>\n{}</think>\n{}", reasoning, self.response),
            None => self.response.clone(),
        }
    }
}

/// Result of scanning a model's cache partition.
#[derive(Debug, Clone, Default)]
pub struct CacheScan {
    /// Number of readable entries.
    pub valid: u64,
    /// Paths of entries that could not be parsed.
    pub malformed: Vec<PathBuf>,
}

/// File-backed response cache partitioned by model identifier.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    root: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn model_dir(&self, model: &str) -> PathBuf {
        // Model identifiers like "anthropic/claude-3.5-sonnet" become
        // nested directories under the root.
        self.root.join(model)
    }

    fn entry_path(&self, model: &str, key: &str) -> PathBuf {
        self.model_dir(model).join(format!("{key}.json"))
    }

    /// Look up a cached response. Missing and malformed entries both read
    /// as `None`; malformed ones are logged so the key can be re-queried.
    pub fn get(&self, model: &str, key: &str) -> Option<CachedResponse> {
        let path = self.entry_path(model, key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Unreadable cache entry, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice::<CachedResponse>(&bytes) {
            Ok(entry) => {
                debug!(model, key, "Cache hit");
                Some(entry)
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "Malformed cache entry, treating as miss"
                );
                None
            }
        }
    }

    /// Write a cache entry atomically.
    ///
    /// The entry is serialized to a temporary file in the destination
    /// directory and renamed into place, so readers never observe a
    /// partial write. Re-writing an existing key replaces the file.
    pub fn put(&self, model: &str, key: &str, entry: &CachedResponse) -> Result<(), CacheError> {
        let dir = self.model_dir(model);
        fs::create_dir_all(&dir).map_err(|source| CacheError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = self.entry_path(model, key);
        let tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|source| CacheError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        serde_json::to_writer_pretty(&tmp, entry).map_err(|err| CacheError::WriteFailed {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
        })?;

        tmp.persist(&path).map_err(|err| CacheError::WriteFailed {
            path: path.clone(),
            source: err.error,
        })?;

        debug!(model, key, "Cache entry written");
        Ok(())
    }

    /// Scan a model's partition, counting valid entries and collecting the
    /// paths of malformed ones.
    pub fn scan_model(&self, model: &str) -> Result<CacheScan, CacheError> {
        let dir = self.model_dir(model);
        let mut scan = CacheScan::default();

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(scan),
            Err(source) => return Err(CacheError::Io { path: dir, source }),
        };

        for entry in entries {
            let entry = entry.map_err(|source| CacheError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let readable = fs::read(&path)
                .ok()
                .and_then(|bytes| serde_json::from_slice::<CachedResponse>(&bytes).ok())
                .is_some();
            if readable {
                scan.valid += 1;
            } else {
                scan.malformed.push(path);
            }
        }

        Ok(scan)
    }

    /// Delete malformed entries in a model's partition, returning how many
    /// were removed.
    pub fn purge_malformed(&self, model: &str) -> Result<u64, CacheError> {
        let scan = self.scan_model(model)?;
        let mut removed = 0;
        for path in scan.malformed {
            match fs::remove_file(&path) {
                Ok(()) => {
                    warn!(path = %path.display(), "Purged malformed cache entry");
                    removed += 1;
                }
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(CacheError::Io { path, source }),
            }
        }
        Ok(removed)
    }

    /// Wipe a model's entire cache partition, returning the number of
    /// entries removed. Used between independent evaluation runs.
    pub fn wipe_model(&self, model: &str) -> Result<u64, CacheError> {
        let dir = self.model_dir(model);
        let scan = self.scan_model(model)?;
        let total = scan.valid + scan.malformed.len() as u64;

        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(total),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(source) => Err(CacheError::Io { path: dir, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merge_bench_common::prompt_digest;
    use tempfile::TempDir;

    const MODEL: &str = "anthropic/claude-3.5-sonnet";

    fn cache() -> (TempDir, ResponseCache) {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(dir.path());
        (dir, cache)
    }

    #[test]
    fn miss_on_empty_cache() {
        let (_dir, cache) = cache();
        assert!(cache.get(MODEL, &prompt_digest("p")).is_none());
    }

    #[test]
    fn put_then_get_roundtrip() {
        let (_dir, cache) = cache();
        let key = prompt_digest("the prompt");
        let entry = CachedResponse::new("the prompt", "the response", None);
        cache.put(MODEL, &key, &entry).unwrap();

        let got = cache.get(MODEL, &key).unwrap();
        assert_eq!(got, entry);
    }

    #[test]
    fn idempotent_rewrite_with_identical_content() {
        let (_dir, cache) = cache();
        let key = prompt_digest("p");
        let entry = CachedResponse::new("p", "r", Some("thinking".to_string()));
        cache.put(MODEL, &key, &entry).unwrap();
        cache.put(MODEL, &key, &entry).unwrap();

        let got = cache.get(MODEL, &key).unwrap();
        assert_eq!(got.response, "r");
        assert_eq!(got.reasoning.as_deref(), Some("thinking"));
    }

    #[test]
    fn corrupt_entry_reads_as_miss() {
        let (_dir, cache) = cache();
        let key = prompt_digest("p");
        let entry = CachedResponse::new("p", "r", None);
        cache.put(MODEL, &key, &entry).unwrap();

        let path = cache.entry_path(MODEL, &key);
        fs::write(&path, b"{ not json").unwrap();

        assert!(cache.get(MODEL, &key).is_none());
    }

    #[test]
    fn scan_and_purge_malformed() {
        let (_dir, cache) = cache();
        let entry = CachedResponse::new("p", "r", None);
        cache.put(MODEL, &prompt_digest("a"), &entry).unwrap();
        cache.put(MODEL, &prompt_digest("b"), &entry).unwrap();

        let bad = cache.entry_path(MODEL, &prompt_digest("b"));
        fs::write(&bad, b"garbage").unwrap();

        let scan = cache.scan_model(MODEL).unwrap();
        assert_eq!(scan.valid, 1);
        assert_eq!(scan.malformed.len(), 1);

        assert_eq!(cache.purge_malformed(MODEL).unwrap(), 1);
        let scan = cache.scan_model(MODEL).unwrap();
        assert_eq!(scan.valid, 1);
        assert!(scan.malformed.is_empty());
    }

    #[test]
    fn wipe_model_removes_partition() {
        let (_dir, cache) = cache();
        let entry = CachedResponse::new("p", "r", None);
        cache.put(MODEL, &prompt_digest("a"), &entry).unwrap();
        cache.put(MODEL, &prompt_digest("b"), &entry).unwrap();

        assert_eq!(cache.wipe_model(MODEL).unwrap(), 2);
        assert!(cache.get(MODEL, &prompt_digest("a")).is_none());
        // Wiping a missing partition is a no-op.
        assert_eq!(cache.wipe_model(MODEL).unwrap(), 0);
    }

    #[test]
    fn partitions_are_independent_per_model() {
        let (_dir, cache) = cache();
        let key = prompt_digest("same prompt");
        cache
            .put("model-a", &key, &CachedResponse::new("same prompt", "from a", None))
            .unwrap();
        cache
            .put("model-b", &key, &CachedResponse::new("same prompt", "from b", None))
            .unwrap();

        assert_eq!(cache.get("model-a", &key).unwrap().response, "from a");
        assert_eq!(cache.get("model-b", &key).unwrap().response, "from b");
    }

    #[test]
    fn full_text_wraps_reasoning() {
        let entry = CachedResponse::new("p", "answer", Some("because".to_string()));
        assert_eq!(entry.full_text(), "<think>\nbecause</think>\nanswer");

        let plain = CachedResponse::new("p", "answer", None);
        assert_eq!(plain.full_text(), "answer");
    }
}
