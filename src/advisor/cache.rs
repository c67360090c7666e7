//! On-disk advisory cache
//!
//! One JSON file per cache key under the cache directory, retained without
//! eviction. Read or write failures are logged and treated as a miss so a
//! broken cache can never block advisory generation.

use crate::error::Result;
use crate::types::AdvisoryResponse;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct AdvisoryCache {
    dir: PathBuf,
}

impl AdvisoryCache {
    /// Open a cache rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Content hash over the serialized analysis plus the query text.
    /// Any change to either produces a new key.
    pub fn key(serialized_analysis: &str, query: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(serialized_analysis.as_bytes());
        hasher.update(b"_");
        hasher.update(query.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Stored response for `key`, or `None` on absence or any read failure
    pub fn get(&self, key: &str) -> Option<AdvisoryResponse> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }
        match read_entry(&path) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(key, "failed to read cached advisory: {e}");
                None
            }
        }
    }

    /// Persist `response` under `key`, overwriting any previous entry.
    /// Failures are logged, not propagated.
    pub fn put(&self, key: &str, response: &AdvisoryResponse) {
        let path = self.entry_path(key);
        if let Err(e) = write_entry(&path, response) {
            warn!(key, "failed to persist advisory: {e}");
        }
    }
}

fn read_entry(path: &Path) -> Result<AdvisoryResponse> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_entry(path: &Path, response: &AdvisoryResponse) -> Result<()> {
    let raw = serde_json::to_string(response)?;
    std::fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn response(advice: &str) -> AdvisoryResponse {
        AdvisoryResponse {
            query: "should I sell now?".to_string(),
            crop: "wheat".to_string(),
            advice: advice.to_string(),
            data_summary: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_key_is_deterministic() {
        let a = AdvisoryCache::key("analysis-blob", "sell?");
        let b = AdvisoryCache::key("analysis-blob", "sell?");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_key_changes_with_either_input() {
        let base = AdvisoryCache::key("analysis-blob", "sell?");
        assert_ne!(base, AdvisoryCache::key("analysis-blob2", "sell?"));
        assert_ne!(base, AdvisoryCache::key("analysis-blob", "hold?"));
    }

    #[test]
    fn test_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let cache = AdvisoryCache::open(tmp.path()).unwrap();

        let resp = response("hold until harvest");
        let key = AdvisoryCache::key("blob", "q");

        assert!(cache.get(&key).is_none());
        cache.put(&key, &resp);
        assert_eq!(cache.get(&key), Some(resp));
    }

    #[test]
    fn test_overwrite_replaces_entry() {
        let tmp = TempDir::new().unwrap();
        let cache = AdvisoryCache::open(tmp.path()).unwrap();
        let key = AdvisoryCache::key("blob", "q");

        cache.put(&key, &response("first"));
        cache.put(&key, &response("second"));
        assert_eq!(cache.get(&key).unwrap().advice, "second");
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = AdvisoryCache::open(tmp.path()).unwrap();
        let key = AdvisoryCache::key("blob", "q");

        std::fs::write(tmp.path().join(format!("{key}.json")), "not json").unwrap();
        assert!(cache.get(&key).is_none());
    }
}
