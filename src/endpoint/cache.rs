//! File-backed model list cache.
//!
//! One record file per endpoint: line 1 is the decimal Unix timestamp of
//! the write, every following line is one model identifier. Any malformed
//! record is treated as a cache miss, never an error; the record is
//! rebuilt on the next successful discovery.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::constants::CACHE_FILE_PREFIX;

/// Result of a cache read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheResult {
    /// True iff the record exists, parses, and is within its TTL.
    pub is_valid: bool,
    /// Cached model identifiers, in discovery order. Empty when invalid.
    pub models: Vec<String>,
}

impl CacheResult {
    fn miss() -> Self {
        Self::default()
    }
}

/// Per-endpoint model list cache rooted at a single directory.
#[derive(Debug, Clone)]
pub struct ModelCache {
    cache_dir: PathBuf,
}

impl ModelCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Record file path for an endpoint.
    pub fn cache_file(&self, endpoint_name: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{CACHE_FILE_PREFIX}{endpoint_name}.txt"))
    }

    /// Reads the cached model list for an endpoint.
    ///
    /// Valid iff the record exists, its first line parses as an integer
    /// timestamp, and `now - timestamp < ttl_secs`. The exact-TTL boundary
    /// counts as stale. Any parse failure is a plain miss.
    pub fn read(&self, endpoint_name: &str, ttl_secs: u64) -> CacheResult {
        let path = self.cache_file(endpoint_name);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return CacheResult::miss(),
        };

        let mut lines = contents.lines();
        let cache_time: i64 = match lines.next().and_then(|l| l.trim().parse().ok()) {
            Some(t) => t,
            None => return CacheResult::miss(),
        };

        let age = Utc::now().timestamp() - cache_time;
        if age >= ttl_secs as i64 {
            return CacheResult::miss();
        }

        let models = lines
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        CacheResult {
            is_valid: true,
            models,
        }
    }

    /// Overwrites the endpoint's record with a fresh timestamp and list.
    ///
    /// Writes to a temp file in the cache directory and renames it into
    /// place, so readers only ever see a complete record.
    pub fn write(&self, endpoint_name: &str, models: &[String]) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).with_context(|| {
            format!("Failed to create cache directory {:?}", self.cache_dir)
        })?;

        let path = self.cache_file(endpoint_name);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.cache_dir)
            .context("Failed to create temporary cache file")?;
        writeln!(tmp, "{}", Utc::now().timestamp())?;
        for model in models {
            writeln!(tmp, "{model}")?;
        }
        tmp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace cache record {path:?}"))?;
        Ok(())
    }

    /// Removes a single endpoint's record. Returns whether one existed.
    pub fn clear(&self, endpoint_name: &str) -> Result<bool> {
        let path = self.cache_file(endpoint_name);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).with_context(|| format!("Failed to remove {path:?}"))?;
        Ok(true)
    }

    /// Removes every model cache record in the directory.
    pub fn clear_all(&self) -> Result<usize> {
        let mut removed = 0;
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(e) => e,
            Err(_) => return Ok(0),
        };
        for entry in entries.flatten() {
            if is_cache_record(&entry.path()) {
                fs::remove_file(entry.path())
                    .with_context(|| format!("Failed to remove {:?}", entry.path()))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn is_cache_record(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with(CACHE_FILE_PREFIX) && n.ends_with(".txt"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> (tempfile::TempDir, ModelCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = ModelCache::new(dir.path());
        (dir, cache)
    }

    #[test]
    fn round_trip_preserves_order_and_duplicates() {
        let (_dir, cache) = cache();
        let models = vec![
            "gpt-4".to_string(),
            "claude-sonnet".to_string(),
            "gpt-4".to_string(),
        ];
        cache.write("ep", &models).unwrap();
        let result = cache.read("ep", 3600);
        assert!(result.is_valid);
        assert_eq!(result.models, models);
    }

    #[test]
    fn round_trip_empty_list() {
        let (_dir, cache) = cache();
        cache.write("ep", &[]).unwrap();
        let result = cache.read("ep", 3600);
        assert!(result.is_valid);
        assert!(result.models.is_empty());
    }

    #[test]
    fn missing_record_is_a_miss() {
        let (_dir, cache) = cache();
        assert_eq!(cache.read("nope", 3600), CacheResult::default());
    }

    #[test]
    fn malformed_records_are_misses_not_errors() {
        let (dir, cache) = cache();
        let cases: [&[u8]; 4] = [
            b"",
            b"not-a-timestamp\nmodel-a\n",
            b"12.5\nmodel-a\n",
            b"\xff\xfe\x00garbage",
        ];
        for (i, contents) in cases.iter().enumerate() {
            let name = format!("bad{i}");
            fs::write(dir.path().join(format!("{CACHE_FILE_PREFIX}{name}.txt")), contents)
                .unwrap();
            let result = cache.read(&name, 3600);
            assert!(!result.is_valid, "case {i} should be invalid");
            assert!(result.models.is_empty());
        }
    }

    #[test]
    fn exact_ttl_boundary_is_stale() {
        let (dir, cache) = cache();
        let ttl = 100u64;
        let at_boundary = Utc::now().timestamp() - ttl as i64;
        fs::write(
            dir.path().join(format!("{CACHE_FILE_PREFIX}edge.txt")),
            format!("{at_boundary}\nmodel-a\n"),
        )
        .unwrap();
        assert!(!cache.read("edge", ttl).is_valid);

        // One second inside the window is still fresh.
        let inside = Utc::now().timestamp() - (ttl as i64 - 2);
        fs::write(
            dir.path().join(format!("{CACHE_FILE_PREFIX}edge.txt")),
            format!("{inside}\nmodel-a\n"),
        )
        .unwrap();
        assert!(cache.read("edge", ttl).is_valid);
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let (dir, cache) = cache();
        let now = Utc::now().timestamp();
        fs::write(
            dir.path().join(format!("{CACHE_FILE_PREFIX}blank.txt")),
            format!("{now}\nmodel-a\n\n\n"),
        )
        .unwrap();
        let result = cache.read("blank", 3600);
        assert!(result.is_valid);
        assert_eq!(result.models, vec!["model-a".to_string()]);
    }

    #[test]
    fn write_overwrites_previous_record() {
        let (_dir, cache) = cache();
        cache.write("ep", &["old".to_string()]).unwrap();
        cache.write("ep", &["new".to_string()]).unwrap();
        assert_eq!(cache.read("ep", 3600).models, vec!["new".to_string()]);
    }

    #[test]
    fn clear_and_clear_all() {
        let (_dir, cache) = cache();
        cache.write("a", &["m".to_string()]).unwrap();
        cache.write("b", &["m".to_string()]).unwrap();
        assert!(cache.clear("a").unwrap());
        assert!(!cache.clear("a").unwrap());
        assert_eq!(cache.clear_all().unwrap(), 1);
        assert!(!cache.read("b", 3600).is_valid);
    }
}
