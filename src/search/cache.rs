// Short-lived cache of counts pages.
//
// Entries stay valid for CACHE_TTL after capture. Expired entries count as
// misses and are overwritten by the next successful fetch; nothing is
// proactively purged. Shared by `&self` via interior mutability.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::api::CountsPage;
use super::CountsQuery;

/// How long a cached counts page stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Canonical cache key for a (keywords, resolved query) pair.
///
/// `CountsQuery` serializes with a fixed field order, so the JSON form is
/// identical for identical inputs.
pub fn cache_key(keywords: &[String], query: &CountsQuery) -> String {
    serde_json::to_string(&(keywords, query)).unwrap_or_default()
}

struct CacheEntry {
    captured: Instant,
    page: CountsPage,
}

/// Process-local TTL cache of counts pages, keyed by `cache_key`.
pub struct CountsCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl CountsCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// A fresh copy of the entry under `key`, or None if absent or expired.
    pub fn lookup(&self, key: &str) -> Option<CountsPage> {
        let entries = self.entries.lock().unwrap();
        let entry = entries.get(key)?;
        if entry.captured.elapsed() < self.ttl {
            Some(entry.page.clone())
        } else {
            None
        }
    }

    pub fn store(&self, key: String, page: &CountsPage) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key,
            CacheEntry {
                captured: Instant::now(),
                page: page.clone(),
            },
        );
    }
}

impl Default for CountsCache {
    fn default() -> Self {
        Self::new()
    }
}
