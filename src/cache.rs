use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::NftPage;

/// Entries expire five minutes after insertion.
pub const PAGE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    page: NftPage,
    stored_at: Instant,
}

/// Short-lived memo of fetched pages, keyed by (wallet, cursor).
///
/// Pure accelerator: its absence only changes request volume. Expiry is
/// pull-based; a `get` on an expired entry deletes it and reports absent.
/// There is no background sweep. Entries are immutable once written, so
/// sharing the map across gallery sessions behind a mutex is safe.
#[derive(Debug)]
pub struct PageCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl PageCache {
    pub fn new() -> Self {
        Self::with_ttl(PAGE_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Cache key for one page request. The first page uses a sentinel so it
    /// never collides with a real continuation token.
    pub fn key(wallet: &str, cursor: Option<&str>) -> String {
        format!("{wallet}:{}", cursor.unwrap_or("<first>"))
    }

    pub fn get(&mut self, key: &str) -> Option<NftPage> {
        self.get_at(key, Instant::now())
    }

    pub fn put(&mut self, key: String, page: NftPage) {
        self.put_at(key, page, Instant::now())
    }

    fn get_at(&mut self, key: &str, now: Instant) -> Option<NftPage> {
        let entry = self.entries.get(key)?;
        if now.duration_since(entry.stored_at) > self.ttl {
            self.entries.remove(key);
            return None;
        }
        Some(self.entries[key].page.clone())
    }

    fn put_at(&mut self, key: String, page: NftPage, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                page,
                stored_at: now,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}
