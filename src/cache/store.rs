//! Render cache storage.

use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use bytes::Bytes;
use lru::LruCache;
use metrics::counter;

use crate::infra::content::Freshness;

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// Effective freshness policy of one cached entry.
///
/// A single query declares either a TTL or tags, never both; a composed
/// page inherits from every query consulted, so its policy can carry the
/// tightest TTL alongside the union of tags. An entry with neither stays
/// fresh until its path is explicitly invalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age: Option<Duration>,
    pub tags: Vec<String>,
}

impl CachePolicy {
    pub fn max_age(age: Duration) -> Self {
        Self {
            max_age: Some(age),
            tags: Vec::new(),
        }
    }

    pub fn tags(tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            max_age: None,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Fold the freshness declarations of every consulted query into one
    /// policy: the shortest TTL wins, tags accumulate.
    pub fn combine<'a>(declarations: impl IntoIterator<Item = &'a Freshness>) -> Self {
        let mut policy = Self::default();
        for declaration in declarations {
            match declaration {
                Freshness::MaxAge(age) => {
                    policy.max_age = Some(match policy.max_age {
                        Some(current) => current.min(*age),
                        None => *age,
                    });
                }
                Freshness::Tags(tags) => {
                    for tag in *tags {
                        if !policy.tags.iter().any(|existing| existing == tag) {
                            policy.tags.push((*tag).to_string());
                        }
                    }
                }
            }
        }
        policy
    }

    fn covers_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

/// A composed page body held by the render cache.
#[derive(Clone)]
pub struct CachedPage {
    pub body: Bytes,
    pub stored_at: Instant,
    policy: CachePolicy,
}

impl CachedPage {
    pub fn new(body: Bytes, policy: CachePolicy) -> Self {
        Self {
            body,
            stored_at: Instant::now(),
            policy,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        match self.policy.max_age {
            Some(max_age) => now.duration_since(self.stored_at) < max_age,
            None => true,
        }
    }
}

/// Path-keyed cache of composed page bodies with LRU eviction.
pub struct RenderCache {
    pages: RwLock<LruCache<String, CachedPage>>,
}

impl RenderCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            pages: RwLock::new(LruCache::new(capacity)),
        }
    }

    /// Look up a fresh entry for `path`. An expired entry is dropped and
    /// reported as a miss, so callers never see stale time-based content.
    pub fn get(&self, path: &str) -> Option<CachedPage> {
        let mut pages = rw_write(&self.pages, SOURCE, "get");
        match pages.get(path) {
            Some(page) if page.is_fresh(Instant::now()) => {
                counter!("solara_render_cache_hit_total").increment(1);
                Some(page.clone())
            }
            Some(_) => {
                pages.pop(path);
                counter!("solara_render_cache_miss_total").increment(1);
                None
            }
            None => {
                counter!("solara_render_cache_miss_total").increment(1);
                None
            }
        }
    }

    pub fn insert(&self, path: impl Into<String>, page: CachedPage) {
        rw_write(&self.pages, SOURCE, "insert").put(path.into(), page);
    }

    /// Drop the entry for one path. Returns whether an entry was present,
    /// so repeated invalidation is observably idempotent.
    pub fn invalidate_path(&self, path: &str) -> bool {
        let removed = rw_write(&self.pages, SOURCE, "invalidate_path")
            .pop(path)
            .is_some();
        if removed {
            counter!("solara_render_cache_invalidate_total").increment(1);
        }
        removed
    }

    /// Drop every entry whose policy carries `tag`. Returns the number of
    /// entries removed.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut pages = rw_write(&self.pages, SOURCE, "invalidate_tag");
        let stale: Vec<String> = pages
            .iter()
            .filter(|(_, page)| page.policy.covers_tag(tag))
            .map(|(path, _)| path.clone())
            .collect();
        for path in &stale {
            pages.pop(path);
        }
        if !stale.is_empty() {
            counter!("solara_render_cache_invalidate_total").increment(stale.len() as u64);
        }
        stale.len()
    }

    pub fn len(&self) -> usize {
        rw_read(&self.pages, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
