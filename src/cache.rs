//! Fingerprint-keyed render cache.
//!
//! Rebuilding a component's subtree is the expensive step of a render cycle,
//! and most re-render triggers (sibling mutations, layout passes) arrive
//! with the component's own configuration unchanged. The cache lets a
//! component skip the rebuild whenever its attribute fingerprint matches the
//! last successful render: the cached subtree is cloned instead.
//!
//! ## Ownership
//!
//! Each component instance owns its own [`RenderCache`] — there is no shared
//! map keyed by instance, so cross-instance reads and invalidation are
//! impossible by construction. Entries are last-write-wins; with a
//! single-threaded event loop there are no concurrent writers.
//!
//! ## Invalidation
//!
//! The cache is cleared in exactly two situations: the fingerprint changed
//! (the component's recognized attributes differ from the cached render), or
//! the instance disconnected. Failed builds are never cached, so a
//! transient failure doesn't pin a fallback subtree past its cause.

use std::fmt;

/// A rendered subtree held by the cache. Stored as the serialized fragment;
/// cloning it is the "clone the cached DOM subtree" of the browser pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSubtree {
    pub html: String,
}

/// Per-instance render cache: at most one entry, keyed by fingerprint.
#[derive(Debug, Default)]
pub struct RenderCache {
    fingerprint: Option<String>,
    subtree: Option<CachedSubtree>,
    stats: CacheStats,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached subtree for a fingerprint. A hit clones the stored
    /// subtree; a miss returns `None` and the caller rebuilds.
    pub fn lookup(&mut self, fingerprint: &str) -> Option<CachedSubtree> {
        match (&self.fingerprint, &self.subtree) {
            (Some(stored), Some(subtree)) if stored == fingerprint => {
                self.stats.hit();
                Some(subtree.clone())
            }
            _ => {
                self.stats.miss();
                None
            }
        }
    }

    /// Record a successful render. Last write wins.
    pub fn store(&mut self, fingerprint: String, subtree: CachedSubtree) {
        self.fingerprint = Some(fingerprint);
        self.subtree = Some(subtree);
    }

    /// Drop the cached entry (fingerprint change or disconnect).
    pub fn invalidate(&mut self) {
        if self.subtree.is_some() {
            self.stats.invalidation();
        }
        self.fingerprint = None;
        self.subtree = None;
    }

    /// Fingerprint of the cached render, if any.
    pub fn cached_fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

/// Cache performance counters for one instance's lifetime.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
    pub invalidations: u32,
}

impl CacheStats {
    fn hit(&mut self) {
        self.hits += 1;
    }

    fn miss(&mut self) {
        self.misses += 1;
    }

    fn invalidation(&mut self) {
        self.invalidations += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} built ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} built", self.misses)
        }
    }
}
