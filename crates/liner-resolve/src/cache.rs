//! The resolution cache seam.
//!
//! The engine only reads and writes whole resolutions by track reference;
//! expiry and persistence belong to the implementation.

use dashmap::DashMap;

use liner_core::model::CanonicalCredit;

/// Storage for previously resolved tracks.
///
/// Concurrent misses on the same key may both recompute and both `put`;
/// implementations must tolerate that.
pub trait ResolutionCache: Send + Sync {
    fn get(&self, track_ref: &str) -> Option<Vec<CanonicalCredit>>;

    fn put(&self, track_ref: &str, credits: &[CanonicalCredit]);
}

/// A process-local cache backed by a `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Vec<CanonicalCredit>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl ResolutionCache for MemoryCache {
    fn get(&self, track_ref: &str) -> Option<Vec<CanonicalCredit>> {
        self.entries.get(track_ref).map(|r| r.clone())
    }

    fn put(&self, track_ref: &str, credits: &[CanonicalCredit]) {
        self.entries.insert(track_ref.to_string(), credits.to_vec());
    }
}
