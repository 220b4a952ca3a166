//! Per-feed record tables
//!
//! One table per feed kind, keyed by asset. A missing key reads back as the
//! record type's default value.

use feed_model::{AssetKey, FeedEntry, PostMode, RejectReason};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct FeedTable<R: FeedEntry> {
    records: FxHashMap<AssetKey, R>,
}

impl<R: FeedEntry> Default for FeedTable<R> {
    fn default() -> Self {
        Self {
            records: FxHashMap::default(),
        }
    }
}

impl<R: FeedEntry> FeedTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored record, or `R::default()` when the key was never posted
    pub fn get(&self, key: &AssetKey) -> R {
        self.records.get(key).cloned().unwrap_or_default()
    }

    /// Order-preserving lookup, one result per requested key
    pub fn get_bulk(&self, keys: &[AssetKey]) -> Vec<R> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Resolve time of the stored record, if any
    pub fn stored_resolve_time(&self, key: &AssetKey) -> Option<u64> {
        self.records.get(key).map(|r| r.resolve_time())
    }

    /// Store `record` unless strict mode finds it stale
    pub fn put(&mut self, record: R, mode: PostMode) -> Result<(), RejectReason> {
        let key = *record.asset_name();
        if mode.is_strict() {
            if let Some(stored) = self.stored_resolve_time(&key) {
                let posted = record.resolve_time();
                if posted <= stored {
                    return Err(RejectReason::Stale { stored, posted });
                }
            }
        }
        self.records.insert(key, record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records sorted by key
    pub fn sorted_records(&self) -> Vec<R> {
        let mut entries: Vec<(&AssetKey, &R)> = self.records.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, r)| r.clone()).collect()
    }
}

impl<R: FeedEntry> FromIterator<R> for FeedTable<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            records: iter
                .into_iter()
                .map(|r| (*r.asset_name(), r))
                .collect(),
        }
    }
}
