//! Intro interval store
//!
//! Read-only lookup of detected intervals keyed by media item. The detection
//! pipeline fills the store; the engine only calls [`IntervalStore::lookup`].

use autoskip_common::{Interval, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};
use tracing::info;
use uuid::Uuid;

/// Lookup of detected intro intervals
pub trait IntervalStore: Send + Sync {
    /// Interval for an item, if one was detected
    fn lookup(&self, item_id: &Uuid) -> Option<Interval>;
}

/// In-memory interval table
///
/// Uses RwLock: lookups every poll tick, writes only when the detection
/// pipeline publishes new results.
#[derive(Debug, Default)]
pub struct InMemoryIntervalStore {
    intervals: RwLock<HashMap<Uuid, Interval>>,
}

impl InMemoryIntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of intervals (later entries win)
    pub fn from_intervals(intervals: impl IntoIterator<Item = Interval>) -> Self {
        let store = Self::new();
        store.replace_all(intervals);
        store
    }

    /// Load the JSON table exported by the detection pipeline
    ///
    /// The file is a JSON array of intervals.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let intervals: Vec<Interval> = serde_json::from_str(&content)?;
        info!(
            "Loaded {} intro intervals from {}",
            intervals.len(),
            path.display()
        );
        Ok(Self::from_intervals(intervals))
    }

    /// Insert or replace one interval
    pub fn insert(&self, interval: Interval) {
        self.intervals
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(interval.item_id, interval);
    }

    /// Swap in a freshly published table
    pub fn replace_all(&self, intervals: impl IntoIterator<Item = Interval>) {
        let table: HashMap<Uuid, Interval> = intervals
            .into_iter()
            .map(|interval| (interval.item_id, interval))
            .collect();
        *self.intervals.write().unwrap_or_else(PoisonError::into_inner) = table;
    }

    pub fn len(&self) -> usize {
        self.intervals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntervalStore for InMemoryIntervalStore {
    fn lookup(&self, item_id: &Uuid) -> Option<Interval> {
        self.intervals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(item_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_lookup_missing_item() {
        let store = InMemoryIntervalStore::new();
        assert!(store.is_empty());
        assert!(store.lookup(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_insert_and_lookup() {
        let store = InMemoryIntervalStore::new();
        let item = Uuid::new_v4();
        store.insert(Interval::from_detection(item, 10.0, 30.0));

        let interval = store.lookup(&item).unwrap();
        assert_eq!(interval.start, 10.0);
        assert_eq!(interval.end, 30.0);
        assert!(interval.valid);
    }

    #[test]
    fn test_replace_all_drops_old_entries() {
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        let store = InMemoryIntervalStore::from_intervals([Interval::from_detection(old, 1.0, 2.0)]);

        store.replace_all([Interval::from_detection(new, 3.0, 4.0)]);

        assert!(store.lookup(&old).is_none());
        assert!(store.lookup(&new).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_json_file() {
        let item = Uuid::new_v4();
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"item_id":"{item}","start":12.5,"end":41.0,"valid":true}},
               {{"item_id":"{other}","start":0.0,"end":0.0,"valid":false}}]"#,
            item = item,
            other = Uuid::new_v4()
        )
        .unwrap();

        let store = InMemoryIntervalStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup(&item).unwrap().end, 41.0);
    }

    #[test]
    fn test_from_json_file_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = InMemoryIntervalStore::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, autoskip_common::Error::Json(_)));
    }
}
