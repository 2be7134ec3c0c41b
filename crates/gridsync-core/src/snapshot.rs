//! Last-synchronized property values per entity.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::ids::EntityId;

/// Property values of one entity, keyed by wire property name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    values: BTreeMap<&'static str, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: &'static str, value: Value) {
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }
}

/// Diff bases for every entity the remote side knows about.
///
/// An entity without an entry has never been rendered and is created on the
/// next render. A missing key inside an entry is always treated as changed.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: HashMap<EntityId, Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the values an entity holds before this cycle's input is applied.
    pub fn capture(&mut self, id: EntityId, values: Snapshot) {
        self.entries.insert(id, values);
    }

    /// The values the next render compares against.
    pub fn diff_base(&self, id: EntityId) -> Option<&Snapshot> {
        self.entries.get(&id)
    }

    /// Replace the base with the values just rendered.
    pub fn commit(&mut self, id: EntityId, values: Snapshot) {
        self.entries.insert(id, values);
    }

    /// Force a property to be re-sent on the next render.
    pub fn invalidate(&mut self, id: EntityId, key: &str) {
        if let Some(snapshot) = self.entries.get_mut(&id) {
            snapshot.remove(key);
        }
    }

    /// Record a value the remote side already holds, so it is not echoed back.
    pub fn record(&mut self, id: EntityId, key: &'static str, value: Value) {
        if let Some(snapshot) = self.entries.get_mut(&id) {
            snapshot.insert(key, value);
        }
    }

    /// Drop the base of a disposed entity.
    pub fn discard(&mut self, id: EntityId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Whether the remote side knows the entity.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(width: i64) -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert("width", json!(width));
        snapshot.insert("left", json!(0));
        snapshot
    }

    #[test]
    fn test_capture_and_commit() {
        let mut store = SnapshotStore::new();
        let id = EntityId(3);
        assert!(store.diff_base(id).is_none());
        store.capture(id, snapshot(10));
        assert_eq!(store.diff_base(id).unwrap().get("width"), Some(&json!(10)));
        store.commit(id, snapshot(20));
        assert_eq!(store.diff_base(id).unwrap().get("width"), Some(&json!(20)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalidate_removes_key_only() {
        let mut store = SnapshotStore::new();
        let id = EntityId(3);
        store.commit(id, snapshot(10));
        store.invalidate(id, "left");
        let base = store.diff_base(id).unwrap();
        assert!(base.get("left").is_none());
        assert_eq!(base.get("width"), Some(&json!(10)));
        // Invalidating an unknown entity does not make it known.
        store.invalidate(EntityId(9), "left");
        assert!(!store.contains(EntityId(9)));
    }

    #[test]
    fn test_record_and_discard() {
        let mut store = SnapshotStore::new();
        let id = EntityId(3);
        store.record(id, "width", json!(5));
        assert!(!store.contains(id));
        store.commit(id, snapshot(10));
        store.record(id, "width", json!(5));
        assert_eq!(store.diff_base(id).unwrap().get("width"), Some(&json!(5)));
        assert!(store.discard(id));
        assert!(!store.discard(id));
        assert!(store.is_empty());
    }
}
