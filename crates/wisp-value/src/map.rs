use crate::cmp::wisp_cmp;
use crate::Value;

/// A hashmap value, represented as entries kept sorted by key at all times.
/// The reference implementation keeps its dictionary as a flat array sorted
/// after every batch of inserts and finds keys with a binary search; this
/// mirrors that rather than reaching for `std::collections::HashMap`, which
/// would make two maps built in different orders compare unequal under
/// `Vec`-style derived equality and would not give the deterministic key
/// order `keys`/`vals`/iteration rely on.
#[derive(Debug)]
pub struct MapData {
    pub entries: Vec<(Value, Value)>,
    pub meta: Value,
}

impl MapData {
    pub fn empty() -> Self {
        MapData {
            entries: Vec::new(),
            meta: Value::Nil,
        }
    }

    /// Builds a map from a flat `key, value, key, value, ...` slice, as the
    /// reader and `hash-map` primitive both do. Each pair is inserted
    /// without re-sorting, then the whole table is sorted once at the end
    /// (the reference's `set_more`/`set_done` split), so construction stays
    /// O(n log n) instead of O(n^2 log n).
    pub fn from_pairs(pairs: &[Value]) -> Self {
        let mut map = MapData::empty();
        for chunk in pairs.chunks(2) {
            let key = chunk[0].clone();
            let value = chunk.get(1).cloned().unwrap_or(Value::Nil);
            map.insert_unsorted(key, value);
        }
        map.sort();
        map
    }

    pub fn insert_unsorted(&mut self, key: Value, value: Value) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(k, _)| wisp_cmp(k, &key) == std::cmp::Ordering::Equal)
        {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn sort(&mut self) {
        self.entries
            .sort_by(|(a, _), (b, _)| wisp_cmp(a, b));
    }

    /// Inserts a single key/value pair, re-sorting immediately — the
    /// behavior `assoc` needs for a single update.
    pub fn set(&mut self, key: Value, value: Value) {
        self.insert_unsorted(key, value);
        self.sort();
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .binary_search_by(|(k, _)| wisp_cmp(k, key))
            .ok()
            .map(|i| &self.entries[i].1)
    }

    pub fn remove(&mut self, key: &Value) {
        if let Ok(i) = self.entries.binary_search_by(|(k, _)| wisp_cmp(k, key)) {
            self.entries.remove(i);
        }
    }

    pub fn with_meta(&self, meta: Value) -> Self {
        MapData {
            entries: self.entries.clone(),
            meta,
        }
    }
}
