use url::form_urlencoded;

pub const TAB: &str = "tab";
pub const PERIOD: &str = "period";
pub const TYPE: &str = "type";
pub const SEARCH: &str = "search";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const PAGE: &str = "page";
pub const SIZE: &str = "size";

/// Ordered view of the location's query string.
///
/// Keys keep the position of their first appearance; a repeated key keeps
/// its last value. Empty values never make it into the set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamSet {
    entries: Vec<(String, String)>,
}

impl ParamSet {
    pub fn parse(search: &str) -> Self {
        let raw = search.trim().trim_start_matches('?');
        let mut set = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            if key.is_empty() {
                continue;
            }
            set.put(&key, Some(value.into_owned()));
        }
        set
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Merges `patch` in place. Keys the patch does not mention are untouched.
    pub fn apply(&mut self, patch: &QueryPatch) {
        for (key, value) in patch.iter() {
            self.put(key, value.map(str::to_string));
        }
    }

    pub fn merged(&self, patch: &QueryPatch) -> Self {
        let mut next = self.clone();
        next.apply(patch);
        next
    }

    /// Serialized form without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// `path` with this set appended, or the bare path when the set is empty.
    pub fn to_href(&self, path: &str) -> String {
        if self.entries.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.to_query_string())
        }
    }

    fn put(&mut self, key: &str, value: Option<String>) {
        let value = value.filter(|value| !value.is_empty());
        let position = self.entries.iter().position(|(existing, _)| existing == key);
        match (position, value) {
            (Some(idx), Some(value)) => self.entries[idx].1 = value,
            (Some(idx), None) => {
                self.entries.remove(idx);
            }
            (None, Some(value)) => self.entries.push((key.to_string(), value)),
            (None, None) => {}
        }
    }
}

/// A partial update to a [`ParamSet`]. `None` (or an empty string) deletes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryPatch {
    changes: Vec<(String, Option<String>)>,
}

impl QueryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.put(key, Some(value.into()));
        self
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.put(key, None);
        self
    }

    pub fn put(&mut self, key: &str, value: Option<String>) {
        let value = value.filter(|value| !value.is_empty());
        if let Some(entry) = self.changes.iter_mut().find(|(existing, _)| existing == key) {
            entry.1 = value;
        } else {
            self.changes.push((key.to_string(), value));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.changes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    /// Folds a later patch into this one; the later value wins per key.
    pub fn merge(&mut self, later: QueryPatch) {
        for (key, value) in later.changes {
            self.put(&key, value);
        }
    }

    /// Drops every change whose key is not in `allowed`, returning the
    /// dropped keys.
    pub fn retain_keys(&mut self, allowed: &[&str]) -> Vec<String> {
        let mut dropped = Vec::new();
        self.changes.retain(|(key, _)| {
            let keep = allowed.contains(&key.as_str());
            if !keep {
                dropped.push(key.clone());
            }
            keep
        });
        dropped
    }
}
