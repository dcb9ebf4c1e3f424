//! Document storage behind a key-value interface, so the same editor
//! runs against browser local storage or anything else the host
//! provides.

use std::collections::HashMap;

/// Storage key the current document autosaves under.
pub const DOCUMENT_KEY: &str = "netsketch.document";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-process store used by tests and headless embedding.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: HashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_values() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.get(DOCUMENT_KEY), None);
        store.set(DOCUMENT_KEY, "{}");
        assert_eq!(store.get(DOCUMENT_KEY).as_deref(), Some("{}"));
        store.remove(DOCUMENT_KEY);
        assert_eq!(store.get(DOCUMENT_KEY), None);
    }
}
