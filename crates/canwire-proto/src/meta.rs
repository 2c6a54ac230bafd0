use std::collections::BTreeMap;

use crate::query;

/// Side-channel key/value metadata (auth tokens, tracing ids).
///
/// Keys are unique and order-irrelevant; the wire form is a query string
/// with keys in sorted order so equal maps encode identically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Meta {
    entries: BTreeMap<String, String>,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as query-string bytes. An empty map encodes as zero bytes.
    pub fn encode_query(&self) -> Vec<u8> {
        query::encode_pairs(self.iter()).into_bytes()
    }

    /// Parse query-string bytes, merging into this map (last value wins).
    pub fn parse_bytes(&mut self, data: &[u8]) {
        for (key, value) in query::decode_pairs(data) {
            self.entries.insert(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Meta {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Meta::new();
        for (k, v) in iter {
            meta.set(k, v);
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_sorted() {
        let meta: Meta = [("trace", "abc123"), ("auth", "secret=1")].into_iter().collect();
        let encoded = meta.encode_query();
        assert_eq!(encoded, b"auth=secret%3D1&trace=abc123");

        let mut decoded = Meta::new();
        decoded.parse_bytes(&encoded);
        assert_eq!(decoded, meta);
    }

    #[test]
    fn empty_map_encodes_zero_bytes() {
        assert!(Meta::new().encode_query().is_empty());
    }

    #[test]
    fn set_replaces_existing_key() {
        let mut meta = Meta::new();
        meta.set("k", "1");
        meta.set("k", "2");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get("k"), Some("2"));
    }
}
