//! Query string parsing and typed extraction.

use std::borrow::Cow;
use std::str::FromStr;

/// Parsed query string parameters.
///
/// Keys may repeat; insertion order is kept so repeated keys come back in
/// the order they appeared on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty set of query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string (with or without the leading `?`).
    ///
    /// `+` decodes to a space and `%XX` escapes are decoded. Pairs without
    /// `=` get an empty value; empty pairs are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use axiom_routing::QueryParams;
    ///
    /// let query = QueryParams::parse("?tags=a&tags=b&page=2");
    /// assert_eq!(query.get_values::<String>("tags"), ["a", "b"]);
    /// assert_eq!(query.get_value::<u32>("page"), Some(2));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self { pairs }
    }

    /// Appends a pair.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Returns the first raw value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parses the first value for a key.
    ///
    /// Returns `None` when the key is missing or its value does not parse.
    pub fn get_value<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Parses every value for a repeated key, in order.
    ///
    /// Values that do not parse are skipped.
    pub fn get_values<T: FromStr>(&self, key: &str) -> Vec<T> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .filter_map(|(_, v)| v.parse().ok())
            .collect()
    }

    /// Returns whether the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns an iterator over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn decode_component(s: &str) -> String {
    let spaced: Cow<'_, str> = if s.contains('+') {
        Cow::Owned(s.replace('+', " "))
    } else {
        Cow::Borrowed(s)
    };
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced.into_owned(),
    }
}
