//! Collection query parameters and query-string encoding.
//!
//! # Design
//! - Keep insertion order so generated URLs are stable.
//! - Skip null and empty-string values, but never skip `0`.

use crate::core::attributes::value_text;
use serde_json::Value;

/// Ordered query parameters for a collection request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, Value)>,
}

impl QueryParams {
    /// Empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or replace a parameter, keeping its original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Fill in every default whose key is absent; present keys keep their value.
    #[must_use]
    pub fn with_defaults(mut self, defaults: &Self) -> Self {
        for (name, value) in &defaults.entries {
            if self.get(name).is_none() {
                self.entries.push((name.clone(), value.clone()));
            }
        }
        self
    }

    /// `?a=1&b=2` form, or an empty string when nothing is left after filtering.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let pairs: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, value)| !matches!(value, Value::Null) && value.as_str() != Some(""))
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(&value_text(Some(value)))))
            .collect();
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }

    /// Whether no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.set(name, value);
        }
        params
    }
}
