//! Attribute normalization and fingerprinting.
//!
//! A component's configuration is the set of attributes a page author put on
//! its tag. This module turns that raw list into a canonical
//! [`AttributeSet`]: unrecognized names are dropped, values are trimmed, and
//! the result is stored in stable (sorted) order so two semantically-equal
//! attribute lists always normalize identically.
//!
//! The fingerprint is a SHA-256 over a canonical `name\0value\0`
//! serialization of the normalized set. It is the render-cache key: equal
//! fingerprints mean a cached subtree can be reused, a changed fingerprint
//! means the component must rebuild.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::warn;

/// Canonical, stable-ordered set of recognized attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    values: BTreeMap<String, String>,
}

impl AttributeSet {
    /// Normalize a raw attribute list against a component's recognized-name
    /// table. Unrecognized names are ignored silently — pages carry plenty
    /// of attributes (class, id, data-*) that are not component
    /// configuration. Duplicate names keep the last value, with a warning.
    pub fn normalize<'a, I>(raw: I, recognized: &[&str]) -> AttributeSet
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values = BTreeMap::new();
        for (name, value) in raw {
            if !recognized.contains(&name) {
                continue;
            }
            if values.insert(name.to_string(), value.trim().to_string()).is_some() {
                warn!(attribute = name, "duplicate attribute; last value wins");
            }
        }
        AttributeSet { values }
    }

    /// Build directly from owned pairs, all treated as recognized. Used by
    /// components that assemble their own configuration.
    pub fn from_pairs<I, K, V>(pairs: I) -> AttributeSet
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        AttributeSet {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into().trim().to_string()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value with a documented default substituted (and a warning) when the
    /// attribute is absent or empty.
    pub fn get_or_default<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.get(name) {
            Some(value) if !value.is_empty() => value,
            _ => default,
        }
    }

    /// Parse a numeric attribute, falling back to the default with a warning
    /// on malformed values.
    pub fn get_u32_or(&self, name: &str, default: u32) -> u32 {
        match self.get(name) {
            None => default,
            Some(value) => value.parse().unwrap_or_else(|_| {
                warn!(attribute = name, value, default, "malformed numeric attribute");
                default
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Attributes in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// SHA-256 hex fingerprint of the canonical serialization.
    ///
    /// `name\0value\0` per entry, in sorted order. NUL separators keep
    /// adjacent fields from colliding (`("ab","c")` vs `("a","bc")`).
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (name, value) in &self.values {
            hasher.update(name.as_bytes());
            hasher.update(b"\0");
            hasher.update(value.as_bytes());
            hasher.update(b"\0");
        }
        format!("{:x}", hasher.finalize())
    }
}
