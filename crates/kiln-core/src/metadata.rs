//! Artifact metadata and the [`Resource`] container.
//!
//! [`Metadata`] is a string-to-string annotation map forming a monoid under
//! left-biased union: [`Metadata::empty`] is the identity and, when both
//! operands define a key, the left operand's value is kept.
//!
//! [`Resource`] pairs metadata with a payload. Chaining resources with
//! [`Resource::and_then`] accumulates metadata from left to right; on a key
//! collision the value attached earlier in the chain wins. This is
//! independent of the dependency graph.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// In-place merge of two values of the same type.
pub trait Merge {
    fn merge(&mut self, other: Self);
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Key/value annotations attached to an artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// The monoid identity: no annotations.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Left-biased union. Keys already in `self` keep their value.
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Return a copy with `key` set, replacing any existing value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Merge for Metadata {
    fn merge(&mut self, other: Self) {
        for (key, value) in other.0 {
            self.0.entry(key).or_insert(value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for Metadata {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// A payload annotated with [`Metadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource<T> {
    metadata: Metadata,
    payload: T,
}

impl<T> Resource<T> {
    pub const fn new(metadata: Metadata, payload: T) -> Self {
        Self { metadata, payload }
    }

    /// Wrap a payload with no metadata.
    pub const fn pure(payload: T) -> Self {
        Self::new(Metadata::empty(), payload)
    }

    pub const fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub const fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Look up a single metadata field.
    pub fn metadata_field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)
    }

    /// Transform the payload, keeping the metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        Resource {
            metadata: self.metadata,
            payload: f(self.payload),
        }
    }

    /// Chain a computation producing another resource.
    ///
    /// The result carries this resource's metadata combined with the
    /// metadata of the resource returned by `f`. Fields set here take
    /// precedence over fields of the same name set by `f`.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Resource<U>) -> Resource<U> {
        let Self { metadata, payload } = self;
        let next = f(payload);
        Resource {
            metadata: metadata.combine(next.metadata),
            payload: next.payload,
        }
    }

    /// Attach additional metadata. Existing fields keep their value.
    #[must_use]
    pub fn with_metadata(mut self, extra: Metadata) -> Self {
        self.metadata.merge(extra);
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
