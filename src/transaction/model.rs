use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::encoding::canonical_bytes;
use crate::hash::{Digest, sha256};

/// A primitive value stored under a transaction field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`; tried after `Int` so smaller values stay signed.
    UInt(u64),
    Float(f64),
    Str(String),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(FieldValue::UInt(v), FieldValue::Int)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

/// An opaque transaction: named fields mapped to primitive values.
///
/// Field order never matters. The map is kept sorted by key so the
/// canonical encoding, and therefore the leaf digest, only depends on
/// the logical content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl TransactionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Leaf digest: SHA-256 of the canonical encoding.
    pub fn digest(&self) -> Digest {
        sha256(&canonical_bytes(self))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for TransactionRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tx = Self::new();
        for (k, v) in iter {
            tx.insert(k, v);
        }
        tx
    }
}

fn transfer(from: &str, to: &str, amt: i64) -> TransactionRecord {
    TransactionRecord::new()
        .with("from", from)
        .with("to", to)
        .with("amt", amt)
}

/// The four demo transfers used by the CLI and the reference fixture.
pub fn sample_transactions() -> Vec<TransactionRecord> {
    vec![
        transfer("Alice", "Bob", 10),
        transfer("Bob", "Carol", 5),
        transfer("Carol", "Dave", 2),
        transfer("Dave", "Alice", 1),
    ]
}

/// Demo transfers carrying a `tag` field so sibling blocks differ.
pub fn tagged_sample_transactions(tag: &str) -> Vec<TransactionRecord> {
    sample_transactions()
        .into_iter()
        .map(|tx| tx.with("tag", tag))
        .collect()
}
