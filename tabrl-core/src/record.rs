//! Key-value records attached to environment steps.
//!
//! Environments report auxiliary information of a step (for example the
//! probability of the transition that happened) as a [`Record`].
//!
//! ```rust
//! use tabrl_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("prob", 1.0 / 3.0);
//! record.insert("cell", RecordValue::String("F".to_string()));
//! assert!(record.get_scalar("prob").is_some());
//! ```
use serde::Serialize;
use std::collections::{hash_map::Iter, HashMap};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    /// A single floating-point value.
    Scalar(f64),

    /// A text value.
    String(String),
}

/// A container of named values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f64) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Gets a scalar value, `None` if the key is absent or not a scalar.
    pub fn get_scalar(&self, k: &str) -> Option<f64> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Merges two records. Values of `record` win on key collisions.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
