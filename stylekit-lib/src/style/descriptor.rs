use indexmap::IndexMap;

use crate::error::CompileError;
use crate::style::value::Value;

/// An insertion-ordered mapping of selector/property keys to values.
///
/// Re-inserting a key keeps its original position and replaces the value,
/// the way a plain object literal behaves.
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    entries: IndexMap<String, Value>,
}

impl Descriptor {
    pub fn new() -> Self {
        Descriptor {
            entries: IndexMap::new(),
        }
    }

    /// Builder form of [`Descriptor::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Inserts every entry of `other`, in its order.
    pub fn extend(&mut self, other: Descriptor) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Order is part of a descriptor's meaning, unlike `IndexMap`'s own equality.
impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Descriptor {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Descriptor {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl TryFrom<serde_json::Value> for Descriptor {
    type Error = CompileError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match Value::from(json) {
            Value::Block(descriptor) => Ok(descriptor),
            other => Err(CompileError::invalid_descriptor(other.kind())),
        }
    }
}
