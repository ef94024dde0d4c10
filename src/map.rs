//! Ordered map type for `{ key: value }` literals.
//!
//! Map keys in the notation are full values: numbers, tuples, structs and so
//! on. Floats are neither `Hash` nor `Eq`, so [`ValueMap`] stores its entries as
//! an ordered list of pairs instead of a hash map. Source order is preserved and
//! repeated keys are kept as written.
//!
//! ## Examples
//!
//! ```rust
//! use ron_notation::{ValueMap, Value};
//!
//! let mut map = ValueMap::new();
//! map.push(Value::from("name"), Value::from("Alice"));
//! map.push(Value::from(1), Value::from(true));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get(&Value::from("name")).and_then(|v| v.as_str()), Some("Alice"));
//! assert_eq!(map.get(&Value::from(1)), Some(&Value::Bool(true)));
//! ```

use crate::Value;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// An ordered list of key/value pairs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueMap(Vec<(Value, Value)>);

impl ValueMap {
    /// Creates an empty `ValueMap`.
    #[must_use]
    pub fn new() -> Self {
        ValueMap(Vec::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(Vec::with_capacity(capacity))
    }

    /// Appends a pair. Earlier pairs with an equal key are kept.
    pub fn push(&mut self, key: Value, value: Value) {
        self.0.push((key, value));
    }

    /// Returns the value of the first pair whose key equals `key`.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if some pair has a key equal to `key`.
    #[must_use]
    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    /// Iterates over pairs in source order, with mutable access to both sides.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&mut Value, &mut Value)> {
        self.0.iter_mut().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(_, v)| v)
    }
}

impl IntoIterator for ValueMap {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (Value, Value)>>(iter: T) -> Self {
        ValueMap(iter.into_iter().collect())
    }
}

impl From<Vec<(Value, Value)>> for ValueMap {
    fn from(pairs: Vec<(Value, Value)>) -> Self {
        ValueMap(pairs)
    }
}

impl Serialize for ValueMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
