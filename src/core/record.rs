use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::value::Value;

/// One JSON object. Cloning is a pointer copy; every update returns a new
/// record that shares the untouched field values with the old one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Arc<IndexMap<String, Value>>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Copy of this record with `key` set to `value`. An existing key keeps
    /// its position; a new key is appended.
    pub fn with_field(&self, key: &str, value: Value) -> Self {
        let mut map = IndexMap::clone(&self.0);
        map.insert(key.to_string(), value);
        Self(Arc::new(map))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

/// Ordered sequence of values, normally records sharing one schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection(Arc<Vec<Value>>);

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Arc::new(items))
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Copy with the element at `index` replaced. Out-of-range indexes leave
    /// the copy unchanged.
    pub fn with_element(&self, index: usize, value: Value) -> Self {
        let mut items = Vec::clone(&self.0);
        if let Some(slot) = items.get_mut(index) {
            *slot = value;
        }
        Self(Arc::new(items))
    }

    pub fn without_element(&self, index: usize) -> Self {
        Self(Arc::new(
            self.0
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != index)
                .map(|(_, value)| value.clone())
                .collect(),
        ))
    }

    pub fn appended(&self, value: Value) -> Self {
        let mut items = Vec::clone(&self.0);
        items.push(value);
        Self(Arc::new(items))
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}
