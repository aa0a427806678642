//! Case-insensitive keyed tables.
//!
//! Every table in the database is indexed by a natural string key. A lookup
//! either finds exactly one record, finds none, or fails because the key is
//! shared by several records. It never picks one of several matches.

use std::collections::HashMap;

use thiserror::Error;

/// Result of a lookup that did not hit an ambiguous key.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a, T> {
    Found(&'a T),
    NotFound,
}

impl<'a, T> Lookup<'a, T> {
    pub fn found(self) -> Option<&'a T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{matches} {table} records match key `{key}`")]
pub struct AmbiguousKey {
    pub table: &'static str,
    pub key: String,
    pub matches: usize,
}

/// Keys compare ignoring case only. Surrounding whitespace is significant.
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

/// Maps normalized keys to record positions in a table.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    positions: HashMap<String, Vec<usize>>,
}

impl KeyIndex {
    fn insert(&mut self, key: &str, position: usize) {
        self.positions
            .entry(normalize_key(key))
            .or_default()
            .push(position);
    }

    fn positions(&self, key: &str) -> &[usize] {
        self.positions
            .get(&normalize_key(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct Table<T> {
    name: &'static str,
    records: Vec<T>,
    index: KeyIndex,
}

impl<T> Table<T> {
    pub fn new(name: &'static str, records: Vec<T>, key: impl Fn(&T) -> &str) -> Self {
        let mut index = KeyIndex::default();
        for (position, record) in records.iter().enumerate() {
            index.insert(key(record), position);
        }
        Self {
            name,
            records,
            index,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, key: &str) -> Result<Lookup<'_, T>, AmbiguousKey> {
        self.get_by(&self.index, key)
    }

    /// Builds a secondary index over a field other than the primary key.
    /// Records for which `key` returns `None` are left out of the index.
    pub fn index_by(&self, key: impl Fn(&T) -> Option<&str>) -> KeyIndex {
        let mut index = KeyIndex::default();
        for (position, record) in self.records.iter().enumerate() {
            if let Some(value) = key(record) {
                index.insert(value, position);
            }
        }
        index
    }

    /// Looks `key` up in an index previously built by [`Table::index_by`].
    pub fn get_by(&self, index: &KeyIndex, key: &str) -> Result<Lookup<'_, T>, AmbiguousKey> {
        match index.positions(key) {
            [] => Ok(Lookup::NotFound),
            [position] => Ok(Lookup::Found(&self.records[*position])),
            many => Err(AmbiguousKey {
                table: self.name,
                key: key.to_string(),
                matches: many.len(),
            }),
        }
    }

    /// Every record under `key` in an index built by [`Table::index_by`],
    /// in table order.
    pub fn all_by(&self, index: &KeyIndex, key: &str) -> Vec<&T> {
        index
            .positions(key)
            .iter()
            .map(|&position| &self.records[position])
            .collect()
    }

    /// Keys held by more than one record, in normalized form.
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .index
            .positions
            .iter()
            .filter(|(_, positions)| positions.len() > 1)
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
