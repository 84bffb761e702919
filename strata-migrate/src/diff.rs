//! Generic keyed diffing.
//!
//! Every object kind is diffed the same way: match items from the two
//! snapshots by a stable identity key, then classify each as added,
//! removed, or updated. The per-kind modules supply the key and the
//! equality check; this module supplies the bookkeeping once.

use std::collections::HashMap;
use std::hash::Hash;

/// An item present in both snapshots whose definition changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Updated<T> {
    pub from: T,
    pub to: T,
}

/// The result of diffing one object kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Diff<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
    pub updated: Vec<Updated<T>>,
}

impl<T> Default for Diff<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            updated: Vec::new(),
        }
    }
}

impl<T> Diff<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Diff two slices by identity key.
///
/// `added` and `updated` follow the order of `to`; `removed` follows the
/// order of `from`. Items sharing a key are compared with `eq` and
/// reported as updated when it returns false.
pub fn diff_by_key<T, K, F, E>(from: &[T], to: &[T], key_of: F, eq: E) -> Diff<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
    E: Fn(&T, &T) -> bool,
{
    let from_by_key: HashMap<K, &T> = from.iter().map(|item| (key_of(item), item)).collect();
    let to_by_key: HashMap<K, &T> = to.iter().map(|item| (key_of(item), item)).collect();

    let mut diff = Diff::default();

    for item in to {
        match from_by_key.get(&key_of(item)) {
            None => diff.added.push(item.clone()),
            Some(previous) if !eq(previous, item) => diff.updated.push(Updated {
                from: (*previous).clone(),
                to: item.clone(),
            }),
            Some(_) => {}
        }
    }

    for item in from {
        if !to_by_key.contains_key(&key_of(item)) {
            diff.removed.push(item.clone());
        }
    }

    diff
}
