//! Copy-on-write entity collection.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::Entity;

/// Ordered sequence of entities of one type.
///
/// Entries are shared behind `Arc`, so deriving a new collection from an old
/// one only allocates for the entries that actually change. A collection is
/// never mutated once built; every reducer returns a fresh value.
#[derive(Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<Arc<T>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|item| &**item)
    }

    /// Shared handles, for callers that need to compare identity.
    pub fn entries(&self) -> &[Arc<T>] {
        &self.items
    }

    /// Collection with `item` appended.
    pub fn with_appended(&self, item: T) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(Arc::new(item));
        Self { items }
    }

    /// Collection with the entries matching `keep`, sharing them with `self`.
    pub fn retained(&self, mut keep: impl FnMut(&T) -> bool) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| keep(item))
                .cloned()
                .collect(),
        }
    }
}

impl<T: Entity> Collection<T> {
    /// Find an entry by identifier.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.iter().find(|item| item.id() == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// All identifiers, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(Entity::id).collect()
    }

    /// Collection with the entry at `index` replaced; other entries stay shared.
    pub(crate) fn with_replaced(&self, index: usize, item: T) -> Self {
        let mut items = self.items.clone();
        items[index] = Arc::new(item);
        Self { items }
    }

    /// Collection without the entries whose id is in `ids`.
    pub fn without_ids(&self, ids: &HashSet<String>) -> Self {
        self.retained(|item| !ids.contains(item.id()))
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter().map(Arc::new).collect(),
        }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Arc::new).collect(),
        }
    }
}
