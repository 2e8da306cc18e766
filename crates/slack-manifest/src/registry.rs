//! Insertion-ordered, identity-keyed registry
//!
//! Registration is idempotent: the first entry for an identity wins and later
//! ones are ignored. The seen-set is also what makes walks over cyclic type
//! graphs terminate.

use ahash::AHashSet;
use std::sync::Arc;

#[derive(Debug)]
pub struct Registry<T> {
    entries: Vec<Arc<T>>,
    seen: AHashSet<Arc<str>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry {
            entries: Vec::new(),
            seen: AHashSet::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Insert `entry` under `id` unless the id is already present.
    /// Returns true when the entry was new.
    pub fn insert(&mut self, id: &str, entry: &Arc<T>) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(Arc::from(id));
        self.entries.push(Arc::clone(entry));
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn entries(&self) -> &[Arc<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
