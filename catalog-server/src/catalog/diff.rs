//! Full-replace planning
//!
//! Compares the stored rows of one owner (a category's bindings, a product's
//! values) with the desired rows and yields the minimal set of writes.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use shared::models::{CategoryAttributeBinding, ProductAttributeValue, ReplaceSummary};

/// Row with a natural key inside its owner
pub trait Keyed {
    type Key: Copy + Eq + Hash + Ord;

    fn key(&self) -> Self::Key;
}

impl Keyed for CategoryAttributeBinding {
    type Key = i64;

    fn key(&self) -> i64 {
        self.attribute_id
    }
}

impl Keyed for ProductAttributeValue {
    type Key = i64;

    fn key(&self) -> i64 {
        self.attribute_id
    }
}

/// Writes needed to turn `current` into `desired`
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacePlan<T: Keyed> {
    pub insert: Vec<T>,
    pub update: Vec<T>,
    /// Keys to remove, ascending
    pub delete: Vec<T::Key>,
    pub unchanged: usize,
}

impl<T: Keyed> ReplacePlan<T> {
    pub fn summary(&self) -> ReplaceSummary {
        ReplaceSummary {
            inserted: self.insert.len(),
            updated: self.update.len(),
            deleted: self.delete.len(),
            unchanged: self.unchanged,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.insert.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// Plan a full replace. `desired` must not repeat a key.
pub fn plan_replace<T>(current: &[T], desired: &[T]) -> ReplacePlan<T>
where
    T: Keyed + Clone + PartialEq,
{
    let existing: HashMap<T::Key, &T> = current.iter().map(|row| (row.key(), row)).collect();

    let mut plan = ReplacePlan {
        insert: Vec::new(),
        update: Vec::new(),
        delete: Vec::new(),
        unchanged: 0,
    };

    for row in desired {
        match existing.get(&row.key()) {
            None => plan.insert.push(row.clone()),
            Some(old) if *old == row => plan.unchanged += 1,
            Some(_) => plan.update.push(row.clone()),
        }
    }

    let wanted: HashSet<T::Key> = desired.iter().map(Keyed::key).collect();
    plan.delete = current
        .iter()
        .map(Keyed::key)
        .filter(|key| !wanted.contains(key))
        .collect();
    plan.delete.sort_unstable();

    plan
}
