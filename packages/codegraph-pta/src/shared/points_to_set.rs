//! Points-to set
//!
//! Sorted, deduplicated set of abstract object ids. Sets stay small for most
//! pointers, so a sorted vector beats a hash set on both memory and iteration.
//!
//! # Performance Characteristics
//! - Insert: O(log n) search + O(n) shift
//! - Contains: O(log n)
//! - Union: O(n + m) merge, reports the newly added elements
//! - Intersects: O(n + m)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sorted set of `u32` ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointsToSet {
    elements: Vec<u32>,
}

impl PointsToSet {
    /// Create an empty set
    #[inline]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Create from a single element
    #[inline]
    pub fn singleton(element: u32) -> Self {
        Self {
            elements: vec![element],
        }
    }

    /// Insert an element. Returns true if the element was not present.
    #[inline]
    pub fn insert(&mut self, element: u32) -> bool {
        match self.elements.binary_search(&element) {
            Ok(_) => false,
            Err(pos) => {
                self.elements.insert(pos, element);
                true
            }
        }
    }

    #[inline]
    pub fn contains(&self, element: u32) -> bool {
        self.elements.binary_search(&element).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate in ascending order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.elements.iter().copied()
    }

    /// Borrow the sorted elements
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.elements
    }

    /// Union: self = self ∪ other
    ///
    /// Returns the elements of `other` that were not already present, in
    /// ascending order. Propagation only needs to forward this difference.
    pub fn union_with(&mut self, other: &PointsToSet) -> Vec<u32> {
        let mut added = Vec::new();
        if other.is_empty() {
            return added;
        }
        if self.is_empty() {
            self.elements = other.elements.clone();
            added.extend_from_slice(&other.elements);
            return added;
        }

        let mut merged = Vec::with_capacity(self.elements.len() + other.elements.len());
        let mut i = 0;
        let mut j = 0;

        while i < self.elements.len() && j < other.elements.len() {
            match self.elements[i].cmp(&other.elements[j]) {
                Ordering::Less => {
                    merged.push(self.elements[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(other.elements[j]);
                    added.push(other.elements[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(self.elements[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.elements[i..]);
        merged.extend_from_slice(&other.elements[j..]);
        added.extend_from_slice(&other.elements[j..]);

        self.elements = merged;
        added
    }

    /// Check if the sets share at least one element
    pub fn intersects(&self, other: &PointsToSet) -> bool {
        let mut i = 0;
        let mut j = 0;

        while i < self.elements.len() && j < other.elements.len() {
            match self.elements[i].cmp(&other.elements[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => return true,
            }
        }
        false
    }

    pub fn is_subset_of(&self, other: &PointsToSet) -> bool {
        self.len() <= other.len() && self.iter().all(|e| other.contains(e))
    }
}

impl FromIterator<u32> for PointsToSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut elements: Vec<u32> = iter.into_iter().collect();
        elements.sort_unstable();
        elements.dedup();
        Self { elements }
    }
}
