//! Value interning
//!
//! Assigns each distinct value a dense, stable `u32` id. Ids are handed out in
//! insertion order and never reused, so they can index side tables directly.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Dense id assignment for hashable values
#[derive(Debug, Clone)]
pub struct Interner<T> {
    values: Vec<T>,
    index: FxHashMap<T, u32>,
}

impl<T> Default for Interner<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T: Hash + Eq + Clone> Interner<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id of `value`, assigning the next id if it is new.
    ///
    /// Returns `(id, created)`.
    pub fn intern(&mut self, value: T) -> (u32, bool) {
        if let Some(&id) = self.index.get(&value) {
            return (id, false);
        }
        let id = self.values.len() as u32;
        self.index.insert(value.clone(), id);
        self.values.push(value);
        (id, true)
    }

    /// Look up an existing id without interning
    #[inline]
    pub fn get_id(&self, value: &T) -> Option<u32> {
        self.index.get(value).copied()
    }

    /// Resolve an id back to its value
    #[inline]
    pub fn get(&self, id: u32) -> Option<&T> {
        self.values.get(id as usize)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(id, value)| (id as u32, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut interner = Interner::new();
        let (a, created_a) = interner.intern("a".to_string());
        let (b, _) = interner.intern("b".to_string());
        let (a2, created_a2) = interner.intern("a".to_string());

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(a, a2);
        assert!(created_a);
        assert!(!created_a2);
        assert_eq!(interner.get(b).map(String::as_str), Some("b"));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_get_id_does_not_intern() {
        let mut interner: Interner<u64> = Interner::new();
        assert_eq!(interner.get_id(&7), None);
        interner.intern(7);
        assert_eq!(interner.get_id(&7), Some(0));
        assert_eq!(interner.len(), 1);
    }
}
