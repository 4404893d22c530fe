//! Worklist with set semantics
//!
//! A fact already pending is not queued again. Facts already reflected in a
//! node's points-to set are filtered by the caller before pushing.

use super::pag::Fact;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct Worklist {
    queue: VecDeque<Fact>,
    pending: FxHashSet<Fact>,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `fact`; returns false if it is already pending
    pub fn push(&mut self, fact: Fact) -> bool {
        if !self.pending.insert(fact) {
            return false;
        }
        self.queue.push_back(fact);
        true
    }

    pub fn pop(&mut self) -> Option<Fact> {
        let fact = self.queue.pop_front()?;
        self.pending.remove(&fact);
        Some(fact)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
