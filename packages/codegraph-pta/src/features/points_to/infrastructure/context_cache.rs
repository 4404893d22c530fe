//! Context interning
//!
//! Single authoritative store of contexts for one analysis run. Everything
//! else refers to contexts by [`ContextId`].

use crate::config::ContextKind;
use crate::features::points_to::domain::Context;
use crate::shared::{ContextId, Interner};

#[derive(Debug, Default)]
pub struct ContextCache {
    contexts: Interner<Context>,
}

impl ContextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable id of `context`, interning it on first sight
    pub fn get_or_new_context_id(&mut self, context: Context) -> ContextId {
        self.contexts.intern(context).0
    }

    /// Id of the empty context of `kind`
    pub fn empty_context_id(&mut self, kind: ContextKind) -> ContextId {
        self.get_or_new_context_id(Context::empty(kind))
    }

    /// Id of an already interned context
    pub fn context_id(&self, context: &Context) -> Option<ContextId> {
        self.contexts.get_id(context)
    }

    pub fn get(&self, id: ContextId) -> Option<&Context> {
        self.contexts.get(id)
    }

    pub fn contains(&self, id: ContextId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
