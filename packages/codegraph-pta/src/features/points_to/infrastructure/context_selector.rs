//! Context selection policies
//!
//! A selector decides the callee context at a resolved call:
//! - **k-call-site**: prepend `(call site, callee)` to the caller's context
//! - **k-object**: prepend the receiver's allocation site to the receiver's
//!   heap context
//! - **insensitive**: always the single shared context
//!
//! All policies keep at most `k` elements; `k = 0` degrades to a single
//! shared context. An unknown caller context yields [`DUMMY_CONTEXT_ID`].

use super::context_cache::ContextCache;
use crate::config::{ContextKind, PtaConfig};
use crate::features::points_to::domain::ContextElement;
use crate::shared::{AllocSiteId, CallSiteId, ContextId, MethodId, DUMMY_CONTEXT_ID};

/// Receiver object seen by the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receiver {
    pub alloc: AllocSiteId,
    /// Heap context of the receiver object
    pub heap_ctx: ContextId,
}

/// Context selection policy
pub trait ContextSelector: Send + Sync {
    fn kind(&self) -> ContextKind;

    /// Maximum context length
    fn depth(&self) -> usize;

    fn empty_context(&self, cache: &mut ContextCache) -> ContextId {
        cache.empty_context_id(self.kind())
    }

    /// Context for `callee` reached from `caller_ctx` through `site`
    fn select_context(
        &self,
        cache: &mut ContextCache,
        caller_ctx: ContextId,
        site: CallSiteId,
        callee: MethodId,
        receiver: Option<Receiver>,
    ) -> ContextId;

    /// Heap context of objects allocated by a method running under `method_ctx`
    fn heap_context(&self, _cache: &mut ContextCache, method_ctx: ContextId) -> ContextId {
        method_ctx
    }
}

/// Build the selector for a validated configuration
pub fn selector_for(config: &PtaConfig) -> Box<dyn ContextSelector> {
    let k = config.effective_depth();
    match config.context {
        ContextKind::CallSite => Box::new(KCallSiteSelector::new(k)),
        ContextKind::Object => Box::new(KObjectSelector::new(k)),
        ContextKind::Insensitive => Box::new(InsensitiveSelector),
    }
}

/// k-limited call-site sensitivity
#[derive(Debug, Clone, Copy)]
pub struct KCallSiteSelector {
    k: usize,
}

impl KCallSiteSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl ContextSelector for KCallSiteSelector {
    fn kind(&self) -> ContextKind {
        ContextKind::CallSite
    }

    fn depth(&self) -> usize {
        self.k
    }

    fn select_context(
        &self,
        cache: &mut ContextCache,
        caller_ctx: ContextId,
        site: CallSiteId,
        callee: MethodId,
        _receiver: Option<Receiver>,
    ) -> ContextId {
        let Some(caller) = cache.get(caller_ctx) else {
            return DUMMY_CONTEXT_ID;
        };
        let next = caller.extend(ContextElement::CallSite { site, callee }, self.k);
        cache.get_or_new_context_id(next)
    }
}

/// k-limited object sensitivity
#[derive(Debug, Clone, Copy)]
pub struct KObjectSelector {
    k: usize,
}

impl KObjectSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl ContextSelector for KObjectSelector {
    fn kind(&self) -> ContextKind {
        ContextKind::Object
    }

    fn depth(&self) -> usize {
        self.k
    }

    fn select_context(
        &self,
        cache: &mut ContextCache,
        caller_ctx: ContextId,
        _site: CallSiteId,
        _callee: MethodId,
        receiver: Option<Receiver>,
    ) -> ContextId {
        if !cache.contains(caller_ctx) {
            return DUMMY_CONTEXT_ID;
        }
        // No receiver: static and function-value calls stay in the caller's context
        let Some(receiver) = receiver else {
            return caller_ctx;
        };
        let Some(heap) = cache.get(receiver.heap_ctx) else {
            return DUMMY_CONTEXT_ID;
        };
        let next = heap.extend(
            ContextElement::Object {
                alloc: receiver.alloc,
            },
            self.k,
        );
        cache.get_or_new_context_id(next)
    }
}

/// Context-insensitive analysis
#[derive(Debug, Clone, Copy, Default)]
pub struct InsensitiveSelector;

impl ContextSelector for InsensitiveSelector {
    fn kind(&self) -> ContextKind {
        ContextKind::Insensitive
    }

    fn depth(&self) -> usize {
        0
    }

    fn select_context(
        &self,
        cache: &mut ContextCache,
        caller_ctx: ContextId,
        _site: CallSiteId,
        _callee: MethodId,
        _receiver: Option<Receiver>,
    ) -> ContextId {
        if !cache.contains(caller_ctx) {
            return DUMMY_CONTEXT_ID;
        }
        cache.empty_context_id(ContextKind::Insensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_site_k1_keeps_last_site() {
        let selector = KCallSiteSelector::new(1);
        let mut cache = ContextCache::new();
        let root = selector.empty_context(&mut cache);

        let c1 = selector.select_context(&mut cache, root, 10, 1, None);
        let c2 = selector.select_context(&mut cache, c1, 11, 2, None);
        let c2_again = selector.select_context(&mut cache, root, 11, 2, None);

        assert_ne!(c1, root);
        assert_eq!(c2, c2_again);
        assert_eq!(cache.get(c2).unwrap().len(), 1);
    }

    #[test]
    fn test_call_site_k2_distinguishes_chains() {
        let selector = KCallSiteSelector::new(2);
        let mut cache = ContextCache::new();
        let root = selector.empty_context(&mut cache);

        let via_a = selector.select_context(&mut cache, root, 1, 5, None);
        let via_b = selector.select_context(&mut cache, root, 2, 5, None);
        let a = selector.select_context(&mut cache, via_a, 3, 6, None);
        let b = selector.select_context(&mut cache, via_b, 3, 6, None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_object_sensitivity_uses_receiver() {
        let selector = KObjectSelector::new(2);
        let mut cache = ContextCache::new();
        let root = selector.empty_context(&mut cache);

        let r1 = Receiver { alloc: 1, heap_ctx: root };
        let r2 = Receiver { alloc: 2, heap_ctx: root };
        let c1 = selector.select_context(&mut cache, root, 0, 0, Some(r1));
        let c2 = selector.select_context(&mut cache, root, 0, 0, Some(r2));
        assert_ne!(c1, c2);

        // Nested: receiver allocated under c1
        let nested = selector.select_context(
            &mut cache,
            c1,
            0,
            0,
            Some(Receiver { alloc: 3, heap_ctx: c1 }),
        );
        assert_eq!(
            cache.get(nested).unwrap().elements(),
            &[
                ContextElement::Object { alloc: 3 },
                ContextElement::Object { alloc: 1 }
            ]
        );
    }

    #[test]
    fn test_object_static_call_keeps_caller() {
        let selector = KObjectSelector::new(1);
        let mut cache = ContextCache::new();
        let root = selector.empty_context(&mut cache);
        assert_eq!(selector.select_context(&mut cache, root, 4, 1, None), root);
    }

    #[test]
    fn test_selector_for_config() {
        let config = PtaConfig::default().context(ContextKind::Object).depth(3);
        let selector = selector_for(&config);
        assert_eq!(selector.kind(), ContextKind::Object);
        assert_eq!(selector.depth(), 3);

        let config = PtaConfig::default().context(ContextKind::Insensitive).depth(3);
        assert_eq!(selector_for(&config).depth(), 0);
    }

    // ========== EDGE CASES ==========

    #[test]
    fn test_edge_unknown_caller_is_dummy() {
        let mut cache = ContextCache::new();
        let selectors: Vec<Box<dyn ContextSelector>> = vec![
            Box::new(KCallSiteSelector::new(1)),
            Box::new(KObjectSelector::new(1)),
            Box::new(InsensitiveSelector),
        ];
        for selector in selectors {
            assert_eq!(
                selector.select_context(&mut cache, 42, 0, 0, None),
                DUMMY_CONTEXT_ID
            );
        }
    }

    #[test]
    fn test_edge_k_zero_single_context() {
        let selector = KCallSiteSelector::new(0);
        let mut cache = ContextCache::new();
        let root = selector.empty_context(&mut cache);
        let c = selector.select_context(&mut cache, root, 7, 3, None);
        assert_eq!(c, root);
        assert_eq!(cache.len(), 1);
    }
}
