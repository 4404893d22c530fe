//! Calling and allocation contexts
//!
//! A context is an immutable, k-bounded sequence of elements, most recent
//! first. Every element carries the selector kind that produced it, so
//! contexts built by different policies never compare equal.

use crate::config::ContextKind;
use crate::shared::{AllocSiteId, CallSiteId, MethodId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of calling history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContextElement {
    /// Call-site sensitivity: the call site and the method it reached
    CallSite { site: CallSiteId, callee: MethodId },
    /// Object sensitivity: allocation site of the receiver
    Object { alloc: AllocSiteId },
}

impl fmt::Display for ContextElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextElement::CallSite { site, callee } => write!(f, "cs{}->m{}", site, callee),
            ContextElement::Object { alloc } => write!(f, "o{}", alloc),
        }
    }
}

/// Interned by [`ContextCache`](crate::features::points_to::infrastructure::ContextCache)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
    kind: ContextKind,
    elements: Vec<ContextElement>,
}

impl Context {
    pub fn empty(kind: ContextKind) -> Self {
        Self {
            kind,
            elements: Vec::new(),
        }
    }

    /// Build from elements (most recent first), truncated to `k`
    pub fn new(kind: ContextKind, mut elements: Vec<ContextElement>, k: usize) -> Self {
        elements.truncate(k);
        Self { kind, elements }
    }

    /// Prepend `element` and keep the `k` most recent elements
    pub fn extend(&self, element: ContextElement, k: usize) -> Self {
        if k == 0 {
            return Self::empty(self.kind);
        }
        let mut elements = Vec::with_capacity(k.min(self.elements.len() + 1));
        elements.push(element);
        elements.extend(self.elements.iter().take(k - 1).copied());
        Self {
            kind: self.kind,
            elements,
        }
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn elements(&self) -> &[ContextElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", e)?;
        }
        f.write_str("]")
    }
}
