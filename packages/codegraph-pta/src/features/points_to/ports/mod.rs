//! Ports (Interfaces) for Points-to Analysis
//!
//! Read-only query traits for clients (checkers, exporters) that should not
//! depend on the concrete analysis type.

use crate::features::call_graph::CallGraph;
use crate::features::ir::MethodSignature;
use crate::features::points_to::application::PointerAnalysis;
use crate::shared::{CallSiteId, ContextId, LocalId, MethodId, ObjectId};

/// Points-to queries over a solved analysis
///
/// # Example (Generic - Zero-cost)
/// ```ignore
/// fn shares_object<Q: PointsToQuery>(q: &Q, m: &MethodSignature) -> bool {
///     q.may_alias((m, "a"), (m, "b"))
/// }
/// ```
pub trait PointsToQuery {
    /// Objects a local may point to under one context
    fn points_to(&self, ctx: ContextId, method: MethodId, local: LocalId) -> Vec<ObjectId>;

    /// Objects a named local may point to in any context
    fn points_to_by_name(&self, method: &MethodSignature, local: &str) -> Vec<ObjectId>;

    fn may_alias(&self, a: (&MethodSignature, &str), b: (&MethodSignature, &str)) -> bool;
}

/// Call graph queries
pub trait CallGraphQuery {
    fn callees_of(&self, method: MethodId) -> Vec<MethodId>;

    fn callers_of(&self, method: MethodId) -> Vec<MethodId>;

    /// Every target resolved at `site`
    fn targets_of(&self, site: CallSiteId) -> Vec<MethodId>;

    fn is_reachable(&self, method: MethodId) -> bool;
}

impl PointsToQuery for PointerAnalysis {
    fn points_to(&self, ctx: ContextId, method: MethodId, local: LocalId) -> Vec<ObjectId> {
        PointerAnalysis::points_to(self, ctx, method, local)
    }

    fn points_to_by_name(&self, method: &MethodSignature, local: &str) -> Vec<ObjectId> {
        PointerAnalysis::points_to_by_name(self, method, local)
    }

    fn may_alias(&self, a: (&MethodSignature, &str), b: (&MethodSignature, &str)) -> bool {
        PointerAnalysis::may_alias(self, a, b)
    }
}

impl CallGraphQuery for CallGraph {
    fn callees_of(&self, method: MethodId) -> Vec<MethodId> {
        CallGraph::callees_of(self, method)
    }

    fn callers_of(&self, method: MethodId) -> Vec<MethodId> {
        CallGraph::callers_of(self, method)
    }

    fn targets_of(&self, site: CallSiteId) -> Vec<MethodId> {
        self.callee_func_ids(site).to_vec()
    }

    fn is_reachable(&self, method: MethodId) -> bool {
        CallGraph::is_reachable(self, method)
    }
}
