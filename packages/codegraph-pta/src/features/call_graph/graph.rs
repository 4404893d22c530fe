//! Context-sensitive call graph
//!
//! Nodes are methods (one per method regardless of context); edges are
//! resolved calls tagged with the call site and the caller/callee context
//! pair. The solver refines it in place until fixpoint; afterwards it is
//! read-only.

use super::call_site::{CallKind, CallSite, CallSiteOrigin};
use crate::shared::{CallSiteId, ContextId, LocalId, MethodId};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reachable method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphNode {
    pub method: MethodId,
    /// Body absent; calls are modeled by plugins
    pub opaque: bool,
}

/// Resolved call relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallEdge {
    pub site: CallSiteId,
    pub caller_ctx: ContextId,
    pub callee_ctx: ContextId,
}

/// Call graph over reachable methods
#[derive(Debug, Default)]
pub struct CallGraph {
    graph: DiGraph<CallGraphNode, CallEdge>,
    nodes: FxHashMap<MethodId, NodeIndex>,
    entries: Vec<MethodId>,
    call_sites: Vec<CallSite>,
    site_index: FxHashMap<CallSiteOrigin, CallSiteId>,
    sites_by_method: FxHashMap<MethodId, Vec<CallSiteId>>,
    callees: FxHashMap<CallSiteId, Vec<MethodId>>,
    edge_index: FxHashSet<(CallSiteId, ContextId, MethodId, ContextId)>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the node of `method`
    pub fn add_method(&mut self, method: MethodId, opaque: bool) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&method) {
            return idx;
        }
        let idx = self.graph.add_node(CallGraphNode { method, opaque });
        self.nodes.insert(method, idx);
        idx
    }

    pub fn add_entry(&mut self, method: MethodId, opaque: bool) {
        self.add_method(method, opaque);
        if !self.entries.contains(&method) {
            self.entries.push(method);
        }
    }

    /// Register a call site; the same origin always yields the same id
    pub fn register_call_site(
        &mut self,
        origin: CallSiteOrigin,
        caller: MethodId,
        kind: CallKind,
        args: Vec<LocalId>,
        result: Option<LocalId>,
    ) -> CallSiteId {
        if let Some(&id) = self.site_index.get(&origin) {
            return id;
        }
        let id = self.call_sites.len() as CallSiteId;
        self.call_sites.push(CallSite {
            id,
            origin,
            caller,
            kind,
            args,
            result,
        });
        self.site_index.insert(origin, id);
        self.sites_by_method.entry(caller).or_default().push(id);
        id
    }

    /// Add a resolved call. Returns false if the edge already existed.
    pub fn add_call_edge(
        &mut self,
        site: CallSiteId,
        caller: MethodId,
        caller_ctx: ContextId,
        callee: MethodId,
        callee_ctx: ContextId,
        callee_opaque: bool,
    ) -> bool {
        if !self.edge_index.insert((site, caller_ctx, callee, callee_ctx)) {
            return false;
        }
        let from = self.add_method(caller, false);
        let to = self.add_method(callee, callee_opaque);
        self.graph.add_edge(
            from,
            to,
            CallEdge {
                site,
                caller_ctx,
                callee_ctx,
            },
        );

        let callees = self.callees.entry(site).or_default();
        if let Err(pos) = callees.binary_search(&callee) {
            callees.insert(pos, callee);
        }
        debug!(
            site = site,
            caller = caller,
            caller_ctx = caller_ctx,
            callee = callee,
            callee_ctx = callee_ctx,
            "call edge"
        );
        true
    }

    pub fn get_node(&self, method: MethodId) -> Option<&CallGraphNode> {
        self.nodes.get(&method).map(|&idx| &self.graph[idx])
    }

    pub fn call_site(&self, site: CallSiteId) -> Option<&CallSite> {
        self.call_sites.get(site as usize)
    }

    pub fn call_site_id(&self, origin: &CallSiteOrigin) -> Option<CallSiteId> {
        self.site_index.get(origin).copied()
    }

    /// Call sites contained in `method`
    pub fn call_sites_of(&self, method: MethodId) -> &[CallSiteId] {
        self.sites_by_method
            .get(&method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All resolved callees of a site, ascending
    pub fn callee_func_ids(&self, site: CallSiteId) -> &[MethodId] {
        self.callees.get(&site).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The callee of a monomorphic site; `None` if unresolved or polymorphic
    pub fn callee_func_id(&self, site: CallSiteId) -> Option<MethodId> {
        match self.callee_func_ids(site) {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// Distinct methods called from `method` under any context
    pub fn callees_of(&self, method: MethodId) -> Vec<MethodId> {
        self.neighbors(method, Direction::Outgoing)
    }

    pub fn callers_of(&self, method: MethodId) -> Vec<MethodId> {
        self.neighbors(method, Direction::Incoming)
    }

    fn neighbors(&self, method: MethodId, dir: Direction) -> Vec<MethodId> {
        let Some(&idx) = self.nodes.get(&method) else {
            return Vec::new();
        };
        let mut out: Vec<MethodId> = self
            .graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n].method)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Every reachable method, ascending
    pub fn reachable_methods(&self) -> Vec<MethodId> {
        let mut methods: Vec<MethodId> = self.nodes.keys().copied().collect();
        methods.sort_unstable();
        methods
    }

    pub fn is_reachable(&self, method: MethodId) -> bool {
        self.nodes.contains_key(&method)
    }

    pub fn entries(&self) -> &[MethodId] {
        &self.entries
    }

    /// `(caller, callee, edge)` for every edge
    pub fn edges(&self) -> impl Iterator<Item = (MethodId, MethodId, &CallEdge)> + '_ {
        self.graph.edge_references().map(move |e| {
            (
                self.graph[e.source()].method,
                self.graph[e.target()].method,
                e.weight(),
            )
        })
    }

    pub fn has_edge(&self, caller: MethodId, callee: MethodId) -> bool {
        match (self.nodes.get(&caller), self.nodes.get(&callee)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Methods taking part in a call cycle (including self recursion)
    pub fn recursive_methods(&self) -> Vec<MethodId> {
        let mut out = Vec::new();
        for scc in tarjan_scc(&self.graph) {
            let cyclic = scc.len() > 1
                || scc
                    .first()
                    .is_some_and(|&n| self.graph.contains_edge(n, n));
            if cyclic {
                out.extend(scc.iter().map(|&n| self.graph[n].method));
            }
        }
        out.sort_unstable();
        out
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn call_site_count(&self) -> usize {
        self.call_sites.len()
    }
}
