//! Mutable state of one analysis run
//!
//! Owns every authoritative store (PAG, call graph, context cache) plus the
//! solver's bookkeeping: the fact worklist, deferred field accesses, parked
//! call sites and the queue of (method, context) pairs awaiting lowering.
//! Builder, plugins and solver all operate on this one value.

use super::context_cache::ContextCache;
use super::context_selector::{ContextSelector, Receiver};
use super::pag::{Fact, Pag};
use super::worklist::Worklist;
use crate::features::call_graph::CallGraph;
use crate::features::ir::{FieldSignature, MethodSignature, StmtRef};
use crate::features::points_to::domain::{ContainerKind, EdgeKind, PointerKey};
use crate::shared::{CallSiteId, ContextId, LocalId, MethodId, NodeId, ObjectId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::{trace, warn};

/// Field touched by a deferred access
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessedField {
    Named(FieldSignature),
    /// Merged element slot (array index, container entry)
    Element,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessDirection {
    /// `other = base.field`
    Load,
    /// `base.field = other`
    Store,
}

/// Field access waiting for its base pointer's objects
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldAccess {
    pub field: AccessedField,
    pub other: NodeId,
    pub direction: AccessDirection,
    pub stmt: Option<StmtRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParkedKind {
    /// Dispatch on each receiver object's class
    Virtual(MethodSignature),
    /// Call each function value reaching the target
    Pointer,
}

/// Call site waiting for objects on its receiver (or function target)
#[derive(Debug, Clone)]
pub(crate) struct ParkedCall {
    pub site: CallSiteId,
    pub caller: MethodId,
    pub caller_ctx: ContextId,
    pub receiver: NodeId,
    pub kind: ParkedKind,
    pub args: Vec<NodeId>,
    pub result: Option<NodeId>,
    pub stmt: Option<StmtRef>,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub facts_propagated: usize,
    pub facts_dropped: usize,
    pub unresolved_calls: usize,
}

pub struct PtaState {
    pub(crate) pag: Pag,
    pub(crate) call_graph: CallGraph,
    pub(crate) contexts: ContextCache,
    pub(crate) selector: Box<dyn ContextSelector>,
    pub(crate) worklist: Worklist,
    pub(crate) pending_methods: VecDeque<(MethodId, ContextId)>,
    pub(crate) pending_calls: VecDeque<(usize, ObjectId)>,
    pub(crate) counters: Counters,
    field_accesses: FxHashMap<NodeId, Vec<FieldAccess>>,
    field_access_keys: FxHashSet<(NodeId, FieldAccess)>,
    parked: Vec<ParkedCall>,
    parked_on: FxHashMap<NodeId, Vec<usize>>,
    parked_keys: FxHashSet<(CallSiteId, ContextId, NodeId, Vec<NodeId>)>,
    processed: FxHashSet<(MethodId, ContextId)>,
}

impl PtaState {
    pub fn new(selector: Box<dyn ContextSelector>) -> Self {
        Self {
            pag: Pag::new(),
            call_graph: CallGraph::new(),
            contexts: ContextCache::new(),
            selector,
            worklist: Worklist::new(),
            pending_methods: VecDeque::new(),
            pending_calls: VecDeque::new(),
            counters: Counters::default(),
            field_accesses: FxHashMap::default(),
            field_access_keys: FxHashSet::default(),
            parked: Vec::new(),
            parked_on: FxHashMap::default(),
            parked_keys: FxHashSet::default(),
            processed: FxHashSet::default(),
        }
    }

    /// Queue a fact unless it is pending or already known
    pub(crate) fn enqueue(&mut self, fact: Fact) {
        if self.pag.contains(fact.0, fact.1) || !self.worklist.push(fact) {
            self.counters.facts_dropped += 1;
        }
    }

    pub(crate) fn enqueue_all(&mut self, facts: Vec<Fact>) {
        for fact in facts {
            self.enqueue(fact);
        }
    }

    /// Consume one fact: grow the node's set, fan out, wake dependents
    pub(crate) fn propagate_fact(&mut self, (node, obj): Fact) {
        if self.pag.contains(node, obj) {
            self.counters.facts_dropped += 1;
            return;
        }
        let downstream = self.pag.propagate(node, obj);
        self.counters.facts_propagated += 1;
        trace!(node = node, obj = obj, fanout = downstream.len(), "propagate");
        self.enqueue_all(downstream);

        if let Some(accesses) = self.field_accesses.remove(&node) {
            for access in &accesses {
                self.materialize(obj, access);
            }
            self.field_accesses.insert(node, accesses);
        }
        if let Some(parked) = self.parked_on.get(&node) {
            for &idx in parked {
                self.pending_calls.push_back((idx, obj));
            }
        }
    }

    pub(crate) fn add_flow_edge(&mut self, src: NodeId, dst: NodeId, kind: EdgeKind, stmt: Option<StmtRef>) {
        let replay = self.pag.add_flow_edge(src, dst, kind, stmt);
        self.enqueue_all(replay);
    }

    pub(crate) fn add_object_edge(&mut self, obj: ObjectId, dst: NodeId, kind: EdgeKind, stmt: Option<StmtRef>) {
        if let Some(fact) = self.pag.add_object_edge(obj, dst, kind, stmt) {
            self.enqueue(fact);
        }
    }

    pub(crate) fn local_node(
        &mut self,
        ctx: ContextId,
        method: MethodId,
        local: LocalId,
        def_stmt: Option<StmtRef>,
    ) -> NodeId {
        self.pag
            .get_or_new_node(PointerKey::Local { ctx, method, local }, def_stmt)
    }

    /// Per-statement holder for a right-hand side stored straight into the heap
    pub(crate) fn temp_node(&mut self, ctx: ContextId, stmt: StmtRef) -> NodeId {
        self.pag.get_or_new_node(
            PointerKey::Temp {
                ctx,
                method: stmt.method,
                stmt: stmt.index,
            },
            Some(stmt),
        )
    }

    pub(crate) fn static_field_node(&mut self, field: &FieldSignature) -> NodeId {
        self.pag.get_or_new_node(
            PointerKey::StaticField {
                field: field.clone(),
            },
            None,
        )
    }

    /// Element node of `obj`, keyed by its container kind (arrays by default)
    pub(crate) fn element_node(&mut self, obj: ObjectId) -> NodeId {
        let kind = self
            .pag
            .allocation_site(obj)
            .and_then(|site| site.container_kind())
            .unwrap_or(ContainerKind::Array);
        self.pag.get_or_clone_container_field_node(obj, kind)
    }

    /// Record a field access on `base` and apply it to the objects already there
    pub(crate) fn register_field_access(&mut self, base: NodeId, access: FieldAccess) {
        if !self.field_access_keys.insert((base, access.clone())) {
            return;
        }
        let known: Vec<ObjectId> = self
            .pag
            .points_to(base)
            .map(|pts| pts.iter().collect())
            .unwrap_or_default();
        for obj in known {
            self.materialize(obj, &access);
        }
        self.field_accesses.entry(base).or_default().push(access);
    }

    fn materialize(&mut self, obj: ObjectId, access: &FieldAccess) {
        let target = match &access.field {
            AccessedField::Named(field) => self.pag.get_or_new_node(
                PointerKey::InstanceField {
                    obj,
                    field: field.clone(),
                },
                None,
            ),
            AccessedField::Element => self.element_node(obj),
        };
        match access.direction {
            AccessDirection::Load => {
                self.add_flow_edge(target, access.other, EdgeKind::Load, access.stmt)
            }
            AccessDirection::Store => {
                self.add_flow_edge(access.other, target, EdgeKind::Store, access.stmt)
            }
        }
    }

    /// Park a call on its receiver; objects already there are resolved next
    pub(crate) fn park_call(&mut self, call: ParkedCall) {
        // Callbacks share a site across containers but differ in argument nodes
        if !self.parked_keys.insert((
            call.site,
            call.caller_ctx,
            call.receiver,
            call.args.clone(),
        )) {
            return;
        }
        let idx = self.parked.len();
        let receiver = call.receiver;
        self.parked.push(call);
        self.parked_on.entry(receiver).or_default().push(idx);
        if let Some(pts) = self.pag.points_to(receiver) {
            self.pending_calls.extend(pts.iter().map(|obj| (idx, obj)));
        }
    }

    pub(crate) fn parked_call(&self, idx: usize) -> Option<&ParkedCall> {
        self.parked.get(idx)
    }

    /// Queue `method` for lowering under `ctx`, once per pair
    pub(crate) fn request_method(&mut self, method: MethodId, ctx: ContextId) {
        if self.processed.insert((method, ctx)) {
            self.pending_methods.push_back((method, ctx));
        }
    }

    pub(crate) fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub(crate) fn select_context(
        &mut self,
        caller_ctx: ContextId,
        site: CallSiteId,
        callee: MethodId,
        receiver_obj: Option<ObjectId>,
    ) -> ContextId {
        let receiver = receiver_obj
            .and_then(|obj| self.pag.object(obj))
            .map(|o| Receiver {
                alloc: o.site,
                heap_ctx: o.ctx,
            });
        self.selector
            .select_context(&mut self.contexts, caller_ctx, site, callee, receiver)
    }

    pub(crate) fn heap_context(&mut self, method_ctx: ContextId) -> ContextId {
        self.selector.heap_context(&mut self.contexts, method_ctx)
    }

    /// Log parked calls whose receivers never saw an object
    pub(crate) fn report_unresolved_parked(&mut self) {
        let mut unresolved = 0;
        for call in &self.parked {
            let empty = self.pag.points_to(call.receiver).map_or(true, |p| p.is_empty());
            if empty {
                warn!(
                    site = call.site,
                    caller = call.caller,
                    "call target unresolved: receiver points to nothing"
                );
                unresolved += 1;
            }
        }
        self.counters.unresolved_calls += unresolved;
    }
}

impl std::fmt::Debug for PtaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtaState")
            .field("nodes", &self.pag.node_count())
            .field("edges", &self.pag.edge_count())
            .field("contexts", &self.contexts.len())
            .field("pending_facts", &self.worklist.len())
            .field("parked_calls", &self.parked.len())
            .finish()
    }
}
