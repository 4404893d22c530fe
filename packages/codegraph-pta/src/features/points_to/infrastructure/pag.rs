//! Pointer Assignment Graph
//!
//! Arena of nodes addressed by [`NodeId`], with flow successors kept as
//! per-node adjacency lists. Nodes, edges and objects are only ever added.
//!
//! Edges and facts may arrive in any order. [`Pag::add_flow_edge`] replays
//! the source's current points-to set onto the new edge, so a late edge
//! loses nothing and the fixpoint does not depend on processing order.

use crate::errors::{PtaError, Result};
use crate::features::ir::StmtRef;
use crate::features::points_to::domain::{
    AbstractObject, AllocationSite, ContainerKind, EdgeKind, EdgeSource, PagEdge, PagNode,
    PointerKey,
};
use crate::shared::{AllocSiteId, ContextId, Interner, NodeId, ObjectId, PointsToSet};
use rustc_hash::{FxHashMap, FxHashSet};

/// A pending `(node, object)` fact
pub type Fact = (NodeId, ObjectId);

#[derive(Debug, Default)]
pub struct Pag {
    nodes: Vec<PagNode>,
    node_index: FxHashMap<PointerKey, NodeId>,
    edges: Vec<PagEdge>,
    edge_index: FxHashSet<(EdgeSource, NodeId, EdgeKind)>,
    successors: Vec<Vec<NodeId>>,
    objects: Interner<AbstractObject>,
    sites: Interner<AllocationSite>,
}

impl Pag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node for `key`, created on first request
    pub fn get_or_new_node(&mut self, key: PointerKey, def_stmt: Option<StmtRef>) -> NodeId {
        if let Some(&id) = self.node_index.get(&key) {
            return id;
        }
        let id = self.nodes.len() as NodeId;
        self.node_index.insert(key.clone(), id);
        self.nodes.push(PagNode::new(id, key, def_stmt));
        self.successors.push(Vec::new());
        id
    }

    /// The single merged element node of a container instance
    pub fn get_or_clone_container_field_node(&mut self, obj: ObjectId, kind: ContainerKind) -> NodeId {
        self.get_or_new_node(PointerKey::ContainerField { obj, kind }, None)
    }

    pub fn node_id(&self, key: &PointerKey) -> Option<NodeId> {
        self.node_index.get(key).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&PagNode> {
        self.nodes.get(id as usize)
    }

    pub fn nodes(&self) -> &[PagNode] {
        &self.nodes
    }

    pub fn points_to(&self, id: NodeId) -> Option<&PointsToSet> {
        self.node(id).map(|n| &n.points_to)
    }

    pub fn contains(&self, node: NodeId, obj: ObjectId) -> bool {
        self.points_to(node).is_some_and(|pts| pts.contains(obj))
    }

    /// Flow successors of `node`
    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        self.successors
            .get(node as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Record an edge. Idempotent on `(src, dst, kind)`; returns true if new.
    pub fn add_pag_edge(
        &mut self,
        src: EdgeSource,
        dst: NodeId,
        kind: EdgeKind,
        stmt: Option<StmtRef>,
    ) -> bool {
        if !self.edge_index.insert((src, dst, kind)) {
            return false;
        }
        if let (EdgeSource::Node(from), true) = (src, kind.is_flow()) {
            if let Some(succ) = self.successors.get_mut(from as usize) {
                if !succ.contains(&dst) {
                    succ.push(dst);
                }
            }
        }
        self.edges.push(PagEdge {
            src,
            dst,
            kind,
            stmt,
        });
        true
    }

    /// Add a flow edge and return the facts it must carry right away
    ///
    /// Replays every object already in `src`'s points-to set onto `dst`.
    /// Object-only kinds (Address, This) cannot join two pointers and are
    /// recorded as Copy.
    pub fn add_flow_edge(
        &mut self,
        src: NodeId,
        dst: NodeId,
        kind: EdgeKind,
        stmt: Option<StmtRef>,
    ) -> Vec<Fact> {
        let kind = if kind.is_flow() { kind } else { EdgeKind::Copy };
        if !self.add_pag_edge(EdgeSource::Node(src), dst, kind, stmt) {
            return Vec::new();
        }
        match self.points_to(src) {
            Some(pts) => pts.iter().map(|obj| (dst, obj)).collect(),
            None => Vec::new(),
        }
    }

    /// Add an Address/This edge from a single object; returns its seed fact
    pub fn add_object_edge(
        &mut self,
        obj: ObjectId,
        dst: NodeId,
        kind: EdgeKind,
        stmt: Option<StmtRef>,
    ) -> Option<Fact> {
        debug_assert!(!kind.is_flow());
        self.add_pag_edge(EdgeSource::Object(obj), dst, kind, stmt)
            .then_some((dst, obj))
    }

    /// Add `obj` to `node`'s set and fan it out along flow edges
    ///
    /// Returns nothing if `obj` was already present.
    pub fn propagate(&mut self, node: NodeId, obj: ObjectId) -> Vec<Fact> {
        let Some(n) = self.nodes.get_mut(node as usize) else {
            return Vec::new();
        };
        if !n.points_to.insert(obj) {
            return Vec::new();
        }
        self.successors(node).iter().map(|&dst| (dst, obj)).collect()
    }

    /// Intern an abstract object for `site` under heap context `ctx`
    pub fn intern_object(&mut self, ctx: ContextId, site: AllocationSite) -> ObjectId {
        let (site, _) = self.sites.intern(site);
        self.objects.intern(AbstractObject::new(ctx, site)).0
    }

    pub fn object(&self, obj: ObjectId) -> Option<&AbstractObject> {
        self.objects.get(obj)
    }

    pub fn site(&self, site: AllocSiteId) -> Option<&AllocationSite> {
        self.sites.get(site)
    }

    /// Allocation site of an object
    pub fn allocation_site(&self, obj: ObjectId) -> Option<&AllocationSite> {
        self.object(obj).and_then(|o| self.site(o.site))
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &AbstractObject)> {
        self.objects.iter()
    }

    pub fn edges(&self) -> &[PagEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Check arena/index consistency: each node is reachable from its own key only
    pub fn check_invariants(&self) -> Result<()> {
        if self.node_index.len() != self.nodes.len() || self.successors.len() != self.nodes.len() {
            return Err(PtaError::invariant(format!(
                "PAG arena holds {} nodes but {} keys and {} adjacency lists",
                self.nodes.len(),
                self.node_index.len(),
                self.successors.len()
            )));
        }
        for node in &self.nodes {
            if self.node_index.get(&node.key) != Some(&node.id) {
                return Err(PtaError::invariant(format!(
                    "node {} materialized under key {} maps elsewhere",
                    node.id, node.key
                )));
            }
        }
        Ok(())
    }
}
