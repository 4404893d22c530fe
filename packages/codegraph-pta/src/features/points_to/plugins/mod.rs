//! # PAG Plugins
//!
//! Plugins model calls whose effect cannot be read from IR: built-in
//! containers and opaque platform (SDK) methods. The [`PluginManager`] asks
//! its plugins in registration order; the first whose `can_handle` matches
//! processes the call and ordinary lowering is skipped.
//!
//! A plugin that cannot apply (missing argument, unknown context) simply
//! adds nothing. It never fails the run.

pub mod container;
pub mod manager;
pub mod sdk;

pub use container::ContainerPlugin;
pub use manager::PluginManager;
pub use sdk::SdkPlugin;

use crate::features::call_graph::{CallKind, CallSiteOrigin};
use crate::features::ir::{Program, StmtRef};
use crate::features::points_to::domain::{
    AbstractObject, AllocationSite, ContainerKind, EdgeKind, PointerKey,
};
use crate::features::points_to::infrastructure::state::{ParkedCall, ParkedKind, PtaState};
use crate::shared::{CallSiteId, ContextId, MethodId, NodeId, ObjectId, PointsToSet};

/// A call as seen by plugins, resolved against one receiver object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginCall {
    pub site: CallSiteId,
    pub caller: MethodId,
    pub caller_ctx: ContextId,
    /// Resolved target, if any
    pub callee: Option<MethodId>,
    /// Context selected for the target
    pub callee_ctx: Option<ContextId>,
    /// Declared method name (none for calls through function values)
    pub method_name: Option<String>,
    pub receiver: Option<NodeId>,
    /// Receiver object this resolution is for
    pub receiver_obj: Option<ObjectId>,
    /// Argument nodes in the caller's context
    pub args: Vec<NodeId>,
    pub result: Option<NodeId>,
    pub stmt: Option<StmtRef>,
}

impl PluginCall {
    pub fn arg(&self, index: usize) -> Option<NodeId> {
        self.args.get(index).copied()
    }
}

/// Extension point for modeling library behavior
pub trait PagPlugin: Send {
    fn name(&self) -> &str;

    fn can_handle(&self, cx: &PluginContext<'_>, call: &PluginCall) -> bool;

    /// Synthesize nodes/edges for `call`; returns the nodes it touched
    fn process_call_site(&mut self, cx: &mut PluginContext<'_>, call: &PluginCall) -> Vec<NodeId>;
}

/// Analysis state handed to plugins
pub struct PluginContext<'a> {
    program: &'a Program,
    state: &'a mut PtaState,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(program: &'a Program, state: &'a mut PtaState) -> Self {
        Self { program, state }
    }

    pub fn program(&self) -> &Program {
        self.program
    }

    pub fn object(&self, obj: ObjectId) -> Option<&AbstractObject> {
        self.state.pag.object(obj)
    }

    pub fn allocation_site(&self, obj: ObjectId) -> Option<&AllocationSite> {
        self.state.pag.allocation_site(obj)
    }

    pub fn points_to(&self, node: NodeId) -> Option<&PointsToSet> {
        self.state.pag.points_to(node)
    }

    pub fn container_field_node(&mut self, obj: ObjectId, kind: ContainerKind) -> NodeId {
        self.state.pag.get_or_clone_container_field_node(obj, kind)
    }

    /// Synthesized parameter `index` of opaque `method` under `ctx`
    pub fn sdk_param_node(&mut self, ctx: ContextId, method: MethodId, index: u32) -> NodeId {
        self.state
            .pag
            .get_or_new_node(PointerKey::SdkParam { ctx, method, index }, None)
    }

    pub fn new_object(&mut self, ctx: ContextId, site: AllocationSite) -> ObjectId {
        self.state.pag.intern_object(ctx, site)
    }

    /// Flow edge with replay of the source's current objects
    ///
    /// `Address` and `This` only make sense from an object; passed here they
    /// are recorded as `Copy`.
    pub fn add_flow_edge(&mut self, src: NodeId, dst: NodeId, kind: EdgeKind, stmt: Option<StmtRef>) {
        self.state.add_flow_edge(src, dst, kind, stmt);
    }

    pub fn add_address_edge(&mut self, obj: ObjectId, dst: NodeId, stmt: Option<StmtRef>) {
        self.state.add_object_edge(obj, dst, EdgeKind::Address, stmt);
    }

    /// Register a call through the function values reaching `target`
    ///
    /// The call site is keyed by the parent site and argument index, so
    /// repeated registration is a no-op.
    pub fn register_callback(
        &mut self,
        parent: &PluginCall,
        arg: u32,
        caller: MethodId,
        caller_ctx: ContextId,
        target: NodeId,
        args: Vec<NodeId>,
    ) -> CallSiteId {
        let site = self.state.call_graph.register_call_site(
            CallSiteOrigin::Callback {
                parent: parent.site,
                arg,
            },
            caller,
            CallKind::Pointer,
            Vec::new(),
            None,
        );
        self.state.park_call(ParkedCall {
            site,
            caller,
            caller_ctx,
            receiver: target,
            kind: ParkedKind::Pointer,
            args,
            result: None,
            stmt: parent.stmt,
        });
        site
    }
}
