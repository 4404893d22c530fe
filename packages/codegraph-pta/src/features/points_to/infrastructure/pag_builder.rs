//! PAG Builder
//!
//! Lowers the statements of a newly reachable `(method, context)` pair into
//! PAG nodes and edges, and resolves calls as their receivers gain objects:
//!
//! | Statement          | Effect                                          |
//! |--------------------|-------------------------------------------------|
//! | `x = new T`        | Address edge from a fresh object to `x`         |
//! | `x = y`            | Copy edge `y -> x`                              |
//! | `x = y.f`          | deferred Load from `(o, f)` for each `o` in `y` |
//! | `y.f = x`          | deferred Store into `(o, f)` for each `o` in `y`|
//! | `y.f = new T`      | lowered into a per-statement temp, then stored  |
//! | `x = C.f` / `C.f = x` | Load/Store on the global static field node   |
//! | `x = f(..)`        | resolved immediately                            |
//! | `x = y.m(..)`      | parked on `y`, dispatched per receiver object   |
//! | `x = p(..)`        | parked on `p`, called per function value        |
//!
//! Instance fields are keyed by [`Program::canonical_field`], so a property
//! reached through a subclass-typed signature meets the one its base declares.
//! Unresolvable targets are logged and dropped; they add no edges.

use super::state::{AccessDirection, AccessedField, FieldAccess, ParkedCall, ParkedKind, PtaState};
use crate::features::call_graph::{CallKind, CallSiteOrigin};
use crate::features::ir::{
    Body, InvokeExpr, LValue, Method, MethodSignature, Program, RValue, Stmt, StmtRef,
};
use crate::features::points_to::domain::{AllocationSite, EdgeKind};
use crate::features::points_to::plugins::{PluginCall, PluginContext, PluginManager};
use crate::shared::{ContextId, LocalId, MethodId, NodeId, ObjectId, DUMMY_CONTEXT_ID};
use tracing::{debug, trace, warn};

pub struct PagBuilder<'a> {
    program: &'a Program,
    state: &'a mut PtaState,
    plugins: &'a mut PluginManager,
}

impl<'a> PagBuilder<'a> {
    pub fn new(program: &'a Program, state: &'a mut PtaState, plugins: &'a mut PluginManager) -> Self {
        Self {
            program,
            state,
            plugins,
        }
    }

    /// Lower every statement of `method` under `ctx`
    pub fn process_method(&mut self, method: MethodId, ctx: ContextId) {
        let program = self.program;
        let Some(m) = program.method(method) else {
            warn!(method = method, "unknown method requested for lowering");
            return;
        };
        self.state.call_graph.add_method(method, m.is_opaque());
        let Some(body) = &m.body else {
            debug!(method = %m.signature, "opaque method; left to plugins");
            return;
        };
        debug!(method = %m.signature, ctx = ctx, stmts = body.stmts.len(), "lowering method");

        let heap_ctx = self.state.heap_context(ctx);
        for (index, stmt) in body.stmts.iter().enumerate() {
            let stmt_ref = StmtRef::new(method, index as u32);
            match stmt {
                Stmt::Assign { lhs, rhs } => self.lower_assign(method, ctx, heap_ctx, stmt_ref, lhs, rhs),
                Stmt::Invoke { result, call } => self.lower_invoke(method, ctx, stmt_ref, *result, call),
                // Return values are wired per call edge
                Stmt::Return { .. } | Stmt::Nop => {}
            }
        }
    }

    fn local(&mut self, ctx: ContextId, method: MethodId, local: LocalId) -> NodeId {
        self.state.local_node(ctx, method, local, None)
    }

    fn lower_assign(
        &mut self,
        method: MethodId,
        ctx: ContextId,
        heap_ctx: ContextId,
        stmt: StmtRef,
        lhs: &LValue,
        rhs: &RValue,
    ) {
        let src = match (lhs, rhs) {
            (LValue::Local(dst), rhs) => {
                let x = self.state.local_node(ctx, method, *dst, Some(stmt));
                self.lower_rvalue_into(method, ctx, heap_ctx, stmt, x, rhs);
                return;
            }
            (_, RValue::Constant) => return,
            (_, RValue::Local(src)) => self.local(ctx, method, *src),
            (_, rhs) => {
                let tmp = self.state.temp_node(ctx, stmt);
                self.lower_rvalue_into(method, ctx, heap_ctx, stmt, tmp, rhs);
                tmp
            }
        };
        self.lower_store(method, ctx, stmt, lhs, src);
    }

    /// `lhs = src` where `src` already holds the value
    fn lower_store(&mut self, method: MethodId, ctx: ContextId, stmt: StmtRef, lhs: &LValue, src: NodeId) {
        let at = Some(stmt);
        match lhs {
            LValue::Local(dst) => {
                let x = self.state.local_node(ctx, method, *dst, at);
                self.state.add_flow_edge(src, x, EdgeKind::Copy, at);
            }
            LValue::InstanceField { base, field } => {
                let b = self.local(ctx, method, *base);
                self.state.register_field_access(
                    b,
                    FieldAccess {
                        field: AccessedField::Named(self.program.canonical_field(field)),
                        other: src,
                        direction: AccessDirection::Store,
                        stmt: at,
                    },
                );
            }
            LValue::StaticField(field) => {
                let s = self.state.static_field_node(field);
                self.state.add_flow_edge(src, s, EdgeKind::Store, at);
            }
            LValue::ArrayElem { base } => {
                let b = self.local(ctx, method, *base);
                self.state.register_field_access(
                    b,
                    FieldAccess {
                        field: AccessedField::Element,
                        other: src,
                        direction: AccessDirection::Store,
                        stmt: at,
                    },
                );
            }
        }
    }

    fn lower_rvalue_into(
        &mut self,
        method: MethodId,
        ctx: ContextId,
        heap_ctx: ContextId,
        stmt: StmtRef,
        x: NodeId,
        rhs: &RValue,
    ) {
        let at = Some(stmt);
        match rhs {
            RValue::New(class) => {
                let obj = self.state.pag.intern_object(
                    heap_ctx,
                    AllocationSite::New {
                        stmt,
                        class: class.clone(),
                    },
                );
                self.state.add_object_edge(obj, x, EdgeKind::Address, at);
            }
            RValue::NewArray(_) => {
                let obj = self
                    .state
                    .pag
                    .intern_object(heap_ctx, AllocationSite::NewArray { stmt });
                self.state.add_object_edge(obj, x, EdgeKind::Address, at);
            }
            RValue::MethodRef(sig) => match self.program.method_id(sig) {
                Some(target) => {
                    let obj = self.state.pag.intern_object(
                        heap_ctx,
                        AllocationSite::FunctionRef {
                            stmt,
                            method: target,
                        },
                    );
                    self.state.add_object_edge(obj, x, EdgeKind::Address, at);
                }
                None => warn!(stmt = %stmt, target = %sig, "function value refers to an unknown method"),
            },
            RValue::Local(src) => {
                let y = self.local(ctx, method, *src);
                self.state.add_flow_edge(y, x, EdgeKind::Copy, at);
            }
            RValue::InstanceField { base, field } => {
                let b = self.local(ctx, method, *base);
                self.state.register_field_access(
                    b,
                    FieldAccess {
                        field: AccessedField::Named(self.program.canonical_field(field)),
                        other: x,
                        direction: AccessDirection::Load,
                        stmt: at,
                    },
                );
            }
            RValue::StaticField(field) => {
                let s = self.state.static_field_node(field);
                self.state.add_flow_edge(s, x, EdgeKind::Load, at);
            }
            RValue::ArrayElem { base } => {
                let b = self.local(ctx, method, *base);
                self.state.register_field_access(
                    b,
                    FieldAccess {
                        field: AccessedField::Element,
                        other: x,
                        direction: AccessDirection::Load,
                        stmt: at,
                    },
                );
            }
            RValue::Constant => {}
        }
    }

    fn lower_invoke(
        &mut self,
        method: MethodId,
        ctx: ContextId,
        stmt: StmtRef,
        result: Option<LocalId>,
        call: &InvokeExpr,
    ) {
        let site = self.state.call_graph.register_call_site(
            CallSiteOrigin::Stmt(stmt),
            method,
            CallKind::from_invoke(call),
            call.args().to_vec(),
            result,
        );
        let result = result.map(|l| self.state.local_node(ctx, method, l, Some(stmt)));
        let args: Vec<NodeId> = call
            .args()
            .iter()
            .map(|&a| self.local(ctx, method, a))
            .collect();

        match call {
            InvokeExpr::Static { method: sig, .. } => {
                let callee = self.program.method_id(sig);
                self.dispatch_call(PluginCall {
                    site,
                    caller: method,
                    caller_ctx: ctx,
                    callee,
                    callee_ctx: None,
                    method_name: Some(sig.name.clone()),
                    receiver: None,
                    receiver_obj: None,
                    args,
                    result,
                    stmt: Some(stmt),
                });
            }
            InvokeExpr::Instance { base, method: sig, .. } => {
                let receiver = self.local(ctx, method, *base);
                self.state.park_call(ParkedCall {
                    site,
                    caller: method,
                    caller_ctx: ctx,
                    receiver,
                    kind: ParkedKind::Virtual(sig.clone()),
                    args,
                    result,
                    stmt: Some(stmt),
                });
            }
            InvokeExpr::Pointer { target, .. } => {
                let receiver = self.local(ctx, method, *target);
                self.state.park_call(ParkedCall {
                    site,
                    caller: method,
                    caller_ctx: ctx,
                    receiver,
                    kind: ParkedKind::Pointer,
                    args,
                    result,
                    stmt: Some(stmt),
                });
            }
        }
    }

    /// Resolve parked call `idx` for one object that reached its receiver
    pub fn resolve_parked(&mut self, idx: usize, obj: ObjectId) {
        let Some(parked) = self.state.parked_call(idx).cloned() else {
            return;
        };
        let Some(site) = self.state.pag.allocation_site(obj).cloned() else {
            return;
        };

        let (callee, method_name, receiver, receiver_obj) = match &parked.kind {
            ParkedKind::Virtual(declared) => (
                self.resolve_virtual(&site, declared),
                Some(declared.name.clone()),
                Some(parked.receiver),
                Some(obj),
            ),
            ParkedKind::Pointer => match site.function() {
                Some(target) => (Some(target), None, None, None),
                None => {
                    trace!(site = parked.site, obj = obj, "non-function value at a function call");
                    return;
                }
            },
        };

        self.dispatch_call(PluginCall {
            site: parked.site,
            caller: parked.caller,
            caller_ctx: parked.caller_ctx,
            callee,
            callee_ctx: None,
            method_name,
            receiver,
            receiver_obj,
            args: parked.args,
            result: parked.result,
            stmt: parked.stmt,
        });
    }

    /// Dispatch on the object's dynamic class
    ///
    /// Objects whose class the program does not declare (arrays, SDK
    /// objects) fall back to the declared target.
    fn resolve_virtual(&self, site: &AllocationSite, declared: &MethodSignature) -> Option<MethodId> {
        match site.class() {
            Some(class) if self.program.has_class(class) => self.program.dispatch(class, &declared.name),
            Some(class) => self
                .program
                .dispatch(class, &declared.name)
                .or_else(|| self.program.method_id(declared)),
            None => self.program.method_id(declared),
        }
    }

    /// Select the callee context, record the call edge, then let a plugin or
    /// ordinary wiring handle the call
    fn dispatch_call(&mut self, mut call: PluginCall) {
        let program = self.program;
        if let Some(callee) = call.callee {
            let callee_ctx = self
                .state
                .select_context(call.caller_ctx, call.site, callee, call.receiver_obj);
            if callee_ctx == DUMMY_CONTEXT_ID {
                debug!(site = call.site, callee = callee, "caller context not analyzable yet");
                return;
            }
            call.callee_ctx = Some(callee_ctx);
            let opaque = program.method(callee).map_or(true, Method::is_opaque);
            self.state.call_graph.add_call_edge(
                call.site,
                call.caller,
                call.caller_ctx,
                callee,
                callee_ctx,
                opaque,
            );
        }

        let handled = {
            let mut cx = PluginContext::new(program, &mut *self.state);
            self.plugins.dispatch(&mut cx, &call)
        };
        if handled.is_some() {
            return;
        }

        match (call.callee, call.callee_ctx) {
            (Some(callee), Some(callee_ctx)) => {
                match program.method(callee).and_then(|m| m.body.as_ref()) {
                    Some(body) => self.wire_call(&call, callee, callee_ctx, body),
                    None => {
                        warn!(site = call.site, callee = callee, "opaque callee not modeled; call dropped");
                        self.state.counters.unresolved_calls += 1;
                    }
                }
            }
            _ => {
                warn!(
                    site = call.site,
                    method = call.method_name.as_deref().unwrap_or("<fn>"),
                    "call target unresolved; call dropped"
                );
                self.state.counters.unresolved_calls += 1;
            }
        }
    }

    /// Bind receiver, arguments and return values, and queue the callee
    fn wire_call(&mut self, call: &PluginCall, callee: MethodId, callee_ctx: ContextId, body: &Body) {
        self.state.request_method(callee, callee_ctx);

        if let (Some(obj), Some(this)) = (call.receiver_obj, body.this_local) {
            let this = self.local(callee_ctx, callee, this);
            self.state.add_object_edge(obj, this, EdgeKind::This, call.stmt);
        }
        for (&arg, &param) in call.args.iter().zip(&body.param_locals) {
            let param = self.local(callee_ctx, callee, param);
            self.state.add_flow_edge(arg, param, EdgeKind::Argument, call.stmt);
        }
        if let Some(result) = call.result {
            for ret in body.return_locals() {
                let ret = self.local(callee_ctx, callee, ret);
                self.state.add_flow_edge(ret, result, EdgeKind::Return, call.stmt);
            }
        }
    }
}
