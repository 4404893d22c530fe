//! Opaque (SDK) method modeling
//!
//! For a call into a method without a body:
//! - every function-typed parameter gets a synthesized parameter node that
//!   receives the argument, and a callback call site is registered on it so
//!   callbacks handed to the platform are still analyzed;
//! - a class-typed return value is one canonical object per
//!   `(method, callee context)`, flowing into the call's result.

use super::{PagPlugin, PluginCall, PluginContext};
use crate::features::ir::{ClassSignature, Type};
use crate::features::points_to::domain::{AllocationSite, EdgeKind};
use crate::shared::{ContextId, MethodId, NodeId, ObjectId};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct SdkPlugin {
    returns: FxHashMap<(MethodId, ContextId), ObjectId>,
    params: FxHashMap<(MethodId, ContextId, u32), NodeId>,
}

impl SdkPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of canonical return objects created so far
    pub fn return_objects(&self) -> usize {
        self.returns.len()
    }
}

/// Class an opaque method's return value is modeled as
fn returned_class(ty: &Type) -> Option<ClassSignature> {
    match ty {
        Type::Class(class) => Some(class.clone()),
        Type::Array(_) => Some(ClassSignature::new("Array")),
        _ => None,
    }
}

impl PagPlugin for SdkPlugin {
    fn name(&self) -> &str {
        "sdk"
    }

    fn can_handle(&self, cx: &PluginContext<'_>, call: &PluginCall) -> bool {
        call.callee
            .and_then(|m| cx.program().method(m))
            .is_some_and(|m| m.is_opaque())
    }

    fn process_call_site(&mut self, cx: &mut PluginContext<'_>, call: &PluginCall) -> Vec<NodeId> {
        let (Some(callee), Some(callee_ctx)) = (call.callee, call.callee_ctx) else {
            return Vec::new();
        };
        let program = cx.program;
        let Some(method) = program.method(callee) else {
            return Vec::new();
        };

        let mut touched = Vec::new();
        for (index, param) in method.params.iter().enumerate() {
            if !param.ty.is_function() {
                continue;
            }
            let index = index as u32;
            let node = *self
                .params
                .entry((callee, callee_ctx, index))
                .or_insert_with(|| cx.sdk_param_node(callee_ctx, callee, index));
            if let Some(arg) = call.arg(index as usize) {
                cx.add_flow_edge(arg, node, EdgeKind::Argument, call.stmt);
            }
            cx.register_callback(call, index, callee, callee_ctx, node, Vec::new());
            touched.push(node);
        }

        if let (Some(class), Some(result)) = (returned_class(&method.return_type), call.result) {
            let obj = *self.returns.entry((callee, callee_ctx)).or_insert_with(|| {
                cx.new_object(
                    callee_ctx,
                    AllocationSite::SdkReturn {
                        method: callee,
                        class,
                    },
                )
            });
            cx.add_address_edge(obj, result, call.stmt);
            touched.push(result);
        }
        touched
    }
}
