//! Built-in container modeling
//!
//! Arrays, sets and maps are abstracted as one merged element node per
//! container instance. Mutators store their value arguments into that node,
//! accessors load from it, and `forEach` feeds it to the callback's first
//! parameter. Every value ever inserted into an instance is visible from
//! every read of it.

use super::{PagPlugin, PluginCall, PluginContext};
use crate::config::ContainerPrecision;
use crate::features::points_to::domain::{ContainerKind, EdgeKind};
use crate::shared::NodeId;

/// Effect of a container method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerOp {
    /// Store `count` arguments starting at `first` (all remaining if `None`)
    Store { first: usize, count: Option<usize> },
    /// Result receives an element
    Load,
    /// Callback argument 0 is invoked with an element
    ForEach,
}

fn classify(kind: ContainerKind, method: &str) -> Option<ContainerOp> {
    use ContainerOp::*;
    let op = match (kind, method) {
        (ContainerKind::Array, "push" | "unshift") => Store { first: 0, count: None },
        (ContainerKind::Array, "fill") => Store { first: 0, count: Some(1) },
        (ContainerKind::Array, "splice") => Store { first: 2, count: None },
        (ContainerKind::Array, "pop" | "shift" | "at" | "find" | "findLast") => Load,
        (ContainerKind::Set, "add") => Store { first: 0, count: Some(1) },
        (ContainerKind::Map, "set") => Store { first: 1, count: Some(1) },
        (ContainerKind::Map, "get") => Load,
        (_, "forEach") => ForEach,
        _ => return None,
    };
    Some(op)
}

/// Models Array/Set/Map methods on the merged element node
#[derive(Debug, Clone, Default)]
pub struct ContainerPlugin {
    precision: ContainerPrecision,
}

impl ContainerPlugin {
    pub fn new(precision: ContainerPrecision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> ContainerPrecision {
        self.precision
    }

    fn container_op(&self, cx: &PluginContext<'_>, call: &PluginCall) -> Option<(ContainerKind, ContainerOp)> {
        let obj = call.receiver_obj?;
        let kind = cx.allocation_site(obj)?.container_kind()?;
        let op = classify(kind, call.method_name.as_deref()?)?;
        Some((kind, op))
    }
}

impl PagPlugin for ContainerPlugin {
    fn name(&self) -> &str {
        "container"
    }

    fn can_handle(&self, cx: &PluginContext<'_>, call: &PluginCall) -> bool {
        self.container_op(cx, call).is_some()
    }

    fn process_call_site(&mut self, cx: &mut PluginContext<'_>, call: &PluginCall) -> Vec<NodeId> {
        let (Some((kind, op)), Some(obj)) = (self.container_op(cx, call), call.receiver_obj) else {
            return Vec::new();
        };
        let element = match self.precision {
            ContainerPrecision::Merged => cx.container_field_node(obj, kind),
        };

        match op {
            ContainerOp::Store { first, count } => {
                let values = call.args.iter().skip(first).take(count.unwrap_or(usize::MAX));
                for &value in values {
                    cx.add_flow_edge(value, element, EdgeKind::Store, call.stmt);
                }
            }
            ContainerOp::Load => {
                let Some(result) = call.result else {
                    return vec![element];
                };
                cx.add_flow_edge(element, result, EdgeKind::Load, call.stmt);
                return vec![element, result];
            }
            ContainerOp::ForEach => {
                let Some(callback) = call.arg(0) else {
                    return Vec::new();
                };
                cx.register_callback(call, 0, call.caller, call.caller_ctx, callback, vec![element]);
            }
        }
        vec![element]
    }
}
