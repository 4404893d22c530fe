//! PAG edges

use crate::features::ir::StmtRef;
use crate::shared::{NodeId, ObjectId};
use serde::{Deserialize, Serialize};

/// Edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Object creation flowing into a pointer
    Address,
    /// Local-to-local assignment
    Copy,
    /// Field/element read, `x = o.f`
    Load,
    /// Field/element write, `o.f = x`
    Store,
    /// Dispatched receiver bound to the callee's `this`
    This,
    /// Argument to parameter
    Argument,
    /// Callee return value to the call's result
    Return,
}

impl EdgeKind {
    /// Copy-class edges forward every fact of their source
    pub fn is_flow(&self) -> bool {
        !matches!(self, EdgeKind::Address | EdgeKind::This)
    }
}

/// Edge origin: a pointer, or a single object for Address/This edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeSource {
    Node(NodeId),
    Object(ObjectId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagEdge {
    pub src: EdgeSource,
    pub dst: NodeId,
    pub kind: EdgeKind,
    pub stmt: Option<StmtRef>,
}
