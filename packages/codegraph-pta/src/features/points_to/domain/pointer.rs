//! PAG nodes
//!
//! A node is a pointer: something that holds a points-to set. Keys are a
//! closed sum type; a key maps to at most one node.

use super::abstract_object::ContainerKind;
use crate::features::ir::{FieldSignature, StmtRef};
use crate::shared::{ContextId, LocalId, MethodId, NodeId, ObjectId, PointsToSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a PAG node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKey {
    /// A local of a method under a context
    Local {
        ctx: ContextId,
        method: MethodId,
        local: LocalId,
    },
    /// Field of one abstract object (the object carries its heap context)
    InstanceField { obj: ObjectId, field: FieldSignature },
    /// Static field; global, so context-free
    StaticField { field: FieldSignature },
    /// Merged element slot of a container instance
    ContainerField { obj: ObjectId, kind: ContainerKind },
    /// Value of a nested right-hand side, as in `base.f = new C()`
    Temp {
        ctx: ContextId,
        method: MethodId,
        stmt: u32,
    },
    /// Synthesized parameter of an opaque method
    SdkParam {
        ctx: ContextId,
        method: MethodId,
        index: u32,
    },
}

impl fmt::Display for PointerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerKey::Local { ctx, method, local } => write!(f, "c{}:m{}:l{}", ctx, method, local),
            PointerKey::InstanceField { obj, field } => write!(f, "o{}.{}", obj, field.name),
            PointerKey::StaticField { field } => write!(f, "{}", field),
            PointerKey::ContainerField { obj, kind } => write!(f, "o{}[{}]", obj, kind.as_str()),
            PointerKey::Temp { ctx, method, stmt } => write!(f, "c{}:m{}:tmp{}", ctx, method, stmt),
            PointerKey::SdkParam { ctx, method, index } => {
                write!(f, "c{}:m{}:sdk-arg{}", ctx, method, index)
            }
        }
    }
}

/// Node of the pointer assignment graph
#[derive(Debug, Clone)]
pub struct PagNode {
    pub id: NodeId,
    pub key: PointerKey,
    pub points_to: PointsToSet,
    /// Statement that first defined the node, if any
    pub def_stmt: Option<StmtRef>,
}

impl PagNode {
    pub fn new(id: NodeId, key: PointerKey, def_stmt: Option<StmtRef>) -> Self {
        Self {
            id,
            key,
            points_to: PointsToSet::new(),
            def_stmt,
        }
    }
}
