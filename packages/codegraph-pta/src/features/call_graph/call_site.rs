//! Call site records

use crate::features::ir::{InvokeExpr, MethodSignature, StmtRef};
use crate::shared::{CallSiteId, LocalId, MethodId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a call site comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallSiteOrigin {
    /// An invoke statement in the IR
    Stmt(StmtRef),
    /// A callback invoked on behalf of the call at `parent`, through its
    /// argument `arg`
    Callback { parent: CallSiteId, arg: u32 },
}

impl CallSiteOrigin {
    pub fn stmt(&self) -> Option<StmtRef> {
        match self {
            CallSiteOrigin::Stmt(stmt) => Some(*stmt),
            CallSiteOrigin::Callback { .. } => None,
        }
    }
}

impl fmt::Display for CallSiteOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallSiteOrigin::Stmt(stmt) => write!(f, "{}", stmt),
            CallSiteOrigin::Callback { parent, arg } => write!(f, "cb(cs{}, {})", parent, arg),
        }
    }
}

/// How the callee is determined
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    /// Bound statically to the signature
    Static(MethodSignature),
    /// Dispatched on the receiver's class; the signature is the declared target
    Virtual(MethodSignature),
    /// Through a function value
    Pointer,
}

impl CallKind {
    pub fn from_invoke(call: &InvokeExpr) -> Self {
        match call {
            InvokeExpr::Static { method, .. } => CallKind::Static(method.clone()),
            InvokeExpr::Instance { method, .. } => CallKind::Virtual(method.clone()),
            InvokeExpr::Pointer { .. } => CallKind::Pointer,
        }
    }

    /// Declared method name, if the call names one
    pub fn method_name(&self) -> Option<&str> {
        match self {
            CallKind::Static(sig) | CallKind::Virtual(sig) => Some(&sig.name),
            CallKind::Pointer => None,
        }
    }
}

/// Context-free call site, owned by the call graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub id: CallSiteId,
    pub origin: CallSiteOrigin,
    /// Method containing the call
    pub caller: MethodId,
    pub kind: CallKind,
    /// Argument locals of the caller (empty for synthesized callbacks)
    pub args: Vec<LocalId>,
    pub result: Option<LocalId>,
}

impl CallSite {
    pub fn stmt(&self) -> Option<StmtRef> {
        self.origin.stmt()
    }
}
