//! Three-address statements
//!
//! Only the shapes the pointer analysis consumes are modeled. Everything
//! else a front-end produces (arithmetic, branches, ...) lowers to
//! [`Stmt::Nop`] or to an assignment of [`RValue::Constant`].

use super::signature::{ClassSignature, FieldSignature, MethodSignature};
use super::types::Type;
use crate::shared::{LocalId, MethodId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a statement: owning method plus index in its body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StmtRef {
    pub method: MethodId,
    pub index: u32,
}

impl StmtRef {
    pub fn new(method: MethodId, index: u32) -> Self {
        Self { method, index }
    }
}

impl fmt::Display for StmtRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}#{}", self.method, self.index)
    }
}

/// Assignment target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LValue {
    Local(LocalId),
    /// `base.field`
    InstanceField { base: LocalId, field: FieldSignature },
    /// `Class.field`
    StaticField(FieldSignature),
    /// `base[i]`, index abstracted away
    ArrayElem { base: LocalId },
}

/// Assignment source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RValue {
    /// `new C()`
    New(ClassSignature),
    /// `new Array<T>()` or an array literal
    NewArray(Type),
    Local(LocalId),
    InstanceField { base: LocalId, field: FieldSignature },
    StaticField(FieldSignature),
    ArrayElem { base: LocalId },
    /// Function value referring to a method
    MethodRef(MethodSignature),
    /// Any non-reference value
    Constant,
}

/// Invocation expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvokeExpr {
    /// Statically bound call
    Static {
        method: MethodSignature,
        #[serde(default)]
        args: Vec<LocalId>,
    },
    /// `base.m(args)`; `method` is the declared target from type inference
    Instance {
        base: LocalId,
        method: MethodSignature,
        #[serde(default)]
        args: Vec<LocalId>,
    },
    /// Call through a function value held in `target`
    Pointer {
        target: LocalId,
        #[serde(default)]
        args: Vec<LocalId>,
    },
}

impl InvokeExpr {
    pub fn args(&self) -> &[LocalId] {
        match self {
            InvokeExpr::Static { args, .. }
            | InvokeExpr::Instance { args, .. }
            | InvokeExpr::Pointer { args, .. } => args,
        }
    }

    /// Statically known target signature, if any
    pub fn method(&self) -> Option<&MethodSignature> {
        match self {
            InvokeExpr::Static { method, .. } | InvokeExpr::Instance { method, .. } => Some(method),
            InvokeExpr::Pointer { .. } => None,
        }
    }
}

/// IR statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    Assign {
        lhs: LValue,
        rhs: RValue,
    },
    Invoke {
        #[serde(default)]
        result: Option<LocalId>,
        call: InvokeExpr,
    },
    Return {
        #[serde(default)]
        value: Option<LocalId>,
    },
    Nop,
}

impl Stmt {
    /// Locals read by this statement
    pub fn used_locals(&self) -> Vec<LocalId> {
        let mut used = Vec::new();
        match self {
            Stmt::Assign { lhs, rhs } => {
                match lhs {
                    LValue::InstanceField { base, .. } | LValue::ArrayElem { base } => {
                        used.push(*base)
                    }
                    LValue::Local(_) | LValue::StaticField(_) => {}
                }
                match rhs {
                    RValue::Local(l)
                    | RValue::InstanceField { base: l, .. }
                    | RValue::ArrayElem { base: l } => used.push(*l),
                    _ => {}
                }
            }
            Stmt::Invoke { call, .. } => {
                match call {
                    InvokeExpr::Instance { base, .. } => used.push(*base),
                    InvokeExpr::Pointer { target, .. } => used.push(*target),
                    InvokeExpr::Static { .. } => {}
                }
                used.extend_from_slice(call.args());
            }
            Stmt::Return { value } => used.extend(value.iter().copied()),
            Stmt::Nop => {}
        }
        used
    }

    /// Local defined by this statement
    pub fn defined_local(&self) -> Option<LocalId> {
        match self {
            Stmt::Assign {
                lhs: LValue::Local(l),
                ..
            } => Some(*l),
            Stmt::Invoke { result, .. } => *result,
            _ => None,
        }
    }

    /// Every local mentioned anywhere in the statement
    pub(crate) fn all_locals(&self) -> Vec<LocalId> {
        let mut locals = self.used_locals();
        if let Some(l) = self.defined_local() {
            locals.push(l);
        }
        locals
    }
}
