//! Abstract heap objects and allocation sites

use crate::features::ir::{ClassSignature, StmtRef};
use crate::shared::{AllocSiteId, ContextId, MethodId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an abstract object is created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationSite {
    /// `new C()`
    New { stmt: StmtRef, class: ClassSignature },
    /// Array allocation or literal
    NewArray { stmt: StmtRef },
    /// Function value taken from a method
    FunctionRef { stmt: StmtRef, method: MethodId },
    /// Stand-in for whatever an opaque method returns
    SdkReturn { method: MethodId, class: ClassSignature },
}

impl AllocationSite {
    /// Allocating statement; synthesized objects have none
    pub fn stmt(&self) -> Option<StmtRef> {
        match self {
            AllocationSite::New { stmt, .. }
            | AllocationSite::NewArray { stmt }
            | AllocationSite::FunctionRef { stmt, .. } => Some(*stmt),
            AllocationSite::SdkReturn { .. } => None,
        }
    }

    /// Dynamic class used for virtual dispatch
    pub fn class(&self) -> Option<&ClassSignature> {
        match self {
            AllocationSite::New { class, .. } | AllocationSite::SdkReturn { class, .. } => Some(class),
            AllocationSite::NewArray { .. } | AllocationSite::FunctionRef { .. } => None,
        }
    }

    /// Target method of a function value
    pub fn function(&self) -> Option<MethodId> {
        match self {
            AllocationSite::FunctionRef { method, .. } => Some(*method),
            _ => None,
        }
    }

    /// Built-in container kind of the allocated object
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            AllocationSite::NewArray { .. } => Some(ContainerKind::Array),
            AllocationSite::New { class, .. } | AllocationSite::SdkReturn { class, .. } => {
                ContainerKind::from_class(class)
            }
            AllocationSite::FunctionRef { .. } => None,
        }
    }
}

impl fmt::Display for AllocationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationSite::New { stmt, class } => write!(f, "new {}@{}", class, stmt),
            AllocationSite::NewArray { stmt } => write!(f, "new Array@{}", stmt),
            AllocationSite::FunctionRef { stmt, method } => write!(f, "fn m{}@{}", method, stmt),
            AllocationSite::SdkReturn { method, class } => write!(f, "sdk {}@m{}", class, method),
        }
    }
}

/// A heap object: an allocation site under a heap context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbstractObject {
    pub ctx: ContextId,
    pub site: AllocSiteId,
}

impl AbstractObject {
    pub fn new(ctx: ContextId, site: AllocSiteId) -> Self {
        Self { ctx, site }
    }
}

/// Built-in containers modeled with one merged element field per instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContainerKind {
    Array,
    Set,
    Map,
}

impl ContainerKind {
    pub fn from_class(class: &ClassSignature) -> Option<Self> {
        match class.name.as_str() {
            "Array" => Some(ContainerKind::Array),
            "Set" | "WeakSet" => Some(ContainerKind::Set),
            "Map" | "WeakMap" => Some(ContainerKind::Map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Array => "Array",
            ContainerKind::Set => "Set",
            ContainerKind::Map => "Map",
        }
    }
}
