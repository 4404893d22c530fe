//! Domain models for Points-to Analysis
//!
//! Core vocabulary, independent of the solver:
//! - Context: k-bounded calling/allocation history
//! - AbstractObject: allocation site under a heap context
//! - PointerKey / PagNode: pointers owning points-to sets
//! - PagEdge: typed value flow between pointers

pub mod abstract_object;
pub mod context;
pub mod edge;
pub mod pointer;

pub use abstract_object::{AbstractObject, AllocationSite, ContainerKind};
pub use context::{Context, ContextElement};
pub use edge::{EdgeKind, EdgeSource, PagEdge};
pub use pointer::{PagNode, PointerKey};
