//! # Call Graph
//!
//! Methods reachable from the entry points and the resolved call relations
//! between them, tagged with caller/callee contexts. Built incrementally by
//! the pointer analysis solver.

pub mod call_site;
pub mod graph;

pub use call_site::{CallKind, CallSite, CallSiteOrigin};
pub use graph::{CallEdge, CallGraph, CallGraphNode};
