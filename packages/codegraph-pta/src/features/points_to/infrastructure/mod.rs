//! Points-to Infrastructure
//!
//! Storage and algorithms behind the analysis:
//! - `pag`: pointer assignment graph (nodes, edges, objects, points-to sets)
//! - `context_cache` / `context_selector`: context interning and k-limited selection
//! - `state`: everything a run mutates, plus deferred field accesses and calls
//! - `pag_builder`: statement lowering and call dispatch
//! - `solver`: the worklist loop

pub mod context_cache;
pub mod context_selector;
pub mod pag;
pub mod pag_builder;
pub mod solver;
pub mod state;
pub mod worklist;

pub use context_cache::ContextCache;
pub use context_selector::{
    selector_for, ContextSelector, InsensitiveSelector, KCallSiteSelector, KObjectSelector,
    Receiver,
};
pub use pag::{Fact, Pag};
pub use pag_builder::PagBuilder;
pub use solver::{SolveOutcome, WorklistSolver};
pub use state::{AccessDirection, AccessedField, FieldAccess, PtaState};
pub use worklist::Worklist;
