//! # Points-to Analysis
//!
//! Context-sensitive, field-sensitive, inclusion-based pointer analysis that
//! builds its call graph on the fly:
//! - **PAG**: pointer assignment graph; points-to facts flow along its edges,
//!   and edges added late replay the facts already at their source
//! - **Contexts**: k-limited call-site or object sequences, interned to ids
//! - **Plugins**: models for built-in containers and bodiless SDK methods
//! - **Solver**: one worklist loop that lowers newly reachable methods,
//!   resolves parked calls and propagates facts until nothing changes
//!
//! ## Usage
//! ```text
//! use codegraph_pta::{PointerAnalysis, PtaConfig};
//!
//! let mut pta = PointerAnalysis::new(program, PtaConfig::default())?;
//! pta.solve()?;
//! assert!(pta.may_alias((&main, "x"), (&main, "y")));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;
pub mod ports;

pub use application::{
    EntryReport, ParallelAnalyzer, ParallelStrategy, PointerAnalysis, PtaReport, PtaStats,
};
pub use domain::{
    AbstractObject, AllocationSite, ContainerKind, Context, ContextElement, EdgeKind, PagEdge,
    PagNode, PointerKey,
};
pub use infrastructure::{ContextCache, ContextSelector, Pag, PtaState, SolveOutcome};
pub use plugins::{ContainerPlugin, PagPlugin, PluginCall, PluginContext, PluginManager, SdkPlugin};
pub use ports::{CallGraphQuery, PointsToQuery};
