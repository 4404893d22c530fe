//! Dense integer identifiers
//!
//! Every analysis store (context cache, PAG arena, call graph, program) hands
//! out `u32` ids. Other components keep only these ids, never copies of the
//! stored values.

/// Index of a method in a `Program`
pub type MethodId = u32;

/// Index of a local in a method body
pub type LocalId = u32;

/// Interned calling/allocation context
pub type ContextId = u32;

/// PAG node arena index
pub type NodeId = u32;

/// Interned abstract heap object
pub type ObjectId = u32;

/// Interned allocation site
pub type AllocSiteId = u32;

/// Context-free call site id (one per invoking statement or synthesized callback)
pub type CallSiteId = u32;

/// Sentinel returned when a context cannot be selected yet
pub const DUMMY_CONTEXT_ID: ContextId = u32::MAX;
