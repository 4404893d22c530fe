//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure analysis vocabulary
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - Graph storage and algorithms

// Consumed IR: classes, methods, three-address statements
pub mod ir;

// On-the-fly call graph
pub mod call_graph;

// Context-sensitive points-to analysis
pub mod points_to;
