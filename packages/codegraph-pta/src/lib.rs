/*
 * Codegraph PTA - Context-Sensitive Pointer Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Id aliases, interner, points-to sets
 * - features/    : Vertical slices (ir → call_graph → points_to)
 * - config/      : Presets and YAML configuration
 *
 * One analysis run is a single-threaded fixpoint; independent runs are
 * batched on a Rayon pool by `ParallelAnalyzer`.
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Graph builders thread many ids through
#![allow(clippy::type_complexity)] // Keyed fact maps
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::unnecessary_map_or)] // map_or style for compatibility

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared ids and utilities
pub mod shared;

/// Feature modules (IR, call graph, points-to)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ContextKind, Preset, PtaConfig};
pub use errors::{PtaError, Result};
pub use features::call_graph::{CallGraph, CallSite, CallSiteOrigin};
pub use features::ir::{
    ClassSignature, FieldSignature, MethodSignature, Program, ProgramBuilder, StmtRef, Type,
};
pub use features::points_to::{
    AllocationSite, ParallelAnalyzer, PointerAnalysis, PtaReport, PtaStats,
};
pub use shared::{ContextId, LocalId, MethodId, NodeId, ObjectId};
