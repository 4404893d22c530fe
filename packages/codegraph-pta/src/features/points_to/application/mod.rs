//! Application layer for Points-to Analysis
//!
//! - **PointerAnalysis**: one run over one program, plus the query surface
//! - **ParallelAnalyzer**: independent runs batched on a rayon pool

pub mod analyzer;
pub mod parallel_analyzer;

pub use analyzer::{CallEdgeSummary, PointerAnalysis, PointsToSummary, PtaReport, PtaStats};
pub use parallel_analyzer::{EntryReport, ParallelAnalyzer, ParallelStrategy};
