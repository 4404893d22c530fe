//! Shared module - Common types and utilities
//!
//! Id aliases and containers used across features. No analysis semantics live here.

pub mod ids;
pub mod interner;
pub mod points_to_set;

pub use ids::*;
pub use interner::Interner;
pub use points_to_set::PointsToSet;
