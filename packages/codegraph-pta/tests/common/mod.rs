//! Common test utilities for codegraph-pta
//!
//! Shared fixture programs and assertions for the integration tests.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
