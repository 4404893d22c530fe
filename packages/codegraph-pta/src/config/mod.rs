//! Configuration System
//!
//! Two levels, mirroring how the analysis is usually driven:
//! - Level 1: Preset - one-liner (`fast`, `balanced`, `thorough`)
//! - Level 2: YAML v1 / builder overrides for individual fields
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_pta::config::{PtaConfig, Preset, ContextKind};
//!
//! let config = PtaConfig::from_preset(Preset::Thorough);
//! let config = PtaConfig::default().context(ContextKind::Object).depth(2);
//! let config = PtaConfig::from_yaml_file("pta.yaml")?;
//! ```
//!
//! Validation runs before any analysis work: an invalid configuration is a
//! programming error and aborts the run up front.

pub mod error;
pub mod io;
pub mod preset;
pub mod pta_config;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, ConfigOverrides, PtaConfigPatch};
pub use preset::Preset;
pub use pta_config::{ContainerPrecision, ContextKind, PtaConfig, MAX_CONTEXT_DEPTH};
