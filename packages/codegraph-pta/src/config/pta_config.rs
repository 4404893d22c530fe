//! Pointer analysis configuration
//!
//! Fixed before a run starts and immutable for the run's duration. The
//! analysis takes it by value at construction; there is no process-wide
//! depth setting.

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};

/// Largest accepted context depth
pub const MAX_CONTEXT_DEPTH: usize = 8;

/// Context sensitivity policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    /// k last call sites
    #[serde(alias = "call_site", alias = "callSite")]
    CallSite,
    /// k last receiver allocation sites
    Object,
    /// Single shared context
    Insensitive,
}

impl ContextKind {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "callsite" | "call_site" | "call-site" => Ok(Self::CallSite),
            "object" | "obj" => Ok(Self::Object),
            "insensitive" | "none" => Ok(Self::Insensitive),
            _ => Err(ConfigError::UnknownContextKind(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CallSite => "callsite",
            Self::Object => "object",
            Self::Insensitive => "insensitive",
        }
    }
}

/// Container modeling precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerPrecision {
    /// One merged element field per container instance
    #[default]
    Merged,
}

/// Pointer analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PtaConfig {
    /// Context sensitivity policy
    pub context: ContextKind,

    /// Context depth k (0 = context-insensitive)
    pub depth: usize,

    /// Model built-in container mutators/accessors
    #[serde(default = "default_true")]
    pub enable_container_plugin: bool,

    /// Model calls into functions without a body
    #[serde(default = "default_true")]
    pub enable_sdk_plugin: bool,

    /// Container element precision
    #[serde(default)]
    pub container_precision: ContainerPrecision,

    /// Worklist iteration cap (None = run to fixpoint)
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl PtaConfig {
    /// Create config from preset
    pub fn from_preset(preset: Preset) -> Self {
        let (context, depth) = match preset {
            Preset::Fast => (ContextKind::Insensitive, 0),
            Preset::Balanced => (ContextKind::CallSite, 1),
            Preset::Thorough => (ContextKind::Object, 2),
        };
        Self {
            context,
            depth,
            enable_container_plugin: true,
            enable_sdk_plugin: true,
            container_precision: ContainerPrecision::Merged,
            max_iterations: None,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.depth > MAX_CONTEXT_DEPTH {
            return Err(ConfigError::range_with_hint(
                "depth",
                self.depth,
                0,
                MAX_CONTEXT_DEPTH,
                "Context depth bounds the number of contexts",
            ));
        }

        if let Some(n) = self.max_iterations {
            if n == 0 {
                return Err(ConfigError::Validation(
                    "max_iterations must be at least 1, or None to run to fixpoint".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Depth actually used by the context selector
    ///
    /// `insensitive` always yields depth 0, whatever `depth` says.
    pub fn effective_depth(&self) -> usize {
        match self.context {
            ContextKind::Insensitive => 0,
            _ => self.depth,
        }
    }

    /// Builder: Set context kind
    pub fn context(mut self, v: ContextKind) -> Self {
        self.context = v;
        self
    }

    /// Builder: Set depth
    pub fn depth(mut self, v: usize) -> Self {
        self.depth = v;
        self
    }

    /// Builder: Set enable_container_plugin
    pub fn enable_container_plugin(mut self, v: bool) -> Self {
        self.enable_container_plugin = v;
        self
    }

    /// Builder: Set enable_sdk_plugin
    pub fn enable_sdk_plugin(mut self, v: bool) -> Self {
        self.enable_sdk_plugin = v;
        self
    }

    /// Builder: Set max_iterations
    pub fn max_iterations(mut self, v: Option<usize>) -> Self {
        self.max_iterations = v;
        self
    }
}

impl Default for PtaConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_call_site() {
        let config = PtaConfig::default();
        assert_eq!(config.context, ContextKind::CallSite);
        assert_eq!(config.depth, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough] {
            assert!(PtaConfig::from_preset(preset).validate().is_ok());
        }
    }

    #[test]
    fn test_depth_out_of_range() {
        let config = PtaConfig::default().depth(MAX_CONTEXT_DEPTH + 1);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = PtaConfig::default().max_iterations(Some(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_context_kind_from_str() {
        assert_eq!(ContextKind::from_str("callSite").unwrap(), ContextKind::CallSite);
        assert_eq!(ContextKind::from_str("OBJECT").unwrap(), ContextKind::Object);
        assert_eq!(
            ContextKind::from_str("insensitive").unwrap(),
            ContextKind::Insensitive
        );
        assert!(matches!(
            ContextKind::from_str("type"),
            Err(ConfigError::UnknownContextKind(_))
        ));
    }

    #[test]
    fn test_effective_depth() {
        let config = PtaConfig::default()
            .context(ContextKind::Insensitive)
            .depth(3);
        assert_eq!(config.effective_depth(), 0);
        assert_eq!(config.context(ContextKind::Object).effective_depth(), 3);
    }
}
