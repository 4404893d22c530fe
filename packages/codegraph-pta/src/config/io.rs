//! Configuration I/O (YAML loading)
//!
//! Schema v1:
//! ```yaml
//! version: 1
//! preset: balanced
//! overrides:
//!   pta:
//!     context: object
//!     depth: 2
//! ```

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::pta_config::{ContainerPrecision, ContextKind, PtaConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Fine-grained overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pta: Option<PtaConfigPatch>,
}

/// Patch type for PtaConfig; unset fields keep the preset's value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PtaConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_container_plugin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_sdk_plugin: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_precision: Option<ContainerPrecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
}

impl PtaConfigPatch {
    /// Apply this patch on top of `base`
    pub fn apply(self, mut base: PtaConfig) -> PtaConfig {
        if let Some(v) = self.context {
            base.context = v;
        }
        if let Some(v) = self.depth {
            base.depth = v;
        }
        if let Some(v) = self.enable_container_plugin {
            base.enable_container_plugin = v;
        }
        if let Some(v) = self.enable_sdk_plugin {
            base.enable_sdk_plugin = v;
        }
        if let Some(v) = self.container_precision {
            base.container_precision = v;
        }
        if let Some(v) = self.max_iterations {
            base.max_iterations = Some(v);
        }
        base
    }
}

impl PtaConfig {
    /// Load and validate a configuration from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<PtaConfig> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        match file.version {
            None => return Err(ConfigError::MissingVersion),
            Some(1) => {}
            Some(found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: vec![1],
                })
            }
        }

        let preset = match file.preset {
            Some(name) => {
                Preset::from_str(&name).map_err(|_| ConfigError::UnknownPreset(name.clone()))?
            }
            None => Preset::default(),
        };

        let mut config = PtaConfig::from_preset(preset);
        if let Some(patch) = file.overrides.and_then(|o| o.pta) {
            config = patch.apply(config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<PtaConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export as a full YAML v1 document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: None,
            overrides: Some(ConfigOverrides {
                pta: Some(PtaConfigPatch {
                    context: Some(self.context),
                    depth: Some(self.depth),
                    enable_container_plugin: Some(self.enable_container_plugin),
                    enable_sdk_plugin: Some(self.enable_sdk_plugin),
                    container_precision: Some(self.container_precision),
                    max_iterations: self.max_iterations,
                }),
            }),
        };
        serde_yaml::to_string(&file).map_err(ConfigError::Yaml)
    }
}
