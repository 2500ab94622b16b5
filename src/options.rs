//! Plugin options and host build context.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Default `sideEffects` written to the library's package descriptor.
/// Stylesheets must survive even when no component references them.
pub const QUASAR_SIDE_EFFECTS: &[&str] = &["*.css", "*.sass", "*.scss"];

/// Value written to the barrel module's `sideEffects` package field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SideEffects {
    Flag(bool),
    Patterns(Vec<String>),
}

impl Default for SideEffects {
    fn default() -> Self {
        SideEffects::Patterns(QUASAR_SIDE_EFFECTS.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginOptions {
    #[serde(default)]
    pub side_effects_override: SideEffects,
    #[serde(default)]
    pub enable_ssr: bool,
    #[serde(default)]
    pub enable_pwa: bool,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            side_effects_override: SideEffects::default(),
            enable_ssr: false,
            enable_pwa: false,
        }
    }
}

/// Validate a raw options object. Absent (`null`) options mean all defaults.
pub fn validate_options(value: serde_json::Value) -> Result<PluginOptions> {
    if value.is_null() {
        return Ok(PluginOptions::default());
    }

    serde_json::from_value(value).map_err(|e| {
        log::warn!("Invalid QuasarUnusedPluginOptions: {}", e);
        EngineError::InvalidOptions(e)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildTarget {
    #[default]
    Client,
    Server,
}

impl BuildTarget {
    /// Maps a webpack-style `target` string; only `node` is a server build.
    pub fn from_host(target: &str) -> Self {
        if target == "node" {
            BuildTarget::Server
        } else {
            BuildTarget::Client
        }
    }

    pub fn is_server(self) -> bool {
        self == BuildTarget::Server
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildMode {
    Development,
    #[default]
    Production,
}

impl BuildMode {
    pub fn from_host(mode: &str) -> Self {
        if mode == "development" {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

/// What the host build knows about the current compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostContext {
    pub target: BuildTarget,
    pub mode: BuildMode,
}
