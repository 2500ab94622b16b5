//! Error taxonomy for the tree-shaking engine.
//!
//! Only fatal conditions live here. Pattern misses (a barrel or generated
//! code shape that is not where we expect it) are reported through `log::warn!`
//! and leave the source untouched; unresolvable dynamic component references
//! are skipped silently.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed options object handed to the plugin constructor.
    #[error("Invalid QuasarUnusedPluginOptions: {0}")]
    InvalidOptions(#[source] serde_json::Error),

    /// A recognition pattern from the auto-import table does not compile.
    #[error("Invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The library's package descriptor or auto-import table is malformed.
    #[error("Invalid library manifest: {0}")]
    InvalidManifest(String),

    /// The barrel module was resolved without a package descriptor, so its
    /// `sideEffects` field cannot be overridden.
    #[error("Missing package descriptor for '{request}'; cannot apply sideEffects override")]
    MissingPackageDescriptor { request: String },

    #[error("Failed to parse '{identifier}': {message}")]
    Parse { identifier: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn manifest<E: std::fmt::Display>(e: E) -> Self {
        Self::InvalidManifest(e.to_string())
    }
}

#[cfg(feature = "napi")]
impl From<EngineError> for napi::Error {
    fn from(err: EngineError) -> Self {
        napi::Error::from_reason(err.to_string())
    }
}
