//! Read-only data supplied by the UI library: its naming convention and the
//! locations the rewrites target.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result};

/// Request fragment identifying the library's barrel module.
pub const QUASAR_INDEX_FILE: &str = "quasar/src/index.prod.js";

/// Shape of `quasar/dist/transforms/auto-import.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AutoImportTable {
    import_name: HashMap<String, String>,
    regex: AutoImportRegex,
}

#[derive(Debug, Clone, Deserialize)]
struct AutoImportRegex {
    components: String,
    directives: String,
}

/// Maps literal component/directive names (`q-btn`, `QBtn`, `v-ripple`) to
/// their canonical export (`QBtn`, `Ripple`).
#[derive(Debug, Clone)]
pub struct NamingConvention {
    import_name: HashMap<String, String>,
    component_source: String,
    directive_source: String,
    component_re: Regex,
    directive_re: Regex,
}

fn compile(kind: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| EngineError::InvalidPattern {
        kind,
        pattern: pattern.to_string(),
        source,
    })
}

impl NamingConvention {
    pub fn new(
        import_name: HashMap<String, String>,
        components_pattern: &str,
        directives_pattern: &str,
    ) -> Result<Self> {
        Ok(Self {
            component_re: compile("component", components_pattern)?,
            directive_re: compile("directive", directives_pattern)?,
            component_source: components_pattern.to_string(),
            directive_source: directives_pattern.to_string(),
            import_name,
        })
    }

    pub fn from_auto_import_json(json: &str) -> Result<Self> {
        let table: AutoImportTable = serde_json::from_str(json).map_err(EngineError::manifest)?;
        Self::new(table.import_name, &table.regex.components, &table.regex.directives)
    }

    pub fn is_component(&self, name: &str) -> bool {
        self.component_re.is_match(name)
    }

    /// Directive names are matched with their `v-` prefix.
    pub fn is_directive(&self, name: &str) -> bool {
        self.directive_re.is_match(name)
    }

    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.import_name.get(name).map(String::as_str)
    }

    /// Canonical export for a `resolveComponent` literal.
    pub fn component_export(&self, literal: &str) -> Option<&str> {
        if !self.is_component(literal) {
            return None;
        }
        self.canonical_name(literal)
    }

    /// Canonical export for a `resolveDirective` literal, which Vue emits
    /// without the `v-` prefix.
    pub fn directive_export(&self, literal: &str) -> Option<&str> {
        let prefixed = format!("v-{}", literal);
        if !self.is_directive(&prefixed) {
            return None;
        }
        self.canonical_name(&prefixed)
    }

    pub fn components_pattern(&self) -> &str {
        &self.component_source
    }

    pub fn directives_pattern(&self) -> &str {
        &self.directive_source
    }
}

/// Everything the engine needs to know about the UI library.
#[derive(Debug, Clone)]
pub struct LibraryManifest {
    pub version: String,
    pub convention: NamingConvention,
    /// Module name application code imports from.
    pub library_name: String,
    /// Module exporting the resolution factories.
    pub runtime_module: String,
    pub resolve_component: String,
    pub resolve_directive: String,
    /// Request fragment identifying the barrel module.
    pub barrel_request: String,
    /// Import target for rewritten per-symbol imports.
    pub internal_path: String,
}

impl LibraryManifest {
    pub fn new(version: impl Into<String>, convention: NamingConvention) -> Self {
        Self {
            version: version.into(),
            convention,
            library_name: "quasar".to_string(),
            runtime_module: "vue".to_string(),
            resolve_component: "resolveComponent".to_string(),
            resolve_directive: "resolveDirective".to_string(),
            barrel_request: QUASAR_INDEX_FILE.to_string(),
            internal_path: QUASAR_INDEX_FILE.to_string(),
        }
    }

    /// Builds a manifest from the library's `package.json` and auto-import table.
    pub fn from_json(package_json: &str, auto_import_json: &str) -> Result<Self> {
        let package: serde_json::Value =
            serde_json::from_str(package_json).map_err(EngineError::manifest)?;
        let version = package
            .get("version")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| EngineError::manifest("package.json has no \"version\" string"))?;

        let convention = NamingConvention::from_auto_import_json(auto_import_json)?;
        Ok(Self::new(version, convention))
    }

    /// Reads the manifest from an installed library directory
    /// (e.g. `node_modules/quasar`).
    pub fn load(library_dir: &Path) -> Result<Self> {
        let package_json = fs::read_to_string(library_dir.join("package.json"))?;
        let auto_import_json =
            fs::read_to_string(library_dir.join("dist/transforms/auto-import.json"))?;
        Self::from_json(&package_json, &auto_import_json)
    }
}

#[cfg(test)]
pub(crate) fn sample_manifest() -> LibraryManifest {
    let auto_import = r#"{
        "importName": {
            "QBtn": "QBtn", "q-btn": "QBtn",
            "QCard": "QCard", "q-card": "QCard",
            "QCardSection": "QCardSection", "q-card-section": "QCardSection",
            "ClosePopup": "ClosePopup", "v-close-popup": "ClosePopup",
            "Ripple": "Ripple", "v-ripple": "Ripple"
        },
        "regex": {
            "components": "(QBtn|q-btn|QCardSection|q-card-section|QCard|q-card)",
            "directives": "(v-close-popup|v-ripple)"
        }
    }"#;
    LibraryManifest::from_json(r#"{ "name": "quasar", "version": "2.16.0" }"#, auto_import)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_lookup() {
        let convention = sample_manifest().convention;
        assert_eq!(convention.component_export("q-btn"), Some("QBtn"));
        assert_eq!(convention.component_export("QCardSection"), Some("QCardSection"));
        assert_eq!(convention.component_export("my-widget"), None);
    }

    #[test]
    fn test_recognized_but_unmapped_name() {
        // Matches the pattern via its `q-btn` prefix but has no canonical export
        let convention = sample_manifest().convention;
        assert!(convention.is_component("q-btn-group"));
        assert_eq!(convention.component_export("q-btn-group"), None);
    }

    #[test]
    fn test_directive_lookup_adds_prefix() {
        let convention = sample_manifest().convention;
        assert_eq!(convention.directive_export("ripple"), Some("Ripple"));
        assert_eq!(convention.directive_export("close-popup"), Some("ClosePopup"));
        assert_eq!(convention.directive_export("v-ripple"), None);
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest = sample_manifest();
        assert_eq!(manifest.version, "2.16.0");
        assert_eq!(manifest.library_name, "quasar");
        assert_eq!(manifest.runtime_module, "vue");
        assert_eq!(manifest.barrel_request, QUASAR_INDEX_FILE);
    }

    #[test]
    fn test_missing_version_is_rejected() {
        let err = LibraryManifest::from_json(
            r#"{ "name": "quasar" }"#,
            r#"{ "importName": {}, "regex": { "components": "x", "directives": "y" } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidManifest(_)));
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        let err = NamingConvention::new(HashMap::new(), "(unclosed", "v-x").unwrap_err();
        assert!(matches!(err, EngineError::InvalidPattern { kind: "component", .. }));
    }
}
