//! Usage discovery over first-party module ASTs.
//!
//! A module contributes usages only when it imports the runtime's
//! `resolveComponent`/`resolveDirective` factories, which is how compiled SFC
//! templates reference components by name. Each literal argument that the
//! naming convention recognizes is recorded under its canonical export.

use rayon::prelude::*;
use serde_json::Value;

use crate::calls::find_calls;
use crate::estree::stringify_tree;
use crate::imports::find_import_local_name;
use crate::naming::LibraryManifest;
use crate::registry::UsageRegistry;

/// Marker separating vendored dependencies from application code.
const VENDOR_MARKER: &str = "node_modules";

/// A module handed over by the host after parsing.
#[derive(Debug, Clone)]
pub struct Module {
    /// Resolved request, possibly prefixed by a `!`-separated loader chain.
    pub identifier: String,
    pub source: String,
    pub ast: Option<Value>,
}

impl Module {
    pub fn new(identifier: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source: source.into(),
            ast: None,
        }
    }

    pub fn with_ast(mut self, ast: Value) -> Self {
        self.ast = Some(ast);
        self
    }

    /// Only the resource segment counts; loaders living in `node_modules`
    /// do not make an application module vendored.
    pub fn is_vendored(&self) -> bool {
        is_vendored(&self.identifier)
    }
}

pub fn is_vendored(identifier: &str) -> bool {
    identifier
        .rsplit('!')
        .next()
        .is_some_and(|resource| resource.contains(VENDOR_MARKER))
}

/// Records every recognized component/directive referenced by `ast` and
/// returns how many call sites resolved to a canonical export.
pub fn scan_ast(ast: &Value, manifest: &LibraryManifest, registry: &UsageRegistry) -> usize {
    let convention = &manifest.convention;
    let mut matched = 0;

    if let Some(local) =
        find_import_local_name(ast, &manifest.runtime_module, &manifest.resolve_component)
    {
        for site in find_calls(ast, local) {
            if let Some(canonical) = convention.component_export(&site.argument_value()) {
                registry.add_component(canonical);
                matched += 1;
            }
        }
    }

    if let Some(local) =
        find_import_local_name(ast, &manifest.runtime_module, &manifest.resolve_directive)
    {
        for site in find_calls(ast, local) {
            if let Some(canonical) = convention.directive_export(&site.argument_value()) {
                registry.add_directive(canonical);
                matched += 1;
            }
        }
    }

    matched
}

/// Scans one module if it is first-party and already parsed.
pub fn scan_module(module: &Module, manifest: &LibraryManifest, registry: &UsageRegistry) -> usize {
    if module.is_vendored() {
        return 0;
    }
    let Some(ast) = &module.ast else {
        return 0;
    };

    if log::log_enabled!(log::Level::Trace) {
        log::trace!("{}\n{}", module.identifier, stringify_tree(ast));
    }

    let matched = scan_ast(ast, manifest, registry);
    if matched > 0 {
        log::debug!("{}: {} library reference(s)", module.identifier, matched);
    }
    matched
}

/// Scans a batch of modules in parallel. Registry adds commute, so the
/// outcome matches a sequential scan in any order.
pub fn scan_modules(modules: &[Module], manifest: &LibraryManifest, registry: &UsageRegistry) -> usize {
    modules
        .par_iter()
        .map(|module| scan_module(module, manifest, registry))
        .sum()
}
