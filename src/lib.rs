//! # Quasar Unused Components (native core)
//!
//! Quasar's barrel module installs every component and directive it exports,
//! so a bundler can never prove any of them unused. This crate makes
//! tree-shaking effective by rewriting that barrel to reference only what the
//! application actually uses.
//!
//! ## Build protocol
//!
//! 1. **Scan pass**: every first-party module AST is searched for
//!    `resolveComponent("q-btn")`/`resolveDirective("ripple")` calls bound to
//!    the `vue` imports. Recognized names land in the [`UsageRegistry`] under
//!    their canonical export. Everything this pass emits is discarded.
//! 2. **Rewrite pass**: with the registry complete, the barrel's
//!    `{ components, directives }` shorthands are expanded to explicit member
//!    lists, its package `sideEffects` is overridden, and library imports in
//!    scripts and compiled templates point at the internal entry directly.
//!
//! The [`PassState`] machine decides which pass is which. Compile-time globals
//! (`__QUASAR_SSR__` etc.) are substituted in every pass.
//!
//! ## Invariants
//!
//! - [`estree::visit_children`] is the only way any traversal descends.
//! - Rewrites never run before the first full scan has finished.
//! - Pattern misses degrade to "no tree-shaking" with a warning, never an error.

#[cfg(feature = "napi")]
mod bridge;

pub mod barrel;
pub mod calls;
pub mod error;
pub mod estree;
pub mod imports;
pub mod macros;
pub mod naming;
pub mod options;
pub mod pass;
pub mod plugin;
pub mod registry;
pub mod rewrite;
pub mod scan;

#[cfg(test)]
mod test_support;

mod scan_tests;

pub use barrel::{apply_side_effects_override, rewrite_barrel, BarrelRewrite};
pub use calls::{find_call_expression, find_call_expressions, find_calls, find_first_call, CallSite};
pub use error::{EngineError, Result};
pub use estree::{find_all, find_first, is_node, stringify_tree, visit_children};
pub use imports::{find_import_local_name, import_bindings, ImportBinding};
pub use macros::{substitute_macros, MacroEdit, MacroTable, ModuleMacros};
pub use naming::{LibraryManifest, NamingConvention, QUASAR_INDEX_FILE};
pub use options::{
    validate_options, BuildMode, BuildTarget, HostContext, PluginOptions, SideEffects,
    QUASAR_SIDE_EFFECTS,
};
pub use pass::{PassController, PassState};
pub use plugin::UnusedPlugin;
pub use registry::UsageRegistry;
pub use rewrite::ImportRewriter;
pub use scan::{is_vendored, scan_ast, scan_module, scan_modules, Module};

#[cfg(feature = "napi")]
pub use bridge::{validate_quasar_unused_options, BarrelOutput, QuasarUnusedNative};
