//! One build's worth of tree-shaking state.
//!
//! The host drives an [`UnusedPlugin`] through its compilation hooks: modules
//! are scanned as they are parsed, the pass query decides when the registry is
//! complete, and the transforms rewrite source text only once it is.

use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::barrel::{apply_side_effects_override, rewrite_barrel, BarrelRewrite};
use crate::error::Result;
use crate::macros::{self, MacroTable};
use crate::naming::LibraryManifest;
use crate::options::{validate_options, BuildMode, HostContext, PluginOptions};
use crate::pass::{PassController, PassState};
use crate::registry::UsageRegistry;
use crate::rewrite::ImportRewriter;
use crate::scan::{self, Module};

#[derive(Debug)]
pub struct UnusedPlugin {
    options: PluginOptions,
    manifest: LibraryManifest,
    host: HostContext,
    registry: UsageRegistry,
    controller: PassController,
    macros: MacroTable,
    rewriter: ImportRewriter,
    barrel_rewritten: AtomicBool,
}

impl UnusedPlugin {
    pub fn new(options: PluginOptions, manifest: LibraryManifest, host: HostContext) -> Result<Self> {
        let macros = MacroTable::new(&manifest.version, &options, host.target);
        log::info!("Setting globals: {}", macros.describe());

        let rewriter = ImportRewriter::new(&manifest)?;
        Ok(Self {
            options,
            manifest,
            host,
            registry: UsageRegistry::new(),
            controller: PassController::new(),
            macros,
            rewriter,
            barrel_rewritten: AtomicBool::new(false),
        })
    }

    /// Validates a raw options object before construction.
    pub fn from_raw_options(options: Value, manifest: LibraryManifest, host: HostContext) -> Result<Self> {
        Self::new(validate_options(options)?, manifest, host)
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn manifest(&self) -> &LibraryManifest {
        &self.manifest
    }

    pub fn registry(&self) -> &UsageRegistry {
        &self.registry
    }

    pub fn state(&self) -> PassState {
        self.controller.state()
    }

    pub fn macro_table(&self) -> &MacroTable {
        &self.macros
    }

    fn is_development(&self) -> bool {
        self.host.mode == BuildMode::Development
    }

    fn rewrites_allowed(&self) -> bool {
        !self.is_development() && self.controller.state().rewrites_allowed()
    }

    /// The barrel module is matched by request fragment so loader chains and
    /// absolute install paths still qualify.
    pub fn is_barrel(&self, request: &str) -> bool {
        request.contains(&self.manifest.barrel_request)
    }

    /// Called when the host starts a compilation pass.
    pub fn begin_pass(&self) -> PassState {
        self.controller.begin_pass()
    }

    /// Records the library references of one parsed module.
    pub fn scan_module(&self, module: &Module) -> usize {
        if self.is_development() {
            return 0;
        }
        // The first scanned module proves a pass is running even if the host
        // never reported its start.
        let state = self.controller.begin_pass();
        if !state.scanning_allowed() {
            return 0;
        }
        scan::scan_module(module, &self.manifest, &self.registry)
    }

    pub fn scan_modules(&self, modules: &[Module]) -> usize {
        if self.is_development() {
            return 0;
        }
        let state = self.controller.begin_pass();
        if !state.scanning_allowed() {
            return 0;
        }
        scan::scan_modules(modules, &self.manifest, &self.registry)
    }

    /// Answers the host's "run the compilation again" query.
    pub fn need_additional_pass(&self) -> bool {
        if self.is_development() {
            return false;
        }

        let before = self.controller.state();
        let run_again = self.controller.need_additional_pass();

        if run_again {
            log::info!(
                "Found {} Quasar component(s) and {} directive(s) being used",
                self.registry.components().len(),
                self.registry.directives().len()
            );
        } else if before == PassState::Rewriting {
            if let Some(message) = self.missing_barrel_warning() {
                log::warn!("{}", message);
            }
        }
        run_again
    }

    /// Whether the barrel module went through the rewrite in this build.
    pub fn barrel_rewritten(&self) -> bool {
        self.barrel_rewritten.load(Ordering::SeqCst)
    }

    /// Warning reported once the build finished without ever seeing the
    /// barrel module.
    pub fn missing_barrel_warning(&self) -> Option<String> {
        if self.controller.state() != PassState::Done || self.barrel_rewritten() {
            return None;
        }
        Some(format!(
            "Did not find Quasar module to rewrite. Did you import from \"{}\"?",
            self.manifest.library_name
        ))
    }

    /// Whether assets produced by the current pass may reach the output.
    pub fn should_emit_assets(&self) -> bool {
        self.is_development() || self.controller.state().emits_allowed()
    }

    /// Drops every queued asset of a pass whose output must not be emitted.
    /// Returns how many were dropped.
    pub fn discard_pending_assets<V>(&self, assets: &mut HashMap<String, V>) -> usize {
        if self.should_emit_assets() {
            return 0;
        }
        let dropped = assets.len();
        assets.clear();
        log::debug!("Discarded {} asset(s) from the usage scanning pass", dropped);
        dropped
    }

    /// Rewrites the barrel module to reference only the used exports and
    /// overrides its package `sideEffects`.
    pub fn transform_barrel<'a>(
        &self,
        request: &str,
        source: &'a str,
        package_json: Option<&mut Value>,
    ) -> Result<Cow<'a, str>> {
        if !self.is_barrel(request) {
            return Ok(Cow::Borrowed(source));
        }
        if !self.rewrites_allowed() {
            log::debug!("Not rewriting {} in state {:?}", request, self.controller.state());
            return Ok(Cow::Borrowed(source));
        }

        apply_side_effects_override(request, package_json, &self.options.side_effects_override)?;

        let components = self.registry.components();
        let directives = self.registry.directives();
        match rewrite_barrel(source, &components, &directives) {
            BarrelRewrite::Rewritten(code) => {
                self.barrel_rewritten.store(true, Ordering::SeqCst);
                log::debug!("Rewrote {} with {} component(s)", request, components.len());
                Ok(Cow::Owned(code))
            }
            BarrelRewrite::AlreadyRewritten => {
                self.barrel_rewritten.store(true, Ordering::SeqCst);
                Ok(Cow::Borrowed(source))
            }
            BarrelRewrite::PatternMissing => {
                log::warn!(
                    "Failed to rewrite {}: no `{{ components` object found, all components stay bundled",
                    request
                );
                Ok(Cow::Borrowed(source))
            }
        }
    }

    /// Splits `import { .. } from 'quasar'` into per-symbol internal imports.
    pub fn transform_script<'a>(&self, request: &str, source: &'a str) -> Cow<'a, str> {
        if self.is_barrel(request) {
            return Cow::Borrowed(source);
        }
        if !self.rewrites_allowed() {
            log::debug!("Not rewriting imports of {} in state {:?}", request, self.controller.state());
            return Cow::Borrowed(source);
        }
        self.rewriter.rewrite_script(source)
    }

    /// Turns compiled-template resolutions into direct internal imports.
    pub fn transform_template<'a>(&self, request: &str, source: &'a str) -> Cow<'a, str> {
        if self.is_barrel(request) {
            return Cow::Borrowed(source);
        }
        if !self.rewrites_allowed() {
            log::debug!("Not rewriting template of {} in state {:?}", request, self.controller.state());
            return Cow::Borrowed(source);
        }
        self.rewriter.rewrite_template(source)
    }

    /// Replaces the library's compile-time globals. Runs in every pass and
    /// mode since it never depends on the registry.
    pub fn substitute_macros(&self, identifier: &str, source: &str) -> Result<String> {
        macros::substitute_macros(identifier, source, &self.macros)
    }

    pub fn used_components(&self) -> Vec<String> {
        self.registry.components()
    }

    pub fn used_directives(&self) -> Vec<String> {
        self.registry.directives()
    }

    /// Starts a fresh build, e.g. on a watch-mode rebuild.
    pub fn reset(&self) {
        self.registry.clear();
        self.controller.reset();
        self.barrel_rewritten.store(false, Ordering::SeqCst);
    }
}
