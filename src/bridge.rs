//! Node-API surface consumed by the webpack plugin shim.

use napi_derive::napi;
use serde_json::Value;
use std::path::Path;

use crate::naming::LibraryManifest;
use crate::options::{validate_options, BuildMode, BuildTarget, HostContext};
use crate::plugin::UnusedPlugin;
use crate::scan::Module;

#[napi(object)]
pub struct BarrelOutput {
    pub code: String,
    /// The package descriptor with its `sideEffects` override applied.
    pub package_json: Option<Value>,
}

#[napi]
pub fn validate_quasar_unused_options(options: Option<Value>) -> napi::Result<bool> {
    validate_options(options.unwrap_or(Value::Null))?;
    Ok(true)
}

#[napi]
pub struct QuasarUnusedNative {
    inner: UnusedPlugin,
}

#[napi]
impl QuasarUnusedNative {
    /// `library_dir` is the installed library root (`node_modules/quasar`);
    /// `target` and `mode` are webpack's `target` and `mode` settings.
    #[napi(constructor)]
    pub fn new(
        options: Option<Value>,
        library_dir: String,
        target: String,
        mode: String,
    ) -> napi::Result<Self> {
        let manifest = LibraryManifest::load(Path::new(&library_dir))?;
        let host = HostContext {
            target: BuildTarget::from_host(&target),
            mode: BuildMode::from_host(&mode),
        };
        let inner = UnusedPlugin::from_raw_options(options.unwrap_or(Value::Null), manifest, host)?;
        Ok(Self { inner })
    }

    #[napi]
    pub fn begin_pass(&self) {
        self.inner.begin_pass();
    }

    #[napi]
    pub fn state(&self) -> String {
        format!("{:?}", self.inner.state())
    }

    /// Scans one parsed module and returns how many library references it made.
    #[napi]
    pub fn scan_module(&self, identifier: String, ast: Value) -> u32 {
        let module = Module::new(identifier, String::new()).with_ast(ast);
        self.inner.scan_module(&module) as u32
    }

    #[napi]
    pub fn need_additional_pass(&self) -> bool {
        self.inner.need_additional_pass()
    }

    #[napi]
    pub fn should_emit_assets(&self) -> bool {
        self.inner.should_emit_assets()
    }

    #[napi]
    pub fn transform_barrel(
        &self,
        request: String,
        source: String,
        package_json: Option<Value>,
    ) -> napi::Result<BarrelOutput> {
        let mut package_json = package_json;
        let code = self
            .inner
            .transform_barrel(&request, &source, package_json.as_mut())?
            .into_owned();
        Ok(BarrelOutput { code, package_json })
    }

    #[napi]
    pub fn transform_script(&self, request: String, source: String) -> String {
        self.inner.transform_script(&request, &source).into_owned()
    }

    #[napi]
    pub fn transform_template(&self, request: String, source: String) -> String {
        self.inner.transform_template(&request, &source).into_owned()
    }

    #[napi]
    pub fn substitute_macros(&self, identifier: String, source: String) -> napi::Result<String> {
        Ok(self.inner.substitute_macros(&identifier, &source)?)
    }

    #[napi]
    pub fn used_components(&self) -> Vec<String> {
        self.inner.used_components()
    }

    #[napi]
    pub fn used_directives(&self) -> Vec<String> {
        self.inner.used_directives()
    }

    #[napi]
    pub fn reset(&self) {
        self.inner.reset();
    }
}
