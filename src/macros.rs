//! Compile-time global substitution.
//!
//! Quasar's sources read feature flags from bare globals such as
//! `__QUASAR_SSR_SERVER__`. Each referenced occurrence is recorded with its
//! exact byte span while the module is parsed and replaced by a JSON literal
//! when the module's code is generated. Replacing spans, rather than running
//! a text substitution over generated output, keeps property names, strings
//! and already-substituted code untouched.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    AssignmentTargetPropertyIdentifier, Expression, IdentifierReference, ObjectProperty,
    SimpleAssignmentTarget,
};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_semantic::{Scoping, SemanticBuilder};
use oxc_span::SourceType;
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::options::{BuildTarget, PluginOptions};

pub const QUASAR_VERSION: &str = "__QUASAR_VERSION__";
pub const QUASAR_SSR: &str = "__QUASAR_SSR__";
pub const QUASAR_SSR_SERVER: &str = "__QUASAR_SSR_SERVER__";
pub const QUASAR_SSR_CLIENT: &str = "__QUASAR_SSR_CLIENT__";
pub const QUASAR_SSR_PWA: &str = "__QUASAR_SSR_PWA__";

/// Sentinel name -> JSON-encoded replacement. Fixed for the whole build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroTable {
    entries: Vec<(&'static str, String)>,
}

impl MacroTable {
    pub fn new(version: &str, options: &PluginOptions, target: BuildTarget) -> Self {
        let ssr = options.enable_ssr;
        let server = target.is_server();

        let values: [(&'static str, Value); 5] = [
            (QUASAR_VERSION, Value::from(version)),
            (QUASAR_SSR, Value::from(ssr && server)),
            (QUASAR_SSR_SERVER, Value::from(ssr && server)),
            (QUASAR_SSR_CLIENT, Value::from(ssr && !server)),
            (QUASAR_SSR_PWA, Value::from(ssr && options.enable_pwa)),
        ];

        Self {
            entries: values
                .into_iter()
                .map(|(name, value)| (name, value.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, sentinel: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == sentinel)
            .map(|(_, literal)| literal.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(name, literal)| (*name, literal.as_str()))
    }

    /// Cheap pre-check so modules without any sentinel skip parsing.
    pub fn mentioned_in(&self, source: &str) -> bool {
        self.entries.iter().any(|(name, _)| source.contains(name))
    }

    /// `{"__QUASAR_SSR__":false,...}` for diagnostics.
    pub fn describe(&self) -> String {
        let map: serde_json::Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, literal)| {
                let value = serde_json::from_str(literal).unwrap_or(Value::Null);
                (name.to_string(), value)
            })
            .collect();
        Value::Object(map).to_string()
    }
}

/// One sentinel occurrence, replaced exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroEdit {
    pub sentinel: String,
    pub replacement: String,
    pub start: u32,
    pub end: u32,
}

struct SentinelCollector<'t, 's> {
    table: &'t MacroTable,
    scoping: &'s Scoping,
    edits: Vec<MacroEdit>,
}

impl SentinelCollector<'_, '_> {
    /// A sentinel is only a global when no binding in scope shadows it.
    fn is_global(&self, ident: &IdentifierReference<'_>) -> bool {
        match ident.reference_id.get() {
            Some(id) => self.scoping.get_reference(id).symbol_id().is_none(),
            None => true,
        }
    }

    fn replacement_for(&self, ident: &IdentifierReference<'_>) -> Option<&str> {
        if !self.is_global(ident) {
            return None;
        }
        self.table.get(ident.name.as_str())
    }
}

impl<'a> Visit<'a> for SentinelCollector<'_, '_> {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        if let Some(replacement) = self.replacement_for(ident) {
            self.edits.push(MacroEdit {
                sentinel: ident.name.to_string(),
                replacement: replacement.to_string(),
                start: ident.span.start,
                end: ident.span.end,
            });
        }
    }

    // Writes (`x = 1`, `x++`, `[x] = a`) are never substituted
    fn visit_simple_assignment_target(&mut self, target: &SimpleAssignmentTarget<'a>) {
        if matches!(target, SimpleAssignmentTarget::AssignmentTargetIdentifier(_)) {
            return;
        }
        walk::walk_simple_assignment_target(self, target);
    }

    // `({ x } = o)` and `({ x = d } = o)` write `x`; only the default is read
    fn visit_assignment_target_property_identifier(
        &mut self,
        prop: &AssignmentTargetPropertyIdentifier<'a>,
    ) {
        if let Some(init) = &prop.init {
            self.visit_expression(init);
        }
    }

    // `{ __QUASAR_SSR__ }` must expand to `{ __QUASAR_SSR__: false }`
    fn visit_object_property(&mut self, prop: &ObjectProperty<'a>) {
        if prop.shorthand {
            if let Expression::Identifier(ident) = &prop.value {
                if let Some(replacement) = self.replacement_for(ident) {
                    self.edits.push(MacroEdit {
                        sentinel: ident.name.to_string(),
                        replacement: format!("{}: {}", ident.name, replacement),
                        start: prop.span.start,
                        end: prop.span.end,
                    });
                    return;
                }
            }
        }
        walk::walk_object_property(self, prop);
    }
}

fn source_type_for(identifier: &str) -> SourceType {
    let resource = identifier.rsplit('!').next().unwrap_or(identifier);
    let path = resource.split('?').next().unwrap_or(resource);
    SourceType::from_path(path).unwrap_or_else(|_| SourceType::default().with_module(true))
}

/// Deferred edits recorded for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMacros {
    edits: Vec<MacroEdit>,
}

impl ModuleMacros {
    /// Parses `source` and records every read of a free sentinel global.
    /// Property keys, member names, string contents, assignment targets and
    /// shadowing locals are left alone.
    pub fn collect(identifier: &str, source: &str, table: &MacroTable) -> Result<Self> {
        if !table.mentioned_in(source) {
            return Ok(Self::default());
        }

        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, source_type_for(identifier)).parse();
        if !ret.errors.is_empty() {
            return Err(EngineError::Parse {
                identifier: identifier.to_string(),
                message: format!("{:?}", ret.errors[0]),
            });
        }

        let semantic = SemanticBuilder::new().build(&ret.program).semantic;
        let mut collector = SentinelCollector {
            table,
            scoping: semantic.scoping(),
            edits: Vec::new(),
        };
        collector.visit_program(&ret.program);

        Ok(Self {
            edits: collector.edits,
        })
    }

    pub fn edits(&self) -> &[MacroEdit] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Splices every recorded edit into `source`. Consumes the edits so they
    /// cannot be applied twice.
    pub fn apply(self, source: &str) -> String {
        let mut edits = self.edits;
        edits.sort_by_key(|edit| edit.start);

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0usize;
        for edit in edits {
            let (start, end) = (edit.start as usize, edit.end as usize);
            if start < cursor
                || start > end
                || end > source.len()
                || !source.is_char_boundary(start)
                || !source.is_char_boundary(end)
            {
                log::warn!(
                    "Skipping {} replacement at {}..{}: span is out of range",
                    edit.sentinel,
                    start,
                    end
                );
                continue;
            }
            out.push_str(&source[cursor..start]);
            out.push_str(&edit.replacement);
            cursor = end;
        }
        out.push_str(&source[cursor..]);
        out
    }
}

/// Collects and applies sentinel replacements in one go.
pub fn substitute_macros(identifier: &str, source: &str, table: &MacroTable) -> Result<String> {
    let macros = ModuleMacros::collect(identifier, source, table)?;
    if macros.is_empty() {
        return Ok(source.to_string());
    }
    Ok(macros.apply(source))
}
