//! Lexical import rewrites.
//!
//! Both inputs have a narrow, compiler-stable shape (`import { .. } from
//! 'quasar'` statements and the `_resolveComponent("q-btn")` declarations
//! emitted by Vue's template compiler), so they are rewritten with regular
//! expressions rather than a parse/print round trip that would reformat
//! unrelated code.

use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::error::{EngineError, Result};
use crate::naming::{LibraryManifest, NamingConvention};

#[derive(Debug, Clone)]
pub struct ImportRewriter {
    script_re: Regex,
    component_re: Regex,
    directive_re: Regex,
    convention: NamingConvention,
    internal_path: String,
}

fn compile(kind: &'static str, pattern: String) -> Result<Regex> {
    Regex::new(&pattern).map_err(|source| EngineError::InvalidPattern {
        kind,
        pattern,
        source,
    })
}

fn single_import(imported: &str, local: &str, path: &str) -> String {
    format!("import {{ {} as {} }} from '{}';\n", imported, local, path)
}

impl ImportRewriter {
    pub fn new(manifest: &LibraryManifest) -> Result<Self> {
        let convention = &manifest.convention;
        let script_re = compile(
            "script import",
            format!(
                r#"import\s*\{{([\w$,\s]+)\}}\s*from\s*['"]{}['"][ \t]*;?"#,
                regex::escape(&manifest.library_name)
            ),
        )?;
        let component_re = compile(
            "component resolution",
            format!(
                r#"const\s+(?P<local>_component_[\w$]+)\s*=\s*_resolveComponent\("(?P<name>{})"\)!?;?"#,
                convention.components_pattern()
            ),
        )?;
        // Vue drops the `v-` prefix when resolving directives
        let unprefixed_directives = convention.directives_pattern().replace("v-", "");
        let directive_re = compile(
            "directive resolution",
            format!(
                r#"const\s+(?P<local>_directive_[\w$]+)\s*=\s*_resolveDirective\("(?P<name>{})"\)!?;?"#,
                unprefixed_directives
            ),
        )?;

        Ok(Self {
            script_re,
            component_re,
            directive_re,
            convention: convention.clone(),
            internal_path: manifest.internal_path.clone(),
        })
    }

    /// `import { QBtn, QCard as Card } from 'quasar'` becomes one import per
    /// symbol from the internal path, keeping aliases.
    pub fn rewrite_script<'a>(&self, source: &'a str) -> Cow<'a, str> {
        self.script_re.replace_all(source, |caps: &Captures<'_>| {
            caps[1]
                .split(',')
                .filter_map(|item| {
                    let mut parts = item.split(" as ");
                    // `import { QBtn, } from 'quasar'` yields an empty trailing item
                    let imported = parts.next().map(str::trim).filter(|s| !s.is_empty())?;
                    let local = parts
                        .next()
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .unwrap_or(imported);
                    Some(single_import(imported, local, &self.internal_path))
                })
                .collect::<String>()
        })
    }

    /// Replaces compiler-generated `const _component_x = _resolveComponent("x")`
    /// declarations with direct imports bound to the same local name.
    pub fn rewrite_template<'a>(&self, source: &'a str) -> Cow<'a, str> {
        let mut imports = Vec::new();

        let without_components = self.component_re.replace_all(source, |caps: &Captures<'_>| {
            match self.convention.canonical_name(&caps["name"]) {
                Some(canonical) => {
                    imports.push(single_import(canonical, &caps["local"], &self.internal_path));
                    String::new()
                }
                None => caps[0].to_string(),
            }
        });

        let rewritten = self.directive_re.replace_all(&without_components, |caps: &Captures<'_>| {
            match self.convention.canonical_name(&format!("v-{}", &caps["name"])) {
                Some(canonical) => {
                    imports.push(single_import(canonical, &caps["local"], &self.internal_path));
                    String::new()
                }
                None => caps[0].to_string(),
            }
        });

        if imports.is_empty() {
            return Cow::Borrowed(source);
        }

        let mut out = imports.concat();
        out.push_str(&rewritten);
        Cow::Owned(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::sample_manifest;
    use pretty_assertions::assert_eq;

    fn rewriter() -> ImportRewriter {
        ImportRewriter::new(&sample_manifest()).unwrap()
    }

    #[test]
    fn test_script_import_is_split_per_symbol() {
        let out = rewriter().rewrite_script("import { QBtn, QCard as Card } from \"quasar\"\nuse(QBtn, Card)\n");
        assert_eq!(
            out,
            "import { QBtn as QBtn } from 'quasar/src/index.prod.js';\n\
             import { QCard as Card } from 'quasar/src/index.prod.js';\n\
             \nuse(QBtn, Card)\n"
        );
    }

    #[test]
    fn test_trailing_comma_and_semicolon() {
        let out = rewriter().rewrite_script("import {QBtn,} from 'quasar';\n");
        assert_eq!(out, "import { QBtn as QBtn } from 'quasar/src/index.prod.js';\n\n");
    }

    #[test]
    fn test_other_libraries_are_untouched() {
        let source = "import { ref } from 'vue'\nimport { QBtn } from 'quasar-extras'\n";
        assert!(matches!(rewriter().rewrite_script(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_multiline_import() {
        let source = "import {\n  QBtn,\n  QCard,\n} from 'quasar'";
        let out = rewriter().rewrite_script(source);
        assert_eq!(
            out,
            "import { QBtn as QBtn } from 'quasar/src/index.prod.js';\n\
             import { QCard as QCard } from 'quasar/src/index.prod.js';\n"
        );
    }

    #[test]
    fn test_template_resolutions_become_imports() {
        let source = concat!(
            "import { resolveComponent as _resolveComponent, resolveDirective as _resolveDirective } from \"vue\"\n",
            "function render(_ctx) {\n",
            "  const _component_q_btn = _resolveComponent(\"q-btn\")\n",
            "  const _component_router_view = _resolveComponent(\"router-view\")\n",
            "  const _directive_ripple = _resolveDirective(\"ripple\")\n",
            "  return [_component_q_btn, _component_router_view, _directive_ripple]\n",
            "}\n",
        );

        let out = rewriter().rewrite_template(source);
        assert_eq!(
            out,
            concat!(
                "import { QBtn as _component_q_btn } from 'quasar/src/index.prod.js';\n",
                "import { Ripple as _directive_ripple } from 'quasar/src/index.prod.js';\n",
                "import { resolveComponent as _resolveComponent, resolveDirective as _resolveDirective } from \"vue\"\n",
                "function render(_ctx) {\n",
                "  \n",
                "  const _component_router_view = _resolveComponent(\"router-view\")\n",
                "  \n",
                "  return [_component_q_btn, _component_router_view, _directive_ripple]\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_non_null_assertion_is_consumed() {
        let out = rewriter().rewrite_template("const _component_QCard = _resolveComponent(\"QCard\")!;\nx()");
        assert_eq!(out, "import { QCard as _component_QCard } from 'quasar/src/index.prod.js';\n\nx()");
    }

    #[test]
    fn test_template_without_library_components_is_borrowed() {
        let source = "const _component_my_widget = _resolveComponent(\"my-widget\")";
        assert!(matches!(rewriter().rewrite_template(source), Cow::Borrowed(_)));
    }
}
