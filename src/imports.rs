//! Import binding resolution over ESTree module ASTs.

use serde::Serialize;
use serde_json::Value;

use crate::estree::{find_all, identifier_name, node_type, visit_children};

/// One specifier of an import declaration: `import { imported as local } from source`.
/// Default imports report `default` as the imported name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBinding {
    pub local_name: String,
    pub imported_name: String,
    pub source_module_name: String,
}

fn import_source(decl: &Value) -> Option<&str> {
    decl.get("source")?.get("value")?.as_str()
}

/// `imported` may be an Identifier or, for `import { "a-b" as x }`, a string Literal.
fn imported_name(specifier: &Value) -> Option<&str> {
    let imported = specifier.get("imported")?;
    identifier_name(imported).or_else(|| imported.get("value").and_then(Value::as_str))
}

fn local_name(specifier: &Value) -> Option<&str> {
    specifier.get("local").and_then(identifier_name)
}

fn specifiers(decl: &Value) -> &[Value] {
    decl.get("specifiers")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Finds the local identifier bound to `exported_name` of `source_module_name`.
///
/// Named specifiers match on their imported name. Default specifiers only
/// match when their local name already equals `exported_name`.
pub fn find_import_local_name<'a>(
    root: &'a Value,
    source_module_name: &str,
    exported_name: &str,
) -> Option<&'a str> {
    fn search<'a>(node: &'a Value, source: &str, exported: &str) -> Option<&'a str> {
        if node_type(node) == Some("ImportDeclaration") && import_source(node) == Some(source) {
            for specifier in specifiers(node) {
                match node_type(specifier) {
                    Some("ImportSpecifier") if imported_name(specifier) == Some(exported) => {
                        if let Some(local) = local_name(specifier) {
                            return Some(local);
                        }
                    }
                    Some("ImportDefaultSpecifier") if local_name(specifier) == Some(exported) => {
                        return local_name(specifier);
                    }
                    _ => {}
                }
            }
        }

        visit_children(node, |child| search(child, source, exported))
    }

    search(root, source_module_name, exported_name)
}

/// Every import binding in the tree, in pre-order. Namespace imports are
/// reported with `*` as the imported name.
pub fn import_bindings(root: &Value) -> Vec<ImportBinding> {
    let mut bindings = Vec::new();

    for decl in find_all(root, |n| node_type(n) == Some("ImportDeclaration")) {
        let Some(source) = import_source(decl) else {
            continue;
        };

        for specifier in specifiers(decl) {
            let Some(local) = local_name(specifier) else {
                continue;
            };
            let imported = match node_type(specifier) {
                Some("ImportSpecifier") => imported_name(specifier).unwrap_or(local),
                Some("ImportDefaultSpecifier") => "default",
                Some("ImportNamespaceSpecifier") => "*",
                _ => continue,
            };

            bindings.push(ImportBinding {
                local_name: local.to_string(),
                imported_name: imported.to_string(),
                source_module_name: source.to_string(),
            });
        }
    }

    bindings
}
