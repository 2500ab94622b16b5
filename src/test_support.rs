//! ESTree fixture builders shared by the unit tests.

use serde_json::{json, Value};

pub fn program(body: Vec<Value>) -> Value {
    json!({ "type": "Program", "sourceType": "module", "body": body })
}

pub fn ident(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

pub fn string_literal(value: &str) -> Value {
    json!({ "type": "Literal", "value": value, "raw": format!("\"{}\"", value) })
}

pub fn import_decl(source: &str, specifiers: Vec<Value>) -> Value {
    json!({
        "type": "ImportDeclaration",
        "specifiers": specifiers,
        "source": string_literal(source)
    })
}

pub fn named_specifier(imported: &str, local: &str) -> Value {
    json!({ "type": "ImportSpecifier", "imported": ident(imported), "local": ident(local) })
}

pub fn default_specifier(local: &str) -> Value {
    json!({ "type": "ImportDefaultSpecifier", "local": ident(local) })
}

pub fn call(callee: &str, arguments: Vec<Value>) -> Value {
    json!({
        "type": "CallExpression",
        "callee": ident(callee),
        "arguments": arguments,
        "optional": false
    })
}

pub fn expr_stmt(expression: Value) -> Value {
    json!({ "type": "ExpressionStatement", "expression": expression })
}

/// `const <name> = <init>`
pub fn const_decl(name: &str, init: Value) -> Value {
    json!({
        "type": "VariableDeclaration",
        "kind": "const",
        "declarations": [{
            "type": "VariableDeclarator",
            "id": ident(name),
            "init": init
        }]
    })
}

/// A compiled SFC render module that resolves the given components and
/// directives through aliased `vue` imports.
pub fn render_module(components: &[&str], directives: &[&str]) -> Value {
    let mut body = vec![import_decl(
        "vue",
        vec![
            named_specifier("resolveComponent", "_resolveComponent"),
            named_specifier("resolveDirective", "_resolveDirective"),
        ],
    )];
    for name in components {
        body.push(const_decl(
            &format!("_component_{}", name.replace('-', "_")),
            call("_resolveComponent", vec![string_literal(name)]),
        ));
    }
    for name in directives {
        body.push(const_decl(
            &format!("_directive_{}", name.replace('-', "_")),
            call("_resolveDirective", vec![string_literal(name)]),
        ));
    }
    program(body)
}
