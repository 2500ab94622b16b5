//! Call-site discovery for bare function invocations.

use serde_json::Value;

use crate::estree::{find_all, find_first, identifier_name, node_range, node_type};

/// A call `callee("literal", ...)` whose first argument is a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub callee_local_name: String,
    /// Raw literal text as written, quotes included.
    pub argument_literal_text: String,
    pub range: Option<(u32, u32)>,
}

impl CallSite {
    /// The literal with quote characters stripped.
    ///
    /// Escaped quotes inside the name are stripped too; component names never
    /// contain them.
    pub fn argument_value(&self) -> String {
        self.argument_literal_text.replace(['\'', '"'], "")
    }
}

/// Only plain identifier callees qualify; member and computed calls never match.
fn is_call_to(node: &Value, callee_name: &str) -> bool {
    node_type(node) == Some("CallExpression")
        && node.get("callee").and_then(identifier_name) == Some(callee_name)
}

/// All call expressions invoking `callee_name`, in pre-order.
pub fn find_call_expressions<'a>(root: &'a Value, callee_name: &str) -> Vec<&'a Value> {
    find_all(root, |node| is_call_to(node, callee_name))
}

/// The first call expression invoking `callee_name`.
pub fn find_call_expression<'a>(root: &'a Value, callee_name: &str) -> Option<&'a Value> {
    find_first(root, |node| is_call_to(node, callee_name))
}

fn literal_first_argument(call: &Value) -> Option<String> {
    let first = call.get("arguments")?.as_array()?.first()?;
    if node_type(first) != Some("Literal") {
        return None;
    }

    let value = first.get("value")?.as_str()?;
    Some(
        first
            .get("raw")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("\"{}\"", value)),
    )
}

fn to_call_site(call: &Value, callee_name: &str) -> Option<CallSite> {
    Some(CallSite {
        callee_local_name: callee_name.to_string(),
        argument_literal_text: literal_first_argument(call)?,
        range: node_range(call),
    })
}

/// Every call to `callee_name` with a string literal first argument.
/// Calls with computed arguments are skipped.
pub fn find_calls(root: &Value, callee_name: &str) -> Vec<CallSite> {
    find_call_expressions(root, callee_name)
        .into_iter()
        .filter_map(|call| to_call_site(call, callee_name))
        .collect()
}

/// First literal call site for `callee_name`.
pub fn find_first_call(root: &Value, callee_name: &str) -> Option<CallSite> {
    find_first(root, |node| {
        is_call_to(node, callee_name) && literal_first_argument(node).is_some()
    })
    .and_then(|call| to_call_site(call, callee_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use serde_json::json;

    fn mixed_calls() -> Value {
        program(vec![
            expr_stmt(call("rc", vec![string_literal("q-btn")])),
            expr_stmt(call("rc", vec![string_literal("q-card")])),
            expr_stmt(call("rc", vec![ident("dynamicVar")])),
        ])
    }

    #[test]
    fn test_literal_calls_only() {
        let sites = find_calls(&mixed_calls(), "rc");
        let names: Vec<String> = sites.iter().map(CallSite::argument_value).collect();
        assert_eq!(names, vec!["q-btn", "q-card"]);
        assert_eq!(sites[0].argument_literal_text, "\"q-btn\"");
        assert!(sites.iter().all(|s| s.callee_local_name == "rc"));
    }

    #[test]
    fn test_find_call_expressions_includes_dynamic() {
        assert_eq!(find_call_expressions(&mixed_calls(), "rc").len(), 3);
    }

    #[test]
    fn test_member_callee_never_matches() {
        let ast = program(vec![expr_stmt(json!({
            "type": "CallExpression",
            "callee": {
                "type": "MemberExpression",
                "object": ident("vue"),
                "property": ident("rc"),
                "computed": false
            },
            "arguments": [string_literal("q-btn")]
        }))]);

        assert!(find_calls(&ast, "rc").is_empty());
        assert!(find_call_expression(&ast, "rc").is_none());
    }

    #[test]
    fn test_nested_calls_are_found() {
        // rc(rc("q-inner")) -- the outer call has a computed argument
        let ast = program(vec![expr_stmt(call(
            "rc",
            vec![call("rc", vec![string_literal("q-inner")])],
        ))]);

        let sites = find_calls(&ast, "rc");
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].argument_value(), "q-inner");
    }

    #[test]
    fn test_first_match_variants() {
        let ast = mixed_calls();
        let first = find_call_expression(&ast, "rc").unwrap();
        assert_eq!(first["arguments"][0]["value"], "q-btn");

        let ast = program(vec![
            expr_stmt(call("rc", vec![ident("dynamicVar")])),
            expr_stmt(call("rc", vec![string_literal("q-card")])),
        ]);
        assert_eq!(find_first_call(&ast, "rc").unwrap().argument_value(), "q-card");
        assert!(find_first_call(&ast, "other").is_none());
    }

    #[test]
    fn test_single_quoted_raw_is_stripped() {
        let ast = program(vec![expr_stmt(json!({
            "type": "CallExpression",
            "callee": ident("rc"),
            "arguments": [{ "type": "Literal", "value": "q-btn", "raw": "'q-btn'" }],
            "start": 0,
            "end": 11
        }))]);

        let sites = find_calls(&ast, "rc");
        assert_eq!(sites[0].argument_value(), "q-btn");
        assert_eq!(sites[0].range, Some((0, 11)));
    }

    #[test]
    fn test_numeric_literal_is_not_a_call_site() {
        let ast = program(vec![expr_stmt(call(
            "rc",
            vec![json!({ "type": "Literal", "value": 5, "raw": "5" })],
        ))]);
        assert!(find_calls(&ast, "rc").is_empty());
    }
}
