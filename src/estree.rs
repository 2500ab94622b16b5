//! Generic ESTree traversal.
//!
//! Module ASTs arrive from the host as ESTree-shaped JSON (acorn output from
//! webpack's parser). Nodes are plain objects with a `type` tag, so traversal
//! is reflective over object fields instead of per-kind dispatch.
//!
//! Rules:
//! 1. `visit_children` is the single descent mechanism. Nothing else walks
//!    into child fields.
//! 2. Fields are visited in declaration order, array elements in array order.
//!    This relies on `serde_json`'s `preserve_order` feature.
//! 3. Scalar fields and non-node objects (`loc`, `regex`, ...) are skipped.

use serde_json::Value;

/// Returns true iff `value` is an object carrying a `type` field.
pub fn is_node(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| obj.contains_key("type"))
}

/// The node's `type` tag, if any.
pub fn node_type(node: &Value) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}

/// Byte range `[start, end)` of a node in its module's source.
/// Accepts both acorn's `start`/`end` and the `range` pair.
pub fn node_range(node: &Value) -> Option<(u32, u32)> {
    if let Some([start, end]) = node.get("range").and_then(Value::as_array).map(Vec::as_slice) {
        return Some((offset(start)?, offset(end)?));
    }

    Some((offset(node.get("start")?)?, offset(node.get("end")?)?))
}

fn offset(value: &Value) -> Option<u32> {
    u32::try_from(value.as_u64()?).ok()
}

/// Name of an `Identifier` node.
pub fn identifier_name(node: &Value) -> Option<&str> {
    if node_type(node) != Some("Identifier") {
        return None;
    }
    node.get("name").and_then(Value::as_str)
}

/// Visits every direct child node of `node`, returning the first `Some`
/// produced by `visit`.
pub fn visit_children<'a, T, F>(node: &'a Value, mut visit: F) -> Option<T>
where
    F: FnMut(&'a Value) -> Option<T>,
{
    let fields = node.as_object()?;

    for value in fields.values() {
        match value {
            Value::Array(elements) => {
                for el in elements {
                    if !is_node(el) {
                        continue;
                    }
                    if let Some(res) = visit(el) {
                        return Some(res);
                    }
                }
            }
            Value::Object(_) if is_node(value) => {
                if let Some(res) = visit(value) {
                    return Some(res);
                }
            }
            _ => {}
        }
    }

    None
}

/// Pre-order search for the first node matching `predicate`. A match is
/// returned without descending into its subtree.
pub fn find_first<'a, P>(root: &'a Value, predicate: P) -> Option<&'a Value>
where
    P: Fn(&Value) -> bool,
{
    fn search<'a>(node: &'a Value, predicate: &dyn Fn(&Value) -> bool) -> Option<&'a Value> {
        if predicate(node) {
            return Some(node);
        }
        visit_children(node, |child| search(child, predicate))
    }

    search(root, &predicate)
}

/// Every node matching `predicate`, in pre-order. Matches do not prune their
/// own children.
pub fn find_all<'a, P>(root: &'a Value, predicate: P) -> Vec<&'a Value>
where
    P: Fn(&Value) -> bool,
{
    fn search<'a>(node: &'a Value, predicate: &dyn Fn(&Value) -> bool, found: &mut Vec<&'a Value>) {
        if predicate(node) {
            found.push(node);
        }
        visit_children(node, |child| {
            search(child, predicate, found);
            None::<()>
        });
    }

    let mut found = Vec::new();
    search(root, &predicate, &mut found);
    found
}

const HIDDEN_KEYS: &[&str] = &[
    "type",
    "value",
    "loc",
    "range",
    "start",
    "end",
    "leadingComments",
    "trailingComments",
];

/// Renders a tree as an indented outline, one node per line, with scalar
/// fields inline and child fields labelled. Used for trace logging.
pub fn stringify_tree(root: &Value) -> String {
    fn stringify(node: &Value, depth: usize, out: &mut String) {
        let Some(fields) = node.as_object() else {
            return;
        };

        out.push_str(&" ".repeat(depth * 2));
        out.push_str(node_type(node).unwrap_or("?"));

        for (key, value) in fields {
            if HIDDEN_KEYS.contains(&key.as_str()) {
                continue;
            }
            match value {
                Value::String(s) => out.push_str(&format!(" {}:{}", key, s)),
                Value::Number(n) => out.push_str(&format!(" {}:{}", key, n)),
                Value::Bool(b) => out.push_str(&format!(" {}:{}", key, b)),
                _ => {}
            }
        }
        out.push('\n');

        for (key, value) in fields {
            if HIDDEN_KEYS.contains(&key.as_str()) {
                continue;
            }
            let children: Vec<&Value> = match value {
                Value::Array(elements) => elements.iter().filter(|el| is_node(el)).collect(),
                Value::Object(_) if is_node(value) => vec![value],
                _ => continue,
            };
            if children.is_empty() {
                continue;
            }

            out.push_str(&format!("{}({})\n", " ".repeat((depth + 1) * 2), key));
            for child in children {
                stringify(child, depth + 2, out);
            }
        }
    }

    let mut out = String::new();
    stringify(root, 0, &mut out);
    out
}
