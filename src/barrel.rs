//! Barrel module rewrite.
//!
//! Quasar's barrel installs itself with `installQuasar(app, { components,
//! directives, ...opts })`, where both shorthands are namespace objects holding
//! every export. Expanding them to explicit lists of the used members is what
//! lets the bundler drop the rest.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::options::SideEffects;

lazy_static! {
    /// Opening of the install options object; group 1 is set when the key has
    /// already been expanded into `components: ...`.
    static ref COMPONENTS_KEY_RE: Regex = Regex::new(r"\{\s*components\b(\s*:)?").unwrap();

    /// The `directives` shorthand that directly follows the components key.
    static ref DIRECTIVES_KEY_RE: Regex = Regex::new(r"^\s*,\s*directives\b(\s*:)?").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarrelRewrite {
    Rewritten(String),
    /// The keys were already expanded by an earlier run.
    AlreadyRewritten,
    PatternMissing,
}

fn member_list(namespace: &str, names: &[String]) -> String {
    let members: Vec<String> = names
        .iter()
        .map(|name| format!("{}.{}", namespace, name))
        .collect();
    format!(": [{}]", members.join(", "))
}

/// Injects `: [components.A, ...]` after the `components` shorthand and, when
/// it directly follows, `: [directives.X, ...]` after `directives`.
pub fn rewrite_barrel(source: &str, components: &[String], directives: &[String]) -> BarrelRewrite {
    let Some(caps) = COMPONENTS_KEY_RE.captures(source) else {
        return BarrelRewrite::PatternMissing;
    };
    if caps.get(1).is_some() {
        return BarrelRewrite::AlreadyRewritten;
    }

    let components_end = caps.get(0).map_or(0, |m| m.end());
    let mut out = String::with_capacity(source.len() + 64);
    out.push_str(&source[..components_end]);
    out.push_str(&member_list("components", components));

    let rest = &source[components_end..];
    match DIRECTIVES_KEY_RE.captures(rest) {
        Some(dir) if dir.get(1).is_none() => {
            let directives_end = dir.get(0).map_or(0, |m| m.end());
            out.push_str(&rest[..directives_end]);
            out.push_str(&member_list("directives", directives));
            out.push_str(&rest[directives_end..]);
        }
        _ => out.push_str(rest),
    }

    BarrelRewrite::Rewritten(out)
}

/// Overrides the barrel package's `sideEffects` field so the bundler may drop
/// members the rewritten lists no longer reference.
pub fn apply_side_effects_override(
    request: &str,
    package_json: Option<&mut Value>,
    side_effects: &SideEffects,
) -> Result<()> {
    let Some(Value::Object(package)) = package_json else {
        return Err(EngineError::MissingPackageDescriptor {
            request: request.to_string(),
        });
    };

    let value = match side_effects {
        SideEffects::Flag(flag) => Value::Bool(*flag),
        SideEffects::Patterns(patterns) => {
            Value::Array(patterns.iter().cloned().map(Value::String).collect())
        }
    };
    package.insert("sideEffects".to_string(), value);
    Ok(())
}
