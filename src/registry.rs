use dashmap::DashSet;

/// Canonical component and directive exports referenced by first-party code.
///
/// Append-only for the lifetime of one build. Adds are idempotent and commute,
/// so modules may be scanned concurrently and in any order.
#[derive(Debug, Default)]
pub struct UsageRegistry {
    components: DashSet<String>,
    directives: DashSet<String>,
}

impl UsageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the name was not present before.
    pub fn add_component(&self, name: &str) -> bool {
        self.components.insert(name.to_string())
    }

    pub fn add_directive(&self, name: &str) -> bool {
        self.directives.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains(name) || self.directives.contains(name)
    }

    pub fn len(&self) -> usize {
        self.components.len() + self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.directives.is_empty()
    }

    /// Forgets every name. Only called between builds.
    pub fn clear(&self) {
        self.components.clear();
        self.directives.clear();
    }

    /// Sorted snapshot of the used components.
    pub fn components(&self) -> Vec<String> {
        sorted(&self.components)
    }

    /// Sorted snapshot of the used directives.
    pub fn directives(&self) -> Vec<String> {
        sorted(&self.directives)
    }
}

fn sorted(set: &DashSet<String>) -> Vec<String> {
    let mut names: Vec<String> = set.iter().map(|name| name.key().clone()).collect();
    names.sort();
    names
}
