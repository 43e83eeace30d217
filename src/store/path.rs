//! Dotted-path projection over a JSON document.
//!
//! # Syntax
//! ```text
//! ""                  → whole document
//! "server.port"       → object key "server", then key "port"
//! "hosts.0"           → first element of the "hosts" array
//! "labels.app\.name"  → key "app.name" inside "labels"
//! ```

use serde_json::Value;

/// Split a dotted path into its components, honouring `\.` escapes.
pub fn components(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '.' => parts.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    parts.push(current);
    parts
}

/// Resolve `path` against `root`, returning `None` when any component is missing.
pub fn select<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    components(path)
        .iter()
        .try_fold(root, |node, part| match node {
            Value::Object(map) => map.get(part.as_str()),
            Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}
