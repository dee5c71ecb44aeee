//! # Import Reference Extraction
//!
//! Turns one Python import statement node into the module names it references.
//! Names are not resolved to files here; the unused-file heuristic works on the
//! raw strings.
//!
//! | statement                    | names          |
//! |------------------------------|----------------|
//! | `import a.b, c as d`         | `a.b`, `c`     |
//! | `from a.b import c`          | `a.b`          |
//! | `from ..utils import x`      | `utils`        |
//! | `from . import x`            | (none)         |
//! | `from __future__ import x`   | `__future__`   |

use tree_sitter::Node;

/// Extracts the referenced module names from an import statement node.
///
/// Returns an empty vector for any other node kind.
pub fn import_names(node: Node<'_>, source: &[u8]) -> Vec<String> {
    match node.kind() {
        "import_statement" => {
            let mut cursor = node.walk();
            let names: Vec<String> = node
                .children_by_field_name("name", &mut cursor)
                .filter_map(|child| imported_module(child, source))
                .collect();
            names
        }
        "import_from_statement" => node
            .child_by_field_name("module_name")
            .and_then(|module| from_module(module, source))
            .into_iter()
            .collect(),
        "future_import_statement" => vec!["__future__".to_string()],
        _ => Vec::new(),
    }
}

/// `a.b` or `a.b as c` → `a.b`.
fn imported_module(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "dotted_name" => dotted_text(node, source),
        "aliased_import" => node
            .child_by_field_name("name")
            .and_then(|name| dotted_text(name, source)),
        _ => None,
    }
}

/// Module of a `from` import. Relative prefixes are dropped; a bare prefix yields nothing.
fn from_module(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "dotted_name" => dotted_text(node, source),
        "relative_import" => {
            let mut cursor = node.walk();
            let dotted = node
                .named_children(&mut cursor)
                .find(|child| child.kind() == "dotted_name");
            dotted.and_then(|d| dotted_text(d, source))
        }
        _ => None,
    }
}

/// Joins the identifiers of a `dotted_name` with `.`, ignoring interior whitespace.
fn dotted_text(node: Node<'_>, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let parts: Vec<&str> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "identifier")
        .filter_map(|child| child.utf8_text(source).ok())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}
