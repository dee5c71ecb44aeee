//! Tree-sitter Python parsing and single-pass unit/import extraction.
//!
//! Every node of the syntax tree is classified into a [`SyntaxNode`] variant and
//! dispatched with one `match`. Functions and classes become [`CodeUnit`]s (their
//! bodies are still walked, so methods and nested functions count too); import
//! statements contribute reference names and are not descended into.
//!
//! A unit's text runs from `def`/`class` to the end of its last statement.
//! Comments trailing the body are not part of it, even when tree-sitter puts
//! them inside the definition node.
//!
//! The grammar also accepts Python 2 `print`/`exec` statements. Files using
//! them are treated like any other file with a syntax error.

use std::collections::BTreeSet;

use forge::{CodeUnit, UnitKind};
use tree_sitter::{Node, Parser};

use crate::imports::import_names;
use crate::AnatomistError;

/// Statement kinds the grammar accepts but Python 3 rejects.
const PYTHON2_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// A syntax node as seen by the extraction visitor.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'t> {
    Function(Node<'t>),
    Class(Node<'t>),
    Import(Node<'t>),
    Other(Node<'t>),
}

impl<'t> SyntaxNode<'t> {
    pub fn classify(node: Node<'t>) -> Self {
        match node.kind() {
            "function_definition" => SyntaxNode::Function(node),
            "class_definition" => SyntaxNode::Class(node),
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                SyntaxNode::Import(node)
            }
            _ => SyntaxNode::Other(node),
        }
    }
}

/// Units and import names extracted from one file.
#[derive(Debug, Default)]
pub struct Extraction {
    pub units: Vec<CodeUnit>,
    pub references: BTreeSet<String>,
}

/// Owns a tree-sitter parser loaded with the Python grammar.
///
/// Parsers are not `Sync`; the pipeline keeps one host per worker thread.
///
/// # Example
/// ```
/// use anatomist::ParserHost;
///
/// let mut host = ParserHost::new().unwrap();
/// let extraction = host.extract("import os\n\ndef f():\n    return 1\n", "a.py").unwrap();
/// assert_eq!(extraction.units.len(), 1);
/// assert!(extraction.references.contains("os"));
/// ```
pub struct ParserHost {
    parser: Parser,
}

impl ParserHost {
    /// Creates a new parser host with the Python grammar loaded.
    ///
    /// # Errors
    /// Returns `AnatomistError::ParseFailure` if the grammar cannot be loaded.
    pub fn new() -> Result<Self, AnatomistError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| AnatomistError::ParseFailure {
                path: String::new(),
                reason: format!("Failed to load Python grammar: {e}"),
            })?;
        Ok(Self { parser })
    }

    /// Parses `text` and extracts its code units and import names.
    ///
    /// `file_key` is recorded on every unit as its location.
    ///
    /// # Errors
    /// `ParseFailure` if tree-sitter returns no tree, the tree contains syntax
    /// errors, or the file uses Python 2 statements. Nothing is extracted from
    /// such a file.
    pub fn extract(&mut self, text: &str, file_key: &str) -> Result<Extraction, AnatomistError> {
        let source = text.as_bytes();
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| AnatomistError::ParseFailure {
                path: file_key.to_string(),
                reason: "parser returned no tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(AnatomistError::ParseFailure {
                path: file_key.to_string(),
                reason: syntax_error_position(root),
            });
        }

        let mut extraction = Extraction::default();
        let mut cursor = root.walk();
        'walk: loop {
            let node = cursor.node();
            let descend = match SyntaxNode::classify(node) {
                SyntaxNode::Function(n) => {
                    push_unit(&mut extraction, UnitKind::Function, n, text, file_key);
                    true
                }
                SyntaxNode::Class(n) => {
                    push_unit(&mut extraction, UnitKind::Class, n, text, file_key);
                    true
                }
                SyntaxNode::Import(n) => {
                    extraction.references.extend(import_names(n, source));
                    false
                }
                SyntaxNode::Other(n) if PYTHON2_STATEMENTS.contains(&n.kind()) => {
                    let pos = n.start_position();
                    return Err(AnatomistError::ParseFailure {
                        path: file_key.to_string(),
                        reason: format!("Python 2 {} at line {}", n.kind(), pos.row + 1),
                    });
                }
                SyntaxNode::Other(_) => true,
            };

            if descend && cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        Ok(extraction)
    }
}

fn push_unit(
    extraction: &mut Extraction,
    kind: UnitKind,
    node: Node<'_>,
    text: &str,
    file_key: &str,
) {
    let Some(unit_text) = text.get(node.start_byte()..statement_end(node)) else {
        return;
    };
    let start_line = (node.start_position().row + 1) as u32;
    extraction
        .units
        .push(CodeUnit::new(kind, file_key, start_line, unit_text.to_string()));
}

/// End byte of `node` without trailing comments, found by descending through
/// the last non-comment child down to a leaf.
fn statement_end(node: Node<'_>) -> usize {
    let mut current = node;
    loop {
        let mut cursor = current.walk();
        let last = current
            .children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .last();
        match last {
            Some(child) => current = child,
            None => return current.end_byte(),
        }
    }
}

/// Describes the first error or missing node, for the log line.
fn syntax_error_position(root: Node<'_>) -> String {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            return format!("syntax error at line {}, column {}", pos.row + 1, pos.column + 1);
        }
        // Only error-bearing subtrees can hold the first error.
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return "syntax error".to_string();
            }
        }
    }
}
