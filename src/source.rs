//! Source files, parse trees, and positions.
//!
//! A `ParsedSource` owns both the text and the tree built from it, so a
//! tree can never outlive or drift from the text it describes. Rewrites
//! always produce a new text; they never touch a parsed source in place.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::grammar::{Grammar, LanguageId};

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column in bytes (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column in bytes (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }

    /// Byte offset of the first byte on the span's starting line, or `None`
    /// when the column does not fit the byte offset.
    pub fn line_start_byte(&self) -> Option<usize> {
        let column = self.start_col.checked_sub(1)?;
        self.start_byte.checked_sub(column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A source file as handed to the library by a caller.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: LanguageId,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, language: LanguageId, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language,
            text: text.into(),
        }
    }
}

/// Holds a parsed tree-sitter tree and the text it was built from.
pub struct ParsedSource {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source text.
    pub text: String,
    /// The file path (for error reporting).
    pub path: PathBuf,
    /// Language of the grammar that produced the tree.
    pub language: LanguageId,
}

impl ParsedSource {
    /// Parse `text` with `grammar`.
    pub fn parse(grammar: &Grammar, path: impl AsRef<Path>, text: String) -> crate::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tree = grammar.parse_tree(&text, &path)?;
        Ok(Self {
            tree,
            text,
            path,
            language: grammar.id,
        })
    }

    /// Parse a `SourceFile`, consuming it.
    pub fn from_source_file(grammar: &Grammar, file: SourceFile) -> crate::Result<Self> {
        Self::parse(grammar, file.path, file.text)
    }

    /// Get the root node of the tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }

    /// Whether the tree contains any error or missing nodes.
    pub fn has_syntax_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// Visit every node under `root` (inclusive) in document order.
///
/// The visitor returns whether to descend into the node's children.
pub fn visit_nodes<'a, F>(root: Node<'a>, mut visit: F)
where
    F: FnMut(Node<'a>) -> bool,
{
    let mut cursor = root.walk();
    loop {
        let descend = visit(cursor.node());
        if descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Collect every descendant of `root` (inclusive) whose kind is in `kinds`.
pub fn descendants_of_kind<'a>(root: Node<'a>, kinds: &[&str]) -> Vec<Node<'a>> {
    let mut found = Vec::new();
    visit_nodes(root, |node| {
        if kinds.contains(&node.kind()) {
            found.push(node);
        }
        true
    });
    found
}

/// Byte offset where the line containing `byte` begins.
pub fn line_start(text: &str, byte: usize) -> usize {
    text[..byte].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte offset of the first non-whitespace character on the line containing `byte`.
pub fn first_non_whitespace(text: &str, byte: usize) -> usize {
    let start = line_start(text, byte);
    let offset = text[start..]
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(0);
    start + offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarRegistry;

    #[test]
    fn test_line_helpers() {
        let text = "fn a() {}\n    fn b() {}\n";
        let b = text.find("fn b").unwrap();
        assert_eq!(line_start(text, b), 10);
        assert_eq!(first_non_whitespace(text, b + 3), b);
        assert_eq!(line_start(text, 0), 0);
    }

    #[test]
    fn test_visit_nodes_document_order() {
        let registry = GrammarRegistry::new();
        let grammar = registry.get(LanguageId::JavaScript).unwrap();
        let parsed =
            ParsedSource::parse(grammar, "a.js", "function a() {}\nfunction b() {}\n".to_string())
                .unwrap();

        let names: Vec<_> = descendants_of_kind(parsed.root(), &["function_declaration"])
            .into_iter()
            .filter_map(|n| n.child_by_field_name("name"))
            .map(|n| parsed.node_text(n).to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_syntax_errors_detected() {
        let registry = GrammarRegistry::new();
        let grammar = registry.get(LanguageId::JavaScript).unwrap();
        let good = ParsedSource::parse(grammar, "a.js", "const a = 1;\n".to_string()).unwrap();
        assert!(!good.has_syntax_errors());

        let bad = ParsedSource::parse(grammar, "b.js", "const = = (;\n".to_string()).unwrap();
        assert!(bad.has_syntax_errors());
    }

    #[test]
    fn test_span_line_start() {
        let registry = GrammarRegistry::new();
        let grammar = registry.get(LanguageId::JavaScript).unwrap();
        let text = "class A {\n  bar() {}\n}\n".to_string();
        let parsed = ParsedSource::parse(grammar, "a.js", text.clone()).unwrap();
        let method = descendants_of_kind(parsed.root(), &["method_definition"])[0];
        let span = Span::from_node(method);
        assert_eq!(span.start_col, 3);
        assert_eq!(span.line_start_byte(), text.find("  bar"));
    }
}
