//! Finds documentable functions and pairs them with the comment above them.

use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Point};

use crate::error::Result;
use crate::grammar::{Grammar, GrammarRegistry};
use crate::source::{first_non_whitespace, line_start, visit_nodes, ParsedSource, Span};

/// One documentable function and its doc-comment context.
///
/// Every position is computed from the text the record was located in. A
/// record is only valid against that exact text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDocRecord {
    /// Function or method name, empty when the grammar exposes none.
    pub name: String,
    /// Source text of the function node.
    pub code: String,
    pub function_span: Span,
    pub name_span: Option<Span>,
    /// Start of the line where the declaration begins, including any
    /// export wrapper or leading attributes. New comments go here.
    pub insertion_byte: usize,
    /// Column of the declaration's first line.
    pub indent_columns: usize,
    /// Whitespace reproduced in front of every inserted comment line.
    pub indent: String,
    /// Span of the contiguous comment block directly above the declaration.
    pub existing_comment_span: Option<Span>,
    pub existing_comment: Option<String>,
    /// Replacement comment, set by the caller before rewriting.
    #[serde(default)]
    pub updated_comment: Option<String>,
}

impl FunctionDocRecord {
    /// Byte range the rewriter replaces: the full lines of the existing
    /// comment, or an empty range at `insertion_byte`. `None` when the
    /// comment span's column runs past its byte offset.
    pub fn edit_range(&self) -> Option<Range<usize>> {
        match &self.existing_comment_span {
            Some(span) => Some(span.line_start_byte()?..self.insertion_byte),
            None => Some(self.insertion_byte..self.insertion_byte),
        }
    }

    pub fn has_existing_comment(&self) -> bool {
        self.existing_comment_span.is_some()
    }
}

/// Locates functions using grammars from a registry.
pub struct Locator<'r> {
    registry: &'r GrammarRegistry,
}

impl<'r> Locator<'r> {
    pub fn new(registry: &'r GrammarRegistry) -> Self {
        Self { registry }
    }

    /// Locate functions in `text`, picking the grammar from a language name
    /// and/or file extension.
    pub fn locate(
        &self,
        text: &str,
        extension: &str,
        language: &str,
    ) -> Result<Vec<FunctionDocRecord>> {
        let grammar = self.registry.resolve(language, extension)?;
        locate_in(grammar, text)
    }

    /// Locate functions in a file on disk.
    pub fn locate_file(&self, path: &Path) -> Result<Vec<FunctionDocRecord>> {
        let grammar = self.registry.for_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|e| crate::Error::io(path, e))?;
        let parsed = ParsedSource::parse(grammar, path, text)?;
        Ok(locate_parsed(grammar, &parsed))
    }
}

/// Locate functions in `text` with a one-off registry.
pub fn locate(text: &str, extension: &str, language: &str) -> Result<Vec<FunctionDocRecord>> {
    let registry = GrammarRegistry::new();
    Locator::new(&registry).locate(text, extension, language)
}

/// Locate functions in `text` with a specific grammar.
pub fn locate_in(grammar: &Grammar, text: &str) -> Result<Vec<FunctionDocRecord>> {
    let parsed = ParsedSource::parse(grammar, "<input>", text.to_string())?;
    Ok(locate_parsed(grammar, &parsed))
}

/// Locate functions in an already-parsed source, in ascending position order.
pub fn locate_parsed(grammar: &Grammar, parsed: &ParsedSource) -> Vec<FunctionDocRecord> {
    let mut comments = Vec::new();
    let mut functions = Vec::new();

    visit_nodes(parsed.root(), |node| {
        if grammar.is_comment(node.kind()) {
            comments.push(node);
            return false;
        }
        if grammar.is_function(node.kind()) {
            functions.push(node);
        }
        true
    });

    comments.sort_by_key(|c| c.start_byte());
    functions.sort_by_key(|f| f.start_byte());

    functions
        .into_iter()
        .map(|function| build_record(grammar, parsed, function, &comments))
        .collect()
}

fn build_record(
    grammar: &Grammar,
    parsed: &ParsedSource,
    function: Node,
    comments: &[Node],
) -> FunctionDocRecord {
    let text = parsed.text.as_str();
    let anchor = anchor_node(grammar, text, function);
    let anchor_start = anchor.start_byte();
    let anchor_pos = anchor.start_position();

    let insertion_byte = line_start(text, anchor_start);
    let prefix = &text[insertion_byte..anchor_start];
    let indent = if is_blank(prefix) {
        prefix.to_string()
    } else {
        " ".repeat(anchor_pos.column)
    };

    let existing = preceding_comment(text, comments, anchor_start, anchor_pos);
    let existing_comment_span = existing.map(|range| {
        let first = comments[range.start];
        let last = comments[range.end - 1];
        Span {
            start_byte: first.start_byte(),
            end_byte: last.end_byte(),
            start_line: first.start_position().row + 1,
            start_col: first.start_position().column + 1,
            end_line: last.end_position().row + 1,
            end_col: last.end_position().column + 1,
        }
    });
    let existing_comment = existing_comment_span
        .as_ref()
        .map(|span| text[span.start_byte..span.end_byte].to_string());

    let name_node = function_name(function);

    FunctionDocRecord {
        name: name_node
            .map(|n| parsed.node_text(n).to_string())
            .unwrap_or_default(),
        code: parsed.node_text(function).to_string(),
        function_span: Span::from_node(function),
        name_span: name_node.map(Span::from_node),
        insertion_byte,
        indent_columns: anchor_pos.column,
        indent,
        existing_comment_span,
        existing_comment,
        updated_comment: None,
    }
}

/// The node whose first line is where a doc comment belongs.
///
/// Wrappers (templates) are climbed first. If the line then starts with one
/// of the grammar's enclosing nodes (`export function`, `private def`), that
/// node becomes the anchor. Leading siblings such as attributes directly
/// above extend it.
fn anchor_node<'a>(grammar: &Grammar, text: &str, function: Node<'a>) -> Node<'a> {
    let mut anchor = function;
    while let Some(parent) = anchor.parent() {
        if !grammar.wrapper_kinds.contains(&parent.kind()) {
            break;
        }
        anchor = parent;
    }

    let line_head = first_non_whitespace(text, anchor.start_byte());
    let mut current = anchor;
    while current.start_byte() != line_head {
        let Some(parent) = current.parent() else {
            break;
        };
        let enclosing = grammar.enclosing_kinds.contains(&parent.kind());
        if !enclosing || parent.start_byte() < line_head {
            break;
        }
        current = parent;
    }
    if current.start_byte() == line_head {
        anchor = current;
    }

    while let Some(prev) = anchor.prev_named_sibling() {
        let adjacent = prev.end_position().row + 1 >= anchor.start_position().row;
        if !grammar.leading_kinds.contains(&prev.kind()) || !adjacent {
            break;
        }
        anchor = prev;
    }

    anchor
}

/// Indices into `comments` of the chain of comments directly above the
/// anchor: each on the line right above the next, at the anchor's column,
/// with nothing but whitespace before it on its line.
fn preceding_comment(
    text: &str,
    comments: &[Node],
    anchor_start: usize,
    anchor_pos: Point,
) -> Option<Range<usize>> {
    let end = comments.partition_point(|c| c.end_byte() <= anchor_start);
    let mut start = end;
    let mut next_row = anchor_pos.row;
    let mut next_byte = anchor_start;

    while start > 0 {
        let comment = comments[start - 1];
        if !is_blank(&text[comment.end_byte()..next_byte]) {
            break;
        }
        if last_row(text, comment) + 1 != next_row {
            break;
        }
        if comment.start_position().column != anchor_pos.column {
            break;
        }
        if !is_blank(&text[line_start(text, comment.start_byte())..comment.start_byte()]) {
            break;
        }
        next_row = comment.start_position().row;
        next_byte = comment.start_byte();
        start -= 1;
    }

    (start < end).then_some(start..end)
}

/// Last row holding comment text. Some grammars include the trailing newline
/// in line comments, which puts the end position on the following row.
fn last_row(text: &str, comment: Node) -> usize {
    let end = comment.end_position();
    if end.column == 0 && end.row > 0 && text[..comment.end_byte()].ends_with('\n') {
        end.row - 1
    } else {
        end.row
    }
}

fn function_name(function: Node) -> Option<Node> {
    if let Some(name) = function.child_by_field_name("name") {
        return Some(name);
    }
    // C-family definitions nest the name inside declarators.
    let mut current = function.child_by_field_name("declarator")?;
    loop {
        if current.kind().contains("identifier") {
            return Some(current);
        }
        current = current.child_by_field_name("declarator")?;
    }
}

fn is_blank(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::LanguageId;

    fn ts_records(source: &str) -> Vec<FunctionDocRecord> {
        let registry = GrammarRegistry::new();
        Locator::new(&registry)
            .locate(source, "ts", "typescript")
            .unwrap()
    }

    #[test]
    fn test_header_comment_not_joined() {
        let source = r#"import { appConfig } from './src/config.js';
import * as T from '../file.js';

/*
Just a header comment
*/

/**
 * Doc comment
 */
function foo() {
  console.log('foo');
}
"#;
        let records = ts_records(source);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].existing_comment.as_deref(),
            Some("/**\n * Doc comment\n */")
        );
    }

    #[test]
    fn test_trailing_comment_not_paired() {
        let source = r#"import * as T from '../file.js'; // eslint-disable-line no-unused-vars

// unusual single line doc comment
// @returns by parse code
function foo() {
  console.log('foo');
}
"#;
        let records = ts_records(source);
        assert_eq!(records.len(), 1);
        let comment = records[0].existing_comment.as_deref().unwrap();
        assert!(comment.starts_with("// unusual"));
        assert!(!comment.contains("eslint"));
    }

    #[test]
    fn test_blank_line_breaks_pairing() {
        let source = "/** Stray */\n\nfunction foo() {}\n";
        let records = ts_records(source);
        assert_eq!(records.len(), 1);
        assert!(!records[0].has_existing_comment());
        assert_eq!(records[0].edit_range(), Some(14..14));
    }

    #[test]
    fn test_export_anchors_at_line_start() {
        let source = "const a = 1;\n\nexport function baz(): string {\n  return 'baz';\n}\n";
        let records = ts_records(source);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "baz");
        assert_eq!(records[0].insertion_byte, source.find("export").unwrap());
        assert_eq!(records[0].indent_columns, 0);
        assert!(records[0].function_span.start_byte > records[0].insertion_byte);
    }

    #[test]
    fn test_one_line_class_keeps_its_comment() {
        let source = "/** Doc for A */\nclass A { m() {} }\n";
        let records = locate(source, "js", "javascript").unwrap();
        assert_eq!(records.len(), 1);
        let m = &records[0];
        assert_eq!(m.name, "m");
        assert_eq!(m.indent_columns, 10);
        assert_eq!(m.indent, " ".repeat(m.indent_columns));
        assert_eq!(m.existing_comment, None);
        assert_eq!(m.insertion_byte, source.find("class").unwrap());
    }

    #[test]
    fn test_one_liner_at_file_top_not_anchored_to_program() {
        let source = "const o = { f() { return 1; } };\n";
        let records = locate(source, "js", "javascript").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].indent_columns, source.find("f()").unwrap());
    }

    #[test]
    fn test_method_indent_and_name() {
        let source = "class MyClass {\n  bar(): string {\n    return 'bar';\n  }\n}\n";
        let records = ts_records(source);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "bar");
        assert_eq!(record.indent_columns, 2);
        assert_eq!(record.indent, "  ");
        assert_eq!(record.function_span.start_col, 3);
        assert_eq!(record.name_span.as_ref().unwrap().start_line, 2);
    }

    #[test]
    fn test_tab_indent_preserved() {
        let source = "class A {\n\tbar() {}\n}\n";
        let records = locate(source, "js", "").unwrap();
        assert_eq!(records[0].indent, "\t");
        assert_eq!(records[0].indent_columns, 1);
    }

    #[test]
    fn test_records_in_ascending_order() {
        let source = "function b() {}\nfunction a() {\n  function inner() {}\n}\n";
        let records = locate(source, "js", "javascript").unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "inner"]);
        assert!(records
            .windows(2)
            .all(|w| w[0].function_span.start_byte < w[1].function_span.start_byte));
    }

    #[test]
    fn test_unknown_language_is_error() {
        assert!(locate("x", "cbl", "cobol").is_err());
    }

    #[test]
    fn test_tsx_selected_by_extension() {
        let registry = GrammarRegistry::new();
        let grammar = registry.resolve("typescript", "tsx").unwrap();
        assert_eq!(grammar.id, LanguageId::Tsx);
        let source = "function App() {\n  return <div>hi</div>;\n}\n";
        let records = locate_in(grammar, source).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "App");
    }

    #[test]
    fn test_record_json_round_trip_keeps_updated_comment() {
        let mut records = ts_records("function foo() {}\n");
        records[0].updated_comment = Some("/** Foo. */".to_string());
        let json = serde_json::to_string(&records).unwrap();
        let back: Vec<FunctionDocRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, records);
    }
}
