//! Per-file declaration and import tables for JavaScript/TypeScript modules.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::debug;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor};

use crate::error::{Error, Result};
use crate::grammar::{Grammar, GrammarRegistry};
use crate::source::{visit_nodes, ParsedSource, Span};

/// Extensions a relative import may point at to count as a local module.
pub const LOCAL_EXTENSIONS: &[&str] = &["js", "ts"];

/// Node kinds that name something a declaration could define.
const REFERENCE_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "shorthand_property_identifier",
];

/// Tree-sitter query for `x = require('...')` style declarators.
///
/// Captures:
/// - `binding`: the declared name or destructuring pattern
/// - `source`: the module path string
const REQUIRE_QUERY: &str = r#"
(variable_declarator
  name: (_) @binding
  value: (call_expression
    function: (identifier) @fn
    arguments: (arguments . (string) @source))
  (#eq? @fn "require"))
"#;

/// Which export of a module a local name is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRef {
    Default,
    Named(String),
}

/// A local name bound to an export of another local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleBinding {
    pub path: PathBuf,
    pub export: ExportRef,
}

/// An identifier token inside a declaration, offsets relative to its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierToken {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// A top-level declaration and what it refers to.
#[derive(Debug, Clone)]
pub struct DeclarationSite {
    /// Names this declaration introduces.
    pub names: Vec<String>,
    pub span: Span,
    /// Declaration source text, without any `export` keyword.
    pub text: String,
    /// Identifier tokens in the text, in document order.
    pub tokens: Vec<IdentifierToken>,
    /// True for `const x = require(...)`; these resolve through the
    /// requires table instead of being inlined.
    pub module_binding: bool,
}

impl DeclarationSite {
    /// Names referenced by this declaration, excluding its own, in first-use order.
    pub fn references(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tokens
            .iter()
            .map(|t| t.name.as_str())
            .filter(|name| !self.names.iter().any(|own| own == name))
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Declaration text with every identifier token `from` replaced by `to`.
    pub fn renamed(&self, from: &str, to: &str) -> String {
        let mut text = self.text.clone();
        for token in self.tokens.iter().rev().filter(|t| t.name == from) {
            text.replace_range(token.start..token.end, to);
        }
        text
    }
}

/// Declaration map, import map, and requires map for one file.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    pub path: PathBuf,
    /// Top-level name -> index into `sites`.
    pub declarations: HashMap<String, usize>,
    pub sites: Vec<DeclarationSite>,
    /// Names bound by `import` statements to local files.
    pub imports: HashMap<String, ModuleBinding>,
    /// Names bound by `require(...)` calls to local files.
    pub requires: HashMap<String, ModuleBinding>,
    /// Identifier named by `export default x` or `module.exports = x`.
    pub default_export: Option<String>,
}

impl ModuleIndex {
    /// Build the tables for a parsed file.
    pub fn build(grammar: &Grammar, parsed: &ParsedSource) -> Result<Self> {
        let dir = parsed.path.parent().unwrap_or(Path::new("")).to_path_buf();
        let mut index = ModuleIndex {
            path: parsed.path.clone(),
            ..Default::default()
        };

        let root = parsed.root();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "import_statement" => index.add_import(parsed, node, &dir),
                "export_statement" => index.add_export(parsed, node),
                "expression_statement" => index.add_module_exports(parsed, node),
                _ => {}
            }
            if let Some(declaration) = find_declaration(node) {
                index.add_declaration(parsed, declaration);
            }
        }

        index.add_requires(grammar, parsed, &dir)?;
        Ok(index)
    }

    /// Read, parse, and index a local module file.
    ///
    /// A file with syntax errors is a parse failure.
    pub fn load(registry: &GrammarRegistry, path: &Path) -> Result<Self> {
        let (path, text) = read_module_source(path)?;
        let grammar = registry.for_path(&path)?;
        let parsed = ParsedSource::parse(grammar, &path, text)?;
        if parsed.has_syntax_errors() {
            return Err(Error::Syntax {
                path: path.display().to_string(),
            });
        }
        Self::build(grammar, &parsed)
    }

    /// The non-binding declaration that defines `name`, if any.
    pub fn declaration(&self, name: &str) -> Option<&DeclarationSite> {
        self.declarations
            .get(name)
            .map(|&i| &self.sites[i])
            .filter(|site| !site.module_binding)
    }

    fn add_declaration(&mut self, parsed: &ParsedSource, node: Node) {
        let names = declared_names(parsed, node);
        if names.is_empty() {
            return;
        }
        let module_binding = is_require_declaration(parsed, node);
        let site = DeclarationSite {
            names: names.clone(),
            span: Span::from_node(node),
            text: parsed.node_text(node).to_string(),
            tokens: identifier_tokens(parsed, node),
            module_binding,
        };
        let idx = self.sites.len();
        self.sites.push(site);
        for name in names {
            self.declarations.entry(name).or_insert(idx);
        }
    }

    fn add_import(&mut self, parsed: &ParsedSource, node: Node, dir: &Path) {
        let Some(source) = node.child_by_field_name("source") else {
            return;
        };
        let Some(path) = resolve_local_path(dir, parsed.node_text(source)) else {
            return;
        };

        let mut cursor = node.walk();
        for clause in node.named_children(&mut cursor) {
            if clause.kind() != "import_clause" {
                continue;
            }
            let mut clause_cursor = clause.walk();
            for part in clause.named_children(&mut clause_cursor) {
                match part.kind() {
                    "identifier" => {
                        self.imports.insert(
                            parsed.node_text(part).to_string(),
                            ModuleBinding {
                                path: path.clone(),
                                export: ExportRef::Default,
                            },
                        );
                    }
                    "named_imports" => {
                        let mut spec_cursor = part.walk();
                        for spec in part.named_children(&mut spec_cursor) {
                            let Some(name) = spec.child_by_field_name("name") else {
                                continue;
                            };
                            let local = spec.child_by_field_name("alias").unwrap_or(name);
                            self.imports.insert(
                                parsed.node_text(local).to_string(),
                                ModuleBinding {
                                    path: path.clone(),
                                    export: ExportRef::Named(parsed.node_text(name).to_string()),
                                },
                            );
                        }
                    }
                    // namespace imports bind the whole module; nothing to inline
                    _ => {}
                }
            }
        }
    }

    fn add_export(&mut self, parsed: &ParsedSource, node: Node) {
        if !has_default_keyword(node) {
            return;
        }
        let Some(target) = node
            .child_by_field_name("declaration")
            .or_else(|| node.child_by_field_name("value"))
        else {
            return;
        };
        let name = if target.kind() == "identifier" {
            Some(target)
        } else {
            target.child_by_field_name("name")
        };
        if let Some(name) = name {
            self.default_export = Some(parsed.node_text(name).to_string());
        }
    }

    fn add_module_exports(&mut self, parsed: &ParsedSource, node: Node) {
        let Some(assignment) = node.named_child(0) else {
            return;
        };
        if assignment.kind() != "assignment_expression" {
            return;
        }
        let (Some(left), Some(right)) = (
            assignment.child_by_field_name("left"),
            assignment.child_by_field_name("right"),
        ) else {
            return;
        };
        if parsed.node_text(left) == "module.exports" && right.kind() == "identifier" {
            self.default_export = Some(parsed.node_text(right).to_string());
        }
    }

    fn add_requires(&mut self, grammar: &Grammar, parsed: &ParsedSource, dir: &Path) -> Result<()> {
        let query = Query::new(&grammar.language, REQUIRE_QUERY)?;
        let mut cursor = QueryCursor::new();
        let source = parsed.text.as_bytes();
        let mut matches = cursor.matches(&query, parsed.root(), source);

        while let Some(m) = matches.next() {
            let mut binding = None;
            let mut module = None;
            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "binding" => binding = Some(capture.node),
                    "source" => module = Some(capture.node),
                    _ => {}
                }
            }
            let (Some(binding), Some(module)) = (binding, module) else {
                continue;
            };
            let Some(path) = resolve_local_path(dir, parsed.node_text(module)) else {
                continue;
            };

            match binding.kind() {
                "identifier" => {
                    self.requires.insert(
                        parsed.node_text(binding).to_string(),
                        ModuleBinding {
                            path,
                            export: ExportRef::Default,
                        },
                    );
                }
                "object_pattern" => {
                    let mut pattern_cursor = binding.walk();
                    for prop in binding.named_children(&mut pattern_cursor) {
                        let (export, local) = match prop.kind() {
                            "shorthand_property_identifier_pattern" => {
                                let name = parsed.node_text(prop).to_string();
                                (name.clone(), name)
                            }
                            "pair_pattern" => {
                                let (Some(key), Some(value)) = (
                                    prop.child_by_field_name("key"),
                                    prop.child_by_field_name("value"),
                                ) else {
                                    continue;
                                };
                                if value.kind() != "identifier" {
                                    continue;
                                }
                                (
                                    parsed.node_text(key).to_string(),
                                    parsed.node_text(value).to_string(),
                                )
                            }
                            _ => continue,
                        };
                        self.requires.insert(
                            local,
                            ModuleBinding {
                                path: path.clone(),
                                export: ExportRef::Named(export),
                            },
                        );
                    }
                }
                other => debug!("ignoring require binding of kind {other}"),
            }
        }
        Ok(())
    }
}

/// The declaration behind a top-level statement, unwrapping `export`.
fn find_declaration(node: Node) -> Option<Node> {
    if node.kind().contains("declaration") {
        return Some(node);
    }
    if node.kind() == "export_statement" {
        let mut cursor = node.walk();
        return node
            .named_children(&mut cursor)
            .find(|child| child.kind().contains("declaration"));
    }
    None
}

fn declared_names(parsed: &ParsedSource, declaration: Node) -> Vec<String> {
    if let Some(name) = declaration.child_by_field_name("name") {
        return vec![parsed.node_text(name).to_string()];
    }
    // lexical_declaration / variable_declaration hold one or more declarators
    let mut names = Vec::new();
    let mut cursor = declaration.walk();
    for declarator in declaration.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        if let Some(name) = declarator.child_by_field_name("name") {
            visit_nodes(name, |n| {
                if matches!(n.kind(), "identifier" | "shorthand_property_identifier_pattern") {
                    names.push(parsed.node_text(n).to_string());
                }
                true
            });
        }
    }
    names
}

fn is_require_declaration(parsed: &ParsedSource, declaration: Node) -> bool {
    let mut cursor = declaration.walk();
    let found = declaration
        .named_children(&mut cursor)
        .filter(|d| d.kind() == "variable_declarator")
        .filter_map(|d| d.child_by_field_name("value"))
        .any(|value| {
            value.kind() == "call_expression"
                && value
                    .child_by_field_name("function")
                    .is_some_and(|f| parsed.node_text(f) == "require")
        });
    found
}

fn has_default_keyword(export: Node) -> bool {
    let mut cursor = export.walk();
    let found = export.children(&mut cursor).any(|c| c.kind() == "default");
    found
}

/// Identifier tokens under `node`, offsets relative to the node's start.
pub fn identifier_tokens(parsed: &ParsedSource, node: Node) -> Vec<IdentifierToken> {
    let base = node.start_byte();
    let mut tokens = Vec::new();
    visit_nodes(node, |n| {
        if REFERENCE_KINDS.contains(&n.kind()) {
            tokens.push(IdentifierToken {
                name: parsed.node_text(n).to_string(),
                start: n.start_byte() - base,
                end: n.end_byte() - base,
            });
        }
        true
    });
    tokens
}

/// Unique referenced names under `node`, in first-appearance order.
pub fn referenced_names(parsed: &ParsedSource, node: Node) -> Vec<String> {
    let mut seen = HashSet::new();
    identifier_tokens(parsed, node)
        .into_iter()
        .map(|t| t.name)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Resolve an import/require specifier to a local file path.
///
/// Only relative specifiers (starting with `.`) with a local extension
/// resolve; anything else is treated as an external package.
pub fn resolve_local_path(dir: &Path, specifier: &str) -> Option<PathBuf> {
    let spec = specifier.trim_matches(|c| c == '\'' || c == '"' || c == '`');
    if !spec.starts_with('.') {
        return None;
    }
    let ext = Path::new(spec).extension()?.to_str()?;
    if !LOCAL_EXTENSIONS.contains(&ext) {
        return None;
    }

    let mut path = dir.to_path_buf();
    for component in Path::new(spec).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                path.pop();
            }
            Component::Normal(part) => path.push(part),
            _ => return None,
        }
    }
    Some(path)
}

/// Read a local module, falling back from `.js` to `.ts` for TypeScript
/// projects that import compiled names. Returns the path actually read.
pub fn read_module_source(path: &Path) -> Result<(PathBuf, String)> {
    let candidate = if !path.exists() && path.extension().is_some_and(|e| e == "js") {
        let ts = path.with_extension("ts");
        if ts.exists() {
            ts
        } else {
            path.to_path_buf()
        }
    } else {
        path.to_path_buf()
    };
    let text = fs::read_to_string(&candidate).map_err(|e| Error::io(&candidate, e))?;
    Ok((candidate, text))
}
