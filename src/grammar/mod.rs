//! Grammar registry: maps a language to its tree-sitter grammar and to the
//! node kinds the locator cares about.
//!
//! The registry is built once with `GrammarRegistry::new()` and passed by
//! reference to whatever needs it. There is no process-wide registry.

pub mod languages;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use phf::phf_map;
use serde::{Deserialize, Serialize};
use tree_sitter::{Language, Parser};

use crate::error::{Error, Result};

/// Languages with a registered grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    C,
    Cpp,
    CSharp,
    Go,
    Java,
    JavaScript,
    Php,
    Ruby,
    Rust,
    Scala,
    Swift,
    TypeScript,
    Tsx,
}

impl LanguageId {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
            LanguageId::CSharp => "csharp",
            LanguageId::Go => "go",
            LanguageId::Java => "java",
            LanguageId::JavaScript => "javascript",
            LanguageId::Php => "php",
            LanguageId::Ruby => "ruby",
            LanguageId::Rust => "rust",
            LanguageId::Scala => "scala",
            LanguageId::Swift => "swift",
            LanguageId::TypeScript => "typescript",
            LanguageId::Tsx => "tsx",
        }
    }

    /// Look up a language by name or common alias (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        LANGUAGE_ALIASES.get(name.trim().to_lowercase().as_str()).copied()
    }

    /// Look up a language by file extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        EXTENSIONS.get(ext.as_str()).copied()
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static EXTENSIONS: phf::Map<&'static str, LanguageId> = phf_map! {
    "c" => LanguageId::C,
    "h" => LanguageId::C,
    "cpp" => LanguageId::Cpp,
    "cc" => LanguageId::Cpp,
    "cxx" => LanguageId::Cpp,
    "hpp" => LanguageId::Cpp,
    "hh" => LanguageId::Cpp,
    "cs" => LanguageId::CSharp,
    "go" => LanguageId::Go,
    "java" => LanguageId::Java,
    "js" => LanguageId::JavaScript,
    "jsx" => LanguageId::JavaScript,
    "mjs" => LanguageId::JavaScript,
    "cjs" => LanguageId::JavaScript,
    "php" => LanguageId::Php,
    "rb" => LanguageId::Ruby,
    "rs" => LanguageId::Rust,
    "scala" => LanguageId::Scala,
    "sc" => LanguageId::Scala,
    "swift" => LanguageId::Swift,
    "ts" => LanguageId::TypeScript,
    "mts" => LanguageId::TypeScript,
    "cts" => LanguageId::TypeScript,
    "tsx" => LanguageId::Tsx,
};

static LANGUAGE_ALIASES: phf::Map<&'static str, LanguageId> = phf_map! {
    "c" => LanguageId::C,
    "cpp" => LanguageId::Cpp,
    "c++" => LanguageId::Cpp,
    "csharp" => LanguageId::CSharp,
    "c#" => LanguageId::CSharp,
    "cs" => LanguageId::CSharp,
    "go" => LanguageId::Go,
    "golang" => LanguageId::Go,
    "java" => LanguageId::Java,
    "javascript" => LanguageId::JavaScript,
    "js" => LanguageId::JavaScript,
    "php" => LanguageId::Php,
    "ruby" => LanguageId::Ruby,
    "rb" => LanguageId::Ruby,
    "rust" => LanguageId::Rust,
    "rs" => LanguageId::Rust,
    "scala" => LanguageId::Scala,
    "swift" => LanguageId::Swift,
    "typescript" => LanguageId::TypeScript,
    "ts" => LanguageId::TypeScript,
    "tsx" => LanguageId::Tsx,
};

/// How a language writes documentation comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/** ... */`
    Block,
    /// Every line starts with the given prefix (`///`, `//`, `#`).
    Line(&'static str),
    /// `///` lines wrapping the text in `<summary>` tags.
    XmlLine,
}

impl CommentStyle {
    /// Format plain prose as a comment in this style, without indentation.
    pub fn render(&self, text: &str) -> String {
        let lines: Vec<&str> = text.trim().lines().map(str::trim_end).collect();
        let prefixed = |prefix: &str| -> Vec<String> {
            lines
                .iter()
                .map(|line| {
                    if line.is_empty() {
                        prefix.to_string()
                    } else {
                        format!("{prefix} {line}")
                    }
                })
                .collect()
        };

        match self {
            CommentStyle::Block => {
                let mut out = vec!["/**".to_string()];
                out.extend(prefixed(" *"));
                out.push(" */".to_string());
                out.join("\n")
            }
            CommentStyle::Line(prefix) => prefixed(prefix).join("\n"),
            CommentStyle::XmlLine => {
                let mut out = vec!["/// <summary>".to_string()];
                out.extend(prefixed("///"));
                out.push("/// </summary>".to_string());
                out.join("\n")
            }
        }
    }

    /// Whether `text` already reads as a comment in this style.
    pub fn is_comment(&self, text: &str) -> bool {
        let text = text.trim_start();
        match self {
            CommentStyle::Block => text.starts_with("/*") || text.starts_with("//"),
            CommentStyle::Line(prefix) => {
                !text.is_empty()
                    && text
                        .lines()
                        .filter(|line| !line.trim().is_empty())
                        .all(|line| line.trim_start().starts_with(prefix))
            }
            CommentStyle::XmlLine => text.starts_with("///"),
        }
    }
}

/// A tree-sitter grammar plus the node kinds used to find documentable functions.
pub struct Grammar {
    /// Which language this grammar parses.
    pub id: LanguageId,
    /// The tree-sitter language.
    pub language: Language,
    /// Node kinds that are documentable functions or methods.
    pub function_kinds: &'static [&'static str],
    /// Node kinds that are comments.
    pub comment_kinds: &'static [&'static str],
    /// Nodes that wrap a function and may start on an earlier line
    /// (e.g. a C++ `template_declaration`).
    pub wrapper_kinds: &'static [&'static str],
    /// Sibling nodes directly above a function that belong to it
    /// (attributes, decorators).
    pub leading_kinds: &'static [&'static str],
    /// Ancestors that may take over the anchor when a function does not
    /// start its line (`export function`, `private def`). Nothing else is
    /// climbed, so a one-line class never claims its method.
    pub enclosing_kinds: &'static [&'static str],
    /// The language's doc-comment idiom.
    pub comment_style: CommentStyle,
}

impl Grammar {
    /// Parse `text` into a syntax tree. `path` is only used in errors.
    pub fn parse_tree(&self, text: &str, path: &Path) -> Result<tree_sitter::Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|source| Error::Grammar {
                language: self.id.name(),
                source,
            })?;
        parser.parse(text, None).ok_or_else(|| Error::Parse {
            path: path.display().to_string(),
        })
    }

    pub fn is_function(&self, kind: &str) -> bool {
        self.function_kinds.contains(&kind)
    }

    pub fn is_comment(&self, kind: &str) -> bool {
        self.comment_kinds.contains(&kind)
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("id", &self.id)
            .field("function_kinds", &self.function_kinds)
            .field("comment_kinds", &self.comment_kinds)
            .field("comment_style", &self.comment_style)
            .finish()
    }
}

/// Every registered grammar, keyed by language.
pub struct GrammarRegistry {
    grammars: HashMap<LanguageId, Grammar>,
}

impl GrammarRegistry {
    /// Build the registry with every supported grammar.
    pub fn new() -> Self {
        let grammars = languages::all()
            .into_iter()
            .map(|grammar| (grammar.id, grammar))
            .collect();
        Self { grammars }
    }

    /// Get the grammar for a language.
    pub fn get(&self, id: LanguageId) -> Option<&Grammar> {
        self.grammars.get(&id)
    }

    /// Resolve a grammar from a language name and a file extension.
    ///
    /// The language name wins when given; the extension refines it
    /// (`typescript` with `.tsx` selects the TSX grammar) or stands alone
    /// when the name is empty.
    pub fn resolve(&self, language: &str, extension: &str) -> Result<&Grammar> {
        let by_ext = LanguageId::from_extension(extension);
        let id = if language.trim().is_empty() {
            by_ext.ok_or_else(|| Error::UnsupportedLanguage(extension.to_string()))?
        } else {
            match LanguageId::from_name(language) {
                Some(LanguageId::TypeScript) if by_ext == Some(LanguageId::Tsx) => LanguageId::Tsx,
                Some(id) => id,
                None => return Err(Error::UnsupportedLanguage(language.to_string())),
            }
        };
        self.get(id)
            .ok_or_else(|| Error::UnsupportedLanguage(id.name().to_string()))
    }

    /// Resolve a grammar from a file path's extension.
    pub fn for_path(&self, path: &Path) -> Result<&Grammar> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.resolve("", ext)
            .map_err(|_| Error::UnsupportedLanguage(path.display().to_string()))
    }

    /// Registered languages, in no particular order.
    pub fn languages(&self) -> impl Iterator<Item = LanguageId> + '_ {
        self.grammars.keys().copied()
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_languages() {
        let registry = GrammarRegistry::new();
        assert_eq!(registry.languages().count(), 13);
        for id in registry.languages() {
            let grammar = registry.get(id).unwrap();
            assert!(!grammar.function_kinds.is_empty(), "{id} has no function kinds");
            assert!(!grammar.comment_kinds.is_empty(), "{id} has no comment kinds");
        }
    }

    #[test]
    fn test_resolve_by_name_and_extension() {
        let registry = GrammarRegistry::new();
        assert_eq!(registry.resolve("typescript", "ts").unwrap().id, LanguageId::TypeScript);
        assert_eq!(registry.resolve("typescript", ".tsx").unwrap().id, LanguageId::Tsx);
        assert_eq!(registry.resolve("C++", "").unwrap().id, LanguageId::Cpp);
        assert_eq!(registry.resolve("c#", "cs").unwrap().id, LanguageId::CSharp);
        assert_eq!(registry.resolve("", ".rb").unwrap().id, LanguageId::Ruby);
        assert!(matches!(
            registry.resolve("cobol", "cbl"),
            Err(Error::UnsupportedLanguage(_))
        ));
        assert!(registry.resolve("", "").is_err());
    }

    #[test]
    fn test_for_path() {
        let registry = GrammarRegistry::new();
        assert_eq!(
            registry.for_path(Path::new("src/lib.rs")).unwrap().id,
            LanguageId::Rust
        );
        assert!(registry.for_path(Path::new("README")).is_err());
    }

    #[test]
    fn test_comment_style_render() {
        assert_eq!(
            CommentStyle::Block.render("Adds two numbers.\n\nReturns the sum."),
            "/**\n * Adds two numbers.\n *\n * Returns the sum.\n */"
        );
        assert_eq!(CommentStyle::Line("///").render("Adds."), "/// Adds.");
        assert_eq!(CommentStyle::Line("#").render("a\nb\n"), "# a\n# b");
        assert_eq!(
            CommentStyle::XmlLine.render("Adds."),
            "/// <summary>\n/// Adds.\n/// </summary>"
        );
    }

    #[test]
    fn test_comment_style_is_comment() {
        assert!(CommentStyle::Block.is_comment("\n/**\n * Adds.\n */"));
        assert!(!CommentStyle::Block.is_comment("Adds two numbers."));
        assert!(CommentStyle::Line("#").is_comment("# a\n\n# b"));
        assert!(!CommentStyle::Line("#").is_comment("# a\nb"));
        assert!(!CommentStyle::Line("///").is_comment(""));
        assert!(!CommentStyle::XmlLine.is_comment("<summary>Adds.</summary>"));
    }
}
