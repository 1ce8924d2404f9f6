//! JavaScript grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

/// Declared functions, generators, and class/object methods.
///
/// Function expressions are left out on purpose: a function assigned inline
/// (`module.exports = function baz() {}`) or passed as a callback is not
/// documented.
pub(crate) const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "method_definition",
];

pub(crate) const COMMENT_KINDS: &[&str] = &["comment"];

/// Class member decorators are siblings of the method they decorate.
pub(crate) const LEADING_KINDS: &[&str] = &["decorator"];

/// `export function` and `export default function` start their line.
pub(crate) const ENCLOSING_KINDS: &[&str] = &["export_statement"];

/// Create the JavaScript grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::JavaScript,
        language: tree_sitter_javascript::LANGUAGE.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: LEADING_KINDS,
        enclosing_kinds: ENCLOSING_KINDS,
        comment_style: CommentStyle::Block,
    }
}
