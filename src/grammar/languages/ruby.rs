//! Ruby grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

/// Instance methods (`def x`) and singleton methods (`def self.x`).
const FUNCTION_KINDS: &[&str] = &["method", "singleton_method"];

const COMMENT_KINDS: &[&str] = &["comment"];

/// Visibility calls such as `private def x`.
const ENCLOSING_KINDS: &[&str] = &["call", "argument_list"];

/// Create the Ruby grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::Ruby,
        language: tree_sitter_ruby::LANGUAGE.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: &[],
        enclosing_kinds: ENCLOSING_KINDS,
        comment_style: CommentStyle::Line("#"),
    }
}
