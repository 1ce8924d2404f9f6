//! Go grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

const FUNCTION_KINDS: &[&str] = &["function_declaration", "method_declaration"];

const COMMENT_KINDS: &[&str] = &["comment"];

/// Create the Go grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::Go,
        language: tree_sitter_go::LANGUAGE.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: &[],
        enclosing_kinds: &[],
        comment_style: CommentStyle::Line("//"),
    }
}
