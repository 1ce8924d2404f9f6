//! Swift grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

/// Functions and methods, including those declared in extensions.
const FUNCTION_KINDS: &[&str] = &["function_declaration", "init_declaration"];

const COMMENT_KINDS: &[&str] = &["comment", "multiline_comment"];

/// Create the Swift grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::Swift,
        language: tree_sitter_swift::LANGUAGE.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: &[],
        enclosing_kinds: &[],
        comment_style: CommentStyle::Line("///"),
    }
}
