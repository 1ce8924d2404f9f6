//! TypeScript and TSX grammar configuration.
//!
//! Both grammars share the JavaScript node kinds for functions and comments.

use super::javascript::{COMMENT_KINDS, ENCLOSING_KINDS, FUNCTION_KINDS, LEADING_KINDS};
use crate::grammar::{CommentStyle, Grammar, LanguageId};

/// Create the TypeScript grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::TypeScript,
        language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: LEADING_KINDS,
        enclosing_kinds: ENCLOSING_KINDS,
        comment_style: CommentStyle::Block,
    }
}

/// Create the TSX grammar.
pub fn tsx_grammar() -> Grammar {
    Grammar {
        id: LanguageId::Tsx,
        language: tree_sitter_typescript::LANGUAGE_TSX.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: LEADING_KINDS,
        enclosing_kinds: ENCLOSING_KINDS,
        comment_style: CommentStyle::Block,
    }
}
