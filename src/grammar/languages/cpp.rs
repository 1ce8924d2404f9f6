//! C++ grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

/// Free functions and inline member function definitions.
const FUNCTION_KINDS: &[&str] = &["function_definition"];

const COMMENT_KINDS: &[&str] = &["comment"];

/// `template <...>` starts on the line above the definition it wraps.
const WRAPPER_KINDS: &[&str] = &["template_declaration"];

/// Create the C++ grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::Cpp,
        language: tree_sitter_cpp::LANGUAGE.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: WRAPPER_KINDS,
        leading_kinds: &[],
        enclosing_kinds: &[],
        comment_style: CommentStyle::Block,
    }
}
