//! PHP grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

const FUNCTION_KINDS: &[&str] = &["function_definition", "method_declaration"];

const COMMENT_KINDS: &[&str] = &["comment"];

/// PHP 8 `#[Attribute]` groups sit above methods as their own nodes.
const LEADING_KINDS: &[&str] = &["attribute_list"];

/// Create the PHP grammar (files starting with `<?php`).
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::Php,
        language: tree_sitter_php::LANGUAGE_PHP.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: LEADING_KINDS,
        enclosing_kinds: &[],
        comment_style: CommentStyle::Block,
    }
}
