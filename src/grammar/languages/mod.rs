//! Language-specific grammar configurations.
//!
//! Each language module provides:
//! - The node kinds of documentable functions and of comments
//! - Wrapper and leading kinds that move where a doc comment belongs
//! - The language's doc-comment idiom
//! - A `grammar()` constructor

pub mod c;
pub mod cpp;
pub mod csharp;
pub mod go;
pub mod java;
pub mod javascript;
pub mod php;
pub mod ruby;
pub mod rust_lang;
pub mod scala;
pub mod swift;
pub mod typescript;

use super::Grammar;

/// Every available grammar.
pub fn all() -> Vec<Grammar> {
    vec![
        c::grammar(),
        cpp::grammar(),
        csharp::grammar(),
        go::grammar(),
        java::grammar(),
        javascript::grammar(),
        php::grammar(),
        ruby::grammar(),
        rust_lang::grammar(),
        scala::grammar(),
        swift::grammar(),
        typescript::grammar(),
        typescript::tsx_grammar(),
    ]
}
