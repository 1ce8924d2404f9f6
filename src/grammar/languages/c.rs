//! C grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

const FUNCTION_KINDS: &[&str] = &["function_definition"];

const COMMENT_KINDS: &[&str] = &["comment"];

/// Create the C grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::C,
        language: tree_sitter_c::LANGUAGE.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: &[],
        enclosing_kinds: &[],
        comment_style: CommentStyle::Block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::locate_in;

    const SOURCE: &str = r#"#include "config.h"
#include <stdio.h>

void foo() {
  printf("foo");
}

typedef struct { int x; } MyClass;

char* bar(MyClass* cls) {
  return "bar";
}

static char* baz() {
  return "baz";
}

/**
 * Doc comment
 * @param to be replaced
 * @returns by parse code
 */
char* fizzbuzz() {
  return "fizzbuzz";
}
"#;

    #[test]
    fn test_c_functions() {
        let records = locate_in(&grammar(), SOURCE).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        // Names are found through pointer and function declarators.
        assert_eq!(names, vec!["foo", "bar", "baz", "fizzbuzz"]);
        assert!(records[3].has_existing_comment());
        assert!(records.iter().all(|r| r.indent.is_empty()));
    }

    #[test]
    fn test_c_prototypes_ignored() {
        let source = "int add(int a, int b);\n\nint add(int a, int b) {\n  return a + b;\n}\n";
        let records = locate_in(&grammar(), source).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].function_span.start_line, 3);
    }
}
