//! Rust grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

/// Free functions, associated functions, and methods all parse as `function_item`.
const FUNCTION_KINDS: &[&str] = &["function_item"];

const COMMENT_KINDS: &[&str] = &["line_comment", "block_comment"];

/// `#[...]` attributes sit above the function as separate siblings.
const LEADING_KINDS: &[&str] = &["attribute_item"];

/// Create the Rust grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::Rust,
        language: tree_sitter_rust::LANGUAGE.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: LEADING_KINDS,
        enclosing_kinds: &[],
        comment_style: CommentStyle::Line("///"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::locate_in;

    const SOURCE: &str = r#"mod app_config;

fn foo() {
  println!("foo");
}

pub struct MyClass;

impl MyClass {
  pub fn bar(&self) -> &str {
    "bar"
  }
}

pub fn baz() -> &'static str {
  "baz"
}

/// Doc comment
/// @param to be replaced
/// @returns by parse code
async fn fizzbuzz() -> Result<&'static str, ()> {
  Ok("fizzbuzz")
}
"#;

    #[test]
    fn test_rust_functions() {
        let records = locate_in(&grammar(), SOURCE).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "bar", "baz", "fizzbuzz"]);

        assert_eq!(records[1].indent, "  ");
        let doc = records[3].existing_comment.as_deref().unwrap();
        assert!(doc.starts_with("/// Doc comment"));
        assert!(doc.contains("/// @returns by parse code"));
    }

    #[test]
    fn test_rust_attributes_belong_to_function() {
        let source = r#"#[cfg(test)]
mod tests {
    /// Checks things.
    #[test]
    fn checks() {}
}
"#;
        let records = locate_in(&grammar(), source).unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.insertion_byte, source.find("    #[test]").unwrap());
        assert_eq!(record.indent_columns, 4);
        assert!(record
            .existing_comment
            .as_deref()
            .unwrap()
            .contains("Checks things."));
    }

    #[test]
    fn test_rust_trailing_comment_not_paired() {
        let source = "const X: u8 = 1; // not a doc\nfn foo() {}\n";
        let records = locate_in(&grammar(), source).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].has_existing_comment());
    }
}
