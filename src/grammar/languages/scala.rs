//! Scala grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

const FUNCTION_KINDS: &[&str] = &["function_definition"];

const COMMENT_KINDS: &[&str] = &["comment", "block_comment"];

/// Create the Scala grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::Scala,
        language: tree_sitter_scala::LANGUAGE.into(),
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

    const SOURCE: &str = r#"import config.Config

object Main {
  def foo(): Unit = {
    println("foo")
  }

  class MyClass {
    def bar(): String = {
      "bar"
    }
  }

  private def baz(): String = "baz"

  /**
   * Doc comment
   * @param to be replaced
   * @returns by parse code
   */
  def fizzbuzz(): String = {
    "fizzbuzz"
  }
}
"#;

    #[test]
    fn test_scala_functions() {
        let records = locate_in(&grammar(), SOURCE).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "bar", "baz", "fizzbuzz"]);
        assert_eq!(records[1].indent_columns, 4);
        assert!(records[3].has_existing_comment());
    }
}
