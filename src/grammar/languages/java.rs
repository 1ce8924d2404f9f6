//! Java grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

const FUNCTION_KINDS: &[&str] = &["method_declaration", "constructor_declaration"];

const COMMENT_KINDS: &[&str] = &["line_comment", "block_comment"];

/// Create the Java grammar.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::Java,
        language: tree_sitter_java::LANGUAGE.into(),
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

    const SOURCE: &str = r#"import com.src.config;

public class Main {
  static void foo() {
    System.out.println("foo");
  }

  static class MyClass {
    public String bar() {
      return "bar";
    }
  }

  public String baz() {
    return "baz";
  }

  /**
   * Doc comment
   * @param to be replaced
   * @returns by parse code
   */
  public String fizzbuzz() {
    return "fizzbuzz";
  }
}
"#;

    #[test]
    fn test_java_methods() {
        let records = locate_in(&grammar(), SOURCE).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "bar", "baz", "fizzbuzz"]);

        let columns: Vec<_> = records.iter().map(|r| r.indent_columns).collect();
        assert_eq!(columns, vec![2, 4, 2, 2]);
        assert!(records[3]
            .existing_comment
            .as_deref()
            .unwrap()
            .starts_with("/**"));
    }

    #[test]
    fn test_java_constructor_and_annotation() {
        let source = r#"class Service {
  Service() {}

  @Override
  public String toString() {
    return "service";
  }
}
"#;
        let records = locate_in(&grammar(), source).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Service", "toString"]);
        assert_eq!(records[1].insertion_byte, source.find("  @Override").unwrap());
    }
}
