//! C# grammar configuration.

use crate::grammar::{CommentStyle, Grammar, LanguageId};

const FUNCTION_KINDS: &[&str] = &[
    "method_declaration",
    "constructor_declaration",
    "local_function_statement",
];

const COMMENT_KINDS: &[&str] = &["comment"];

/// Create the C# grammar.
///
/// `[Attribute]` lists are part of the declaration node, so there are no
/// leading kinds.
pub fn grammar() -> Grammar {
    Grammar {
        id: LanguageId::CSharp,
        language: tree_sitter_c_sharp::LANGUAGE.into(),
        function_kinds: FUNCTION_KINDS,
        comment_kinds: COMMENT_KINDS,
        wrapper_kinds: &[],
        leading_kinds: &[],
        enclosing_kinds: &[],
        comment_style: CommentStyle::XmlLine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::{locate_in, rewrite};

    const SOURCE: &str = r#"using System;

namespace MyNamespace
{
  class Main
  {
    static void foo()
    {
      Console.WriteLine("foo");
    }

    class MyClass
    {
      public string bar()
      {
        return "bar";
      }
    }

    public string baz()
    {
      return "baz";
    }

    /// <summary>
    /// Doc comment
    /// </summary>
    public async Task<string> fizzbuzz()
    {
      return "fizzbuzz";
    }
  }
}
"#;

    #[test]
    fn test_csharp_methods() {
        let records = locate_in(&grammar(), SOURCE).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "bar", "baz", "fizzbuzz"]);
        assert_eq!(records[1].indent, "      ");
        assert_eq!(
            records[3].existing_comment.as_deref(),
            Some("/// <summary>\n    /// Doc comment\n    /// </summary>")
        );
    }

    #[test]
    fn test_csharp_xml_doc_replaced() {
        let mut records = locate_in(&grammar(), SOURCE).unwrap();
        records[3].updated_comment = Some(grammar().comment_style.render("Fizzes and buzzes."));
        let out = rewrite(SOURCE, &records).unwrap();
        assert!(out.contains(
            "    /// <summary>\n    /// Fizzes and buzzes.\n    /// </summary>\n    public async Task<string> fizzbuzz()"
        ));
        assert!(!out.contains("Doc comment"));
    }
}
