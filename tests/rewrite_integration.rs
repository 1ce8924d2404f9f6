//! Locate-then-rewrite round trips against the fixtures in testdata/comments.

use std::fs;
use std::path::PathBuf;

use docsmith::docs::{locate, rewrite, FunctionDocRecord, Locator};
use docsmith::{Error, GrammarRegistry};

const BLOCK_DOC: &str = "/**\n * Great new docs\n * @param Eave wrote\n * @return very well\n */";

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("comments")
}

fn line_doc(prefix: &str) -> String {
    format!("{prefix} Great new docs\n{prefix} @param Eave wrote\n{prefix} @return very well")
}

/// Locate the fixture, document every function, and compare with the
/// `.expected` file next to it.
fn check_fixture(file: &str, language: &str, doc: &str, expected_count: usize) {
    let path = testdata_path().join(file);
    let content = fs::read_to_string(&path).expect("should read fixture");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap();

    let mut records = locate(&content, ext, language).expect("should locate functions");
    assert_eq!(records.len(), expected_count, "function count for {file}");

    for record in &mut records {
        record.updated_comment = Some(doc.to_string());
    }
    let updated = rewrite(&content, &records).expect("should rewrite");

    let expected = fs::read_to_string(testdata_path().join(format!("{file}.expected")))
        .expect("should read expected output");
    assert_eq!(updated, expected, "rewritten {file}");
}

#[test]
fn test_typescript_round_trip() {
    check_fixture("file.ts", "typescript", BLOCK_DOC, 4);
}

#[test]
fn test_javascript_round_trip() {
    // module.exports = function baz() is an expression, not a declaration.
    check_fixture("file.js", "javascript", BLOCK_DOC, 3);
}

#[test]
fn test_rust_round_trip() {
    check_fixture("file.rs", "rust", &line_doc("///"), 4);
}

#[test]
fn test_go_round_trip() {
    check_fixture("file.go", "go", &line_doc("//"), 4);
}

#[test]
fn test_ruby_round_trip() {
    check_fixture("file.rb", "ruby", &line_doc("#"), 4);
}

#[test]
fn test_replaced_comment_does_not_survive() {
    let path = testdata_path().join("file.ts");
    let content = fs::read_to_string(&path).unwrap();
    let registry = GrammarRegistry::new();
    let mut records = Locator::new(&registry).locate_file(&path).unwrap();

    let documented = records.iter_mut().find(|r| r.has_existing_comment()).unwrap();
    assert_eq!(documented.name, "fizzbuzz");
    documented.updated_comment = Some("/** Returns fizzbuzz. */".to_string());

    let updated = rewrite(&content, &records).unwrap();
    assert!(!updated.contains("Doc comment"));
    assert!(!updated.contains("@returns by parse code"));
    assert_eq!(updated.matches("/** Returns fizzbuzz. */").count(), 1);
    assert!(updated.contains("/** Returns fizzbuzz. */\nasync function fizzbuzz()"));
}

#[test]
fn test_batch_equals_one_at_a_time_from_the_end() {
    let content = fs::read_to_string(testdata_path().join("file.go")).unwrap();
    let mut records = locate(&content, "go", "go").unwrap();
    for (i, record) in records.iter_mut().enumerate() {
        record.updated_comment = Some(format!("// doc {i}"));
    }

    let batched = rewrite(&content, &records).unwrap();

    let mut sequential = content.clone();
    for record in records.iter().rev() {
        sequential = rewrite(&sequential, std::slice::from_ref(record)).unwrap();
    }
    assert_eq!(batched, sequential);
}

#[test]
fn test_records_survive_json_round_trip() {
    let content = fs::read_to_string(testdata_path().join("file.rb")).unwrap();
    let records = locate(&content, "rb", "ruby").unwrap();

    let json = serde_json::to_string(&records).unwrap();
    let mut restored: Vec<FunctionDocRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, records);

    restored[0].updated_comment = Some("# Prints foo.".to_string());
    let updated = rewrite(&content, &restored).unwrap();
    assert!(updated.contains("# Prints foo.\ndef foo\n"));
}

#[test]
fn test_records_from_other_text_are_rejected() {
    let content = fs::read_to_string(testdata_path().join("file.ts")).unwrap();
    let mut records = locate(&content, "ts", "typescript").unwrap();
    records[0].updated_comment = Some("/** foo */".to_string());

    let edited = content.replace("console.log('foo');", "console.log('changed');");
    assert!(matches!(
        rewrite(&edited, &records),
        Err(Error::StaleRecord { .. })
    ));
}

#[test]
fn test_unrelated_comments_are_not_joined() {
    let content = "import { appConfig } from './src/config.js';\nimport * as T from '../file.js'; // eslint-disable-line no-unused-vars\n\n/*\nJust a header comment\n*/\n\n// unusual single line js doc comment\n// @param to be replaced\n// @returns by parse code\nfunction foo() {\n  console.log('foo');\n}\n";
    let mut records = locate(content, "ts", "typescript").unwrap();
    assert_eq!(records.len(), 1);
    records[0].updated_comment = Some(BLOCK_DOC.to_string());

    let updated = rewrite(content, &records).unwrap();
    assert_eq!(
        updated,
        "import { appConfig } from './src/config.js';\nimport * as T from '../file.js'; // eslint-disable-line no-unused-vars\n\n/*\nJust a header comment\n*/\n\n/**\n * Great new docs\n * @param Eave wrote\n * @return very well\n */\nfunction foo() {\n  console.log('foo');\n}\n"
    );
}
