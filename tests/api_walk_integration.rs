//! Directory walk and endpoint excerpt tests against testdata/apis.

use std::path::PathBuf;

use docsmith::config::WalkConfig;
use docsmith::endpoints::{find_apis, ApiFinder, ApiSummary, Framework};
use docsmith::GrammarRegistry;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("apis")
}

fn shop_api() -> ApiSummary {
    let apis = find_apis(&testdata_path()).expect("walk should succeed");
    assert_eq!(apis.len(), 1, "only the shop API is valid: {apis:#?}");
    apis.into_iter().next().unwrap()
}

#[test]
fn test_valid_api_found_despite_broken_siblings() {
    let api = shop_api();
    assert_eq!(api.name, "Shop API");
    assert_eq!(api.root_dir, testdata_path().join("shop-api"));
    assert_eq!(api.root_file, testdata_path().join("shop-api/src/app.js"));
    assert_eq!(api.endpoints.len(), 2);
}

#[test]
fn test_shared_validator_inlined_once_per_excerpt() {
    let api = shop_api();
    for excerpt in &api.endpoints {
        assert_eq!(excerpt.matches("function validateOrder(body)").count(), 1);
        assert_eq!(
            excerpt.matches("const REQUIRED_FIELDS = ['items', 'total'];").count(),
            1
        );
        assert!(!excerpt.contains("auditLog"));
        assert!(!excerpt.contains("unusedHelper"));
        assert!(!excerpt.contains("app.listen"));
    }
}

#[test]
fn test_excerpts_only_hold_their_own_dependencies() {
    let api = shop_api();
    let (post, put) = (&api.endpoints[0], &api.endpoints[1]);

    assert!(post.contains("app.post('/orders'"));
    assert!(post.contains("function withTax(total)"));
    assert!(post.contains("const TAX_RATE = 0.2;"));
    assert!(!post.contains("app.put("));

    assert!(put.contains("app.put('/orders/:id'"));
    assert!(!put.contains("withTax"));
    assert!(!put.contains("TAX_RATE"));
}

#[test]
fn test_external_identifiers_are_omitted() {
    let api = shop_api();
    let post = &api.endpoints[0];
    // uuid comes from a package: the call survives, no declaration is inlined
    assert!(post.contains("id: uuid()"));
    assert!(!post.contains("from 'uuid'"));
    assert!(!post.contains("function uuid"));
}

#[test]
fn test_excerpt_preamble() {
    let api = shop_api();
    assert!(api.endpoints[0].starts_with(
        "import express from 'express';\nconst app = express();\napp.use(express.json());\n\napp.post('/orders'"
    ));
}

#[test]
fn test_exclusions_are_configurable() {
    let registry = GrammarRegistry::new();
    let framework = Framework::default();
    let walk = WalkConfig {
        exclude: vec!["**/shop-api".to_string()],
        ..WalkConfig::default()
    };
    let finder = ApiFinder::new(&registry, &framework, &walk).unwrap();
    let names: Vec<_> = finder
        .find_apis(&testdata_path())
        .into_iter()
        .map(|a| a.name)
        .collect();
    // node_modules is no longer excluded, so the vendored app shows up instead.
    assert_eq!(names, vec!["Express API"]);
}
