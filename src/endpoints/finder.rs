//! Classifies call expressions as app setup, middleware, or route registration.

use phf::phf_set;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::endpoints::module::referenced_names;
use crate::source::{descendants_of_kind, ParsedSource, Span};

/// HTTP verbs recognised as `<app>.<verb>(...)` route registrations.
static HTTP_VERBS: phf::Set<&'static str> = phf_set! {
    "checkout", "copy", "delete", "get", "head", "lock", "merge",
    "mkactivity", "mkcol", "move", "m-search", "notify", "options",
    "patch", "post", "purge", "put", "report", "search", "subscribe",
    "trace", "unlock", "unsubscribe", "all",
};

/// The routing framework being looked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Framework {
    /// Package name as it appears in manifest dependencies and imports.
    pub package: String,
    /// Callee that creates an app (`express` in `const app = express()`).
    pub factory: String,
    /// Callees that create a router.
    pub router_factories: Vec<String>,
}

impl Default for Framework {
    fn default() -> Self {
        Self {
            package: "express".to_string(),
            factory: "express".to_string(),
            router_factories: vec!["express.Router".to_string(), "Router".to_string()],
        }
    }
}

/// Names the file binds its app and router to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppIdentifiers {
    pub app: Option<String>,
    pub router: Option<String>,
}

impl AppIdentifiers {
    /// Find `x = <factory>()` and `y = <router factory>()` declarators.
    pub fn find(parsed: &ParsedSource, framework: &Framework) -> Self {
        let mut ids = AppIdentifiers::default();
        for (name, callee) in factory_calls(parsed) {
            if callee == framework.factory {
                ids.app.get_or_insert(name);
            } else if framework.router_factories.iter().any(|r| *r == callee) {
                ids.router.get_or_insert(name);
            }
        }
        ids
    }
}

/// A route-registration call and everything needed to reproduce its setup.
#[derive(Debug, Clone)]
pub struct RouteEndpoint {
    pub app: String,
    pub router: Option<String>,
    pub span: Span,
    /// Source text of the registration call.
    pub text: String,
    /// Middleware-setup calls seen before this one, in document order.
    pub middleware: Vec<String>,
    /// Names referenced by the call, excluding the app and router.
    pub references: Vec<String>,
}

/// Whether the file creates an app with the framework's factory.
pub fn is_root_file(parsed: &ParsedSource, framework: &Framework) -> bool {
    factory_calls(parsed)
        .into_iter()
        .any(|(_, callee)| callee == framework.factory)
}

/// Route registrations in document order, each carrying the middleware
/// registered before it.
pub fn find_endpoints(parsed: &ParsedSource, framework: &Framework) -> Vec<RouteEndpoint> {
    let ids = AppIdentifiers::find(parsed, framework);
    let Some(app) = ids.app.clone() else {
        return Vec::new();
    };
    let middleware_prefix = format!("{app}.use");
    let router_use = ids.router.as_ref().map(|r| format!("{r}.use"));

    let mut middleware = Vec::new();
    let mut endpoints = Vec::new();

    for call in descendants_of_kind(parsed.root(), &["call_expression"]) {
        let Some(callee) = call.child_by_field_name("function") else {
            continue;
        };
        let callee = parsed.node_text(callee);

        if callee.starts_with(&middleware_prefix) {
            middleware.push(parsed.node_text(call).to_string());
            continue;
        }

        let is_route = router_use.as_deref() == Some(callee) || is_verb_call(callee, &app);
        if !is_route {
            continue;
        }

        endpoints.push(RouteEndpoint {
            app: app.clone(),
            router: ids.router.clone(),
            span: Span::from_node(call),
            text: parsed.node_text(call).to_string(),
            middleware: middleware.clone(),
            references: call_references(parsed, call, &ids),
        });
    }

    endpoints
}

fn is_verb_call(callee: &str, app: &str) -> bool {
    callee
        .strip_prefix(app)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|verb| HTTP_VERBS.contains(verb))
}

fn call_references(parsed: &ParsedSource, call: Node, ids: &AppIdentifiers) -> Vec<String> {
    referenced_names(parsed, call)
        .into_iter()
        .filter(|name| Some(name) != ids.app.as_ref() && Some(name) != ids.router.as_ref())
        .collect()
}

/// `(declared name, callee text)` for every declarator initialised by a call.
fn factory_calls(parsed: &ParsedSource) -> Vec<(String, String)> {
    descendants_of_kind(parsed.root(), &["variable_declarator"])
        .into_iter()
        .filter_map(|declarator| {
            let name = declarator.child_by_field_name("name")?;
            let value = declarator.child_by_field_name("value")?;
            if name.kind() != "identifier" || value.kind() != "call_expression" {
                return None;
            }
            let callee = value.child_by_field_name("function")?;
            Some((
                parsed.node_text(name).to_string(),
                parsed.node_text(callee).to_string(),
            ))
        })
        .collect()
}
