//! Express-style API discovery.
//!
//! The walker looks for package manifests that depend on the framework,
//! finds the file that creates the app, and turns every route registration
//! in it into a standalone excerpt: the app setup, the registration call,
//! and every local declaration the call depends on, across files.

pub mod closure;
pub mod finder;
pub mod module;
pub mod naming;
pub mod walker;

pub use closure::ClosureBuilder;
pub use finder::{find_endpoints, is_root_file, Framework, RouteEndpoint};
pub use module::ModuleIndex;
pub use naming::guess_api_name;
pub use walker::{find_apis, ApiFinder, ApiSummary};
