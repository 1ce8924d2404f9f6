//! Docsmith - static analysis for documentation generation.
//!
//! Two pipelines share one set of tree-sitter grammars:
//!
//! - Doc comments: find every function in a file with the comment directly
//!   above it, then splice updated comments back in a single pass.
//! - API excerpts: find Express APIs in a repository and cut every route
//!   registration into a standalone excerpt holding the call and the local
//!   declarations it depends on, ready to hand to a documentation writer.
//!
//! # Architecture
//!
//! - `grammar`: language registry, one file per language under `languages/`
//! - `source`: parsed files, spans, tree walking helpers
//! - `docs`: function/comment locator, batch rewriter, per-file regeneration
//! - `endpoints`: module resolution, route finding, excerpt building, walking
//! - `documenter`: the documentation-writer boundary and its HTTP client
//! - `config`: YAML configuration
//! - `report`: output formatting (text, JSON)
//!
//! # Adding a New Language
//!
//! Add a file under `src/grammar/languages/` that builds a `Grammar` with the
//! language's function and comment node kinds, and list it in
//! `languages::all`.

pub mod cli;
pub mod config;
pub mod docs;
pub mod documenter;
pub mod endpoints;
pub mod error;
pub mod grammar;
pub mod report;
pub mod source;

pub use config::Config;
pub use docs::{locate, rewrite, FunctionDocRecord};
pub use endpoints::{find_apis, ApiSummary};
pub use error::{Error, Result};
pub use grammar::{GrammarRegistry, LanguageId};
