//! Documentable-function locating and doc-comment rewriting.
//!
//! `locate` finds every function or method in a file together with the doc
//! comment directly above it. Callers fill in `updated_comment` on the
//! records they want changed and hand the list to `rewrite`, which splices
//! all of them into the original text in one pass. `update_documentation`
//! runs both steps around a `FunctionDocumenter`.

pub mod documenting;
pub mod locator;
pub mod rewriter;

pub use documenting::{comment_from_reply, update_documentation, FunctionDocumenter};
pub use locator::{locate, locate_in, FunctionDocRecord, Locator};
pub use rewriter::{render_comment, rewrite};
