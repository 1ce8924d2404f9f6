//! The boundary to the external documentation writer.
//!
//! Each endpoint excerpt is sent on its own. The writer answers either with
//! the literal `none` or with one Markdown section in this shape:
//!
//! ````text
//! ## {short endpoint description}
//!
//! ```
//! {METHOD} {PATH}
//! ```
//!
//! {prose description}
//!
//! ### Path Parameters
//! ### Example Request
//! ### Example Response
//! ### Response Codes
//! ````

pub mod openai;

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::endpoints::ApiSummary;
use crate::error::Result;

pub use openai::OpenAiDocumenter;

/// Separator placed between endpoint sections in an API document.
pub const SECTION_SEPARATOR: &str = "\n\n<br />\n\n";

/// Something that writes documentation for one endpoint excerpt.
#[allow(async_fn_in_trait)]
pub trait EndpointDocumenter {
    /// Return the raw reply: `none` or a Markdown section.
    async fn document(&self, excerpt: &str) -> Result<String>;
}

/// A parsed endpoint section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDoc {
    pub title: String,
    pub method: Option<String>,
    pub path: Option<String>,
    /// The section as received, trimmed.
    pub markdown: String,
}

/// Parse a documenter reply.
///
/// Returns `None` for a `none` reply (any case, optional trailing period),
/// an empty reply, or a reply without a `##` heading.
pub fn parse_endpoint_doc(reply: &str) -> Option<EndpointDoc> {
    let markdown = reply.trim();
    let bare = markdown.trim_end_matches('.').trim();
    if bare.is_empty() || bare.eq_ignore_ascii_case("none") {
        return None;
    }

    let title = markdown
        .lines()
        .find_map(|line| line.trim().strip_prefix("## "))
        .map(|t| t.trim().to_string())?;

    let (method, path) = match request_line(markdown) {
        Some(line) => {
            let mut parts = line.split_whitespace();
            (
                parts.next().map(str::to_string),
                parts.next().map(str::to_string),
            )
        }
        None => (None, None),
    };

    Some(EndpointDoc {
        title,
        method,
        path,
        markdown: markdown.to_string(),
    })
}

/// First non-empty line inside the first fenced block.
fn request_line(markdown: &str) -> Option<&str> {
    let mut lines = markdown.lines().skip_while(|l| !l.trim_start().starts_with("```"));
    lines.next()?;
    lines
        .take_while(|l| !l.trim_start().starts_with("```"))
        .map(str::trim)
        .find(|l| !l.is_empty())
}

/// Document every endpoint of `api`, one request at a time.
///
/// Failed requests and `none` replies contribute nothing. Returns `None` when
/// no endpoint produced documentation.
pub async fn document_api<D: EndpointDocumenter>(documenter: &D, api: &ApiSummary) -> Option<String> {
    let sections: Vec<String> = stream::iter(api.endpoints.iter().enumerate())
        .then(move |(i, excerpt)| async move { (i, documenter.document(excerpt).await) })
        .filter_map(move |(i, reply)| async move {
            match reply {
                Ok(reply) => match parse_endpoint_doc(&reply) {
                    Some(doc) => Some(doc.markdown),
                    None => {
                        debug!("{}: endpoint {} not documented", api.name, i);
                        None
                    }
                },
                Err(e) => {
                    warn!("{}: documenting endpoint {} failed: {e}", api.name, i);
                    None
                }
            }
        })
        .collect()
        .await;

    if sections.is_empty() {
        return None;
    }
    Some(format!("# {}\n\n{}", api.name, sections.join(SECTION_SEPARATOR)))
}
