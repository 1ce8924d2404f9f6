//! Regenerates the doc comment of every function in a file.

use futures::stream::{self, StreamExt};
use log::{debug, warn};

use crate::docs::locator::{locate_in, FunctionDocRecord};
use crate::docs::rewriter::rewrite;
use crate::error::Result;
use crate::grammar::{CommentStyle, Grammar, LanguageId};

/// Requests in flight at once.
const MAX_IN_FLIGHT: usize = 8;

/// Something that writes the doc comment for one function.
#[allow(async_fn_in_trait)]
pub trait FunctionDocumenter {
    /// Return a doc comment for `record`, or plain prose to be wrapped in
    /// the language's comment style. When the record already has a comment,
    /// the reply should carry over what is still accurate in it.
    async fn document_function(
        &self,
        language: LanguageId,
        record: &FunctionDocRecord,
    ) -> Result<String>;
}

/// Locate every function in `text`, ask `documenter` for its comment, and
/// splice the replies back in.
///
/// Returns `Ok(None)` when the text holds no documentable function. A failed
/// or empty reply leaves that function's current comment in place.
pub async fn update_documentation<D: FunctionDocumenter>(
    documenter: &D,
    grammar: &Grammar,
    text: &str,
) -> Result<Option<String>> {
    let mut records = locate_in(grammar, text)?;
    if records.is_empty() {
        debug!("no {} functions to document", grammar.id.name());
        return Ok(None);
    }

    let replies: Vec<Result<String>> = stream::iter(&records)
        .map(|record| documenter.document_function(grammar.id, record))
        .buffered(MAX_IN_FLIGHT)
        .collect()
        .await;

    for (record, reply) in records.iter_mut().zip(replies) {
        match reply {
            Ok(reply) => {
                record.updated_comment = comment_from_reply(grammar.comment_style, &reply);
                if record.updated_comment.is_none() {
                    debug!("empty reply for {}", record.name);
                }
            }
            Err(e) => warn!("failed to document {}: {}", record.name, e),
        }
    }

    rewrite(text, &records).map(Some)
}

/// Turn a reply into a comment: unwrap a code fence, keep text that is
/// already a comment, and render anything else as prose.
pub fn comment_from_reply(style: CommentStyle, reply: &str) -> Option<String> {
    let body = strip_fence(reply.trim()).trim();
    if body.is_empty() {
        return None;
    }
    if style.is_comment(body) {
        Some(body.to_string())
    } else {
        Some(style.render(body))
    }
}

fn strip_fence(reply: &str) -> &str {
    let Some(rest) = reply.strip_prefix("```") else {
        return reply;
    };
    // Skip the info string (```javascript).
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest)
}
