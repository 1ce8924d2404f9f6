//! Splices updated doc comments into source text.
//!
//! All edits are applied to a copy of the original text in descending
//! position order, so every record's offsets stay valid until it is applied.

use std::ops::Range;

use crate::docs::locator::FunctionDocRecord;
use crate::error::{Error, Result};

/// Apply every record carrying an `updated_comment` to `text`.
///
/// Records without one are left alone. Text outside the edited regions is
/// returned byte-for-byte. Records must come from locating this exact text;
/// out-of-range, overlapping, or mismatched records yield `StaleRecord`.
pub fn rewrite(text: &str, records: &[FunctionDocRecord]) -> Result<String> {
    let mut edits: Vec<(Range<usize>, &FunctionDocRecord, &str)> = Vec::new();
    for record in records {
        let Some(comment) = record.updated_comment.as_deref() else {
            continue;
        };
        check_comment_span(text, record)?;
        let range = record
            .edit_range()
            .ok_or_else(|| stale(record, "comment column is past its byte offset"))?;
        check_record(text, record, &range)?;
        edits.push((range, record, comment));
    }

    edits.sort_by(|a, b| {
        b.0.start
            .cmp(&a.0.start)
            .then(b.1.function_span.start_byte.cmp(&a.1.function_span.start_byte))
    });

    for pair in edits.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        if earlier.0.end > later.0.start {
            return Err(stale(
                earlier.1,
                format!("edit {:?} overlaps {:?}", earlier.0, later.0),
            ));
        }
    }

    let mut out = text.to_string();
    for (range, record, comment) in edits {
        out.replace_range(range, &render_comment(comment, &record.indent));
    }
    Ok(out)
}

/// Indent every line of `comment` and terminate the block with a newline.
///
/// Blank lines stay empty rather than carrying trailing whitespace.
pub fn render_comment(comment: &str, indent: &str) -> String {
    let body = comment.trim_start_matches(['\r', '\n']).trim_end();
    let mut out = String::with_capacity(body.len() + indent.len() * 4);
    for line in body.lines() {
        if !line.trim().is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

fn check_comment_span(text: &str, record: &FunctionDocRecord) -> Result<()> {
    let Some(span) = &record.existing_comment_span else {
        return Ok(());
    };
    if span.start_byte > span.end_byte
        || span.end_byte > record.insertion_byte
        || span.end_byte > text.len()
    {
        return Err(stale(record, "comment does not end before the declaration"));
    }
    let Some(before) = text.get(..span.start_byte) else {
        return Err(stale(record, "comment span splits a character"));
    };
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    if span.line_start_byte() != Some(line_start) {
        return Err(stale(record, "comment column does not match its line"));
    }
    Ok(())
}

fn check_record(text: &str, record: &FunctionDocRecord, range: &Range<usize>) -> Result<()> {
    let span = &record.function_span;
    if range.start > range.end || range.end > text.len() || span.end_byte > text.len() {
        return Err(stale(record, "positions are past the end of the text"));
    }
    if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
        return Err(stale(record, "edit range splits a character"));
    }
    if text.get(span.start_byte..span.end_byte) != Some(record.code.as_str()) {
        return Err(stale(record, "function text has changed"));
    }
    Ok(())
}

fn stale(record: &FunctionDocRecord, reason: impl Into<String>) -> Error {
    Error::StaleRecord {
        name: record.name.clone(),
        reason: reason.into(),
    }
}
