//! Clean and decode model output

use crate::error::ExtractionError;
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, warn};

const FENCE: &str = "```";

/// Strip an enclosing markdown code fence, if any
///
/// Content that is not wrapped in fences is returned unchanged. Fenced
/// content needs at least three lines (opening marker, body, closing marker);
/// a bare `json` language tag left on the first body line is dropped too.
pub fn strip_code_fence(content: &str) -> Cow<'_, str> {
    let trimmed = content.trim();
    if !(trimmed.starts_with(FENCE) && trimmed.ends_with(FENCE)) {
        return Cow::Borrowed(content);
    }

    let lines: Vec<&str> = trimmed.split('\n').collect();
    if lines.len() < 3 {
        return Cow::Borrowed(content);
    }

    // Skip first line (```json or ```) and last line (```)
    let mut body = &lines[1..lines.len() - 1];
    if body
        .first()
        .is_some_and(|line| line.trim().eq_ignore_ascii_case("json"))
    {
        body = &body[1..];
    }

    debug!("Stripped code fence ({} body lines)", body.len());
    Cow::Owned(body.join("\n"))
}

/// Parse cleaned content as JSON, reporting the exact failure position
pub fn decode_json(text: &str) -> Result<Value, ExtractionError> {
    serde_json::from_str(text).map_err(|e| {
        // Input that ends early fails at the end of the text
        let offset = if e.is_eof() {
            text.len()
        } else {
            byte_offset(text, e.line(), e.column())
        };
        warn!(
            line = e.line(),
            column = e.column(),
            offset,
            "Failed to decode model output: {}",
            e
        );
        ExtractionError::InvalidJson {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
            offset,
            text: text.to_string(),
        }
    })
}

/// Convert the parser's 1-based line/column into a 0-based byte offset
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split('\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: fence-free content passes through unchanged
        #[test]
        fn test_unfenced_passthrough(content in "[a-z0-9{}\\[\\]\":, \n]{0,64}") {
            let out = strip_code_fence(&content);
            prop_assert_eq!(out.as_ref(), content.as_str());
        }

        /// Property: wrapping once in fences yields the unwrapped content
        #[test]
        fn test_fence_once_matches_unwrapped(content in "[a-z0-9{}\\[\\]\":, \n]{0,64}") {
            let first_line = content.split('\n').next().unwrap_or("");
            prop_assume!(!first_line.trim().eq_ignore_ascii_case("json"));

            let fenced = format!("```json\n{}\n```", content);
            let once = strip_code_fence(&fenced).into_owned();
            prop_assert_eq!(&once, &content);
            let twice = strip_code_fence(&once);
            prop_assert_eq!(twice.as_ref(), content.as_str());
        }
    }
}
