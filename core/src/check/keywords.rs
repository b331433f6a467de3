use super::{Check, CheckContext};
use crate::diag::{Finding, FindingKind, Span};
use crate::scan;
use crate::vocab;

/// Flags marker-requiring keywords written without their `$`, such as
/// `if condition {`. Expects the code view.
pub fn find_missing_markers(code: &str, out: &mut Vec<Finding>) {
    let bytes = code.as_bytes();
    for (start, word) in scan::words(code) {
        let Some(keyword) = vocab::keyword(word) else {
            continue;
        };
        if !keyword.requires_marker() {
            continue;
        }
        let end = start + word.len();
        if !bytes.get(end).is_some_and(|b| b.is_ascii_whitespace()) {
            continue;
        }
        out.push(Finding::new(
            FindingKind::MissingKeywordMarker,
            Span::new(start, end),
            format!(
                "Keyword '{}' should be followed by {} (use '{}')",
                word,
                vocab::MARKER,
                keyword.spelled
            ),
        ));
    }
}

pub struct KeywordMarkerCheck;

impl Check for KeywordMarkerCheck {
    fn name(&self) -> &'static str {
        "keyword-markers"
    }

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>) {
        find_missing_markers(cx.code(), out);
    }
}
