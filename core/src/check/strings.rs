use super::{Check, CheckContext};
use crate::diag::{Finding, FindingKind, Span};
use crate::text::unclosed_strings;

/// Reports every string literal still open at a line break or at the end of
/// the text, from its opening quote to that point.
pub fn find_unterminated_strings(text: &str) -> Vec<Finding> {
    unclosed_strings(text)
        .into_iter()
        .map(|(start, end)| Finding::new(FindingKind::UnclosedString, Span::new(start, end), "Unclosed string literal"))
        .collect()
}

pub struct StringCheck;

impl Check for StringCheck {
    fn name(&self) -> &'static str {
        "strings"
    }

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>) {
        out.extend(find_unterminated_strings(cx.text()));
    }
}
