use tracing::trace;

use super::{Check, CheckContext};
use crate::config::BracketSource;
use crate::diag::{Finding, FindingKind, Span};

fn closing_for(open: u8) -> u8 {
    match open {
        b'{' => b'}',
        b'[' => b']',
        _ => b')',
    }
}

/// Matches `{}`, `[]` and `()` over `text` exactly as given.
///
/// Mismatches are reported where they are found; brackets still open at the
/// end are reported at their own offsets, leftmost first.
pub fn find_bracket_issues(text: &str) -> Vec<Finding> {
    let mut out = Vec::new();
    scan_brackets(text, &mut out);
    out
}

fn scan_brackets(text: &str, out: &mut Vec<Finding>) {
    // Brackets are ASCII, so no byte of a multi-byte char can match them.
    let mut stack: Vec<(u8, usize)> = Vec::new();

    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' | b'[' | b'(' => stack.push((b, i)),
            b'}' | b']' | b')' => match stack.pop() {
                Some((open, _)) if closing_for(open) == b => {}
                Some((open, _)) => out.push(Finding::new(
                    FindingKind::MismatchedBracket,
                    Span::new(i, i + 1),
                    format!(
                        "Mismatched bracket: found '{}' but expected '{}'",
                        b as char,
                        closing_for(open) as char
                    ),
                )),
                None => out.push(Finding::new(
                    FindingKind::UnexpectedClose,
                    Span::new(i, i + 1),
                    format!("Mismatched bracket: found '{}' with no open bracket", b as char),
                )),
            },
            _ => {}
        }
    }

    for (open, offset) in stack {
        out.push(Finding::new(
            FindingKind::UnclosedBracket,
            Span::new(offset, offset + 1),
            format!("Unclosed '{}': missing '{}'", open as char, closing_for(open) as char),
        ));
    }
}

pub struct BracketCheck;

impl Check for BracketCheck {
    fn name(&self) -> &'static str {
        "brackets"
    }

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>) {
        let text = match cx.config.bracket_source {
            BracketSource::Code => cx.code(),
            BracketSource::Raw => cx.text(),
        };
        trace!(source = ?cx.config.bracket_source, "matching brackets");
        scan_brackets(text, out);
    }
}
