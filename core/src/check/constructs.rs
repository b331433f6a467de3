use super::{Check, CheckContext};
use crate::diag::{Finding, FindingKind, Span};
use crate::scan;
use crate::text::LineIndex;
use crate::vocab::{self, KeywordKind, MARKER, Marker};

struct Lines<'a> {
    code: &'a str,
    index: LineIndex,
    lookahead: usize,
}

impl<'a> Lines<'a> {
    /// True when the header ending at `header_end` is followed by `{` on the
    /// rest of its line, or by a line starting with `{` within the window.
    fn has_body(&self, header_end: usize) -> bool {
        let line = self.index.line_of(header_end);
        let rest = &self.code[header_end..self.index.line_range(line).end];
        if rest.contains('{') {
            return true;
        }
        let last = line.saturating_add(self.lookahead).min(self.index.line_count().saturating_sub(1));
        (line + 1..=last).any(|n| self.code[self.index.line_range(n)].trim_start().starts_with('{'))
    }
}

/// Control headers, functions and classes that never open a `{ }` body.
/// Expects the code view; `lookahead` is how many following lines may hold
/// the opening brace.
pub fn find_incomplete_constructs(code: &str, lookahead: usize, out: &mut Vec<Finding>) {
    let lines = Lines {
        code,
        index: LineIndex::new(code),
        lookahead,
    };

    for keyword in vocab::KEYWORDS.iter().filter(|k| k.kind == KeywordKind::Control) {
        for (start, spelled) in control_headers(code, keyword.word, keyword.marker) {
            let end = start + spelled.len();
            if !lines.has_body(end) {
                out.push(Finding::new(
                    FindingKind::IncompleteConstruct,
                    Span::new(start, end),
                    format!("Incomplete {} statement. Missing {{ }} body", spelled),
                ));
            }
        }
    }

    for header in scan::func_headers(code) {
        if !lines.has_body(header.end) {
            out.push(Finding::new(
                FindingKind::IncompleteConstruct,
                Span::new(header.start, header.end),
                format!("Incomplete function definition for '{}'. Missing {{ }} body", header.name),
            ));
        }
    }

    for at in scan::marked_keyword_offsets(code, "class") {
        let Some((name, end)) = scan::class_header_at(code, at) else {
            continue;
        };
        if !lines.has_body(end) {
            out.push(Finding::new(
                FindingKind::IncompleteConstruct,
                Span::new(at, end),
                format!("Incomplete class definition for '{}'. Missing {{ }} body", name),
            ));
        }
    }
}

/// Occurrences of a control keyword with the spelling used at each site.
fn control_headers<'a>(code: &'a str, word: &'a str, marker: Marker) -> Vec<(usize, &'a str)> {
    let bytes = code.as_bytes();
    scan::words(code)
        .filter(|(_, w)| *w == word)
        .filter_map(|(start, w)| {
            let marked = bytes.get(start + w.len()) == Some(&(MARKER as u8));
            match (marker, marked) {
                (_, true) => Some((start, &code[start..start + w.len() + 1])),
                (Marker::Optional, false) => Some((start, w)),
                _ => None,
            }
        })
        .collect()
}

pub struct ConstructCheck;

impl Check for ConstructCheck {
    fn name(&self) -> &'static str {
        "constructs"
    }

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>) {
        find_incomplete_constructs(cx.code(), cx.config.construct_lookahead, out);
    }
}
