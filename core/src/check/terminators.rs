use super::{Check, CheckContext};
use crate::diag::{Finding, FindingKind, Span};
use crate::scan;
use crate::vocab::{self, MARKER, Marker, TERMINATOR};

/// Flags statement lines that look like an assignment or a call but do not
/// end with `;`. Expects the code view, so strings and trailing comments are
/// already blank. The finding is zero-width at the end of the line.
pub fn find_missing_terminators(code: &str, out: &mut Vec<Finding>) {
    let lines: Vec<(usize, &str)> = scan::lines(code).collect();
    let statement = |n: usize| lines.get(n).map(|&(_, l)| scan::code_part(l).trim()).unwrap_or("");

    for (n, (line_start, line)) in lines.iter().enumerate() {
        let current = statement(n);
        if current.is_empty() || current.ends_with(['{', '}', TERMINATOR]) {
            continue;
        }
        if starts_block_header(current) {
            continue;
        }
        let previous = if n > 0 { statement(n - 1) } else { "" };
        if previous.ends_with(['\\', ',', '(', '[']) || current.ends_with(['\\', ',', '(', '[']) {
            continue;
        }
        if continues_on_next_line(statement(n + 1)) {
            continue;
        }
        if current.contains('=') || current.contains(vocab::NAMESPACE_PREFIX) || has_call_shape(current) {
            out.push(Finding::new(
                FindingKind::MissingTerminator,
                Span::at(line_start + line.len()),
                "Missing semicolon at end of statement",
            ));
        }
    }
}

/// `if$ ...`, `} else ...`, `func$ ...` and friends never take a `;`.
fn starts_block_header(statement: &str) -> bool {
    let statement = statement.trim_start_matches('}').trim_start();
    let bytes = statement.as_bytes();
    let Some(end) = scan::read_ident(bytes, 0) else {
        return false;
    };
    let Some(keyword) = vocab::keyword(&statement[..end]) else {
        return false;
    };
    if !keyword.opens_block() {
        return false;
    }
    let marked = bytes.get(end) == Some(&(MARKER as u8));
    match keyword.marker {
        Marker::Required => marked,
        Marker::Optional => true,
        Marker::None => !marked,
    }
}

fn continues_on_next_line(next: &str) -> bool {
    if next.starts_with('.') || next.starts_with("->") || next.starts_with("&&") || next.starts_with("||") {
        return true;
    }
    scan::read_ident(next.as_bytes(), 0).is_some_and(|end| matches!(&next[..end], "and" | "or"))
}

/// `name(` or `name (` anywhere in the statement.
fn has_call_shape(statement: &str) -> bool {
    scan::identifiers(statement).any(|(start, word)| statement[start + word.len()..].trim_start().starts_with('('))
}

pub struct TerminatorCheck;

impl Check for TerminatorCheck {
    fn name(&self) -> &'static str {
        "terminators"
    }

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>) {
        find_missing_terminators(cx.code(), out);
    }
}
