use rustc_hash::FxHashSet;

use super::{Check, CheckContext};
use crate::diag::{Finding, FindingKind, Span};
use crate::scan;
use crate::vocab::{self, IMPLICIT_NAMES};

/// Names the undeclared-usage heuristic treats as known. Owned by one run
/// and dropped with it.
#[derive(Debug, Default, Clone)]
pub struct DeclaredNameSet {
    names: FxHashSet<String>,
}

impl DeclaredNameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything declared anywhere in `code`: `let$` targets, function
    /// parameters, function and class names, and the implicit names.
    pub fn seeded(code: &str) -> Self {
        let mut set = Self::new();
        for name in IMPLICIT_NAMES {
            set.insert(name);
        }
        for (_, name) in scan::let_declarations(code) {
            set.insert(name);
        }
        for header in scan::func_headers(code) {
            set.insert(header.name);
            for param in header.params {
                set.insert(param);
            }
        }
        for at in scan::marked_keyword_offsets(code, "class") {
            if let Some((name, _)) = scan::class_header_at(code, at) {
                set.insert(name);
            }
        }
        set
    }

    pub fn insert(&mut self, name: &str) {
        self.remember(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Inserts `name`; true when it was not known before.
    pub fn remember(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Reports the first use of every name that is never declared. Expects the
/// code view.
///
/// This is a textual heuristic: it has no notion of scope, so a name
/// declared inside one function counts as declared everywhere.
pub fn find_undeclared(code: &str, out: &mut Vec<Finding>) {
    let mut declared = DeclaredNameSet::seeded(code);
    for (line_start, line) in scan::lines(code) {
        if scan::is_comment_line(line) {
            continue;
        }
        scan_line(line_start, line, &mut declared, out);
    }
}

fn scan_line(line_start: usize, line: &str, declared: &mut DeclaredNameSet, out: &mut Vec<Finding>) {
    for (_, name) in scan::let_declarations(line) {
        declared.insert(name);
    }
    let sites = scan::declaration_sites(line);
    let bytes = line.as_bytes();

    for (start, name) in scan::identifiers(line) {
        if vocab::is_reserved(name) || sites.contains(&name) {
            continue;
        }
        // `obj.field` and `obj.method()` name members, not variables.
        if start > 0 && bytes[start - 1] == b'.' {
            continue;
        }
        if declared.remember(name) {
            let start = line_start + start;
            out.push(Finding::new(
                FindingKind::UndeclaredVariable,
                Span::new(start, start + name.len()),
                format!("Variable '{}' is used but not defined", name),
            ));
        }
    }
}

pub struct UsageCheck;

impl Check for UsageCheck {
    fn name(&self) -> &'static str {
        "undeclared"
    }

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>) {
        find_undeclared(cx.code(), out);
    }
}
