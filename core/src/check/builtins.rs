use super::{Check, CheckContext};
use crate::diag::{Finding, FindingKind, Span};
use crate::scan::{self, is_ident_char};
use crate::vocab::{self, NAMESPACE_PREFIX};

/// Flags built-in calls written without the `::` prefix. Expects the code
/// view; works line by line and skips comment-only lines.
pub fn find_unprefixed_builtins(code: &str, out: &mut Vec<Finding>) {
    for (line_start, line) in scan::lines(code) {
        if scan::is_comment_line(line) {
            continue;
        }
        for builtin in vocab::BUILTINS {
            let name = builtin.name;
            for (start, _) in line.match_indices(name) {
                let end = start + name.len();
                if line.as_bytes().get(end).is_some_and(|b| is_ident_char(*b)) {
                    continue;
                }
                if is_unprefixed_call(line, start, end) {
                    out.push(Finding::new(
                        FindingKind::UnprefixedBuiltin,
                        Span::new(line_start + start, line_start + end),
                        format!(
                            "Built-in function '{}' should be prefixed with {} (use '{}{}')",
                            name, NAMESPACE_PREFIX, NAMESPACE_PREFIX, name
                        ),
                    ));
                }
            }
        }
    }
}

// The order matters: an already prefixed call is never a finding, a name
// that is the tail of a longer identifier is not this built-in, and only a
// name used in call position is a call.
fn is_unprefixed_call(line: &str, start: usize, end: usize) -> bool {
    let before = &line[..start];
    if before.ends_with(NAMESPACE_PREFIX) {
        return false;
    }
    if before.as_bytes().last().is_some_and(|b| is_ident_char(*b)) {
        return false;
    }
    if is_member_or_definition(before) {
        return false;
    }
    let rest = line[end..].trim_start();
    rest.starts_with('(') || rest.starts_with('"') || rest.starts_with('\'')
}

// `list.push(x)` calls a method and `func$ get(key)` defines a function.
fn is_member_or_definition(before: &str) -> bool {
    let trimmed = before.trim_end();
    if trimmed.ends_with('.') {
        return true;
    }
    trimmed.ends_with("func$")
}

pub struct BuiltinPrefixCheck;

impl Check for BuiltinPrefixCheck {
    fn name(&self) -> &'static str {
        "builtin-prefix"
    }

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>) {
        find_unprefixed_builtins(cx.code(), out);
    }
}
