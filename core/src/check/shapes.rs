use super::{Check, CheckContext};
use crate::diag::{Finding, FindingKind, Span};
use crate::scan::{self, is_ident_char};
use crate::vocab::{self, container_type_list};

/// Longest `<...>` span still considered a type tag.
const MAX_TAG_LEN: usize = 32;
/// How far past `dict` the opening brace may sit.
const DICT_BRACE_WINDOW: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagShape<'a> {
    Empty,
    Malformed(&'a str),
    Invalid(&'a str),
}

fn classify_tag(inner: &str) -> Option<TagShape<'_>> {
    let mut words = inner.split_ascii_whitespace();
    let Some(word) = words.next() else {
        return Some(TagShape::Empty);
    };
    if words.next().is_some() {
        // `a < b and c > d` compares, it does not tag.
        return None;
    }
    let padded = word.len() != inner.len();
    match (vocab::container_type(word).is_some(), padded) {
        (true, true) => Some(TagShape::Malformed(word)),
        (true, false) => None,
        (false, false) => Some(TagShape::Invalid(word)),
        (false, true) => None,
    }
}

fn is_tag_byte(b: u8) -> bool {
    is_ident_char(b) || b == b' ' || b == b'\t'
}

/// End of the `>` closing a candidate tag that opens at `open`.
fn tag_close(bytes: &[u8], open: usize) -> Option<usize> {
    let limit = (open + MAX_TAG_LEN).min(bytes.len());
    (open + 1..limit).find_map(|i| match bytes[i] {
        b'>' => Some(Some(i)),
        b if is_tag_byte(b) => None,
        _ => Some(None),
    })?
}

fn tag_finding(shape: TagShape<'_>, span: Span) -> Finding {
    match shape {
        TagShape::Empty => Finding::new(
            FindingKind::EmptyTypeTag,
            span,
            format!("Empty data type brackets. Should be {}", container_type_list("or")),
        ),
        TagShape::Malformed(name) => Finding::new(
            FindingKind::MalformedTypeTag,
            span,
            format!("Malformed data type. Should be <{}> without spaces", name),
        ),
        TagShape::Invalid(name) => Finding::new(
            FindingKind::InvalidTypeTag,
            span,
            format!(
                "Invalid data type <{}>. Valid types are {}",
                name,
                container_type_list("and")
            ),
        ),
    }
}

/// Container type tags such as `<stack>`: empty, padded and unknown names.
/// Expects the code view.
pub fn find_type_tag_issues(code: &str, out: &mut Vec<Finding>) {
    let bytes = code.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        let Some(close) = tag_close(bytes, i) else {
            i += 1;
            continue;
        };
        if let Some(shape) = classify_tag(&code[i + 1..close]) {
            out.push(tag_finding(shape, Span::new(i, close + 1)));
        }
        i = close + 1;
    }
}

/// Opening offsets of every `{` that has a matching `}`, ascending.
fn closed_braces(code: &str) -> Vec<usize> {
    let mut open = Vec::new();
    let mut closed = Vec::new();
    for (i, b) in code.bytes().enumerate() {
        match b {
            b'{' => open.push(i),
            b'}' => {
                if let Some(at) = open.pop() {
                    closed.push(at);
                }
            }
            _ => {}
        }
    }
    closed.sort_unstable();
    closed
}

fn dict_brace(bytes: &[u8], after: usize) -> Option<usize> {
    let limit = (after + DICT_BRACE_WINDOW).min(bytes.len());
    (after..limit)
        .find(|&i| !bytes[i].is_ascii_whitespace())
        .filter(|&i| bytes[i] == b'{')
}

/// `dict` must be followed by `{`, and that brace must be closed.
/// Expects the code view.
pub fn find_dictionary_issues(code: &str, out: &mut Vec<Finding>) {
    let bytes = code.as_bytes();
    let mut closed: Option<Vec<usize>> = None;

    for (start, word) in scan::words(code) {
        if word != "dict" {
            continue;
        }
        let end = start + word.len();
        let Some(brace) = dict_brace(bytes, end) else {
            out.push(Finding::new(
                FindingKind::DictMissingBrace,
                Span::new(start, end),
                "Dictionary declaration should be followed by { (e.g., dict{key: value})",
            ));
            continue;
        };
        let closed = closed.get_or_insert_with(|| closed_braces(code));
        if closed.binary_search(&brace).is_err() {
            out.push(Finding::new(
                FindingKind::UnclosedDict,
                Span::new(start, brace + 1),
                "Unclosed dictionary. Missing closing }",
            ));
        }
    }
}

pub struct TypeTagCheck;

impl Check for TypeTagCheck {
    fn name(&self) -> &'static str {
        "type-tags"
    }

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>) {
        find_type_tag_issues(cx.code(), out);
    }
}

pub struct DictionaryCheck;

impl Check for DictionaryCheck {
    fn name(&self) -> &'static str {
        "dictionaries"
    }

    fn run(&self, cx: &CheckContext<'_>, out: &mut Vec<Finding>) {
        find_dictionary_issues(cx.code(), out);
    }
}
