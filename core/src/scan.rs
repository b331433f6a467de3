// Small byte-level scanners shared by the checks. All of them expect masked
// text, so quotes and comment bodies never look like code.

use crate::vocab::MARKER;

#[inline]
pub(crate) fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
pub(crate) fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Maximal runs of `[A-Za-z0-9_]` with their start offsets.
pub(crate) fn words(s: &str) -> Words<'_> {
    Words { s, pos: 0 }
}

pub(crate) struct Words<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Iterator for Words<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.s.as_bytes();
        while self.pos < bytes.len() && !is_ident_char(bytes[self.pos]) {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }
        let start = self.pos;
        while self.pos < bytes.len() && is_ident_char(bytes[self.pos]) {
            self.pos += 1;
        }
        Some((start, &self.s[start..self.pos]))
    }
}

/// Words that start with a letter or `_`.
pub(crate) fn identifiers(s: &str) -> impl Iterator<Item = (usize, &str)> {
    words(s).filter(|(_, w)| is_ident_start(w.as_bytes()[0]))
}

/// Lines with their start offsets; the `\n` and a trailing `\r` are excluded.
pub(crate) fn lines(s: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut start = 0usize;
    s.split('\n').map(move |raw| {
        let line_start = start;
        start += raw.len() + 1;
        (line_start, raw.strip_suffix('\r').unwrap_or(raw))
    })
}

/// Part of a code-view line before its comment.
pub(crate) fn code_part(line: &str) -> &str {
    match line.find(crate::vocab::COMMENT) {
        Some(i) => &line[..i],
        None => line,
    }
}

pub(crate) fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with(crate::vocab::COMMENT)
}

pub(crate) fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// End of the identifier starting at `i`, if one starts there.
pub(crate) fn read_ident(bytes: &[u8], i: usize) -> Option<usize> {
    if !bytes.get(i).is_some_and(|b| is_ident_start(*b)) {
        return None;
    }
    let mut end = i + 1;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    Some(end)
}

/// Offsets of `word$` occurrences that start at a word boundary.
pub(crate) fn marked_keyword_offsets<'a>(s: &'a str, word: &'a str) -> impl Iterator<Item = usize> + 'a {
    let bytes = s.as_bytes();
    s.match_indices(word).filter_map(move |(i, _)| {
        let boundary = i == 0 || !is_ident_char(bytes[i - 1]);
        let marked = bytes.get(i + word.len()) == Some(&(MARKER as u8));
        (boundary && marked).then_some(i)
    })
}

/// `let$ name =` and `let$ name :=`.
pub(crate) fn let_declarations(s: &str) -> Vec<(usize, &str)> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    for at in marked_keyword_offsets(s, "let") {
        let name_start = skip_whitespace(bytes, at + "let$".len());
        let Some(name_end) = read_ident(bytes, name_start) else {
            continue;
        };
        let mut i = skip_whitespace(bytes, name_end);
        if bytes.get(i) == Some(&b':') {
            i += 1;
        }
        if bytes.get(i) == Some(&b'=') {
            out.push((name_start, &s[name_start..name_end]));
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FuncHeader<'a> {
    pub(crate) start: usize,
    pub(crate) name: &'a str,
    pub(crate) params: Vec<&'a str>,
    /// Offset just past the closing `)`.
    pub(crate) end: usize,
}

/// Finds the first `)` at or after a position. Positions passed in must not
/// decrease, so a whole document is searched at most once.
pub(crate) struct CloseParens<'a> {
    s: &'a str,
    next: Option<usize>,
    exhausted: bool,
}

impl<'a> CloseParens<'a> {
    pub(crate) fn new(s: &'a str) -> Self {
        Self {
            s,
            next: None,
            exhausted: false,
        }
    }

    pub(crate) fn at_or_after(&mut self, pos: usize) -> Option<usize> {
        match self.next {
            Some(next) if next >= pos => return Some(next),
            None if self.exhausted => return None,
            _ => {}
        }
        self.next = self.s.get(pos..).and_then(|rest| rest.find(')')).map(|i| pos + i);
        self.exhausted = self.next.is_none();
        self.next
    }
}

/// `func$ name(params)` starting at the `func` of `at`. The parameter list
/// ends at the first `)`, which may sit on a later line.
pub(crate) fn func_header_at<'a>(s: &'a str, at: usize, parens: &mut CloseParens<'_>) -> Option<FuncHeader<'a>> {
    let bytes = s.as_bytes();
    let after_marker = at + "func$".len();
    let name_start = skip_whitespace(bytes, after_marker);
    if name_start == after_marker {
        return None;
    }
    let name_end = read_ident(bytes, name_start)?;
    let open = skip_whitespace(bytes, name_end);
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let close = parens.at_or_after(open + 1)?;
    let params = s[open + 1..close]
        .split(',')
        .filter_map(|p| {
            let p = p.trim();
            read_ident(p.as_bytes(), 0).map(|end| &p[..end])
        })
        .collect();
    Some(FuncHeader {
        start: at,
        name: &s[name_start..name_end],
        params,
        end: close + 1,
    })
}

pub(crate) fn func_headers(s: &str) -> Vec<FuncHeader<'_>> {
    let mut parens = CloseParens::new(s);
    marked_keyword_offsets(s, "func")
        .filter_map(|at| func_header_at(s, at, &mut parens))
        .collect()
}

/// `class$ Name`: returns the name and the offset just past it.
pub(crate) fn class_header_at(s: &str, at: usize) -> Option<(&str, usize)> {
    let bytes = s.as_bytes();
    let after_marker = at + "class$".len();
    let name_start = skip_whitespace(bytes, after_marker);
    if name_start == after_marker {
        return None;
    }
    let name_end = read_ident(bytes, name_start)?;
    Some((&s[name_start..name_end], name_end))
}

/// Names introduced by `let$`, `func$` or `class$` on one line, with or
/// without whitespace after the marker.
pub(crate) fn declaration_sites(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut out = Vec::new();
    for word in ["let", "func", "class"] {
        for at in marked_keyword_offsets(line, word) {
            let name_start = skip_whitespace(bytes, at + word.len() + 1);
            if let Some(name_end) = read_ident(bytes, name_start) {
                out.push(&line[name_start..name_end]);
            }
        }
    }
    out
}
