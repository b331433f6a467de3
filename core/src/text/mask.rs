/// Lexical region a character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Code,
    /// An opening or closing `"`.
    Quote,
    StringBody,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InString { start: usize },
    Comment,
}

/// Walks `text` once, reporting the region of every character to `visit` and
/// every string literal that is still open at a newline or at end of text to
/// `unclosed` as `(opening quote offset, end offset)`.
///
/// A backslash toggles the escape flag for exactly the next character; only an
/// unescaped `"` opens or closes a string and only an unescaped `#` outside a
/// string starts a comment. A newline always terminates an open string, so a
/// single bad literal never swallows the rest of the document.
pub(crate) fn classify<V, U>(text: &str, mut visit: V, mut unclosed: U)
where
    V: FnMut(usize, char, Region),
    U: FnMut(usize, usize),
{
    let mut state = State::Normal;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        let region = match state {
            State::Normal => match ch {
                '"' if !escaped => {
                    state = State::InString { start: i };
                    Region::Quote
                }
                '#' if !escaped => {
                    state = State::Comment;
                    Region::Comment
                }
                _ => Region::Code,
            },
            State::InString { start } => match ch {
                '"' if !escaped => {
                    state = State::Normal;
                    Region::Quote
                }
                '\n' => {
                    unclosed(start, i);
                    state = State::Normal;
                    Region::Code
                }
                _ => Region::StringBody,
            },
            State::Comment => {
                if ch == '\n' {
                    state = State::Normal;
                    Region::Code
                } else {
                    Region::Comment
                }
            }
        };
        escaped = ch == '\\' && !escaped;
        visit(i, ch, region);
    }

    if let State::InString { start } = state {
        unclosed(start, text.len());
    }
}

pub(crate) fn unclosed_strings(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    classify(text, |_, _, _| {}, |start, end| out.push((start, end)));
    out
}

/// Replaces every character inside a string literal with spaces, one space per
/// byte, so the result has exactly the byte length of `text`. Quotes stay
/// visible.
pub fn mask(text: &str) -> String {
    MaskedText::new(text).strings
}

// A `\r` survives masking so CRLF line ends stay recognisable.
fn push_blank(out: &mut String, ch: char) {
    if ch == '\r' {
        out.push(ch);
        return;
    }
    for _ in 0..ch.len_utf8() {
        out.push(' ');
    }
}

/// Both masked views of one document.
///
/// `strings` blanks string payloads only. `code` additionally blanks comment
/// bodies, keeping the leading `#` so comment-only lines are still
/// recognisable. Both have the byte length of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    strings: String,
    code: String,
}

impl MaskedText {
    pub fn new(text: &str) -> Self {
        let mut strings = String::with_capacity(text.len());
        let mut code = String::with_capacity(text.len());
        let mut in_comment = false;

        classify(
            text,
            |_, ch, region| match region {
                Region::Code | Region::Quote => {
                    in_comment = false;
                    strings.push(ch);
                    code.push(ch);
                }
                Region::StringBody => {
                    push_blank(&mut strings, ch);
                    push_blank(&mut code, ch);
                }
                Region::Comment => {
                    strings.push(ch);
                    if in_comment {
                        push_blank(&mut code, ch);
                    } else {
                        in_comment = true;
                        code.push(ch);
                    }
                }
            },
            |_, _| {},
        );

        Self { strings, code }
    }

    pub fn strings(&self) -> &str {
        &self.strings
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}
