use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent};

// Convert LSP UTF-16 position to Rope char index (scalar values), clamped to the end of the line.
pub(crate) fn position_to_char_idx(text: &Rope, pos: Position) -> usize {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return text.len_chars();
    }
    let line_start_char = text.line_to_char(line_idx);
    let line_slice = text.line(line_idx);
    let target_utf16 = pos.character as usize;

    if let Some(s) = line_slice.as_str() {
        if s.is_ascii() {
            return line_start_char + target_utf16.min(s.len());
        }
    }

    let mut seen_utf16 = 0usize;
    let mut chars_in_line = 0usize;
    for ch in line_slice.chars() {
        let u16_len = ch.len_utf16();
        if seen_utf16 + u16_len > target_utf16 {
            break;
        }
        seen_utf16 += u16_len;
        chars_in_line += 1;
        if seen_utf16 == target_utf16 {
            break;
        }
    }
    line_start_char + chars_in_line
}

// Apply one LSP change to a rope buffer; no range means full replacement.
pub(crate) fn apply_incremental_change_rope(text: &mut Rope, change: &TextDocumentContentChangeEvent) {
    if let Some(range) = &change.range {
        let start_char = position_to_char_idx(text, range.start);
        let end_char = position_to_char_idx(text, range.end);
        let (s, e) = if start_char <= end_char {
            (start_char, end_char)
        } else {
            (end_char, start_char)
        };
        if s != e {
            text.remove(s..e);
        }
        if !change.text.is_empty() {
            text.insert(s, &change.text);
        }
    } else {
        *text = Rope::from_str(&change.text);
    }
}

/// Text of the cursor's line up to the cursor.
pub(crate) fn line_prefix(text: &Rope, pos: Position) -> String {
    let char_idx = position_to_char_idx(text, pos);
    let line_idx = text.char_to_line(char_idx);
    let line_start = text.line_to_char(line_idx);
    text.slice(line_start..char_idx).to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Identifier under the cursor, with a trailing `$` marker kept, and its
/// range in UTF-16 columns.
pub(crate) fn word_at_position(text: &Rope, pos: Position) -> Option<(String, Range)> {
    let line_idx = pos.line as usize;
    if line_idx >= text.len_lines() {
        return None;
    }
    let line: Vec<char> = text.line(line_idx).chars().collect();
    let cursor = position_to_char_idx(text, pos) - text.line_to_char(line_idx);

    let mut start = cursor.min(line.len());
    while start > 0 && is_word_char(line[start - 1]) {
        start -= 1;
    }
    let mut end = cursor.min(line.len());
    while end < line.len() && is_word_char(line[end]) {
        end += 1;
    }
    if start == end {
        return None;
    }
    if line.get(end) == Some(&'$') {
        end += 1;
    }

    let utf16 = |n: usize| line[..n].iter().map(|c| c.len_utf16() as u32).sum::<u32>();
    let range = Range::new(Position::new(pos.line, utf16(start)), Position::new(pos.line, utf16(end)));
    Some((line[start..end].iter().collect(), range))
}
