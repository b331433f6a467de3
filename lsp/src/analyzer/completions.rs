use once_cell::sync::Lazy;
use regex::Regex;
use tess_core::vocab::{self, Builtin, ContainerType, Keyword, KeywordKind};
use tower_lsp::lsp_types::*;

// `::` followed by the part of a built-in name typed so far.
static NAMESPACE_CONTEXT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"::([A-Za-z_]\w*)?$").ok());

/// Typed built-in prefix when the cursor sits right after `::`.
pub fn namespace_prefix(line_prefix: &str) -> Option<&str> {
    let re = NAMESPACE_CONTEXT.as_ref()?;
    let caps = re.captures(line_prefix)?;
    Some(caps.get(1).map_or("", |m| m.as_str()))
}

/// Completion candidates for the text left of the cursor on its line.
///
/// After `::` only built-ins are offered, filtered by what was typed.
/// Everywhere else keywords, container types and prefixed built-ins.
pub fn completion_items(line_prefix: &str) -> Vec<CompletionItem> {
    if let Some(typed) = namespace_prefix(line_prefix) {
        return vocab::BUILTINS
            .iter()
            .filter(|b| b.name.starts_with(typed))
            .map(|b| builtin_item(b, false))
            .collect();
    }

    let mut items = Vec::with_capacity(vocab::KEYWORDS.len() + vocab::CONTAINER_TYPES.len() + vocab::BUILTINS.len());
    items.extend(vocab::KEYWORDS.iter().map(keyword_item));
    items.extend(vocab::CONTAINER_TYPES.iter().map(container_item));
    items.extend(vocab::BUILTINS.iter().map(|b| builtin_item(b, true)));
    items
}

fn keyword_item(k: &Keyword) -> CompletionItem {
    let kind = match k.kind {
        KeywordKind::Operator => CompletionItemKind::OPERATOR,
        KeywordKind::Literal => CompletionItemKind::VALUE,
        KeywordKind::Type => CompletionItemKind::CLASS,
        _ => CompletionItemKind::KEYWORD,
    };
    CompletionItem {
        label: k.spelled.to_string(),
        kind: Some(kind),
        detail: Some(k.detail.to_string()),
        documentation: Some(markdown(format!("```tesseract\n{}\n```", k.doc))),
        ..Default::default()
    }
}

fn container_item(t: &ContainerType) -> CompletionItem {
    CompletionItem {
        label: format!("<{}>", t.name),
        kind: Some(CompletionItemKind::CLASS),
        detail: Some(t.detail.to_string()),
        documentation: Some(markdown(format!("```tesseract\n{}\n```", t.example))),
        ..Default::default()
    }
}

// Outside a `::` context the label carries the prefix so accepting it
// produces a call the linter accepts.
fn builtin_item(b: &Builtin, with_prefix: bool) -> CompletionItem {
    let label = if with_prefix {
        format!("{}{}", vocab::NAMESPACE_PREFIX, b.name)
    } else {
        b.name.to_string()
    };
    CompletionItem {
        label,
        kind: Some(CompletionItemKind::FUNCTION),
        detail: Some(b.detail.to_string()),
        documentation: Some(markdown(format!("{}\n\n```tesseract\n{}\n```", b.doc, b.signature))),
        ..Default::default()
    }
}

fn markdown(value: String) -> Documentation {
    Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    })
}

/// Markdown shown when hovering `word`, if it is part of the vocabulary.
pub fn hover_markdown(word: &str) -> Option<String> {
    if let Some(k) = vocab::keyword_spelled(word) {
        return Some(format!("**{}** {}\n\n```tesseract\n{}\n```", k.spelled, k.detail, k.doc));
    }
    let name = word.strip_prefix(vocab::NAMESPACE_PREFIX).unwrap_or(word);
    if let Some(b) = vocab::builtin(name) {
        return Some(format!("**{}**\n\n{}\n\n```tesseract\n{}\n```", b.detail, b.doc, b.signature));
    }
    let name = name.trim_start_matches('<').trim_end_matches('>');
    vocab::container_type(name).map(|t| format!("**<{}>** {}\n\n```tesseract\n{}\n```", t.name, t.detail, t.example))
}
