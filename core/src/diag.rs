use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// What a finding is about. The serialized form is the stable finding code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    MismatchedBracket,
    UnexpectedClose,
    UnclosedBracket,
    MissingKeywordMarker,
    UnclosedString,
    UnprefixedBuiltin,
    UndeclaredVariable,
    EmptyTypeTag,
    MalformedTypeTag,
    InvalidTypeTag,
    DictMissingBrace,
    UnclosedDict,
    IncompleteConstruct,
    MissingTerminator,
}

impl FindingKind {
    pub const ALL: [FindingKind; 14] = [
        FindingKind::MismatchedBracket,
        FindingKind::UnexpectedClose,
        FindingKind::UnclosedBracket,
        FindingKind::MissingKeywordMarker,
        FindingKind::UnclosedString,
        FindingKind::UnprefixedBuiltin,
        FindingKind::UndeclaredVariable,
        FindingKind::EmptyTypeTag,
        FindingKind::MalformedTypeTag,
        FindingKind::InvalidTypeTag,
        FindingKind::DictMissingBrace,
        FindingKind::UnclosedDict,
        FindingKind::IncompleteConstruct,
        FindingKind::MissingTerminator,
    ];

    pub fn code(self) -> &'static str {
        match self {
            FindingKind::MismatchedBracket => "mismatched-bracket",
            FindingKind::UnexpectedClose => "unexpected-close",
            FindingKind::UnclosedBracket => "unclosed-bracket",
            FindingKind::MissingKeywordMarker => "missing-keyword-marker",
            FindingKind::UnclosedString => "unclosed-string",
            FindingKind::UnprefixedBuiltin => "unprefixed-builtin",
            FindingKind::UndeclaredVariable => "undeclared-variable",
            FindingKind::EmptyTypeTag => "empty-type-tag",
            FindingKind::MalformedTypeTag => "malformed-type-tag",
            FindingKind::InvalidTypeTag => "invalid-type-tag",
            FindingKind::DictMissingBrace => "dict-missing-brace",
            FindingKind::UnclosedDict => "unclosed-dict",
            FindingKind::IncompleteConstruct => "incomplete-construct",
            FindingKind::MissingTerminator => "missing-terminator",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// The two heuristic checks report warnings; everything else is an error.
    ///
    /// Editors that reported every finding as an error can get that back
    /// through `[severity]` overrides. With the defaults, a file holding only
    /// these two kinds still passes `tess check` with exit code 0.
    pub fn default_severity(self) -> Severity {
        match self {
            FindingKind::UndeclaredVariable | FindingKind::MissingTerminator => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Half-open byte range `start..end` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Finding {
    #[serde(flatten)]
    pub span: Span,
    pub message: String,
    pub severity: Severity,
    #[serde(rename = "code")]
    pub kind: FindingKind,
}

impl Finding {
    pub fn new(kind: FindingKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            severity: kind.default_severity(),
            kind,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {} at {}", self.severity, self.kind, self.message, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for kind in FindingKind::ALL {
            assert_eq!(FindingKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(FindingKind::from_code("no-such-code"), None);
    }

    #[test]
    fn serde_name_matches_code() {
        for kind in FindingKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.code().to_string()));
        }
    }

    #[test]
    fn finding_serializes_flat() {
        let finding = Finding::new(FindingKind::UnclosedString, Span::new(3, 7), "Unclosed string literal");
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "start": 3,
                "end": 7,
                "message": "Unclosed string literal",
                "severity": "error",
                "code": "unclosed-string",
            })
        );
    }

    #[test]
    fn span_never_inverts() {
        let span = Span::new(5, 2);
        assert_eq!(span, Span::at(5));
        assert_eq!(Span::new(4, 10).clamp(6), Span::new(4, 6));
        assert_eq!(Span::new(8, 10).clamp(6), Span::at(6));
    }

    #[test]
    fn display() {
        let finding = Finding::new(FindingKind::MissingTerminator, Span::at(9), "Missing semicolon at end of statement");
        assert_eq!(
            finding.to_string(),
            "warning[missing-terminator]: Missing semicolon at end of statement at 9..9"
        );
    }
}
