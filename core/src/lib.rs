pub mod analyzer;
pub mod check;
pub mod config;
pub mod diag;
pub mod publish;
mod scan;
pub mod text;
pub mod vocab;

#[cfg(test)]
mod analyzer_test;

pub use analyzer::{Analysis, Analyzer, analyze};
pub use config::{BracketSource, CONFIG_FILE_NAME, LintConfig, MAX_CONSTRUCT_LOOKAHEAD};
pub use diag::{Finding, FindingKind, Severity, Span};
pub use publish::{FindingSink, FindingStore};
pub use text::{LineCol, LineIndex, MaskedText, SourceText, mask, offset_to_line_col};
