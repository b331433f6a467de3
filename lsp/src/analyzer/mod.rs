use std::sync::Arc;

use tess_core::{Analyzer, Finding, LintConfig, Severity, SourceText};
use tower_lsp::lsp_types::*;
use tracing::debug;

mod completions;

pub use completions::{completion_items, hover_markdown, namespace_prefix};

/// Findings of one document version, converted for the editor.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
    pub findings: Arc<[Finding]>,
    pub errors: usize,
    pub warnings: usize,
}

/// Lint engine configured for one workspace.
pub struct TessAnalyzer {
    inner: Analyzer,
    /// Diagnostics kept per document; `None` keeps all of them.
    limit: Option<usize>,
}

impl Default for TessAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TessAnalyzer {
    pub fn new() -> Self {
        Self {
            inner: Analyzer::new(),
            limit: None,
        }
    }

    pub fn with_config(config: LintConfig) -> Self {
        Self {
            limit: config.max_findings,
            inner: Analyzer::with_config(config),
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn config(&self) -> &LintConfig {
        self.inner.config()
    }

    /// Counts cover every finding; the lists stop at the limit.
    pub fn analyze(&self, content: &str) -> AnalysisResult {
        let mut analysis = self.inner.analyze(content);
        let errors = analysis.error_count();
        let warnings = analysis.warning_count();
        if let Some(limit) = self.limit {
            if analysis.findings.len() > limit {
                debug!(total = analysis.findings.len(), kept = limit, "truncating diagnostics");
                analysis.findings.truncate(limit);
            }
        }
        let diagnostics = analysis
            .findings
            .iter()
            .map(|f| finding_to_diagnostic(&analysis.source, f))
            .collect();
        AnalysisResult {
            diagnostics,
            errors,
            warnings,
            findings: analysis.findings.into(),
        }
    }
}

// LSP columns count UTF-16 code units.
pub fn lsp_position(source: &SourceText, offset: usize) -> Position {
    let pos = source.line_col(offset);
    Position::new(pos.line, source.utf16_col(offset))
}

pub fn finding_to_diagnostic(source: &SourceText, finding: &Finding) -> Diagnostic {
    let severity = match finding.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };
    Diagnostic {
        range: Range::new(
            lsp_position(source, finding.span.start),
            lsp_position(source, finding.span.end),
        ),
        severity: Some(severity),
        code: Some(NumberOrString::String(finding.kind.code().to_string())),
        source: Some("tess".to_string()),
        message: finding.message.clone(),
        ..Default::default()
    }
}
