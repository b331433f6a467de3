//! Runs every enabled check over one document snapshot.

use serde_json::json;
use tracing::{debug, debug_span};

use crate::check::{Check, CheckContext, default_checks};
use crate::config::LintConfig;
use crate::diag::{Finding, Severity};
use crate::text::{LineCol, MaskedText, SourceText};

pub struct Analyzer {
    config: LintConfig,
    checks: Vec<Box<dyn Check>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::with_config(LintConfig::default())
    }

    pub fn with_config(config: LintConfig) -> Self {
        let checks = default_checks()
            .into_iter()
            .filter(|c| config.is_enabled(c.name()))
            .collect();
        Self { config, checks }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Names of the checks this analyzer runs, in order.
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn analyze(&self, text: impl Into<SourceText>) -> Analysis {
        let source = text.into();
        let masked = MaskedText::new(source.as_str());
        let cx = CheckContext {
            source: &source,
            masked: &masked,
            config: &self.config,
        };

        let mut findings = Vec::new();
        for check in &self.checks {
            let _span = debug_span!("check", name = check.name()).entered();
            let before = findings.len();
            check.run(&cx, &mut findings);
            debug!(found = findings.len() - before, "check finished");
        }

        let len = source.len();
        for finding in &mut findings {
            finding.span = finding.span.clamp(len);
            finding.severity = self.config.severity_for(finding.kind);
        }

        Analysis { source, findings }
    }
}

/// Findings for one snapshot, together with the snapshot they refer to.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub source: SourceText,
    pub findings: Vec<Finding>,
}

impl Analysis {
    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings.iter().filter(|f| f.severity == Severity::Warning).count()
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(Finding::is_error)
    }

    /// Findings with the line/column of their start.
    pub fn located(&self) -> impl Iterator<Item = (LineCol, &Finding)> {
        self.findings
            .iter()
            .map(|f| (self.source.line_col(f.span.start), f))
    }

    pub fn to_json(&self) -> serde_json::Value {
        let findings: Vec<serde_json::Value> = self
            .located()
            .map(|(pos, f)| {
                let end = self.source.line_col(f.span.end);
                json!({
                    "start": f.span.start,
                    "end": f.span.end,
                    "line": pos.line,
                    "column": pos.column,
                    "endLine": end.line,
                    "endColumn": end.column,
                    "severity": f.severity,
                    "code": f.kind,
                    "message": f.message,
                })
            })
            .collect();
        json!({
            "findings": findings,
            "errors": self.error_count(),
            "warnings": self.warning_count(),
        })
    }
}

/// Analyzes `text` with the default configuration.
pub fn analyze(text: &str) -> Vec<Finding> {
    Analyzer::new().analyze(text).findings
}
