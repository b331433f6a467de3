use std::path::{Component, Path};

use anyhow::Context;
use tess_core::LintConfig;
use tower_lsp::lsp_types::DiagnosticSeverity;

use crate::analyzer::{AnalysisResult, TessAnalyzer};

const USAGE: &str = "Usage: tess-lsp --analyze [--errors-only] <relative-file-path>\n  --analyze <file>     : Full analysis with JSON output\n  --errors-only        : Show only errors in simple format";

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct AnalyzeRequest {
    pub(crate) path: String,
    pub(crate) errors_only: bool,
}

/// `None` when the server should start normally.
pub(crate) fn parse_analyze_args(args: &[String]) -> anyhow::Result<Option<AnalyzeRequest>> {
    let Some(i) = args.iter().position(|a| a == "--analyze") else {
        return Ok(None);
    };
    let mut path_index = i + 1;
    while path_index < args.len() && args[path_index].starts_with("--") {
        path_index += 1;
    }
    let path = args.get(path_index).cloned().ok_or_else(|| anyhow::anyhow!(USAGE))?;
    Ok(Some(AnalyzeRequest {
        path,
        errors_only: args.iter().any(|a| a == "--errors-only"),
    }))
}

pub(crate) fn try_cli_analyze() -> anyhow::Result<Option<String>> {
    let args: Vec<String> = std::env::args().collect();
    let Some(request) = parse_analyze_args(&args)? else {
        return Ok(None);
    };

    let content = read_file_content(&request.path)?;
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    let analyzer = TessAnalyzer::with_config(LintConfig::discover(&cwd)?);
    let analysis = analyzer.analyze(&content);

    if request.errors_only {
        return Ok(Some(render_errors(&analysis)));
    }
    let output = serde_json::json!({
        "diagnostics": analysis.diagnostics,
        "errors": analysis.errors,
        "warnings": analysis.warnings,
    });
    Ok(Some(serde_json::to_string_pretty(&output)?))
}

pub(crate) fn render_errors(analysis: &AnalysisResult) -> String {
    let errors: Vec<String> = analysis
        .diagnostics
        .iter()
        .filter(|d| d.severity == Some(DiagnosticSeverity::ERROR))
        .map(|d| {
            format!(
                "Line {}:{}: {}",
                d.range.start.line + 1,
                d.range.start.character + 1,
                d.message
            )
        })
        .collect();

    if errors.is_empty() {
        "No errors found".to_string()
    } else {
        errors.join("\n")
    }
}

pub(crate) fn is_safe_path(path: &str) -> bool {
    let path = Path::new(path);

    if path.as_os_str().is_empty() {
        return false;
    }
    if path.is_absolute() {
        return false;
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return false;
    }

    let s = path.to_string_lossy();
    let suspicious = ['\0', '\n', '\r', '\t'];
    if s.chars().any(|c| suspicious.contains(&c)) {
        return false;
    }
    // `C:` drive prefixes
    let bytes = s.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' {
        return false;
    }
    true
}

pub(crate) fn read_file_content(path: &str) -> anyhow::Result<String> {
    if !is_safe_path(path) {
        return Err(anyhow::anyhow!("Unsafe file path: {}", path));
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path))
}
