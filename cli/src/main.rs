use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tess_core::{Analysis, Analyzer, LintConfig, MaskedText, Severity};

#[cfg(test)]
mod main_test;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "tess_core=debug,tess_cli=info";

#[derive(Debug, Parser)]
#[command(name = "tess", author, version, about = "Lint Tesseract sources", long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lint source files and report findings.
    Check {
        #[arg(value_name = "FILE", required = true, value_parser = parse_sanitized_path)]
        files: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Only report error-severity findings
        #[arg(long)]
        errors_only: bool,
        /// Lint configuration (defaults to ./tess.toml when present)
        #[arg(long, value_name = "FILE", value_parser = parse_sanitized_path)]
        config: Option<PathBuf>,
    },
    /// Print a file with string contents blanked, as the checks see it.
    Mask {
        #[arg(value_name = "FILE", value_parser = parse_sanitized_path)]
        file: PathBuf,
        /// Also blank comment bodies
        #[arg(long)]
        code: bool,
    },
}

fn read_file_content(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path.display()))
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);

    for comp in p.components() {
        if matches!(comp, Component::ParentDir) {
            return Err(anyhow::anyhow!(
                "Parent directory components ('..') are not allowed in file paths."
            ));
        }
    }

    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `TESS_TRACE=1` logs with the default filter; any other value is used as
/// the filter itself.
fn maybe_init_tracing() {
    let raw = match std::env::var("TESS_TRACE") {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<LintConfig> {
    match explicit {
        Some(path) => LintConfig::load(path),
        None => {
            let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
            LintConfig::discover(&cwd)
        }
    }
}

fn keep_finding(severity: Severity, errors_only: bool) -> bool {
    !errors_only || severity == Severity::Error
}

/// `path:line:col: severity[code]: message`, one-based.
fn render_text(path: &Path, analysis: &Analysis, errors_only: bool) -> Vec<String> {
    analysis
        .located()
        .filter(|(_, f)| keep_finding(f.severity, errors_only))
        .map(|(pos, f)| format!("{}:{}: {}[{}]: {}", path.display(), pos, f.severity, f.kind, f.message))
        .collect()
}

fn render_json(path: &Path, analysis: &Analysis, errors_only: bool) -> serde_json::Value {
    let mut value = analysis.to_json();
    if errors_only {
        if let Some(findings) = value.get_mut("findings").and_then(|f| f.as_array_mut()) {
            findings.retain(|f| f["severity"] == "error");
        }
    }
    value["path"] = serde_json::Value::String(path.display().to_string());
    value
}

fn run_check(
    files: &[PathBuf],
    format: OutputFormat,
    errors_only: bool,
    config: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let analyzer = Analyzer::with_config(load_config(config)?);
    let mut errors = 0usize;
    let mut warnings = 0usize;
    let mut reports = Vec::new();

    for path in files {
        let src = read_file_content(path)?;
        let analysis = analyzer.analyze(src);
        tracing::info!(file = %path.display(), findings = analysis.findings.len(), "checked");
        errors += analysis.error_count();
        warnings += analysis.warning_count();
        match format {
            OutputFormat::Text => {
                for line in render_text(path, &analysis, errors_only) {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => reports.push(render_json(path, &analysis, errors_only)),
        }
    }

    match format {
        OutputFormat::Text => {
            if errors_only {
                eprintln!("{} file(s) checked: {} error(s)", files.len(), errors);
            } else {
                eprintln!("{} file(s) checked: {} error(s), {} warning(s)", files.len(), errors, warnings);
            }
        }
        OutputFormat::Json => {
            let out = serde_json::to_string_pretty(&reports).context("Failed to encode report")?;
            println!("{}", out);
        }
    }

    Ok(if errors > 0 { ExitCode::from(1) } else { ExitCode::SUCCESS })
}

fn run_mask(file: &Path, code: bool) -> anyhow::Result<ExitCode> {
    let src = read_file_content(file)?;
    let masked = MaskedText::new(&src);
    let text = if code { masked.code() } else { masked.strings() };
    print!("{}", text);
    Ok(ExitCode::SUCCESS)
}

fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    match args.command {
        Commands::Check {
            files,
            format,
            errors_only,
            config,
        } => run_check(&files, format, errors_only, config.as_deref()),
        Commands::Mask { file, code } => run_mask(&file, code),
    }
}

fn main() -> ExitCode {
    maybe_init_tracing();

    let args = CliArgs::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
