use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use tess_core::{BracketSource, LintConfig, Severity};
use tokio::sync::Semaphore;
use tower_lsp::lsp_types::{ConfigurationItem, MessageType};
use tracing::{debug, warn};

use super::state::TessLanguageServer;
use crate::analyzer::TessAnalyzer;

pub(crate) const CONFIG_SECTION: &str = "tesseract.lint";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServerConfig {
    pub(crate) lint: LintConfig,
    /// Quiet period after an edit before diagnostics are recomputed.
    pub(crate) debounce_ms: u64,
    pub(crate) open_delay_ms: u64,
    pub(crate) max_concurrent: usize,
    /// Diagnostics published per document.
    pub(crate) max_findings: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            lint: LintConfig::default(),
            debounce_ms: 250,
            open_delay_ms: 150,
            max_concurrent: 2,
            max_findings: 200,
        }
    }
}

/// Client settings under `tesseract.lint`. Anything left out falls back to
/// the workspace `tess.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct TessLintSection {
    disabled: Option<Vec<String>>,
    severity: Option<BTreeMap<String, Severity>>,
    bracket_source: Option<BracketSource>,
    construct_lookahead: Option<usize>,
    max_findings: Option<usize>,
    debounce_ms: Option<u64>,
    max_concurrent: Option<usize>,
}

impl ServerConfig {
    pub(crate) fn from_section(workspace: LintConfig, value: serde_json::Value) -> anyhow::Result<Self> {
        let section: TessLintSection = if value.is_null() {
            TessLintSection::default()
        } else {
            serde_json::from_value(value)?
        };

        let mut lint = workspace;
        if let Some(disabled) = section.disabled {
            lint.disabled = disabled;
        }
        if let Some(severity) = section.severity {
            lint.severity.extend(severity);
        }
        if let Some(source) = section.bracket_source {
            lint.bracket_source = source;
        }
        if let Some(v) = section.construct_lookahead {
            lint.construct_lookahead = v;
        }
        if let Some(v) = section.max_findings.filter(|v| *v > 0) {
            lint.max_findings = Some(v);
        }
        lint.validate()?;

        let mut config = Self::default();
        if let Some(v) = lint.max_findings {
            config.max_findings = v;
        }
        config.lint = lint;
        if let Some(v) = section.debounce_ms {
            config.debounce_ms = v;
        }
        if let Some(v) = section.max_concurrent.filter(|v| *v > 0) {
            config.max_concurrent = v;
        }
        Ok(config)
    }
}

impl TessLanguageServer {
    pub(crate) async fn load_config(&self) {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];

        let value = match self.client.configuration(items).await {
            Ok(values) => values.into_iter().next().unwrap_or_default(),
            Err(err) => {
                debug!(%err, "client did not answer workspace/configuration");
                serde_json::Value::Null
            }
        };

        let workspace = self.workspace_lint.lock().map(|g| g.clone()).unwrap_or_default();
        match ServerConfig::from_section(workspace, value) {
            Ok(config) => self.apply_config(config),
            Err(err) => {
                warn!("ignoring {} settings: {:#}", CONFIG_SECTION, err);
                let _ = self
                    .client
                    .show_message(MessageType::WARNING, format!("Tesseract: invalid {} settings: {:#}", CONFIG_SECTION, err))
                    .await;
            }
        }
    }

    pub(crate) fn build_analyzer(config: &ServerConfig) -> TessAnalyzer {
        TessAnalyzer::with_config(config.lint.clone()).with_limit(Some(config.max_findings))
    }

    pub(crate) fn apply_config(&self, config: ServerConfig) {
        if let Ok(mut analyzer) = self.analyzer.lock() {
            *analyzer = Arc::new(Self::build_analyzer(&config));
        }
        if let Ok(mut sem) = self.compute_limiter.lock() {
            *sem = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        }
        if let Ok(mut guard) = self.config.lock() {
            *guard = config;
        }
    }
}
