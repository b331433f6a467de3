use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::check;
use crate::diag::{FindingKind, Severity};

/// File looked up by [`LintConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "tess.toml";

pub const MAX_CONSTRUCT_LOOKAHEAD: usize = 64;

/// Which text the bracket matcher walks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BracketSource {
    /// Strings and comments blanked; brackets inside them are ignored.
    #[default]
    Code,
    /// The document as written.
    Raw,
}

/// Lint options, usually read from `tess.toml`:
///
/// ```toml
/// disabled = ["terminators"]
/// bracket-source = "code"
/// construct-lookahead = 3
/// max-findings = 200
///
/// [severity]
/// undeclared-variable = "error"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LintConfig {
    /// Check names to skip.
    pub disabled: Vec<String>,
    /// Severity overrides keyed by finding code.
    pub severity: BTreeMap<String, Severity>,
    pub bracket_source: BracketSource,
    /// Lines after a header searched for its opening `{`.
    pub construct_lookahead: usize,
    /// Cap on the diagnostics the language server publishes per document.
    /// The analyzer itself always returns every finding.
    pub max_findings: Option<usize>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            severity: BTreeMap::new(),
            bracket_source: BracketSource::Code,
            construct_lookahead: 3,
            max_findings: None,
        }
    }
}

impl LintConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LintConfig = toml::from_str(text).context("invalid lint configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Failed to load config {}", path.display()))
    }

    /// `dir/tess.toml` when present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.construct_lookahead > MAX_CONSTRUCT_LOOKAHEAD {
            bail!(
                "construct-lookahead {} is above the limit of {}",
                self.construct_lookahead,
                MAX_CONSTRUCT_LOOKAHEAD
            );
        }
        let names = check::check_names();
        for name in &self.disabled {
            if !names.contains(&name.as_str()) {
                bail!("unknown check '{}' in disabled (known: {})", name, names.join(", "));
            }
        }
        for code in self.severity.keys() {
            if FindingKind::from_code(code).is_none() {
                bail!("unknown finding code '{}' in severity", code);
            }
        }
        Ok(())
    }

    pub fn is_enabled(&self, check: &str) -> bool {
        !self.disabled.iter().any(|d| d == check)
    }

    pub fn severity_for(&self, kind: FindingKind) -> Severity {
        self.severity
            .get(kind.code())
            .copied()
            .unwrap_or_else(|| kind.default_severity())
    }
}
