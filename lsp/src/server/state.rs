use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use ropey::Rope;
use tess_core::{FindingStore, LintConfig};
use tokio::sync::Semaphore;
use tower_lsp::Client;
use tower_lsp::lsp_types::Url;

use super::config::ServerConfig;
use crate::analyzer::{AnalysisResult, TessAnalyzer};

/// An open document and the analysis of its current version.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
    pub(crate) cached_analysis: Option<Arc<AnalysisResult>>,
    /// Last computed analysis keyed by the hash of the text it ran on.
    /// Survives edits so an undo back to known text is not re-analyzed.
    pub(crate) last_analysis: Option<(u64, Arc<AnalysisResult>)>,
    pub(crate) debounce_seq: u64,
}

impl Document {
    pub(crate) fn new(text: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(text),
            version,
            ..Self::default()
        }
    }

    pub(crate) fn reusable_analysis(&self, hash: u64) -> Option<Arc<AnalysisResult>> {
        match &self.last_analysis {
            Some((h, analysis)) if *h == hash => Some(analysis.clone()),
            _ => None,
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.cached_analysis = None;
        self.debounce_seq = self.debounce_seq.wrapping_add(1);
    }
}

pub(crate) struct TessLanguageServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    pub(crate) analyzer: Mutex<Arc<TessAnalyzer>>,
    pub(crate) config: Mutex<ServerConfig>,
    /// `tess.toml` of the workspace root; client settings layer on top.
    pub(crate) workspace_lint: Mutex<LintConfig>,
    pub(crate) published: Arc<Mutex<FindingStore>>,
    pub(crate) compute_limiter: Mutex<Arc<Semaphore>>,
}

impl TessLanguageServer {
    pub(crate) fn new(client: Client) -> Self {
        let config = ServerConfig::default();
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            analyzer: Mutex::new(Arc::new(Self::build_analyzer(&config))),
            compute_limiter: Mutex::new(Arc::new(Semaphore::new(config.max_concurrent))),
            config: Mutex::new(config),
            workspace_lint: Mutex::new(LintConfig::default()),
            published: Arc::new(Mutex::new(FindingStore::new())),
        }
    }

    pub(crate) fn current_analyzer(&self) -> Arc<TessAnalyzer> {
        match self.analyzer.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn current_limiter(&self) -> Arc<Semaphore> {
        match self.compute_limiter.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn current_config(&self) -> ServerConfig {
        self.config.lock().map(|g| g.clone()).unwrap_or_default()
    }
}
