use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tess_core::{FindingSink, FindingStore};
use tokio::sync::Semaphore;
use tokio::task;
use tokio::time::{Duration, sleep};
use tower_lsp::Client;
use tower_lsp::lsp_types::{request::WorkDoneProgressCreate, *};
use tracing::debug;

use crate::analyzer::{AnalysisResult, TessAnalyzer, hover_markdown};

use super::state::{Document, TessLanguageServer};
use super::text::word_at_position;
use super::utils::compute_content_hash;

async fn run_analysis(analyzer: Arc<TessAnalyzer>, limiter: Arc<Semaphore>, content: String) -> Option<AnalysisResult> {
    let _permit = limiter.acquire_owned().await.ok()?;
    task::spawn_blocking(move || analyzer.analyze(&content)).await.ok()
}

/// Stores `computed` when the document is still at the snapshot it was
/// computed from. Returns false when a newer edit superseded it.
fn store_analysis(doc: &mut Document, version: i32, seq: u64, hash: u64, computed: &Arc<AnalysisResult>) -> bool {
    if doc.version != version || doc.debounce_seq != seq {
        return false;
    }
    doc.cached_analysis = Some(computed.clone());
    doc.last_analysis = Some((hash, computed.clone()));
    true
}

impl TessLanguageServer {
    pub(crate) async fn validate_document(&self, uri: &Url) -> Vec<Diagnostic> {
        match self.get_or_compute_analysis(uri).await {
            Some(analysis) => analysis.diagnostics.clone(),
            None => Vec::new(),
        }
    }

    pub(crate) fn get_hover_info(&self, uri: &Url, position: Position) -> Option<Hover> {
        let (word, range) = {
            let doc = self.documents.get(uri)?;
            word_at_position(&doc.content, position)?
        };
        let value = hover_markdown(&word)?;
        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: Some(range),
        })
    }

    pub(crate) async fn get_or_compute_analysis(&self, uri: &Url) -> Option<Arc<AnalysisResult>> {
        let (content_snapshot, version_snapshot, seq_snapshot, hash, reusable) = {
            let doc = self.documents.get(uri)?;
            if let Some(cached) = doc.cached_analysis.clone() {
                return Some(cached);
            }
            let content = doc.content.to_string();
            let hash = compute_content_hash(&content);
            (content, doc.version, doc.debounce_seq, hash, doc.reusable_analysis(hash))
        };

        let computed = match reusable {
            Some(previous) => previous,
            None => Arc::new(run_analysis(self.current_analyzer(), self.current_limiter(), content_snapshot).await?),
        };

        if let Some(mut doc) = self.documents.get_mut(uri) {
            store_analysis(&mut doc, version_snapshot, seq_snapshot, hash, &computed);
        }
        Some(computed)
    }

    /// Recomputes diagnostics for `uri` after `delay_ms` and publishes them,
    /// unless the document moved past `scheduled_version` in the meantime.
    pub(crate) fn schedule_diagnostics(&self, uri: Url, scheduled_version: i32, delay_ms: u64) {
        let documents = self.documents.clone();
        let client = self.client.clone();
        let published = self.published.clone();
        let analyzer = self.current_analyzer();
        let limiter = self.current_limiter();
        tokio::spawn(async move {
            publish_after(documents, client, published, analyzer, limiter, uri, scheduled_version, delay_ms).await;
        });
    }

    /// Drops every cached result and re-checks all open documents; used after
    /// the lint configuration changed.
    pub(crate) fn reanalyze_open_documents(&self) {
        let mut pending = Vec::new();
        for mut entry in self.documents.iter_mut() {
            entry.invalidate();
            entry.last_analysis = None;
            pending.push((entry.key().clone(), entry.version));
        }
        debug!(documents = pending.len(), "re-checking open documents");
        for (uri, version) in pending {
            self.schedule_diagnostics(uri, version, 0);
        }
    }

    pub(crate) async fn forget_document(&self, uri: &Url) {
        self.documents.remove(uri);
        if let Ok(mut store) = self.published.lock() {
            store.clear(uri.as_str());
        }
        self.client.publish_diagnostics(uri.clone(), Vec::new(), None).await;
    }
}

#[allow(clippy::too_many_arguments)]
async fn publish_after(
    documents: Arc<DashMap<Url, Document>>,
    client: Client,
    published: Arc<Mutex<FindingStore>>,
    analyzer: Arc<TessAnalyzer>,
    limiter: Arc<Semaphore>,
    uri: Url,
    scheduled_version: i32,
    delay_ms: u64,
) {
    if delay_ms > 0 {
        sleep(Duration::from_millis(delay_ms)).await;
    }

    let (content_snapshot, seq_snapshot, version_snapshot, reusable) = match documents.get(&uri) {
        Some(doc) => {
            if doc.version != scheduled_version {
                return;
            }
            let content = doc.content.to_string();
            let reusable = doc.cached_analysis.clone();
            (content, doc.debounce_seq, doc.version, reusable)
        }
        None => return,
    };
    let hash = compute_content_hash(&content_snapshot);
    let reusable = reusable.or_else(|| documents.get(&uri).and_then(|doc| doc.reusable_analysis(hash)));

    let token = NumberOrString::String(format!("tess:diag:{}", uri));
    let _ = client
        .send_request::<WorkDoneProgressCreate>(WorkDoneProgressCreateParams { token: token.clone() })
        .await;
    let _ = client
        .send_notification::<notification::Progress>(ProgressParams {
            token: token.clone(),
            value: ProgressParamsValue::WorkDone(WorkDoneProgress::Begin(WorkDoneProgressBegin {
                title: "Tesseract: Checking".to_string(),
                cancellable: Some(false),
                message: Some(uri.to_string()),
                percentage: None,
            })),
        })
        .await;

    let computed = match reusable {
        Some(previous) => {
            debug!(%uri, "content unchanged since last analysis");
            Some(previous)
        }
        None => run_analysis(analyzer, limiter, content_snapshot).await.map(Arc::new),
    };

    if let Some(computed) = computed {
        let current = match documents.get_mut(&uri) {
            Some(mut doc) => store_analysis(&mut doc, version_snapshot, seq_snapshot, hash, &computed),
            None => false,
        };
        // A newer edit owns the next publish.
        let accepted = current
            && published
                .lock()
                .map(|mut store| store.publish(uri.as_str(), version_snapshot, computed.findings.to_vec()))
                .unwrap_or(false);
        if accepted {
            debug!(%uri, version = version_snapshot, errors = computed.errors, warnings = computed.warnings, "publishing");
            client
                .publish_diagnostics(uri.clone(), computed.diagnostics.clone(), Some(version_snapshot))
                .await;
        }
    }

    let _ = client
        .send_notification::<notification::Progress>(ProgressParams {
            token,
            value: ProgressParamsValue::WorkDone(WorkDoneProgress::End(WorkDoneProgressEnd {
                message: Some("Checking complete".to_string()),
            })),
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_snapshots_are_not_stored() {
        let analysis = Arc::new(TessAnalyzer::new().analyze("let$ x = 1;"));
        let mut doc = Document::new("let$ x = 1;", 3);

        assert!(!store_analysis(&mut doc, 2, 0, 7, &analysis));
        assert!(doc.cached_analysis.is_none());

        doc.invalidate();
        assert!(!store_analysis(&mut doc, 3, 0, 7, &analysis));
        assert!(store_analysis(&mut doc, 3, 1, 7, &analysis));
        assert!(doc.cached_analysis.is_some());
        assert!(doc.reusable_analysis(7).is_some());
        assert!(doc.reusable_analysis(8).is_none());
    }

    #[test]
    fn last_analysis_survives_invalidation() {
        let analysis = Arc::new(TessAnalyzer::new().analyze("let$ x = 1"));
        let mut doc = Document::new("let$ x = 1", 1);
        let hash = compute_content_hash("let$ x = 1");
        assert!(store_analysis(&mut doc, 1, 0, hash, &analysis));

        doc.invalidate();
        assert!(doc.cached_analysis.is_none());
        let reused = doc.reusable_analysis(hash).unwrap();
        assert_eq!(reused.warnings, 1);
    }
}
