use tess_core::{CONFIG_FILE_NAME, LintConfig};
use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::{info, warn};

use crate::analyzer::completion_items;

use super::{
    state::{Document, TessLanguageServer},
    text::{apply_incremental_change_rope, line_prefix},
    utils::compute_content_hash,
};

#[tower_lsp::async_trait]
impl LanguageServer for TessLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Tesseract Language Server initializing with params: {:?}", params.root_uri);

        if let Some(root) = params.root_uri.as_ref().and_then(|u| u.to_file_path().ok()) {
            match LintConfig::discover(&root) {
                Ok(lint) => {
                    if let Ok(mut guard) = self.workspace_lint.lock() {
                        *guard = lint;
                    }
                }
                Err(err) => warn!("ignoring {} in {}: {:#}", CONFIG_FILE_NAME, root.display(), err),
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::INCREMENTAL),
                    save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                    ..Default::default()
                })),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![":".to_string(), "<".to_string()]),
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                diagnostic_provider: Some(DiagnosticServerCapabilities::Options(DiagnosticOptions {
                    identifier: Some("tess".to_string()),
                    inter_file_dependencies: false,
                    workspace_diagnostics: false,
                    work_done_progress_options: Default::default(),
                })),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "Tesseract Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Tesseract Language Server initialized");
        let _ = self
            .client
            .log_message(MessageType::INFO, "Tesseract Language Server started")
            .await;
        self.load_config().await;
        self.reanalyze_open_documents();
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Tesseract Language Server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, _params: DidChangeConfigurationParams) {
        self.load_config().await;
        self.reanalyze_open_documents();
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        self.documents
            .insert(uri.clone(), Document::new(&params.text_document.text, version));

        let delay = self.current_config().open_delay_ms;
        self.schedule_diagnostics(uri, version, delay);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        {
            let mut entry = self.documents.entry(uri.clone()).or_default();
            entry.version = version;
            for change in &params.content_changes {
                apply_incremental_change_rope(&mut entry.content, change);
            }
            entry.invalidate();

            // An edit that lands back on analyzed text reuses that result.
            let hash = compute_content_hash(&entry.content.to_string());
            if let Some(previous) = entry.reusable_analysis(hash) {
                entry.cached_analysis = Some(previous);
            }
        }

        let delay = self.current_config().debounce_ms;
        self.schedule_diagnostics(uri, version, delay);
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = match self.documents.get(&uri) {
            Some(doc) => doc.version,
            None => return,
        };
        self.schedule_diagnostics(uri, version, 0);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.forget_document(&params.text_document.uri).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        Ok(self.get_hover_info(uri, position))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let prefix = match self.documents.get(uri) {
            Some(doc) => line_prefix(&doc.content, position),
            None => String::new(),
        };
        Ok(Some(CompletionResponse::Array(completion_items(&prefix))))
    }

    async fn diagnostic(&self, params: DocumentDiagnosticParams) -> Result<DocumentDiagnosticReportResult> {
        let uri = &params.text_document.uri;
        let diagnostics = self.validate_document(uri).await;

        Ok(DocumentDiagnosticReportResult::Report(DocumentDiagnosticReport::Full(
            RelatedFullDocumentDiagnosticReport {
                related_documents: None,
                full_document_diagnostic_report: FullDocumentDiagnosticReport {
                    result_id: None,
                    items: diagnostics,
                },
            },
        )))
    }
}
