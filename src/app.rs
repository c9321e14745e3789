//! Main application state and UI coordination

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::watch;

use crate::core::config::AppConfig;
use crate::core::document::{strip_known_extension, Document, DocumentPatch, DocumentType};
use crate::core::export::{self, delivery, Conversion, ExportFailed, ExportFormat};
use crate::core::storage::{JsonFileBackend, MemoryBackend, StorageBackend};
use crate::core::store::DocumentStore;
use crate::ui::{
    create::CreatePanel, documents::DocumentsPanel, editor::EditorPanel, header::Header,
    home::HomePanel, sidebar::Sidebar,
};

/// How long success messages stay visible
const FLASH_DURATION: Duration = Duration::from_secs(3);

/// Which page is shown in the central panel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Documents,
    Create,
    Editor(String),
}

/// Working copy of the document being edited; written back on save
#[derive(Debug, Clone)]
pub struct EditorState {
    pub id: String,
    pub name: String,
    pub doc_type: DocumentType,
    pub content: String,
    pub dirty: bool,
}

impl EditorState {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            doc_type: doc.doc_type,
            content: doc.content.clone(),
            dirty: false,
        }
    }
}

/// Fields of the create page
#[derive(Debug, Clone)]
pub struct CreateForm {
    pub doc_type: DocumentType,
    pub title: String,
    pub content: String,
}

impl CreateForm {
    pub fn for_type(doc_type: DocumentType) -> Self {
        Self {
            doc_type,
            title: format!("Untitled {}", doc_type.label()),
            content: String::new(),
        }
    }
}

/// Upload form on the documents page
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub visible: bool,
    pub doc_type: DocumentType,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// Short user-facing status message
#[derive(Debug, Clone)]
pub struct Flash {
    pub text: String,
    pub kind: FlashKind,
    shown_at: Instant,
}

impl Flash {
    /// Success messages go away after a while; errors stay until dismissed
    fn is_expired(&self, now: Instant) -> bool {
        self.kind == FlashKind::Success
            && now.saturating_duration_since(self.shown_at) >= FLASH_DURATION
    }
}

/// Results of background jobs
enum TaskOutcome {
    Imported(Option<Document>),
    Exported {
        result: Result<PathBuf, ExportFailed>,
        open: bool,
    },
}

/// Main application state
pub struct DocsmithApp {
    /// Shared document store
    pub store: Arc<DocumentStore>,
    /// Latest snapshot of the store
    pub documents: Vec<Document>,
    documents_rx: watch::Receiver<Vec<Document>>,
    /// Current page
    pub route: Route,
    /// Document open in the editor
    pub editor: Option<EditorState>,
    pub create_form: CreateForm,
    pub upload_form: UploadForm,
    /// Document awaiting delete confirmation
    pub pending_delete: Option<String>,
    pub flash: Option<Flash>,
    pub uploading: bool,
    pub exporting: bool,
    /// Application configuration
    pub config: AppConfig,
    /// Write config changes to disk
    persist_config: bool,
    /// Whether sidebar is visible
    pub sidebar_visible: bool,
    /// Commonmark cache for preview
    pub commonmark_cache: egui_commonmark::CommonMarkCache,
    ctx: egui::Context,
    runtime: tokio::runtime::Runtime,
    outcome_tx: mpsc::Sender<TaskOutcome>,
    outcome_rx: mpsc::Receiver<TaskOutcome>,
}

impl DocsmithApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {:#}", e);
            AppConfig::default()
        });
        Self::apply_theme(&cc.egui_ctx, &config);

        let backend: Box<dyn StorageBackend> = if config.storage.ephemeral {
            tracing::info!("Ephemeral storage, documents will not be kept");
            Box::new(MemoryBackend::new())
        } else {
            let backend = JsonFileBackend::new(config.documents_path());
            tracing::info!("Documents file: {}", backend.path().display());
            Box::new(backend)
        };
        let store = Arc::new(DocumentStore::open(backend));

        let mut app = Self::with_store(cc.egui_ctx.clone(), store, config)?;
        app.persist_config = true;
        Ok(app)
    }

    /// Build the app around an existing store; config changes stay in memory
    pub fn with_store(
        ctx: egui::Context,
        store: Arc<DocumentStore>,
        config: AppConfig,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("docsmith-worker")
            .enable_all()
            .build()?;

        let documents_rx = store.subscribe();
        let documents = store.list();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        Ok(Self {
            store,
            documents,
            documents_rx,
            route: Route::Home,
            editor: None,
            create_form: CreateForm::for_type(DocumentType::Pdf),
            upload_form: UploadForm::default(),
            pending_delete: None,
            flash: None,
            uploading: false,
            exporting: false,
            sidebar_visible: true,
            commonmark_cache: egui_commonmark::CommonMarkCache::default(),
            config,
            persist_config: false,
            ctx,
            runtime,
            outcome_tx,
            outcome_rx,
        })
    }

    fn apply_theme(ctx: &egui::Context, config: &AppConfig) {
        if config.ui.theme == "light" {
            ctx.set_visuals(egui::Visuals::light());
        } else {
            ctx.set_visuals(egui::Visuals::dark());
        }
    }

    pub fn set_theme(&mut self, theme: &str) {
        self.config.ui.theme = theme.to_string();
        Self::apply_theme(&self.ctx, &self.config);
        self.save_config();
    }

    fn save_config(&self) {
        if !self.persist_config {
            return;
        }
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {:#}", e);
        }
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.flash = Some(Flash {
            text: text.into(),
            kind: FlashKind::Success,
            shown_at: Instant::now(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.flash = Some(Flash {
            text: text.into(),
            kind: FlashKind::Error,
            shown_at: Instant::now(),
        });
    }

    /// Navigate to the create page for `doc_type`
    pub fn start_create(&mut self, doc_type: DocumentType) {
        self.create_form = CreateForm::for_type(doc_type);
        self.route = Route::Create;
    }

    /// Open a document in the editor
    pub fn open_document(&mut self, id: &str) {
        // Keep unsaved edits when the open document is selected again
        if self.editor.as_ref().is_some_and(|e| e.id == id && e.dirty) {
            self.route = Route::Editor(id.to_string());
            return;
        }

        match self.store.get(id) {
            Some(doc) => {
                self.editor = Some(EditorState::from_document(&doc));
                self.config.add_recent_document(id);
                self.save_config();
            }
            None => {
                self.editor = None;
                self.error("Document not found");
            }
        }
        self.route = Route::Editor(id.to_string());
    }

    /// Create a document from the create form and open it
    pub fn create_document(&mut self) {
        let title = self.create_form.title.trim().to_string();
        if title.is_empty() {
            self.error("Please enter a document title");
            return;
        }

        let content = if self.create_form.content.is_empty() {
            Document::starter_content(&title)
        } else {
            self.create_form.content.clone()
        };

        let patch = DocumentPatch::new()
            .name(title)
            .doc_type(self.create_form.doc_type)
            .content(content);

        match self.store.create(patch) {
            Ok(doc) => {
                self.open_document(&doc.id);
                self.success("Document created successfully!");
            }
            Err(e) => {
                tracing::error!("Error creating document: {}", e);
                self.error("Failed to create document");
            }
        }
    }

    /// Write the editor's working copy back to the store
    pub fn save_active_document(&mut self) {
        let Some(editor) = &self.editor else {
            self.error("No document selected");
            return;
        };

        let patch = DocumentPatch::new()
            .name(editor.name.clone())
            .content(editor.content.clone());

        match self.store.update(&editor.id, patch) {
            Ok(Some(doc)) => {
                self.editor = Some(EditorState::from_document(&doc));
                self.success("Document saved successfully!");
            }
            Ok(None) => self.error("Document not found"),
            Err(e) => {
                tracing::error!("Error saving document: {}", e);
                self.error("Failed to save document");
            }
        }
    }

    /// Ask for confirmation before deleting
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    pub fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        match self.store.delete(&id) {
            Ok(()) => {
                if self.editor.as_ref().is_some_and(|e| e.id == id) {
                    self.editor = None;
                    self.route = Route::Documents;
                }
                self.config.remove_recent_document(&id);
                self.save_config();
                self.success("Document deleted successfully!");
            }
            Err(e) => {
                tracing::error!("Error deleting document: {}", e);
                self.error("Failed to delete document");
            }
        }
    }

    pub fn pick_upload_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new().pick_file() {
            self.upload_form.file = Some(path);
        }
    }

    /// Import the selected file in the background
    pub fn start_upload(&mut self) {
        if self.uploading {
            return;
        }
        let Some(path) = self.upload_form.file.clone() else {
            self.error("Please select a file");
            return;
        };

        self.uploading = true;
        let store = self.store.clone();
        let doc_type = self.upload_form.doc_type;
        let tx = self.outcome_tx.clone();
        let ctx = self.ctx.clone();

        self.runtime.spawn(async move {
            let imported = match store.import_file(&path, doc_type).await {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::error!("Error uploading document: {:#}", anyhow::Error::new(e));
                    None
                }
            };
            let _ = tx.send(TaskOutcome::Imported(imported));
            ctx.request_repaint();
        });
    }

    /// Download the open document in the format matching its type
    pub fn download_active_document(&mut self) {
        if let Some(editor) = &self.editor {
            let format = ExportFormat::for_document_type(editor.doc_type);
            let title = strip_known_extension(&editor.name);
            self.start_export(format, title);
        }
    }

    /// Export the open document as `format`
    pub fn export_active_document(&mut self, format: ExportFormat) {
        if let Some(editor) = &self.editor {
            let title = strip_known_extension(&editor.name);
            self.start_export(format, title);
        }
    }

    /// Re-export the open document through the other exporter
    pub fn convert_active_document(&mut self, conversion: Conversion) {
        if let Some(editor) = &self.editor {
            let title = conversion.file_title(&editor.name);
            self.start_export(conversion.target_format(), title);
        }
    }

    fn export_target(&self, format: ExportFormat, title: &str) -> Option<PathBuf> {
        let file_name = format.file_name(title);
        let dir = self.config.export_dir();

        if self.config.export.ask_for_location {
            rfd::FileDialog::new()
                .set_title(format!("Export as {}", format.label()))
                .set_directory(&dir)
                .set_file_name(file_name)
                .add_filter(format.label(), &[format.extension()])
                .save_file()
        } else {
            Some(delivery::default_target(&dir, &file_name))
        }
    }

    fn start_export(&mut self, format: ExportFormat, title: String) {
        if self.exporting {
            return;
        }
        let Some(content) = self.editor.as_ref().map(|e| e.content.clone()) else {
            return;
        };
        let Some(target) = self.export_target(format, &title) else {
            tracing::debug!("Export cancelled");
            return;
        };

        self.exporting = true;
        let open = self.config.export.open_after_export;
        let tx = self.outcome_tx.clone();
        let ctx = self.ctx.clone();

        self.runtime.spawn(async move {
            let result = export::export_to(format, title, content, target).await;
            let _ = tx.send(TaskOutcome::Exported { result, open });
            ctx.request_repaint();
        });
    }

    /// Pick up store snapshots and finished background jobs
    fn poll(&mut self) {
        if self.documents_rx.has_changed().unwrap_or(false) {
            self.documents = self.documents_rx.borrow_and_update().clone();
        }

        while let Ok(outcome) = self.outcome_rx.try_recv() {
            match outcome {
                TaskOutcome::Imported(Some(doc)) => {
                    self.uploading = false;
                    self.upload_form.file = None;
                    self.success(format!("Uploaded {}", doc.name));
                }
                TaskOutcome::Imported(None) => {
                    self.uploading = false;
                    self.error("Failed to upload document");
                }
                TaskOutcome::Exported { result, open } => {
                    self.exporting = false;
                    match result {
                        Ok(path) => {
                            self.success("File downloaded successfully!");
                            if open {
                                if let Err(e) = open::that(&path) {
                                    tracing::warn!("Failed to open {}: {}", path.display(), e);
                                }
                            }
                        }
                        Err(e) => self.error(e.to_string()),
                    }
                }
            }
        }

        let expired = self
            .flash
            .as_ref()
            .is_some_and(|f| f.is_expired(Instant::now()));
        if expired {
            self.flash = None;
        } else if self.flash.as_ref().is_some_and(|f| f.kind == FlashKind::Success) {
            self.ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    fn render_flash(&mut self, ctx: &egui::Context) {
        let Some(flash) = self.flash.clone() else {
            return;
        };

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let color = match flash.kind {
                    FlashKind::Success => egui::Color32::from_rgb(152, 195, 121),
                    FlashKind::Error => egui::Color32::from_rgb(224, 108, 117),
                };
                ui.colored_label(color, &flash.text);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("\u{2715}").clicked() {
                        self.flash = None;
                    }
                });
            });
        });
    }

    fn render_delete_confirm(&mut self, ctx: &egui::Context) {
        let Some(id) = self.pending_delete.clone() else {
            return;
        };
        let name = self
            .documents
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.name.clone())
            .unwrap_or_default();

        egui::Window::new("Delete document")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Are you sure you want to delete \"{}\"?", name));
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.pending_delete = None;
                    }
                    if ui.button("Delete").clicked() {
                        self.confirm_delete();
                    }
                });
            });
    }
}

impl eframe::App for DocsmithApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll();

        // Handle keyboard shortcuts
        let (save, new, download, sidebar) = ctx.input(|i| {
            (
                i.modifiers.ctrl && i.key_pressed(egui::Key::S),
                i.modifiers.ctrl && i.key_pressed(egui::Key::N),
                i.modifiers.ctrl && i.key_pressed(egui::Key::E),
                i.modifiers.ctrl && i.key_pressed(egui::Key::B),
            )
        });
        if save && self.editor.is_some() {
            self.save_active_document();
        }
        if new {
            self.start_create(DocumentType::Pdf);
        }
        if download {
            self.download_active_document();
        }
        if sidebar {
            self.sidebar_visible = !self.sidebar_visible;
        }

        Header::show(ctx, self);
        self.render_flash(ctx);

        if self.sidebar_visible {
            egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(self.config.ui.sidebar_width)
                .min_width(150.0)
                .show(ctx, |ui| {
                    Sidebar::show(ui, self);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.route.clone() {
            Route::Home => HomePanel::show(ui, self),
            Route::Documents => DocumentsPanel::show(ui, self),
            Route::Create => CreatePanel::show(ui, self),
            Route::Editor(id) => EditorPanel::show(ui, self, &id),
        });

        self.render_delete_confirm(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryBackend;

    fn test_app() -> DocsmithApp {
        let store = Arc::new(DocumentStore::open(Box::new(MemoryBackend::new())));
        DocsmithApp::with_store(egui::Context::default(), store, AppConfig::default()).unwrap()
    }

    fn flash_kind(app: &DocsmithApp) -> Option<FlashKind> {
        app.flash.as_ref().map(|f| f.kind)
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let mut app = test_app();
        app.start_create(DocumentType::Doc);
        app.create_form.title = "   ".to_string();

        app.create_document();

        assert_eq!(flash_kind(&app), Some(FlashKind::Error));
        assert_eq!(app.route, Route::Create);
        assert_eq!(app.store.list().len(), 2);
    }

    #[test]
    fn test_create_opens_new_document() {
        let mut app = test_app();
        app.start_create(DocumentType::Ppt);
        app.create_form.title = " Roadmap ".to_string();

        app.create_document();

        let editor = app.editor.clone().unwrap();
        assert_eq!(app.route, Route::Editor(editor.id.clone()));
        assert_eq!(editor.name, "Roadmap");
        assert_eq!(editor.doc_type, DocumentType::Ppt);
        assert_eq!(editor.content, Document::starter_content("Roadmap"));
        assert_eq!(app.config.recent_documents, vec![editor.id]);
        assert_eq!(flash_kind(&app), Some(FlashKind::Success));
    }

    #[test]
    fn test_save_writes_working_copy() {
        let mut app = test_app();
        app.open_document("1");
        if let Some(editor) = app.editor.as_mut() {
            editor.name = "Renamed".to_string();
            editor.content = "edited".to_string();
            editor.dirty = true;
        }

        app.save_active_document();

        let stored = app.store.get("1").unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.content, "edited");
        assert!(!app.editor.as_ref().unwrap().dirty);
        assert_eq!(flash_kind(&app), Some(FlashKind::Success));
    }

    #[test]
    fn test_reselecting_dirty_document_keeps_edits() {
        let mut app = test_app();
        app.open_document("1");
        if let Some(editor) = app.editor.as_mut() {
            editor.content = "unsaved".to_string();
            editor.dirty = true;
        }
        app.route = Route::Documents;

        app.open_document("1");

        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.content, "unsaved");
        assert!(editor.dirty);
        assert_eq!(app.route, Route::Editor("1".to_string()));
    }

    #[test]
    fn test_open_missing_document() {
        let mut app = test_app();
        app.open_document("nope");

        assert!(app.editor.is_none());
        assert_eq!(app.route, Route::Editor("nope".to_string()));
        assert_eq!(flash_kind(&app), Some(FlashKind::Error));
    }

    #[test]
    fn test_delete_open_document_returns_to_list() {
        let mut app = test_app();
        app.open_document("1");

        app.request_delete("1");
        app.confirm_delete();

        assert!(app.editor.is_none());
        assert_eq!(app.route, Route::Documents);
        assert!(app.store.get("1").is_none());
        assert!(app.config.recent_documents.is_empty());
        assert!(app.pending_delete.is_none());
    }

    #[test]
    fn test_delete_other_document_keeps_editor() {
        let mut app = test_app();
        app.open_document("1");

        app.request_delete("2");
        app.confirm_delete();

        assert_eq!(app.editor.as_ref().unwrap().id, "1");
        assert_eq!(app.route, Route::Editor("1".to_string()));
        assert!(app.store.get("2").is_none());
    }

    #[test]
    fn test_success_flash_expires_error_stays() {
        let mut app = test_app();
        app.success("saved");
        let success = app.flash.clone().unwrap();
        app.error("failed");
        let error = app.flash.clone().unwrap();

        let shown = success.shown_at;
        assert!(!success.is_expired(shown + Duration::from_secs(1)));
        assert!(success.is_expired(shown + FLASH_DURATION));
        assert!(!error.is_expired(error.shown_at + Duration::from_secs(60)));
    }
}
