//! Application configuration management

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Recently opened document ids, most recent first
    pub recent_documents: Vec<String>,
    /// Document storage settings
    pub storage: StorageConfig,
    /// Export settings
    pub export: ExportConfig,
    /// Editor settings
    pub editor: EditorConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Where the document collection lives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the documents file
    pub documents_path: Option<PathBuf>,
    /// Keep documents in memory only; nothing is written to disk
    pub ephemeral: bool,
}

/// Export behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Prompt for a location on every export
    pub ask_for_location: bool,
    /// Destination when not prompting (defaults to the download directory)
    pub directory: Option<PathBuf>,
    /// Open the exported file with the system viewer
    pub open_after_export: bool,
}

/// Editor-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Font size in pixels
    pub font_size: f32,
    /// Word wrap
    pub word_wrap: bool,
    /// Show the rendered preview next to the editor
    pub show_preview: bool,
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme (light/dark)
    pub theme: String,
    /// Sidebar width
    pub sidebar_width: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            ask_for_location: true,
            directory: None,
            open_after_export: false,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            word_wrap: true,
            show_preview: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            sidebar_width: 220.0,
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "docsmith", "Docsmith")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Path of the documents file
    pub fn documents_path(&self) -> PathBuf {
        self.storage.documents_path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("documents.json"))
                .unwrap_or_else(|| PathBuf::from("documents.json"))
        })
    }

    /// Directory exports go to when not prompting
    pub fn export_dir(&self) -> PathBuf {
        self.export.directory.clone().unwrap_or_else(|| {
            UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    /// Record a document as most recently opened
    pub fn add_recent_document(&mut self, id: &str) {
        self.recent_documents.retain(|d| d != id);
        self.recent_documents.insert(0, id.to_string());
        self.recent_documents.truncate(10);
    }

    /// Forget a document, e.g. after it was deleted
    pub fn remove_recent_document(&mut self, id: &str) {
        self.recent_documents.retain(|d| d != id);
    }
}
