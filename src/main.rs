//! Docsmith - desktop document creation and editing
//!
//! Documents are kept in a local JSON file and can be exported as PDF, Word,
//! plain text or Markdown.

mod app;
mod core;
mod ui;

use app::DocsmithApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Docsmith...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Docsmith"),
        ..Default::default()
    };

    eframe::run_native(
        "Docsmith",
        native_options,
        Box::new(|cc| Ok(Box::new(DocsmithApp::new(cc)?))),
    )
}
