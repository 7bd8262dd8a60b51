//! mdpad - minimal markdown editor
//!
//! A text entry pane with a live-rendered preview, and file open/save/save-as.

mod app;
mod core;
mod ui;

use app::MarkdownEditorApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::config::AppConfig;
use crate::core::session::APP_NAME;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting {}...", APP_NAME);

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Using default config: {:#}", e);
        AppConfig::default()
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([400.0, 300.0])
            .with_title(APP_NAME),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(MarkdownEditorApp::new(cc, config)))),
    )
}
