//! Markdown preview panel

use eframe::egui;

use super::block_renderer::{render_block, BlockAction};
use super::markdown_blocks::Preview;

/// Markdown preview panel
pub struct PreviewPanel;

impl PreviewPanel {
    /// Show the rendered preview
    pub fn show(ui: &mut egui::Ui, preview: &Preview, base_size: f32) {
        let mut action = None;

        egui::ScrollArea::vertical()
            .id_salt("preview_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if preview.is_empty() {
                    Self::show_empty(ui);
                    return;
                }

                for block in preview.blocks() {
                    ui.push_id(block.range().start, |ui| {
                        if let Some(a) = render_block(ui, block, base_size) {
                            action = Some(a);
                        }
                    });
                }
            });

        if let Some(BlockAction::OpenUrl(url)) = action {
            tracing::debug!("Opening link: {}", url);
            ui.ctx().open_url(egui::OpenUrl::new_tab(url));
        }
    }

    /// Show empty state
    fn show_empty(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(50.0);
            ui.weak("Nothing to preview");
            ui.weak("Type markdown on the left or open a file (Ctrl+O)");
        });
    }
}
