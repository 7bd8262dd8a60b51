//! Markdown editor panel

use eframe::egui;

use crate::app::MarkdownEditorApp;

/// Markdown editor panel
pub struct EditorPanel;

impl EditorPanel {
    /// Show the editor panel. Every change to the text is fed to the
    /// session, which re-renders the preview.
    pub fn show(ui: &mut egui::Ui, app: &mut MarkdownEditorApp) {
        let font = egui::FontId::monospace(app.config.editor.font_size);

        egui::ScrollArea::vertical()
            .id_salt("editor_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let response = egui::TextEdit::multiline(&mut app.draft)
                    .font(font)
                    .hint_text("Write markdown here")
                    .desired_width(f32::INFINITY)
                    .desired_rows(30)
                    .frame(false)
                    .show(ui);

                if response.response.changed() {
                    app.editor.edit(app.draft.as_str());
                }
            });
    }
}
