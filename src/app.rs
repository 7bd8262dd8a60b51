//! Main application state and UI coordination

use eframe::egui;

use crate::core::commands::{CommandOutcome, FileCommands};
use crate::core::config::AppConfig;
use crate::core::editor::EditorState;
use crate::core::error::SessionError;
use crate::core::session::{SessionState, APP_NAME};
use crate::core::storage::DiskStore;
use crate::ui::{editor::EditorPanel, file_dialogs::NativeDialogs, markdown_blocks::MarkdownRenderer, preview::PreviewPanel};

/// Entries of the File menu that touch the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCommand {
    Open,
    Save,
    SaveAs,
}

/// Main application state
pub struct MarkdownEditorApp {
    /// The document session and its rendered preview
    pub editor: EditorState<MarkdownRenderer>,
    /// Buffer the editor widget edits in place. The session owns the
    /// document; this only mirrors it and is refreshed after Open.
    pub draft: String,
    /// Application configuration
    pub config: AppConfig,
    dialogs: NativeDialogs,
    store: DiskStore,
    /// Message of the last failed command, shown until dismissed
    error: Option<String>,
    /// Title last sent to the window
    title: String,
}

impl MarkdownEditorApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let dialogs = NativeDialogs::new(config.last_directory.clone());
        Self {
            editor: EditorState::new(MarkdownRenderer::default()),
            draft: String::new(),
            config,
            dialogs,
            store: DiskStore,
            error: None,
            title: APP_NAME.to_string(),
        }
    }

    /// Run a File menu command and report its failure, if any
    pub fn run_command(&mut self, command: FileCommand) {
        let mut commands = FileCommands::new(&mut self.editor, &mut self.dialogs, &self.store);
        let result = match command {
            FileCommand::Open => commands.open(),
            FileCommand::Save => commands.save(),
            FileCommand::SaveAs => commands.save_as(),
        };

        match result {
            Ok(CommandOutcome::Completed) => {
                if command == FileCommand::Open {
                    self.draft = self.editor.session().content().to_string();
                }
                if self.config.remember_directory(self.dialogs.directory()) {
                    if let Err(e) = self.config.save() {
                        tracing::warn!("Failed to save config: {:#}", e);
                    }
                }
            }
            Ok(CommandOutcome::Cancelled) => {}
            Err(e) => self.report(command, e),
        }
    }

    fn report(&mut self, command: FileCommand, error: SessionError) {
        tracing::error!(path = ?error.path(), "{:?} failed: {}", command, error);
        self.error = Some(error.to_string());
    }

    /// Keyboard shortcut pressed this frame, if any
    fn shortcut(ctx: &egui::Context) -> Option<FileCommand> {
        use egui::{Key, Modifiers};

        ctx.input_mut(|i| {
            // Save As first: Ctrl+S also matches while Shift is held
            if i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::S) {
                Some(FileCommand::SaveAs)
            } else if i.consume_key(Modifiers::COMMAND, Key::S) {
                Some(FileCommand::Save)
            } else if i.consume_key(Modifiers::COMMAND, Key::O) {
                Some(FileCommand::Open)
            } else {
                None
            }
        })
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) -> Option<FileCommand> {
        let can_save = self.editor.session().can_save();
        let mut command = None;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open File...").clicked() {
                        command = Some(FileCommand::Open);
                        ui.close();
                    }
                    if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
                        command = Some(FileCommand::Save);
                        ui.close();
                    }
                    if ui.button("Save as...").clicked() {
                        command = Some(FileCommand::SaveAs);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        command
    }

    /// Render the status bar with the file location and save state
    fn render_status_bar(&self, ctx: &egui::Context) {
        let session = self.editor.session();
        let status = match session.state() {
            SessionState::Unbound => "New document",
            SessionState::UnboundDirty => "Not saved yet",
            SessionState::BoundClean => "Saved",
            SessionState::BoundDirty => "Unsaved changes",
        };

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match session.bound_path() {
                    Some(path) => ui.label(path.display().to_string()),
                    None => ui.label(session.display_name()),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if session.is_dirty() {
                        ui.colored_label(ui.visuals().warn_fg_color, status);
                    } else {
                        ui.weak(status);
                    }
                });
            });
        });
    }

    /// Show the last error until the user dismisses it
    fn render_error(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error.as_deref() else {
            return;
        };

        let mut dismissed = false;
        let modal = egui::Modal::new(egui::Id::new("error_modal")).show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.heading("Error");
            ui.add_space(8.0);
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

        if dismissed || modal.should_close() {
            self.error = None;
        }
    }

    /// Keep the window title in step with the session
    fn sync_title(&mut self, ctx: &egui::Context) {
        let title = self.editor.session().window_title();
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }
}

impl eframe::App for MarkdownEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let menu_command = self.render_menu_bar(ctx);
        if let Some(command) = menu_command.or_else(|| Self::shortcut(ctx)) {
            self.run_command(command);
        }

        self.render_status_bar(ctx);

        // Editor on the left, preview on the right
        let default_width = ctx.screen_rect().width() * self.config.editor.split_ratio;
        egui::SidePanel::left("editor_panel")
            .resizable(true)
            .default_width(default_width)
            .min_width(120.0)
            .show(ctx, |ui| {
                EditorPanel::show(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            PreviewPanel::show(ui, self.editor.preview(), self.config.preview.font_size);
        });

        self.render_error(ctx);
        self.sync_title(ctx);
    }
}
