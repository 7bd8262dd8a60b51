//! Native file dialogs backed by rfd

use std::path::{Path, PathBuf};

use crate::core::commands::{DialogChoice, FileDialogService};

/// Extensions offered by the markdown filter
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "MD"];

/// Native open/save dialogs filtered to markdown files.
///
/// Each dialog starts in the directory of the last picked file.
#[derive(Debug, Clone, Default)]
pub struct NativeDialogs {
    directory: Option<PathBuf>,
}

impl NativeDialogs {
    pub fn new(directory: Option<PathBuf>) -> Self {
        Self { directory }
    }

    /// Directory of the most recently picked file
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    fn dialog(&self, title: &str) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new()
            .set_title(title)
            .add_filter("Markdown", MARKDOWN_EXTENSIONS);
        match &self.directory {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn remember(&mut self, picked: Option<PathBuf>) -> DialogChoice {
        match picked {
            Some(path) => {
                self.directory = path.parent().map(Path::to_path_buf);
                DialogChoice::Picked(path)
            }
            None => DialogChoice::Cancelled,
        }
    }
}

impl FileDialogService for NativeDialogs {
    fn pick_open(&mut self) -> DialogChoice {
        let picked = self.dialog("Open File").pick_file();
        self.remember(picked)
    }

    fn pick_save(&mut self, default_name: &str) -> DialogChoice {
        let picked = self
            .dialog("Save As")
            .set_file_name(default_name)
            .save_file();
        self.remember(picked)
    }
}
