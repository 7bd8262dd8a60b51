//! Document session: the single open document, its file binding and
//! unsaved-changes state

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::error::SessionError;
use super::storage::DocumentStore;

/// Name shown for a document that has never been saved
pub const UNTITLED: &str = "untitled.md";

/// Application name used in the window title
pub const APP_NAME: &str = "Markdown Editor";

/// Where the session stands with respect to its file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// New document, nothing to save
    Unbound,
    /// New document with edits
    UnboundDirty,
    /// Matches the bound file
    BoundClean,
    /// Bound file with unsaved edits
    BoundDirty,
}

/// The document being edited
#[derive(Debug, Default)]
pub struct DocumentSession {
    content: String,
    bound_path: Option<PathBuf>,
    dirty: bool,
}

impl DocumentSession {
    /// Create an empty, unbound, clean session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn bound_path(&self) -> Option<&Path> {
        self.bound_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a plain Save has somewhere to write
    pub fn can_save(&self) -> bool {
        self.bound_path.is_some()
    }

    pub fn state(&self) -> SessionState {
        match (self.bound_path.is_some(), self.dirty) {
            (false, false) => SessionState::Unbound,
            (false, true) => SessionState::UnboundDirty,
            (true, false) => SessionState::BoundClean,
            (true, true) => SessionState::BoundDirty,
        }
    }

    /// File name of the bound path, or the untitled label
    pub fn display_name(&self) -> String {
        self.bound_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Title for the main window, with a `*` marker while dirty
    pub fn window_title(&self) -> String {
        let marker = if self.dirty { " *" } else { "" };
        format!("{} - {}{}", APP_NAME, self.display_name(), marker)
    }

    /// Replace the content with the editor's text.
    ///
    /// Marks the session dirty when the text differs from the current
    /// content. Dirty is sticky: only a load or save clears it, even if the
    /// text is edited back to what is on disk. Returns whether the content
    /// changed.
    pub fn on_edit(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.content {
            return false;
        }
        self.content = text;
        if !self.dirty {
            tracing::debug!("Document {} has unsaved changes", self.display_name());
        }
        self.dirty = true;
        true
    }

    /// Load a document from `reader` and bind the session to `path`.
    ///
    /// Unsaved changes are discarded without confirmation.
    pub fn open(&mut self, path: impl Into<PathBuf>, mut reader: impl Read) -> Result<(), SessionError> {
        let path = path.into();
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| SessionError::Read {
                path: path.clone(),
                source,
            })?;
        let content = String::from_utf8(bytes).map_err(|e| SessionError::Read {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        if self.dirty {
            tracing::warn!("Discarding unsaved changes to {}", self.display_name());
        }
        tracing::info!("Opened document: {}", path.display());
        self.content = content;
        self.bound_path = Some(path);
        self.dirty = false;
        Ok(())
    }

    /// Write the content back to the bound path
    pub fn save(&mut self, store: &dyn DocumentStore) -> Result<(), SessionError> {
        let path = self.bound_path.as_deref().ok_or(SessionError::NoBoundPath)?;
        let write_err = |source: std::io::Error| SessionError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = store.writer(path).map_err(write_err)?;
        write_content(&mut writer, &self.content).map_err(write_err)?;

        tracing::info!("Saved document: {}", path.display());
        self.dirty = false;
        Ok(())
    }

    /// Write the content to `writer` and bind the session to `path`.
    ///
    /// `path` must carry a `.md` extension (any case).
    pub fn save_as(&mut self, path: impl Into<PathBuf>, mut writer: impl Write) -> Result<(), SessionError> {
        let path = path.into();
        check_extension(&path)?;
        write_content(&mut writer, &self.content).map_err(|source| SessionError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Saved document as: {}", path.display());
        self.bound_path = Some(path);
        self.dirty = false;
        Ok(())
    }

    /// Validate `path`, then save through a sink from `store`.
    ///
    /// The extension is checked before the store is asked for a writer, so
    /// a rejected path never creates a file.
    pub fn save_as_into(&mut self, path: impl Into<PathBuf>, store: &dyn DocumentStore) -> Result<(), SessionError> {
        let path = path.into();
        check_extension(&path)?;
        let writer = store.writer(&path).map_err(|source| SessionError::Write {
            path: path.clone(),
            source,
        })?;
        self.save_as(path, writer)
    }

    /// The user dismissed a file dialog
    pub fn cancel_dialog(&self) {
        tracing::debug!("File dialog cancelled");
    }
}

/// Accept only `.md` paths, ignoring case
pub fn check_extension(path: &Path) -> Result<(), SessionError> {
    let is_markdown = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false);

    if is_markdown {
        Ok(())
    } else {
        Err(SessionError::InvalidExtension {
            path: path.to_path_buf(),
        })
    }
}

fn write_content(writer: &mut impl Write, content: &str) -> std::io::Result<()> {
    writer.write_all(content.as_bytes())?;
    writer.flush()
}
