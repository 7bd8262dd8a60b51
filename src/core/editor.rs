//! Editor state: the document session plus its rendered preview

use super::render::Renderer;
use super::session::DocumentSession;

/// A session paired with the renderer that feeds the preview pane
pub struct EditorState<R: Renderer> {
    session: DocumentSession,
    renderer: R,
    preview: R::Output,
}

impl<R: Renderer> EditorState<R> {
    /// Start with an empty session and the preview of empty text
    pub fn new(renderer: R) -> Self {
        let session = DocumentSession::new();
        let preview = renderer.render(session.content());
        Self {
            session,
            renderer,
            preview,
        }
    }

    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DocumentSession {
        &mut self.session
    }

    pub fn preview(&self) -> &R::Output {
        &self.preview
    }

    /// Apply the editor's text and re-render the preview.
    ///
    /// Renders on every call, whether or not the text changed.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.session.on_edit(text);
        self.refresh_preview();
    }

    /// Re-render from the session content, e.g. after a file was loaded
    pub fn refresh_preview(&mut self) {
        self.preview = self.renderer.render(self.session.content());
    }
}
