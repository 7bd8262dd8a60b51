//! File menu commands: open, save and save as

use std::path::PathBuf;

use super::editor::EditorState;
use super::error::SessionError;
use super::render::Renderer;
use super::storage::DocumentStore;

/// What the user did with a file dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogChoice {
    Picked(PathBuf),
    Cancelled,
}

/// Native file pickers
pub trait FileDialogService {
    /// Ask for a markdown file to open
    fn pick_open(&mut self) -> DialogChoice;

    /// Ask where to save, suggesting `default_name`
    fn pick_save(&mut self, default_name: &str) -> DialogChoice;
}

/// How a command ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    Cancelled,
}

/// Handler for the File menu, borrowing everything it drives
pub struct FileCommands<'a, R: Renderer> {
    editor: &'a mut EditorState<R>,
    dialogs: &'a mut dyn FileDialogService,
    store: &'a dyn DocumentStore,
}

impl<'a, R: Renderer> FileCommands<'a, R> {
    pub fn new(
        editor: &'a mut EditorState<R>,
        dialogs: &'a mut dyn FileDialogService,
        store: &'a dyn DocumentStore,
    ) -> Self {
        Self {
            editor,
            dialogs,
            store,
        }
    }

    /// Pick a file and load it, replacing the current document
    pub fn open(&mut self) -> Result<CommandOutcome, SessionError> {
        let path = match self.dialogs.pick_open() {
            DialogChoice::Picked(path) => path,
            DialogChoice::Cancelled => return Ok(self.cancelled()),
        };

        let reader = self
            .store
            .reader(&path)
            .map_err(|source| SessionError::Read {
                path: path.clone(),
                source,
            })?;
        self.editor.session_mut().open(path, reader)?;
        self.editor.refresh_preview();
        Ok(CommandOutcome::Completed)
    }

    /// Save to the bound file, or ask for one when there is none yet
    pub fn save(&mut self) -> Result<CommandOutcome, SessionError> {
        if !self.editor.session().can_save() {
            return self.save_as();
        }
        self.editor.session_mut().save(self.store)?;
        Ok(CommandOutcome::Completed)
    }

    /// Pick a new target and save there
    pub fn save_as(&mut self) -> Result<CommandOutcome, SessionError> {
        let default_name = self.editor.session().display_name();
        let path = match self.dialogs.pick_save(&default_name) {
            DialogChoice::Picked(path) => path,
            DialogChoice::Cancelled => return Ok(self.cancelled()),
        };

        self.editor.session_mut().save_as_into(path, self.store)?;
        Ok(CommandOutcome::Completed)
    }

    fn cancelled(&self) -> CommandOutcome {
        self.editor.session().cancel_dialog();
        CommandOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::path::Path;

    use super::*;
    use crate::core::storage::memory::MemoryStore;

    struct Echo;

    impl Renderer for Echo {
        type Output = String;

        fn render(&self, markdown: &str) -> String {
            markdown.to_string()
        }
    }

    /// Answers dialogs from a script and records save suggestions
    #[derive(Default)]
    struct ScriptedDialogs {
        answers: VecDeque<DialogChoice>,
        suggested: Vec<String>,
    }

    impl ScriptedDialogs {
        fn answering(answers: impl IntoIterator<Item = DialogChoice>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                suggested: Vec::new(),
            }
        }
    }

    impl FileDialogService for ScriptedDialogs {
        fn pick_open(&mut self) -> DialogChoice {
            self.answers.pop_front().expect("unexpected open dialog")
        }

        fn pick_save(&mut self, default_name: &str) -> DialogChoice {
            self.suggested.push(default_name.to_string());
            self.answers.pop_front().expect("unexpected save dialog")
        }
    }

    fn picked(path: &str) -> DialogChoice {
        DialogChoice::Picked(PathBuf::from(path))
    }

    #[test]
    fn test_open_loads_and_renders() {
        let store = MemoryStore::new().with_file("x.md", b"body");
        let mut dialogs = ScriptedDialogs::answering([picked("x.md")]);
        let mut editor = EditorState::new(Echo);

        let outcome = FileCommands::new(&mut editor, &mut dialogs, &store)
            .open()
            .unwrap();

        assert_eq!(outcome, CommandOutcome::Completed);
        assert_eq!(editor.session().content(), "body");
        assert_eq!(editor.preview(), "body");
        assert!(!editor.session().is_dirty());
    }

    #[test]
    fn test_cancelled_open_leaves_session() {
        let store = MemoryStore::new().with_file("x.md", b"body");
        let mut dialogs =
            ScriptedDialogs::answering([picked("x.md"), DialogChoice::Cancelled]);
        let mut editor = EditorState::new(Echo);

        let mut commands = FileCommands::new(&mut editor, &mut dialogs, &store);
        commands.open().unwrap();
        assert_eq!(commands.open().unwrap(), CommandOutcome::Cancelled);

        let session = editor.session();
        assert_eq!(session.content(), "body");
        assert_eq!(session.bound_path(), Some(Path::new("x.md")));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_open_missing_file_reports_path() {
        let store = MemoryStore::new();
        let mut dialogs = ScriptedDialogs::answering([picked("gone.md")]);
        let mut editor = EditorState::new(Echo);
        editor.edit("draft");

        let err = FileCommands::new(&mut editor, &mut dialogs, &store)
            .open()
            .unwrap_err();

        assert_eq!(err.path(), Some(&PathBuf::from("gone.md")));
        assert_eq!(editor.session().content(), "draft");
        assert!(editor.session().is_dirty());
    }

    #[test]
    fn test_save_unbound_goes_through_save_as() {
        let store = MemoryStore::new();
        let mut dialogs = ScriptedDialogs::answering([picked("doc.md")]);
        let mut editor = EditorState::new(Echo);
        editor.edit("# Hello");

        let outcome = FileCommands::new(&mut editor, &mut dialogs, &store)
            .save()
            .unwrap();

        assert_eq!(outcome, CommandOutcome::Completed);
        assert_eq!(dialogs.suggested, vec!["untitled.md".to_string()]);
        assert_eq!(store.text("doc.md").unwrap(), "# Hello");
        assert_eq!(editor.session().bound_path(), Some(Path::new("doc.md")));
    }

    #[test]
    fn test_cancelled_save_as_is_not_an_error() {
        let store = MemoryStore::new();
        let mut dialogs = ScriptedDialogs::answering([DialogChoice::Cancelled]);
        let mut editor = EditorState::new(Echo);
        editor.edit("draft");

        let outcome = FileCommands::new(&mut editor, &mut dialogs, &store)
            .save()
            .unwrap();

        assert_eq!(outcome, CommandOutcome::Cancelled);
        assert_eq!(store.writers_opened(), 0);
        assert!(editor.session().is_dirty());
        assert!(editor.session().bound_path().is_none());
    }

    #[test]
    fn test_save_bound_skips_dialog() {
        let store = MemoryStore::new().with_file("x.md", b"old");
        let mut dialogs = ScriptedDialogs::answering([picked("x.md")]);
        let mut editor = EditorState::new(Echo);

        let mut commands = FileCommands::new(&mut editor, &mut dialogs, &store);
        commands.open().unwrap();
        commands.editor.edit("new");
        commands.save().unwrap();

        assert!(dialogs.suggested.is_empty());
        assert_eq!(store.text("x.md").unwrap(), "new");
        assert!(!editor.session().is_dirty());
    }

    #[test]
    fn test_save_as_suggests_current_name_and_rejects_txt() {
        let store = MemoryStore::new().with_file("notes.md", b"text");
        let mut dialogs =
            ScriptedDialogs::answering([picked("notes.md"), picked("notes.txt")]);
        let mut editor = EditorState::new(Echo);

        let mut commands = FileCommands::new(&mut editor, &mut dialogs, &store);
        commands.open().unwrap();
        let err = commands.save_as().unwrap_err();

        assert!(matches!(err, SessionError::InvalidExtension { .. }));
        assert_eq!(dialogs.suggested, vec!["notes.md".to_string()]);
        assert!(store.contents("notes.txt").is_none());
        assert_eq!(editor.session().bound_path(), Some(Path::new("notes.md")));
    }
}
