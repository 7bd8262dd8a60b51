//! Errors surfaced by document operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a session operation. The session is left untouched whenever
/// one of these is returned.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read file: {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to save file: {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not a markdown file: {} (expected a .md extension)", path.display())]
    InvalidExtension { path: PathBuf },

    #[error("Document has not been saved yet; use Save As")]
    NoBoundPath,
}

impl SessionError {
    /// The path the failed operation was working on, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            SessionError::Read { path, .. }
            | SessionError::Write { path, .. }
            | SessionError::InvalidExtension { path } => Some(path),
            SessionError::NoBoundPath => None,
        }
    }
}
