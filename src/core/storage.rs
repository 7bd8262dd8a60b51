//! Byte streams behind document paths

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Source of readers and writers for document paths
pub trait DocumentStore {
    /// Open a byte stream for reading the file at `path`
    fn reader(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    /// Open a sink that replaces the contents of the file at `path`
    fn writer(&self, path: &Path) -> io::Result<Box<dyn Write>>;
}

/// Store backed by the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl DocumentStore for DiskStore {
    fn reader(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn writer(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// In-memory store for tests
#[cfg(test)]
pub mod memory {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::io::{self, Cursor, Read, Write};
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use super::DocumentStore;

    type Files = Rc<RefCell<HashMap<PathBuf, Vec<u8>>>>;

    /// Files kept in a shared map; writes land on flush
    #[derive(Default)]
    pub struct MemoryStore {
        files: Files,
        writers_opened: Cell<usize>,
        fail_writes: Cell<bool>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(self, path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
            self.files.borrow_mut().insert(path.into(), bytes.to_vec());
            self
        }

        pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
            self.files.borrow().get(path.as_ref()).cloned()
        }

        pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
            self.contents(path)
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        }

        pub fn writers_opened(&self) -> usize {
            self.writers_opened.get()
        }

        pub fn fail_writes(&self) {
            self.fail_writes.set(true);
        }
    }

    impl DocumentStore for MemoryStore {
        fn reader(&self, path: &Path) -> io::Result<Box<dyn Read>> {
            let bytes = self
                .files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))?;
            Ok(Box::new(Cursor::new(bytes)))
        }

        fn writer(&self, path: &Path) -> io::Result<Box<dyn Write>> {
            self.writers_opened.set(self.writers_opened.get() + 1);
            Ok(Box::new(MemoryWriter {
                path: path.to_path_buf(),
                buffer: Vec::new(),
                files: Rc::clone(&self.files),
                fail: self.fail_writes.get(),
            }))
        }
    }

    struct MemoryWriter {
        path: PathBuf,
        buffer: Vec<u8>,
        files: Files,
        fail: bool,
    }

    impl Write for MemoryWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.files
                .borrow_mut()
                .insert(self.path.clone(), self.buffer.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.md");

        let mut writer = DiskStore.writer(&path).unwrap();
        writer.write_all(b"# Title\n").unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut text = String::new();
        DiskStore
            .reader(&path)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "# Title\n");
    }

    #[test]
    fn test_disk_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DiskStore.reader(&dir.path().join("missing.md")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
