//! Compound-file adapter for the reader.

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;

use cfb::CompoundFile;
use glob::Pattern;
use reader::{display_path, Container, ReadError, ReadResult};
use tracing::debug;

/// One stream in a compound file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    /// Slash-separated path without the leading root.
    pub path: String,
    pub size: u64,
}

/// A compound file exposed as named streams.
pub struct CfbContainer<F> {
    file: RefCell<CompoundFile<F>>,
}

impl CfbContainer<File> {
    /// Opens the compound file at `path`.
    pub fn open_path(path: &Path) -> io::Result<Self> {
        cfb::open(path).map(Self::new)
    }
}

impl<F: Read + Seek> CfbContainer<F> {
    pub fn new(file: CompoundFile<F>) -> Self {
        Self {
            file: RefCell::new(file),
        }
    }

    /// Parses a compound file from any seekable reader.
    pub fn from_reader(inner: F) -> io::Result<Self> {
        CompoundFile::open(inner).map(Self::new)
    }

    /// Every stream in the file, in directory order.
    pub fn streams(&mut self) -> Vec<StreamEntry> {
        self.file
            .get_mut()
            .walk()
            .filter(cfb::Entry::is_stream)
            .map(|entry| StreamEntry {
                path: entry
                    .path()
                    .to_string_lossy()
                    .trim_start_matches('/')
                    .to_owned(),
                size: entry.len(),
            })
            .collect()
    }
}

impl<F: Read + Seek> Container for CfbContainer<F> {
    fn open_stream(&self, path: &[&str]) -> ReadResult<Option<Vec<u8>>> {
        let container_error = |message: String| ReadError::Container {
            path: display_path(path),
            message,
        };
        let full = format!("/{}", display_path(path));
        let mut file = self
            .file
            .try_borrow_mut()
            .map_err(|_| container_error("compound file already in use".to_owned()))?;
        if !file.is_stream(&full) {
            return Ok(None);
        }
        let mut data = Vec::new();
        file.open_stream(&full)
            .and_then(|mut stream| stream.read_to_end(&mut data))
            .map_err(|e| container_error(e.to_string()))?;
        debug!(path = %full, bytes = data.len(), "stream read");
        Ok(Some(data))
    }
}

/// Lists streams whose path or final name matches `pattern`.
pub fn list_streams<F: Read + Seek>(
    container: &mut CfbContainer<F>,
    pattern: Option<&Pattern>,
) -> Vec<StreamEntry> {
    let mut entries = container.streams();
    if let Some(pattern) = pattern {
        entries.retain(|entry| {
            let name = entry.path.rsplit('/').next().unwrap_or(&entry.path);
            pattern.matches(&entry.path) || pattern.matches(name)
        });
    }
    entries
}
