//! The structured-storage container seen as named streams.

use std::collections::BTreeMap;

use crate::error::ReadResult;

/// Name of the identity stream at the container root.
pub const COMPOBJ_STREAM: &str = "\u{1}CompObj";

/// A hierarchical directory of named byte streams.
///
/// The container format itself is parsed elsewhere; implementations only
/// hand over whole streams.
pub trait Container {
    /// Reads the stream at `path`, or `Ok(None)` if there is none.
    fn open_stream(&self, path: &[&str]) -> ReadResult<Option<Vec<u8>>>;
}

impl<C: Container + ?Sized> Container for &C {
    fn open_stream(&self, path: &[&str]) -> ReadResult<Option<Vec<u8>>> {
        (**self).open_stream(path)
    }
}

/// Joins path components the way errors and logs show them.
#[must_use]
pub fn display_path(path: &[&str]) -> String {
    path.join("/")
}

/// An in-memory container, for synthetic files and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    streams: BTreeMap<Vec<String>, Vec<u8>>,
}

impl MemoryContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the stream at `path`.
    pub fn insert(&mut self, path: &[&str], data: impl Into<Vec<u8>>) -> &mut Self {
        let key = path.iter().map(|p| (*p).to_owned()).collect();
        self.streams.insert(key, data.into());
        self
    }

    /// Removes the stream at `path`, returning its bytes.
    pub fn remove(&mut self, path: &[&str]) -> Option<Vec<u8>> {
        let key: Vec<String> = path.iter().map(|p| (*p).to_owned()).collect();
        self.streams.remove(&key)
    }

    /// Returns the number of streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Returns `true` if the container holds no streams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Iterates over `(path, length)` in path order.
    pub fn paths(&self) -> impl Iterator<Item = (String, usize)> + '_ {
        self.streams.iter().map(|(k, v)| (k.join("/"), v.len()))
    }
}

impl Container for MemoryContainer {
    fn open_stream(&self, path: &[&str]) -> ReadResult<Option<Vec<u8>>> {
        let key: Vec<String> = path.iter().map(|p| (*p).to_owned()).collect();
        Ok(self.streams.get(&key).cloned())
    }
}
