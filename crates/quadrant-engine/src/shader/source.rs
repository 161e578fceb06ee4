use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Reads shader stage sources.
pub trait SourceLoader {
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Loads sources from the filesystem.
///
/// The file handle and buffer are scoped to the call and released on every
/// exit path.
#[derive(Debug, Default, Clone)]
pub struct FsSourceLoader {
    root: Option<PathBuf>,
}

impl FsSourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `root` instead of the working directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SourceLoader for FsSourceLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }
}

/// In-memory sources keyed by path. Missing keys read as `NotFound`.
#[derive(Debug, Default, Clone)]
pub struct MemorySources {
    files: HashMap<PathBuf, String>,
}

impl MemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    /// Adds or replaces a source.
    pub fn insert(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) {
        self.files.insert(path.into(), source.into());
    }

    pub fn remove(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }
}

impl SourceLoader for MemorySources {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no source registered for `{}`", path.display()),
            )
        })
    }
}
