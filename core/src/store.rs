#![deny(missing_docs)]

//! # File Store
//!
//! The engine touches the project tree only through [`FileStore`], so merge sessions
//! can run against [`MemoryStore`] in tests and [`DiskStore`] in the CLI.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::{self, Error, ErrorKind};
use std::path::{Path, PathBuf};

/// Blocking file operations used by the merge engine.
pub trait FileStore {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the full content of `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Creates an empty file at `path`, creating missing parent folders.
    fn create_empty(&self, path: &Path) -> io::Result<()>;

    /// Replaces the content of `path`.
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Removes the file at `path`.
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Store backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn create_empty(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::File::create(path).map(|_| ())
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        fs::write(path, content)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// In-memory store for tests.
///
/// Writes to paths registered with [`MemoryStore::deny_writes`] fail with `PermissionDenied`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    read_only: RefCell<HashSet<PathBuf>>,
    writes: RefCell<usize>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `path` with `content`.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(path.into(), content.into());
    }

    /// Returns the content of `path` as text, if present.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .borrow()
            .get(path.as_ref())
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Makes every later write or create of `path` fail.
    pub fn deny_writes(&self, path: impl Into<PathBuf>) {
        self.read_only.borrow_mut().insert(path.into());
    }

    /// Number of successful `write` calls so far.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }

    /// Paths of all stored files, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    fn check_writable(&self, path: &Path) -> io::Result<()> {
        if self.read_only.borrow().contains(path) {
            return Err(Error::new(
                ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }
        Ok(())
    }
}

impl FileStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, path.display().to_string()))
    }

    fn create_empty(&self, path: &Path) -> io::Result<()> {
        self.check_writable(path)?;
        self.files.borrow_mut().insert(path.to_path_buf(), Vec::new());
        Ok(())
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        self.check_writable(path)?;
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_vec());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Error::new(ErrorKind::NotFound, path.display().to_string()))
    }
}
