//! Filesystem access behind the config store.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Filesystem operations the config store depends on.
///
/// Abstracts file access for mock substitution in tests.
pub trait Storage {
    /// Returns `true` if a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Opens `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read>>;

    /// Opens `path` for writing, truncating any existing content and
    /// creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or opening the file fails.
    fn open_write(&self, path: &Path) -> Result<Box<dyn Write>>;
}

/// [`Storage`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read>> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_write(&self, path: &Path) -> Result<Box<dyn Write>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}
