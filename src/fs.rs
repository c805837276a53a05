//! Filesystem collaborator boundary
//!
//! The render-target core consumes exactly two byte-oriented primitives from
//! the platform filesystem: whole-file reads and stat. They are used to seed
//! a canvas color attachment with initial pixel data (see
//! `graphics::Texture::from_file`). Everything else the platform
//! layer offers (directory listing, memory mapping, per-OS path discovery)
//! stays behind this trait and out of this crate.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{Error, Result};

/// Metadata returned by [`Filesystem::stat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    /// File size in bytes
    pub size: u64,
    /// Last modification time, if the platform reports one
    pub last_modified: Option<SystemTime>,
    /// True if the path names a directory
    pub is_directory: bool,
}

/// Byte-oriented filesystem interface
///
/// One implementation per target platform, selected at startup and passed
/// explicitly to the code that needs it. [`StdFilesystem`] covers every
/// platform the standard library supports; consoles or sandboxed platforms
/// provide their own.
pub trait Filesystem: Send + Sync {
    /// Read the entire file at `path`
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Query size, modification time, and kind of the entry at `path`
    fn stat(&self, path: &Path) -> Result<FileInfo>;
}

/// [`Filesystem`] implementation backed by `std::fs`
#[derive(Debug, Default)]
pub struct StdFilesystem;

impl Filesystem for StdFilesystem {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        let metadata =
            fs::metadata(path).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))?;
        Ok(FileInfo {
            size: metadata.len(),
            last_modified: metadata.modified().ok(),
            is_directory: metadata.is_dir(),
        })
    }
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;
