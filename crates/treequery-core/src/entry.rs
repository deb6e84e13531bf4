//! Filesystem entry descriptors.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Classification of a filesystem entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File {
        /// Size in bytes.
        size: u64,
    },
    /// Directory.
    Directory,
    /// Symbolic link. Recorded as a leaf, never followed.
    Symlink {
        /// Link target path.
        target: CompactString,
    },
    /// Other file types (sockets, devices, etc.).
    Other,
}

impl EntryKind {
    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File { .. })
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryKind::Symlink { .. })
    }
}

/// A single filesystem entry: name, absolute path, and classification.
///
/// `is_file` and `is_dir` are mutually exclusive by construction of
/// [`EntryKind`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsEntry {
    /// Final path component (not the full path).
    pub name: CompactString,

    /// Absolute path of the entry.
    pub path: PathBuf,

    /// Entry classification and associated metadata.
    pub kind: EntryKind,
}

impl FsEntry {
    /// Create a file entry.
    pub fn new_file(name: impl Into<CompactString>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File { size },
        }
    }

    /// Create a directory entry.
    pub fn new_directory(name: impl Into<CompactString>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Bare name of the entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if this entry is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Size in bytes, 0 for anything but a regular file.
    pub fn size(&self) -> u64 {
        match self.kind {
            EntryKind::File { size } => size,
            _ => 0,
        }
    }
}
