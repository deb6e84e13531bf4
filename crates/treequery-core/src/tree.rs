//! File tree container and query algorithms.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::WalkConfig;
use crate::entry::FsEntry;
use crate::error::WalkWarning;
use crate::node::{NodeId, Tree};

/// Summary statistics for a built tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of regular files.
    pub total_files: u64,
    /// Total number of directories.
    pub total_dirs: u64,
    /// Total number of symbolic links.
    pub total_symlinks: u64,
    /// Total size of regular files in bytes.
    pub total_size: u64,
    /// Maximum depth reached (root is depth 0).
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a regular file.
    pub fn record_file(&mut self, size: u64, depth: u32) {
        self.total_files += 1;
        self.total_size += size;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a symlink.
    pub fn record_symlink(&mut self) {
        self.total_symlinks += 1;
    }
}

/// A fully built in-memory mirror of a directory subtree.
///
/// Built once by a walker; queries only traverse the arena and never touch
/// the filesystem again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTree {
    /// Arena holding every materialized entry.
    pub tree: Tree<FsEntry>,

    /// Root path that was walked.
    pub root_path: PathBuf,

    /// When this tree was built.
    pub built_at: SystemTime,

    /// Duration of the walk.
    pub walk_duration: Duration,

    /// Walk configuration used.
    pub config: WalkConfig,

    /// Summary statistics.
    pub stats: TreeStats,

    /// Warnings encountered during the walk.
    pub warnings: Vec<WalkWarning>,
}

impl FileTree {
    /// Create a new file tree.
    pub fn new(
        tree: Tree<FsEntry>,
        root_path: PathBuf,
        config: WalkConfig,
        stats: TreeStats,
        walk_duration: Duration,
        warnings: Vec<WalkWarning>,
    ) -> Self {
        Self {
            tree,
            root_path,
            built_at: SystemTime::now(),
            walk_duration,
            config,
            stats,
            warnings,
        }
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The underlying arena.
    pub fn tree(&self) -> &Tree<FsEntry> {
        &self.tree
    }

    /// Full paths of every file whose path ends with `suffix`.
    ///
    /// Plain case-sensitive suffix match against the full path string, no
    /// glob or regex semantics. Paths come back in pre-order depth-first
    /// traversal order with children visited in build order; directories are
    /// never emitted. The whole tree is visited regardless of match count.
    pub fn files_of_type(&self, suffix: &str) -> Vec<PathBuf> {
        let mut matches = Vec::new();
        self.collect_with_suffix(self.tree.root(), suffix, &mut matches);
        matches
    }

    fn collect_with_suffix(&self, id: NodeId, suffix: &str, matches: &mut Vec<PathBuf>) {
        let entry = self.tree.data(id);
        if entry.is_file() {
            if entry.path.to_string_lossy().ends_with(suffix) {
                matches.push(entry.path.clone());
            }
        } else if entry.is_dir() {
            for child in self.tree.children(id) {
                self.collect_with_suffix(child, suffix, matches);
            }
        }
    }

    /// Full path of the first file whose bare name equals `name` exactly.
    ///
    /// Pre-order depth-first search, short-circuiting on the first match:
    /// once a subtree produces a hit, remaining siblings are not examined.
    /// Returns `None` if no file matches.
    pub fn find_file(&self, name: &str) -> Option<PathBuf> {
        self.find_in(self.tree.root(), name)
    }

    fn find_in(&self, id: NodeId, name: &str) -> Option<PathBuf> {
        let entry = self.tree.data(id);
        if entry.is_file() {
            if entry.name() == name {
                return Some(entry.path.clone());
            }
        } else if entry.is_dir() {
            for child in self.tree.children(id) {
                if let Some(found) = self.find_in(child, name) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Total number of regular files.
    pub fn total_files(&self) -> u64 {
        self.stats.total_files
    }

    /// Total number of directories.
    pub fn total_dirs(&self) -> u64 {
        self.stats.total_dirs
    }

    /// Total size of regular files in bytes.
    pub fn total_size(&self) -> u64 {
        self.stats.total_size
    }

    /// Check if there were any warnings during the walk.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
