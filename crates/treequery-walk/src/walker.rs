//! Single-pass recursive directory walker.

use std::fs;
use std::path::Path;
use std::time::Instant;

use treequery_core::{
    EntryKind, FileTree, FsEntry, NodeId, Tree, TreeStats, WalkConfig, WalkError, WalkWarning,
};

/// Builds a [`FileTree`] by recursively enumerating a directory subtree.
///
/// The walk is synchronous and single-threaded: one `read_dir` pass per
/// directory, children materialized in the order the OS yields them. All
/// filesystem I/O happens here; the resulting tree is queried without ever
/// touching the filesystem again.
pub struct DirWalker;

impl DirWalker {
    /// Create a new walker.
    pub fn new() -> Self {
        Self
    }

    /// Build the tree rooted at `config.root`.
    ///
    /// Fails only when the root itself cannot be resolved; problems below
    /// the root are recorded as warnings and the offending entries skipped.
    pub fn walk(&self, config: &WalkConfig) -> Result<FileTree, WalkError> {
        let start = Instant::now();
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| WalkError::io(&config.root, e))?;
        let metadata =
            fs::symlink_metadata(&root_path).map_err(|e| WalkError::io(&root_path, e))?;

        tracing::debug!(root = %root_path.display(), "building file tree");

        let name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| root_path.to_string_lossy().to_string());
        let root_entry = classify(name, &root_path, &metadata);

        let mut stats = TreeStats::new();
        let mut warnings = Vec::new();
        match &root_entry.kind {
            EntryKind::File { size } => stats.record_file(*size, 0),
            EntryKind::Directory => stats.record_dir(0),
            EntryKind::Symlink { .. } => stats.record_symlink(),
            EntryKind::Other => {}
        }

        let is_dir = root_entry.is_dir();
        let mut tree = Tree::new(root_entry);
        if is_dir {
            let root = tree.root();
            self.walk_dir(&mut tree, root, config, 1, &mut stats, &mut warnings);
        }

        tracing::debug!(
            files = stats.total_files,
            dirs = stats.total_dirs,
            warnings = warnings.len(),
            "file tree built"
        );

        Ok(FileTree::new(
            tree,
            root_path,
            config.clone(),
            stats,
            start.elapsed(),
            warnings,
        ))
    }

    /// Enumerate the children of `dir` (at `depth` below the root), attach
    /// them in enumeration order, and recurse into subdirectories.
    fn walk_dir(
        &self,
        tree: &mut Tree<FsEntry>,
        dir: NodeId,
        config: &WalkConfig,
        depth: u32,
        stats: &mut TreeStats,
        warnings: &mut Vec<WalkWarning>,
    ) {
        if config.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        let dir_path = tree.data(dir).path.clone();
        let entries = match fs::read_dir(&dir_path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir_path.display(), error = %e, "unreadable directory");
                warnings.push(WalkWarning::read_error(&dir_path, &e));
                return;
            }
        };

        for entry in entries {
            let dirent = match entry {
                Ok(d) => d,
                Err(e) => {
                    warnings.push(WalkWarning::read_error(&dir_path, &e));
                    continue;
                }
            };

            let name = dirent.file_name().to_string_lossy().to_string();
            if config.should_skip_hidden(&name) || config.should_ignore(&name) {
                continue;
            }

            let path = dirent.path();
            let metadata = match fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    warnings.push(WalkWarning::metadata_error(&path, &e));
                    continue;
                }
            };

            let entry = classify(name, &path, &metadata);
            match &entry.kind {
                EntryKind::File { size } => stats.record_file(*size, depth),
                EntryKind::Directory => stats.record_dir(depth),
                EntryKind::Symlink { .. } => stats.record_symlink(),
                EntryKind::Other => {}
            }

            let is_dir = entry.is_dir();
            let child = tree.push_child(dir, entry);
            if is_dir {
                self.walk_dir(tree, child, config, depth + 1, stats, warnings);
            }
        }
    }
}

impl Default for DirWalker {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a path into an [`FsEntry`] from its (non-following) metadata.
fn classify(name: String, path: &Path, metadata: &fs::Metadata) -> FsEntry {
    let file_type = metadata.file_type();
    let kind = if file_type.is_symlink() {
        let target = fs::read_link(path)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        EntryKind::Symlink {
            target: target.into(),
        }
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File {
            size: metadata.len(),
        }
    } else {
        EntryKind::Other
    };

    FsEntry {
        name: name.into(),
        path: path.to_path_buf(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.log"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_basic_walk() {
        let temp = create_test_tree();
        let config = WalkConfig::new(temp.path());

        let tree = DirWalker::new().walk(&config).unwrap();

        assert_eq!(tree.stats.total_files, 4);
        assert_eq!(tree.stats.total_dirs, 4); // root + dir1 + dir2 + subdir
        assert_eq!(tree.stats.max_depth, 3);
        assert!(tree.total_size() > 0);
        assert!(!tree.has_warnings());
    }

    #[test]
    fn test_build_completeness() {
        let temp = create_test_tree();
        let config = WalkConfig::new(temp.path());

        let tree = DirWalker::new().walk(&config).unwrap();

        // Direct children of the root match what read_dir reports.
        let on_disk = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(tree.tree().children(tree.root()).count(), on_disk);

        // One arena node per filesystem entry, root included.
        assert_eq!(tree.tree().len(), 8);
    }

    #[test]
    fn test_parent_links_after_walk() {
        let temp = create_test_tree();
        let config = WalkConfig::new(temp.path());

        let file_tree = DirWalker::new().walk(&config).unwrap();
        let tree = file_tree.tree();

        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            for child in tree.children(id) {
                assert_eq!(tree.parent(child), Some(id));
                stack.push(child);
            }
        }
    }

    #[test]
    fn test_queries_on_walked_tree() {
        let temp = create_test_tree();
        let config = WalkConfig::new(temp.path());

        let tree = DirWalker::new().walk(&config).unwrap();

        let mut txt = tree.files_of_type(".txt");
        txt.sort();
        let mut expected = vec![
            temp.path().canonicalize().unwrap().join("file1.txt"),
            temp.path().canonicalize().unwrap().join("dir1/file2.txt"),
            temp.path().canonicalize().unwrap().join("dir2/file4.txt"),
        ];
        expected.sort();
        assert_eq!(txt, expected);

        assert_eq!(
            tree.find_file("file3.log"),
            Some(temp.path().canonicalize().unwrap().join("dir1/subdir/file3.log"))
        );
        assert_eq!(tree.find_file("absent.txt"), None);
    }

    #[test]
    fn test_root_is_a_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("only.txt");
        fs::write(&file, "alone").unwrap();

        let config = WalkConfig::new(&file);
        let tree = DirWalker::new().walk(&config).unwrap();

        assert_eq!(tree.tree().len(), 1);
        assert!(tree.tree().is_leaf(tree.root()));
        assert_eq!(tree.stats.total_files, 1);
        assert_eq!(tree.files_of_type(".txt"), vec![file.canonicalize().unwrap()]);
        assert!(tree.files_of_type(".rs").is_empty());
    }

    #[test]
    fn test_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let config = WalkConfig::new(temp.path().join("does-not-exist"));

        let err = DirWalker::new().walk(&config).unwrap_err();
        assert!(matches!(err, WalkError::NotFound { .. }));
    }

    #[test]
    fn test_hidden_files_filtered() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".hidden"), "x").unwrap();
        fs::write(temp.path().join("visible.txt"), "x").unwrap();

        let config = WalkConfig::builder()
            .root(temp.path())
            .include_hidden(false)
            .build()
            .unwrap();
        let tree = DirWalker::new().walk(&config).unwrap();

        assert_eq!(tree.stats.total_files, 1);
        assert_eq!(tree.find_file(".hidden"), None);
    }

    #[test]
    fn test_ignore_patterns() {
        let temp = create_test_tree();
        let config = WalkConfig::builder()
            .root(temp.path())
            .ignore_patterns(vec!["dir2".to_string(), "*.log".to_string()])
            .build()
            .unwrap();

        let tree = DirWalker::new().walk(&config).unwrap();

        assert_eq!(tree.find_file("file4.txt"), None);
        assert_eq!(tree.find_file("file3.log"), None);
        assert_eq!(tree.stats.total_files, 2);
    }

    #[test]
    fn test_max_depth_truncates() {
        let temp = create_test_tree();
        let config = WalkConfig::builder()
            .root(temp.path())
            .max_depth(Some(1u32))
            .build()
            .unwrap();

        let tree = DirWalker::new().walk(&config).unwrap();

        // Depth 1 keeps the root's direct children but nothing below them.
        assert_eq!(tree.stats.total_files, 1); // file1.txt only
        assert_eq!(tree.find_file("file2.txt"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_a_leaf_and_never_followed() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(temp.path().join("dir1"), temp.path().join("link")).unwrap();

        let config = WalkConfig::new(temp.path());
        let tree = DirWalker::new().walk(&config).unwrap();

        assert_eq!(tree.stats.total_symlinks, 1);
        // dir1 contents appear once; the link added no file nodes.
        assert_eq!(tree.stats.total_files, 4);

        let link = tree
            .tree()
            .children(tree.root())
            .find(|&id| tree.tree().data(id).name() == "link")
            .unwrap();
        assert!(tree.tree().is_leaf(link));
        assert!(tree.tree().data(link).kind.is_symlink());
    }
}
