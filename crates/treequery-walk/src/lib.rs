//! Directory walker for treequery.
//!
//! This crate resolves a root path and recursively materializes the
//! in-memory file tree in a single synchronous pass. Queries run against
//! the built tree without further filesystem access.
//!
//! # Example
//!
//! ```rust,no_run
//! use treequery_walk::{DirWalker, WalkConfig};
//!
//! let config = WalkConfig::new("/path/to/walk");
//! let tree = DirWalker::new().walk(&config).unwrap();
//!
//! for path in tree.files_of_type(".rs") {
//!     println!("{}", path.display());
//! }
//! if let Some(path) = tree.find_file("Cargo.toml") {
//!     println!("first match: {}", path.display());
//! }
//! ```

mod walker;

pub use walker::DirWalker;

// Re-export core types for convenience
pub use treequery_core::{
    EntryKind, FileTree, FsEntry, NodeId, Tree, TreeStats, WalkConfig, WalkError, WalkWarning,
    WarningKind,
};
