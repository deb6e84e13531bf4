//! Core types and query algorithms for treequery.
//!
//! This crate provides the arena-backed tree, the filesystem entry
//! descriptors stored in it, and the two traversal queries. It performs no
//! filesystem I/O itself; building a tree from a real directory lives in
//! `treequery-walk`.

mod config;
mod entry;
mod error;
mod node;
mod tree;

pub use config::{WalkConfig, WalkConfigBuilder};
pub use entry::{EntryKind, FsEntry};
pub use error::{WalkError, WalkWarning, WarningKind};
pub use node::{Node, NodeId, Tree};
pub use tree::{FileTree, TreeStats};
