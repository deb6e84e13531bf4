//! Walk configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for building a file tree.
///
/// Defaults impose no filtering: every entry `read_dir` yields is
/// materialized, in the order the OS provides it.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Root path to walk.
    pub root: PathBuf,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum depth to descend below the root (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Entry names to skip (exact match, or a single leading/trailing `*`).
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Create a simple config for walking a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_hidden: true,
            max_depth: None,
            ignore_patterns: Vec::new(),
        }
    }

    /// Check if a name should be ignored based on patterns.
    pub fn should_ignore(&self, name: &str) -> bool {
        for pattern in &self.ignore_patterns {
            if name == pattern {
                return true;
            }
            if let Some(prefix) = pattern.strip_suffix('*') {
                if name.starts_with(prefix) {
                    return true;
                }
            }
            if let Some(suffix) = pattern.strip_prefix('*') {
                if name.ends_with(suffix) {
                    return true;
                }
            }
        }
        false
    }

    /// Check if hidden files should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WalkConfig::builder()
            .root("/home/user")
            .max_depth(Some(3u32))
            .include_hidden(false)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.max_depth, Some(3));
        assert!(!config.include_hidden);
    }

    #[test]
    fn test_builder_rejects_empty_root() {
        assert!(WalkConfig::builder().root("").build().is_err());
        assert!(WalkConfig::builder().build().is_err());
    }

    #[test]
    fn test_config_simple() {
        let config = WalkConfig::new("/home/user");
        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert!(config.include_hidden);
        assert_eq!(config.max_depth, None);
    }

    #[test]
    fn test_should_ignore() {
        let config = WalkConfig::builder()
            .root("/test")
            .ignore_patterns(vec!["node_modules".to_string(), "*.log".to_string()])
            .build()
            .unwrap();

        assert!(config.should_ignore("node_modules"));
        assert!(config.should_ignore("test.log"));
        assert!(!config.should_ignore("src"));
    }

    #[test]
    fn test_should_skip_hidden() {
        let mut config = WalkConfig::new("/test");
        assert!(!config.should_skip_hidden(".git"));

        config.include_hidden = false;
        assert!(config.should_skip_hidden(".git"));
        assert!(!config.should_skip_hidden("src"));
    }
}
