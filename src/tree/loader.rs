//! Tree loader - file loading and parsing
//!
//! This module handles loading tree definitions from JSON or YAML files.

use std::fs;
use std::path::Path;

use super::model::Tree;
use crate::error::DtreeError;

/// On-disk tree formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Yaml,
}

impl TreeFormat {
    /// Pick the format from a file extension; anything but `.yaml`/`.yml` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => TreeFormat::Yaml,
            _ => TreeFormat::Json,
        }
    }
}

/// Loads and validates trees from files
pub struct TreeLoader;

impl TreeLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load and validate a tree from a file
    pub fn load_tree<P: AsRef<Path>>(&self, path: P) -> Result<Tree, DtreeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let tree = Self::parse(&content, TreeFormat::from_path(path))?;
        log::info!(
            "Loaded tree from {} ({} nodes)",
            path.display(),
            tree.node_count()
        );
        Ok(tree)
    }

    pub fn parse(content: &str, format: TreeFormat) -> Result<Tree, DtreeError> {
        match format {
            TreeFormat::Json => Tree::from_json_str(content),
            TreeFormat::Yaml => Tree::from_yaml(content),
        }
    }

    /// Serialize a tree in the given format
    pub fn render(tree: &Tree, format: TreeFormat) -> Result<String, DtreeError> {
        match format {
            TreeFormat::Json => tree.to_json_pretty(),
            TreeFormat::Yaml => tree.to_yaml(),
        }
    }
}

impl Default for TreeLoader {
    fn default() -> Self {
        Self::new()
    }
}
