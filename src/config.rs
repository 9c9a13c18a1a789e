// SPDX-License-Identifier: MIT

//! Environment configuration
//!
//! Read once at startup, after `.env` has been loaded:
//! - `DTREE_MAX_HOPS` - hop limit for a single decision (default 1024)
//! - `DTREE_TREE_FILE` - tree file used when the CLI gets no `--file`

use std::env;
use std::path::PathBuf;

use crate::error::DtreeError;
use crate::tree::{EngineConfig, DEFAULT_MAX_HOPS};

pub const MAX_HOPS_VAR: &str = "DTREE_MAX_HOPS";
pub const TREE_FILE_VAR: &str = "DTREE_TREE_FILE";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub engine: EngineConfig,
    pub tree_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self, DtreeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DtreeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_hops = match lookup(MAX_HOPS_VAR) {
            Some(raw) => parse_max_hops(&raw)?,
            None => DEFAULT_MAX_HOPS,
        };

        let tree_file = lookup(TREE_FILE_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        log::debug!("Settings: max_hops={}, tree_file={:?}", max_hops, tree_file);

        Ok(Self {
            engine: EngineConfig { max_hops },
            tree_file,
        })
    }

    /// Explicit path if given, else the configured default
    pub fn resolve_tree_file(&self, explicit: Option<PathBuf>) -> Result<PathBuf, DtreeError> {
        explicit.or_else(|| self.tree_file.clone()).ok_or_else(|| {
            DtreeError::config(format!("no tree file given and {} is not set", TREE_FILE_VAR))
        })
    }
}

fn parse_max_hops(raw: &str) -> Result<usize, DtreeError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(DtreeError::config(format!("{} must be greater than 0", MAX_HOPS_VAR))),
        Ok(n) => Ok(n),
        Err(e) => Err(DtreeError::config(format!(
            "{} must be a positive integer, got '{}': {}",
            MAX_HOPS_VAR, raw, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_with(pairs: &[(&str, &str)]) -> Result<Settings, DtreeError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_with(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.engine.max_hops, DEFAULT_MAX_HOPS);
    }

    #[test]
    fn test_reads_values() {
        let settings =
            settings_with(&[(MAX_HOPS_VAR, " 16 "), (TREE_FILE_VAR, "trees/buy.json")]).unwrap();
        assert_eq!(settings.engine.max_hops, 16);
        assert_eq!(settings.tree_file, Some(PathBuf::from("trees/buy.json")));
    }

    #[test]
    fn test_rejects_bad_max_hops() {
        assert!(matches!(
            settings_with(&[(MAX_HOPS_VAR, "0")]),
            Err(DtreeError::Config(_))
        ));
        assert!(matches!(
            settings_with(&[(MAX_HOPS_VAR, "many")]),
            Err(DtreeError::Config(_))
        ));
    }

    #[test]
    fn test_resolve_tree_file() {
        let settings = settings_with(&[(TREE_FILE_VAR, "default.json")]).unwrap();
        assert_eq!(
            settings.resolve_tree_file(Some(PathBuf::from("x.yaml"))).unwrap(),
            PathBuf::from("x.yaml")
        );
        assert_eq!(
            settings.resolve_tree_file(None).unwrap(),
            PathBuf::from("default.json")
        );

        let empty = settings_with(&[(TREE_FILE_VAR, "  ")]).unwrap();
        assert!(matches!(
            empty.resolve_tree_file(None),
            Err(DtreeError::Config(_))
        ));
    }
}
