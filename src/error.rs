// SPDX-License-Identifier: MIT

//! Typed error handling for dtree-rs
//!
//! `TreeError` covers structural and decision failures of the engine itself.
//! `DtreeError` wraps it together with the I/O, parse and configuration errors
//! that surround loading a tree.

use thiserror::Error;

use crate::tree::Literal;

/// Top-level error type for dtree-rs
#[derive(Debug, Error)]
pub enum DtreeError {
    /// Structural or decision errors from the tree engine
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Configuration errors (invalid env vars, missing tree file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Tree construction and decision errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// Root node missing, or the root carries no branch list
    #[error("invalid tree data")]
    InvalidTreeData,

    /// A branch is missing its condition or its outcome
    #[error("invalid branch format under predicate '{predict}'")]
    InvalidBranchFormat { predict: String },

    /// A condition with an empty or unknown type, or an unusable value
    #[error("invalid condition data: {0}")]
    InvalidConditionData(String),

    /// The answers lack an entry for the predicate being asked
    #[error("missing decision input for: {0}")]
    MissingPredicateInput(String),

    /// None of the node's branches accept the supplied answer
    #[error("no branch of '{predict}' matches {value}")]
    NoMatchingBranch { predict: String, value: Literal },

    /// Traversal exceeded the configured hop limit
    #[error("decision exceeded {0} hops")]
    HopLimitExceeded(usize),

    /// A branch path does not address a branch of the tree
    #[error("no branch at path {0:?}")]
    InvalidBranchPath(Vec<usize>),

    /// An answer value that cannot be matched against conditions
    #[error("invalid answer for '{predict}': {reason}")]
    InvalidAnswer { predict: String, reason: String },
}

impl TreeError {
    pub fn invalid_condition(reason: impl Into<String>) -> Self {
        Self::InvalidConditionData(reason.into())
    }

    pub fn invalid_branch(predict: impl Into<String>) -> Self {
        Self::InvalidBranchFormat {
            predict: predict.into(),
        }
    }
}

impl DtreeError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The engine error behind this one, if any
    pub fn as_tree_error(&self) -> Option<&TreeError> {
        match self {
            Self::Tree(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T, E = DtreeError> = std::result::Result<T, E>;
