// SPDX-License-Identifier: MIT

//! Binary decision trees
//!
//! This module provides:
//! - `TreeDef` - the serialized shape, accepted as-is from files
//! - `Tree` - a validated, strictly owned tree
//! - `Engine` - first-match-wins traversal from the root to a leaf
//! - `NodeBuilder` and copy helpers for growing or cloning trees

pub mod builder;
pub mod condition;
pub mod engine;
pub mod loader;
mod model;
pub mod schema;
mod validate;

pub use builder::{adopt_node, copy_node, copy_outcomes, make_conditions, NodeBuilder};
pub use condition::{Condition, ConditionKind, Literal};
pub use engine::{answers_from_json, Answers, Decision, Engine, EngineConfig, DEFAULT_MAX_HOPS};
pub use loader::{TreeFormat, TreeLoader};
pub use model::{Branch, Node, Outcome, Tree};
pub use schema::{tree_schema, BranchDef, ConditionDef, NodeDef, OutcomeDef, TreeDef};
pub use validate::{validate_subtree, validate_tree};
