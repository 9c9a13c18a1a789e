// SPDX-License-Identifier: MIT

//! Validated decision tree
//!
//! A [`Tree`] owns its root [`Node`]; each node owns its branches and every
//! branch owns the node it leads to. Instances are only produced by
//! validation or by the builder, so a `Tree` in hand is always well-formed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;

use super::condition::Condition;
use super::schema::{BranchDef, ConditionDef, NodeDef, OutcomeDef, TreeDef};
use super::validate;
use crate::error::{DtreeError, TreeError};

/// Remaining stack below which recursive conversions switch to a fresh segment
pub(crate) const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each stack segment allocated past the red zone
pub(crate) const STACK_GROWTH: usize = 1024 * 1024;

/// A validated decision tree
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: Node,
}

/// A node asking one predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub predict: String,
    pub branches: Vec<Branch>,
}

/// Condition plus where it leads
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: Condition,
    pub outcome: Outcome,
}

/// Destination of a taken branch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub result: Option<Value>,
    pub next: Option<Box<Node>>,
}

impl Tree {
    /// Wrap a root node built in memory
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Validate a parsed definition and take ownership of it
    pub fn from_def(def: TreeDef) -> Result<Self, TreeError> {
        validate::validate_tree(&def)?;
        let root = def.root.ok_or(TreeError::InvalidTreeData)?;
        Ok(Self {
            root: Node::try_from(root)?,
        })
    }

    /// Parse JSON without a nesting limit; depth is bounded by the input alone
    pub fn from_json(bytes: &[u8]) -> Result<Self, DtreeError> {
        let mut de = serde_json::Deserializer::from_slice(bytes);
        de.disable_recursion_limit();
        let def = TreeDef::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(Self::from_def(def)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DtreeError> {
        Self::from_json(text.as_bytes())
    }

    /// Parse YAML; serde_yaml caps nesting at 128 levels (about 30 tree levels)
    pub fn from_yaml(text: &str) -> Result<Self, DtreeError> {
        let def: TreeDef = serde_yaml::from_str(text)?;
        Ok(Self::from_def(def)?)
    }

    pub fn to_def(&self) -> TreeDef {
        TreeDef {
            root: Some(NodeDef::from(&self.root)),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, DtreeError> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::new(&mut out);
        self.to_def()
            .serialize(serde_stacker::Serializer::new(&mut ser))?;
        Ok(out)
    }

    pub fn to_json_pretty(&self) -> Result<String, DtreeError> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::pretty(&mut out);
        self.to_def()
            .serialize(serde_stacker::Serializer::new(&mut ser))?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn to_yaml(&self) -> Result<String, DtreeError> {
        Ok(serde_yaml::to_string(&self.to_def())?)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Nodes in breadth-first order, root first
    pub fn nodes(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(&self.root);

        while let Some(node) = queue.pop_front() {
            out.push(node);
            for child in node.children() {
                queue.push_back(child);
            }
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut queue = VecDeque::new();
        queue.push_back((&self.root, 1));

        while let Some((node, depth)) = queue.pop_front() {
            max_depth = max_depth.max(depth);
            for child in node.children() {
                queue.push_back((child, depth + 1));
            }
        }
        max_depth
    }

    pub fn leaves(&self) -> Vec<&Node> {
        self.nodes().into_iter().filter(|n| n.is_leaf()).collect()
    }

    /// Distinct predicates asked by non-leaf nodes, in breadth-first order
    pub fn predicates(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for node in self.nodes() {
            if !node.is_leaf() && !seen.contains(&node.predict.as_str()) {
                seen.push(&node.predict);
            }
        }
        seen
    }
}

impl Node {
    pub fn leaf(predict: impl Into<String>) -> Self {
        Self {
            id: 0,
            predict: predict.into(),
            branches: vec![],
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.branches.is_empty()
    }

    /// Nodes reachable through one branch
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.branches
            .iter()
            .filter_map(|b| b.outcome.next.as_deref())
    }
}

impl Outcome {
    pub fn next(node: Node) -> Self {
        Self {
            result: None,
            next: Some(Box::new(node)),
        }
    }

    pub fn result(value: impl Into<Value>) -> Self {
        Self {
            result: Some(value.into()),
            next: None,
        }
    }

    pub fn with_result(mut self, value: impl Into<Value>) -> Self {
        self.result = Some(value.into());
        self
    }
}

impl TryFrom<NodeDef> for Node {
    type Error = TreeError;

    fn try_from(def: NodeDef) -> Result<Self, Self::Error> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || node_from_def(def))
    }
}

fn node_from_def(def: NodeDef) -> Result<Node, TreeError> {
    let mut branches = Vec::new();
    for branch in def.branches.unwrap_or_default() {
        let (condition, outcome) = match (branch.condition, branch.outcome) {
            (Some(c), Some(o)) => (c, o),
            _ => return Err(TreeError::invalid_branch(&def.predict)),
        };
        let condition = Condition::from_parts(&condition.kind, condition.value.as_ref())?;
        let next = match outcome.next_node {
            Some(next) => Some(Box::new(Node::try_from(*next)?)),
            None => None,
        };
        branches.push(Branch {
            condition,
            outcome: Outcome {
                result: outcome.result,
                next,
            },
        });
    }

    Ok(Node {
        id: def.id,
        predict: def.predict,
        branches,
    })
}

impl From<&Node> for NodeDef {
    fn from(node: &Node) -> Self {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || Self {
            id: node.id,
            predict: node.predict.clone(),
            branches: Some(node.branches.iter().map(BranchDef::from).collect()),
        })
    }
}

impl From<&Branch> for BranchDef {
    fn from(branch: &Branch) -> Self {
        Self {
            condition: Some(ConditionDef {
                kind: branch.condition.kind().to_string(),
                value: Some(branch.condition.value().to_json()),
            }),
            outcome: Some(OutcomeDef {
                result: branch.outcome.result.clone(),
                next_node: branch
                    .outcome
                    .next
                    .as_deref()
                    .map(|n| Box::new(NodeDef::from(n))),
            }),
        }
    }
}
