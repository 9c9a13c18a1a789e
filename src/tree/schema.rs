//! Serialized tree format
//!
//! These types mirror the on-disk shape exactly and accept incomplete data;
//! every field the validator checks is optional here so that a malformed
//! branch surfaces as a tree error rather than a parse error.

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decision tree as read from a file
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, JsonSchema)]
pub struct TreeDef {
    /// Root node of the tree
    #[serde(default)]
    pub root: Option<NodeDef>,
}

/// A node asking one predicate
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, JsonSchema)]
pub struct NodeDef {
    /// Optional identifier, not required to be unique
    #[serde(rename = "node_id", default)]
    pub id: i64,
    /// Name of the predicate this node asks
    #[serde(default)]
    pub predict: String,
    /// Outgoing branches in evaluation order; empty for a leaf
    #[serde(default)]
    pub branches: Option<Vec<BranchDef>>,
}

/// An edge from a node
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, JsonSchema)]
pub struct BranchDef {
    #[serde(default)]
    pub condition: Option<ConditionDef>,
    #[serde(default)]
    pub outcome: Option<OutcomeDef>,
}

/// Condition test value tagged with its type
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, JsonSchema)]
pub struct ConditionDef {
    /// `bool` or `comparison`
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: Option<Value>,
}

/// Where a taken branch leads
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, JsonSchema)]
pub struct OutcomeDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(rename = "nextNode", default, skip_serializing_if = "Option::is_none")]
    pub next_node: Option<Box<NodeDef>>,
}

impl NodeDef {
    /// Create a leaf definition
    pub fn leaf(id: i64, predict: impl Into<String>) -> Self {
        Self {
            id,
            predict: predict.into(),
            branches: Some(vec![]),
        }
    }
}

static TREE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::to_value(schemars::schema_for!(TreeDef)).unwrap_or(Value::Null)
});

/// JSON Schema describing the serialized tree format
pub fn tree_schema() -> &'static Value {
    &TREE_SCHEMA
}
