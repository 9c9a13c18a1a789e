// SPDX-License-Identifier: MIT

//! Tree builder and copy helpers
//!
//! Everything here returns fresh structures and leaves its inputs untouched,
//! so subtrees can be cloned out of one tree and grafted into another.

use serde_json::Value;

use super::condition::{Condition, Literal};
use super::model::{Branch, Node, Outcome, Tree, STACK_GROWTH, STACK_RED_ZONE};
use super::schema::{BranchDef, ConditionDef, NodeDef, OutcomeDef};
use super::validate;
use crate::error::TreeError;

/// Fluent construction of a [`Node`]
#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
    id: i64,
    predict: String,
    branches: Vec<Branch>,
    error: Option<TreeError>,
}

impl NodeBuilder {
    pub fn new(predict: impl Into<String>) -> Self {
        Self {
            id: 0,
            predict: predict.into(),
            branches: Vec::new(),
            error: None,
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Append a branch; branches are evaluated in the order they are added
    pub fn branch(mut self, condition: Condition, outcome: Outcome) -> Self {
        self.branches.push(Branch { condition, outcome });
        self
    }

    /// Continue into `next` when the answer equals `value`
    pub fn when(self, value: impl Into<Literal>, next: Node) -> Self {
        self.equals_branch(value.into(), Outcome::next(next))
    }

    /// End with `result` when the answer equals `value`
    pub fn then_result(self, value: impl Into<Literal>, result: impl Into<Value>) -> Self {
        self.equals_branch(value.into(), Outcome::result(result))
    }

    fn equals_branch(mut self, value: Literal, outcome: Outcome) -> Self {
        match Condition::equals(value) {
            Ok(condition) => self.branch(condition, outcome),
            Err(e) => {
                self.error.get_or_insert(e);
                self
            }
        }
    }

    /// Finish the node; fails with the first invalid condition value given
    pub fn build(self) -> Result<Node, TreeError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(Node {
            id: self.id,
            predict: self.predict,
            branches: self.branches,
        })
    }
}

/// Copy a node definition, dropping branches that lack a condition or outcome
pub fn copy_node(def: &NodeDef) -> NodeDef {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || copy_node_inner(def))
}

fn copy_node_inner(def: &NodeDef) -> NodeDef {
    let branches = def
        .branches
        .iter()
        .flatten()
        .filter_map(|branch| match (&branch.condition, &branch.outcome) {
            (Some(condition), Some(outcome)) => Some(BranchDef {
                condition: Some(condition.clone()),
                outcome: Some(OutcomeDef {
                    result: outcome.result.clone(),
                    next_node: outcome.next_node.as_deref().map(|n| Box::new(copy_node(n))),
                }),
            }),
            _ => {
                log::warn!("Dropping incomplete branch under '{}'", def.predict);
                None
            }
        })
        .collect();

    NodeDef {
        id: def.id,
        predict: def.predict.clone(),
        branches: Some(branches),
    }
}

/// Copy a node definition and validate it into a detached [`Node`]
pub fn adopt_node(def: &NodeDef) -> Result<Node, TreeError> {
    let copy = copy_node(def);
    validate::validate_subtree(&copy)?;
    Node::try_from(copy)
}

/// Build conditions from definitions, failing on the first unknown type
pub fn make_conditions(defs: &[ConditionDef]) -> Result<Vec<Condition>, TreeError> {
    defs.iter()
        .map(|d| Condition::from_parts(&d.kind, d.value.as_ref()))
        .collect()
}

/// Copy outcome definitions, keeping only those that lead to a next node
pub fn copy_outcomes(defs: &[OutcomeDef]) -> Vec<OutcomeDef> {
    defs.iter()
        .filter_map(|d| d.next_node.as_deref())
        .map(|next| OutcomeDef {
            result: None,
            next_node: Some(Box::new(copy_node(next))),
        })
        .collect()
}

impl Outcome {
    /// Outcome continuing into a copy of `next`; absent when there is no next node
    pub fn copy_next(next: Option<&Node>) -> Option<Outcome> {
        next.map(|n| Outcome::next(n.clone()))
    }
}

impl Tree {
    /// Return a new tree whose branch at `path` continues into `node`
    ///
    /// `path` lists branch indices starting from the root. The addressed
    /// branch keeps its condition and result; its next node is replaced.
    pub fn attach(&self, path: &[usize], node: Node) -> Result<Tree, TreeError> {
        let (last, prefix) = path
            .split_last()
            .ok_or_else(|| TreeError::InvalidBranchPath(path.to_vec()))?;

        let mut root = self.root().clone();
        let mut current = &mut root;
        for &idx in prefix {
            current = current
                .branches
                .get_mut(idx)
                .and_then(|b| b.outcome.next.as_deref_mut())
                .ok_or_else(|| TreeError::InvalidBranchPath(path.to_vec()))?;
        }

        let branch = current
            .branches
            .get_mut(*last)
            .ok_or_else(|| TreeError::InvalidBranchPath(path.to_vec()))?;
        branch.outcome.next = Some(Box::new(node));

        Ok(Tree::new(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn def(value: serde_json::Value) -> NodeDef {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_builder_keeps_branch_order() {
        let node = NodeBuilder::new("Color")
            .id(7)
            .then_result("red", "stop")
            .then_result("green", "go")
            .build()
            .unwrap();
        assert_eq!(node.id, 7);
        assert_eq!(node.branches.len(), 2);
        assert_eq!(node.branches[0].condition.value(), &Literal::from("red"));
        assert_eq!(node.branches[1].outcome.result, Some(json!("go")));
    }

    #[test]
    fn test_builder_rejects_non_finite_values() {
        let err = NodeBuilder::new("Score")
            .then_result(1.0, "one")
            .then_result(f64::NAN, "never")
            .when(f64::INFINITY, Node::leaf("Later"))
            .build()
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidConditionData(ref m) if m.contains("NaN")));
    }

    #[test]
    fn test_copy_node_filters_incomplete_branches() {
        let original = def(json!({"node_id": 1, "predict": "A", "branches": [
            {"condition": {"type": "bool", "value": true}, "outcome": {"nextNode": {"predict": "B", "branches": [
                {"condition": null, "outcome": {"result": 1}},
                {"condition": {"type": "bool", "value": false}, "outcome": {"result": 2}}
            ]}}},
            {"condition": {"type": "bool", "value": false}}
        ]}));
        let before = original.clone();

        let copy = copy_node(&original);
        assert_eq!(original, before);

        let branches = copy.branches.as_ref().unwrap();
        assert_eq!(branches.len(), 1);
        let nested = branches[0].outcome.as_ref().unwrap().next_node.as_ref().unwrap();
        let nested_branches = nested.branches.as_ref().unwrap();
        assert_eq!(nested_branches.len(), 1);
        assert_eq!(
            nested_branches[0].outcome.as_ref().unwrap().result,
            Some(json!(2))
        );
    }

    #[test]
    fn test_adopt_node() {
        let node = adopt_node(&def(json!({"predict": "A", "branches": [
            {"condition": {"type": "comparison", "value": 3}, "outcome": {"result": "three"}},
            {"outcome": {"result": "dropped"}}
        ]}))).unwrap();
        assert_eq!(node.predict, "A");
        assert_eq!(node.branches.len(), 1);

        let err = adopt_node(&def(json!({"predict": "A", "branches": [
            {"condition": {"type": "range", "value": 3}, "outcome": {}}
        ]})))
        .unwrap_err();
        assert!(matches!(err, TreeError::InvalidConditionData(_)));
    }

    #[test]
    fn test_make_conditions() {
        let ok = make_conditions(&[
            ConditionDef { kind: "bool".into(), value: Some(json!(true)) },
            ConditionDef { kind: "comparison".into(), value: Some(json!("x")) },
        ])
        .unwrap();
        assert_eq!(ok.len(), 2);

        let err = make_conditions(&[
            ConditionDef { kind: "bool".into(), value: Some(json!(true)) },
            ConditionDef { kind: "between".into(), value: Some(json!(1)) },
        ])
        .unwrap_err();
        assert!(matches!(err, TreeError::InvalidConditionData(_)));
    }

    #[test]
    fn test_copy_outcomes_skips_terminal_outcomes() {
        let outcomes = vec![
            OutcomeDef { result: Some(json!("end")), next_node: None },
            OutcomeDef { result: None, next_node: Some(Box::new(NodeDef::leaf(2, "Next"))) },
        ];
        let copies = copy_outcomes(&outcomes);
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].next_node.as_deref(), Some(&NodeDef::leaf(2, "Next")));
    }

    #[test]
    fn test_copy_next() {
        assert_eq!(Outcome::copy_next(None), None);
        let leaf = Node::leaf("X");
        let outcome = Outcome::copy_next(Some(&leaf)).unwrap();
        assert_eq!(outcome.next.as_deref(), Some(&leaf));
    }

    #[test]
    fn test_attach_returns_new_tree() {
        let tree = Tree::new(
            NodeBuilder::new("ShouldBuy")
                .when(true, Node::leaf("CheckBudget"))
                .then_result(false, "skip")
                .build()
                .unwrap(),
        );

        let grown = tree.attach(&[1], Node::leaf("AskLater")).unwrap();
        assert!(tree.root().branches[1].outcome.next.is_none());

        let branch = &grown.root().branches[1];
        assert_eq!(branch.outcome.result, Some(json!("skip")));
        assert_eq!(branch.outcome.next.as_deref().map(|n| n.predict.as_str()), Some("AskLater"));
    }

    #[test]
    fn test_attach_invalid_path() {
        let tree = Tree::new(NodeBuilder::new("A").when(true, Node::leaf("B")).build().unwrap());
        assert_eq!(
            tree.attach(&[0, 0], Node::leaf("C")),
            Err(TreeError::InvalidBranchPath(vec![0, 0]))
        );
        assert_eq!(
            tree.attach(&[], Node::leaf("C")),
            Err(TreeError::InvalidBranchPath(vec![]))
        );
        assert_eq!(
            tree.attach(&[4], Node::leaf("C")),
            Err(TreeError::InvalidBranchPath(vec![4]))
        );
    }
}
