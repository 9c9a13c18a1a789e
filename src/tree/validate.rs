//! Structural validation of parsed trees
//!
//! Walks the definition breadth-first from the root and stops at the first
//! malformed branch or condition. Nothing is modified.

use std::collections::VecDeque;

use super::condition::Condition;
use super::schema::{NodeDef, TreeDef};
use crate::error::TreeError;

/// Validate a whole tree definition
pub fn validate_tree(def: &TreeDef) -> Result<(), TreeError> {
    let root = def.root.as_ref().ok_or(TreeError::InvalidTreeData)?;
    if root.branches.is_none() {
        return Err(TreeError::InvalidTreeData);
    }

    let visited = validate_subtree(root)?;
    log::debug!("Validated tree rooted at '{}' ({} nodes)", root.predict, visited);
    Ok(())
}

/// Validate a node and everything reachable from it; returns the number of nodes visited
pub fn validate_subtree(node: &NodeDef) -> Result<usize, TreeError> {
    let mut queue: VecDeque<&NodeDef> = VecDeque::new();
    queue.push_back(node);
    let mut visited = 0;

    while let Some(current) = queue.pop_front() {
        visited += 1;

        for branch in current.branches.iter().flatten() {
            let (condition, outcome) = match (&branch.condition, &branch.outcome) {
                (Some(c), Some(o)) => (c, o),
                _ => return Err(TreeError::invalid_branch(&current.predict)),
            };

            Condition::from_parts(&condition.kind, condition.value.as_ref())?;

            if let Some(next) = &outcome.next_node {
                queue.push_back(next);
            }
        }
    }

    Ok(visited)
}
