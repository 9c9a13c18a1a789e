//! Decision engine

use serde_json::Value;
use std::collections::HashMap;

use super::condition::Literal;
use super::model::{Node, Tree};
use crate::error::TreeError;

/// Answers to predicates, keyed by predicate name
pub type Answers = HashMap<String, Literal>;

pub const DEFAULT_MAX_HOPS: usize = 1024;

/// Engine limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of nodes evaluated in one decision
    pub max_hops: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

/// Where a decision ended
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<'t> {
    /// Leaf reached, or `None` when the matched outcome had no next node
    pub leaf: Option<&'t Node>,
    /// Result carried by the last matched outcome
    pub result: Option<&'t Value>,
    /// Predicates asked, in order
    pub path: Vec<&'t str>,
}

/// Walks a tree from the root following the first matching branch
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Walk `tree` with `answers`, taking the first branch whose condition matches
    ///
    /// A root without branches is returned at once as the leaf, before any
    /// answer is looked up, so an empty answer map decides it.
    pub fn decide<'t>(&self, tree: &'t Tree, answers: &Answers) -> Result<Decision<'t>, TreeError> {
        let mut current = tree.root();
        let mut path = Vec::new();

        if current.is_leaf() {
            return Ok(Decision {
                leaf: Some(current),
                result: None,
                path,
            });
        }

        loop {
            if path.len() >= self.config.max_hops {
                log::warn!("Decision stopped after {} hops", path.len());
                return Err(TreeError::HopLimitExceeded(self.config.max_hops));
            }

            let answer = answers
                .get(&current.predict)
                .ok_or_else(|| TreeError::MissingPredicateInput(current.predict.clone()))?;
            path.push(current.predict.as_str());

            let branch = current
                .branches
                .iter()
                .find(|b| b.condition.matches(answer))
                .ok_or_else(|| TreeError::NoMatchingBranch {
                    predict: current.predict.clone(),
                    value: answer.clone(),
                })?;

            log::debug!("'{}' = {} -> branch taken", current.predict, answer);

            let outcome = &branch.outcome;
            match outcome.next.as_deref() {
                Some(next) if !next.is_leaf() => current = next,
                leaf => {
                    return Ok(Decision {
                        leaf,
                        result: outcome.result.as_ref(),
                        path,
                    })
                }
            }
        }
    }
}

impl Tree {
    /// Decide with the default engine limits
    pub fn decide(&self, answers: &Answers) -> Result<Decision<'_>, TreeError> {
        Engine::default().decide(self, answers)
    }
}

/// Parse a JSON object of predicate answers
pub fn answers_from_json(text: &str) -> Result<Answers, crate::error::DtreeError> {
    let raw: HashMap<String, Value> = serde_json::from_str(text)?;
    let mut answers = Answers::with_capacity(raw.len());
    for (predict, value) in raw {
        let literal = Literal::try_from(&value).map_err(|reason| TreeError::InvalidAnswer {
            predict: predict.clone(),
            reason,
        })?;
        answers.insert(predict, literal);
    }
    Ok(answers)
}
