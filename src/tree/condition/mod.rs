// SPDX-License-Identifier: MIT

//! Branch conditions
//!
//! A condition pairs a type (`bool` or `comparison`) with a scalar literal.
//! Matching is type-safe: an answer of a different runtime type never matches.

mod literal;
mod matcher;

pub use literal::{ConditionKind, Literal};
pub use matcher::Condition;
