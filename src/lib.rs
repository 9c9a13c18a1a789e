// SPDX-License-Identifier: MIT

pub mod config;
pub mod error;
pub mod tree;

pub use error::{DtreeError, TreeError};
pub use tree::{Answers, Decision, Engine, EngineConfig, Literal, Node, Tree};
