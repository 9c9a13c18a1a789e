// SPDX-License-Identifier: MIT

//! Typed literals and condition kinds

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::TreeError;

/// Largest integer magnitude an `f64` holds without rounding (2^53)
pub const MAX_EXACT_INTEGER: i64 = 1 << 53;

/// Scalar values carried by conditions and answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// Name of the runtime type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Bool(_) => "bool",
            Literal::Number(_) => "number",
            Literal::String(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER as f64 => {
                Value::from(*n as i64)
            }
            Literal::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::String(s) => Value::String(s.clone()),
        }
    }
}

impl TryFrom<&Value> for Literal {
    type Error = String;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(Literal::Bool(*b)),
            Value::Number(n) if n.is_f64() => n
                .as_f64()
                .map(Literal::Number)
                .ok_or_else(|| format!("number {} is not representable", n)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Literal::try_from(i),
                None => Err(format!("integer {} is not exactly representable", n)),
            },
            Value::String(s) => Ok(Literal::String(s.clone())),
            Value::Null => Err("value is null".to_string()),
            Value::Array(_) => Err("arrays are not scalar literals".to_string()),
            Value::Object(_) => Err("objects are not scalar literals".to_string()),
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

/// Integers outside +/-2^53 would silently round, so they are refused
impl TryFrom<i64> for Literal {
    type Error = String;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        if n.unsigned_abs() > MAX_EXACT_INTEGER as u64 {
            return Err(format!("integer {} is not exactly representable", n));
        }
        Ok(Literal::Number(n as f64))
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "'{}'", s),
        }
    }
}

/// Recognized condition types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    /// Boolean equality; the literal must be a bool
    Bool,
    /// Same-type equality on any scalar literal
    Comparison,
}

impl ConditionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Bool => "bool",
            ConditionKind::Comparison => "comparison",
        }
    }
}

impl FromStr for ConditionKind {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(ConditionKind::Bool),
            "comparison" => Ok(ConditionKind::Comparison),
            "" => Err(TreeError::invalid_condition("condition type is empty")),
            other => Err(TreeError::invalid_condition(format!(
                "unknown condition type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
